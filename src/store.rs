use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::models::{
    Application, ApplicationPatch, ApplicationStatus, NewApplication, NewReminder, Reminder,
    ReminderPatch, UserProfile,
};
use crate::seed::Snapshot;

const DEFAULT_RESUME_VERSION: &str = "v2.1";

/// In-memory record store. The only mutable state in the program; every
/// view is derived from it on read.
///
/// Operations on unknown ids are silent no-ops. The `bool` they return only
/// reports whether a record matched.
#[derive(Debug, Clone)]
pub struct Store {
    applications: Vec<Application>,
    reminders: Vec<Reminder>,
    resume_versions: Vec<String>,
    profile: UserProfile,
}

impl Store {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            applications: snapshot.applications,
            reminders: snapshot.reminders,
            resume_versions: snapshot.resume_versions,
            profile: snapshot.profile,
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            applications: self.applications.clone(),
            reminders: self.reminders.clone(),
            resume_versions: self.resume_versions.clone(),
            profile: self.profile.clone(),
        }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn resume_versions(&self) -> &[String] {
        &self.resume_versions
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    pub fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    pub fn reminder(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    // --- Application operations ---

    /// Assigns an id and creation timestamp, then prepends the record.
    pub fn add_application(&mut self, draft: NewApplication) -> String {
        self.add_application_at(draft, Local::now().naive_local())
    }

    pub fn add_application_at(&mut self, draft: NewApplication, now: NaiveDateTime) -> String {
        let id = unique_id("app", now, |c| self.application(c).is_some());
        debug!(id = %id, company = %draft.company, "add application");
        self.applications.insert(0, draft.into_application(id.clone(), now));
        id
    }

    pub fn update_application(&mut self, id: &str, patch: ApplicationPatch) -> bool {
        match self.applications.iter_mut().find(|a| a.id == id) {
            Some(app) => {
                patch.apply(app);
                debug!(id, "update application");
                true
            }
            None => {
                debug!(id, "update application: no such id");
                false
            }
        }
    }

    /// Kanban move: a status-only update.
    pub fn move_application(&mut self, id: &str, status: ApplicationStatus) -> bool {
        self.update_application(id, ApplicationPatch::status(status))
    }

    pub fn delete_application(&mut self, id: &str) -> bool {
        let before = self.applications.len();
        self.applications.retain(|a| a.id != id);
        let removed = self.applications.len() != before;
        debug!(id, removed, "delete application");
        removed
    }

    // --- Reminder operations ---

    pub fn add_reminder(&mut self, draft: NewReminder) -> String {
        self.add_reminder_at(draft, Local::now().naive_local())
    }

    pub fn add_reminder_at(&mut self, draft: NewReminder, now: NaiveDateTime) -> String {
        let id = unique_id("rem", now, |c| self.reminder(c).is_some());
        debug!(id = %id, title = %draft.title, "add reminder");
        self.reminders.insert(0, draft.into_reminder(id.clone()));
        id
    }

    pub fn update_reminder(&mut self, id: &str, patch: ReminderPatch) -> bool {
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(rem) => {
                patch.apply(rem);
                debug!(id, "update reminder");
                true
            }
            None => {
                debug!(id, "update reminder: no such id");
                false
            }
        }
    }

    pub fn delete_reminder(&mut self, id: &str) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        let removed = self.reminders.len() != before;
        debug!(id, removed, "delete reminder");
        removed
    }

    pub fn toggle_reminder_complete(&mut self, id: &str) -> bool {
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(rem) => {
                rem.completed = !rem.completed;
                debug!(id, completed = rem.completed, "toggle reminder");
                true
            }
            None => false,
        }
    }

    // --- Resume versions ---

    pub fn add_resume_version(&mut self, version: &str) {
        debug!(version, "add resume version");
        self.resume_versions.insert(0, version.to_string());
    }

    /// Label a new upload gets: the latest `vX.Y` bumped by 0.1.
    pub fn next_resume_version(&self) -> String {
        let latest = self
            .resume_versions
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_RESUME_VERSION);
        let number = parse_version(latest)
            .or_else(|| parse_version(DEFAULT_RESUME_VERSION))
            .unwrap_or(0.0);
        format!("v{:.1}", number + 0.1)
    }

    /// Simulated upload: no file content is read, only a label is recorded.
    pub fn upload_resume(&mut self) -> String {
        let version = self.next_resume_version();
        self.add_resume_version(&version);
        version
    }
}

fn parse_version(label: &str) -> Option<f64> {
    label.trim().trim_start_matches(['v', 'V']).parse::<f64>().ok()
}

fn unique_id(prefix: &str, now: NaiveDateTime, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}-{}", prefix, now.and_utc().timestamp_millis());
    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobCategory, ReminderCategory};
    use crate::seed;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn empty_store() -> Store {
        Store::from_snapshot(Snapshot {
            applications: Vec::new(),
            reminders: Vec::new(),
            resume_versions: Vec::new(),
            profile: seed::mock_profile(),
        })
    }

    fn reminder(title: &str, date: NaiveDateTime) -> NewReminder {
        NewReminder {
            title: title.to_string(),
            description: None,
            date,
            category: ReminderCategory::FollowUp,
            completed: false,
            application_id: None,
        }
    }

    #[test]
    fn test_add_application_prepends_with_unique_id() {
        let mut store = seed::mock_store();
        let before = store.applications().len();
        let now = at(2024, 2, 1);

        let first = store.add_application_at(NewApplication::new("Figma", "Design Intern", JobCategory::Design), now);
        let second = store.add_application_at(NewApplication::new("Figma", "PM Intern", JobCategory::Product), now);

        assert_eq!(store.applications().len(), before + 2);
        assert_ne!(first, second);
        assert_eq!(store.applications()[0].id, second);
        assert_eq!(store.applications()[1].id, first);
        assert_eq!(store.applications()[0].created_at, now);

        let mut ids: Vec<&str> = store.applications().iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.applications().len());
    }

    #[test]
    fn test_update_changes_only_specified_fields() {
        let mut store = seed::mock_store();
        let original = store.application("2").cloned().unwrap();

        let matched = store.update_application(
            "2",
            ApplicationPatch {
                salary: Some(99_000),
                location: Some("Remote".to_string()),
                ..ApplicationPatch::default()
            },
        );

        assert!(matched);
        let updated = store.application("2").unwrap();
        assert_eq!(updated.salary, 99_000);
        assert_eq!(updated.location, "Remote");
        assert_eq!(updated.company, original.company);
        assert_eq!(updated.role, original.role);
        assert_eq!(updated.status, original.status);
        assert_eq!(updated.recruiter_email, original.recruiter_email);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = seed::mock_store();
        let before = store.applications().to_vec();
        assert!(!store.update_application("nope", ApplicationPatch::status(ApplicationStatus::Offer)));
        assert_eq!(store.applications(), before.as_slice());
    }

    #[test]
    fn test_delete_unknown_id_leaves_collection_unchanged() {
        let mut store = seed::mock_store();
        let apps = store.applications().to_vec();
        let rems = store.reminders().to_vec();

        assert!(!store.delete_application("missing"));
        assert!(!store.delete_reminder("missing"));

        assert_eq!(store.applications(), apps.as_slice());
        assert_eq!(store.reminders(), rems.as_slice());
    }

    #[test]
    fn test_delete_removes_matching_record() {
        let mut store = seed::mock_store();
        let before = store.applications().len();
        assert!(store.delete_application("5"));
        assert_eq!(store.applications().len(), before - 1);
        assert!(store.application("5").is_none());
    }

    #[test]
    fn test_move_application_sets_status() {
        let mut store = seed::mock_store();
        assert!(store.move_application("3", ApplicationStatus::Rejected));
        assert_eq!(store.application("3").unwrap().status, ApplicationStatus::Rejected);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = seed::mock_store();
        let original = store.reminder("r5").cloned().unwrap();

        store.toggle_reminder_complete("r5");
        assert_eq!(store.reminder("r5").unwrap().completed, !original.completed);
        store.toggle_reminder_complete("r5");
        assert_eq!(store.reminder("r5").unwrap(), &original);

        assert!(!store.toggle_reminder_complete("missing"));
    }

    #[test]
    fn test_reminder_add_update_delete() {
        let mut store = empty_store();
        let id = store.add_reminder_at(reminder("Email recruiter", at(2024, 2, 3)), at(2024, 2, 1));
        assert_eq!(store.reminders().len(), 1);

        store.update_reminder(
            &id,
            ReminderPatch {
                description: Some(Some("Ask about timeline".to_string())),
                ..ReminderPatch::default()
            },
        );
        let rem = store.reminder(&id).unwrap();
        assert_eq!(rem.description.as_deref(), Some("Ask about timeline"));
        assert_eq!(rem.title, "Email recruiter");

        assert!(store.delete_reminder(&id));
        assert!(store.reminders().is_empty());
    }

    #[test]
    fn test_next_resume_version() {
        let mut store = seed::mock_store();
        assert_eq!(store.resume_versions()[0], "v2.1");
        assert_eq!(store.next_resume_version(), "v2.2");

        let uploaded = store.upload_resume();
        assert_eq!(uploaded, "v2.2");
        assert_eq!(store.resume_versions()[0], "v2.2");
        assert_eq!(store.next_resume_version(), "v2.3");

        let empty = empty_store();
        assert_eq!(empty.next_resume_version(), "v2.2");
    }

    #[test]
    fn test_snapshot_round_trip_preserves_records() {
        let store = seed::mock_store();
        let restored = Store::from_snapshot(store.to_snapshot());
        assert_eq!(restored.applications(), store.applications());
        assert_eq!(restored.reminders(), store.reminders());
        assert_eq!(restored.resume_versions(), store.resume_versions());
    }
}
