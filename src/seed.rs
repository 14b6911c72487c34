use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::models::{
    Application, ApplicationStatus, InterviewStatus, InterviewType, JobCategory, JobMode,
    Notifications, Reminder, ReminderCategory, UserProfile,
};
use crate::store::Store;

/// Import/export document: the whole session as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub resume_versions: Vec<String>,
    #[serde(default = "mock_profile")]
    pub profile: UserProfile,
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid snapshot JSON in {}", path.display()))?;
    if let Some(id) = first_duplicate(snapshot.applications.iter().map(|a| a.id.as_str())) {
        bail!("Duplicate application id '{}' in {}", id, path.display());
    }
    if let Some(id) = first_duplicate(snapshot.reminders.iter().map(|r| r.id.as_str())) {
        bail!("Duplicate reminder id '{}' in {}", id, path.display());
    }
    info!(
        path = %path.display(),
        applications = snapshot.applications.len(),
        reminders = snapshot.reminders.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn first_duplicate<'a>(mut ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

/// Builds the starting store: the snapshot at `path` if given, otherwise
/// the built-in sample data.
pub fn initial_store(path: Option<&Path>) -> Result<Store> {
    match path {
        Some(p) => Ok(Store::from_snapshot(load_snapshot(p)?)),
        None => Ok(mock_store()),
    }
}

pub fn mock_store() -> Store {
    Store::from_snapshot(mock_snapshot())
}

pub fn mock_snapshot() -> Snapshot {
    Snapshot {
        applications: mock_applications(),
        reminders: mock_reminders(),
        resume_versions: vec!["v2.1".to_string(), "v2.0".to_string(), "v1.9".to_string()],
        profile: mock_profile(),
    }
}

pub fn mock_profile() -> UserProfile {
    UserProfile {
        name: "Alex Thompson".to_string(),
        email: "alex.thompson@email.com".to_string(),
        phone: Some("+1 (555) 123-4567".to_string()),
        linkedin_url: Some("https://linkedin.com/in/alexthompson".to_string()),
        notifications: Notifications::default(),
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

struct Sample {
    id: &'static str,
    company: &'static str,
    role: &'static str,
    location: &'static str,
    status: ApplicationStatus,
    salary: i64,
    category: JobCategory,
    recruiter: Option<(&'static str, &'static str)>,
    resume: &'static str,
    link: Option<&'static str>,
    notes: Option<&'static str>,
    created: (u32, u32),
    interview: Option<((u32, u32), InterviewType)>,
}

impl Sample {
    fn build(self) -> Application {
        let created_at = day(2024, self.created.0, self.created.1);
        Application {
            id: self.id.to_string(),
            company: self.company.to_string(),
            role: self.role.to_string(),
            location: self.location.to_string(),
            status: self.status,
            salary: self.salary,
            category: self.category,
            recruiter_name: self.recruiter.map(|(name, _)| name.to_string()),
            recruiter_email: self.recruiter.map(|(_, email)| email.to_string()),
            resume_version: self.resume.to_string(),
            job_description_link: self.link.map(str::to_string),
            notes: self.notes.map(str::to_string),
            created_at,
            interview_date: self.interview.map(|((m, d), _)| day(2024, m, d)),
            interview_type: self.interview.map(|(_, kind)| kind),
            interview_status: self.interview.map(|_| InterviewStatus::Upcoming),
            job_mode: JobMode::Onsite,
            date_applied: Some(created_at),
        }
    }
}

fn mock_applications() -> Vec<Application> {
    use ApplicationStatus::*;
    use JobCategory::*;

    [
        Sample {
            id: "1",
            company: "Google",
            role: "Software Engineer Intern",
            location: "Mountain View, CA",
            status: Interview,
            salary: 120_000,
            category: SoftwareDeveloper,
            recruiter: Some(("Sarah Johnson", "sarah.j@google.com")),
            resume: "v2.1",
            link: Some("https://careers.google.com"),
            notes: Some("Second round scheduled"),
            created: (1, 15),
            interview: Some(((2, 10), InterviewType::Video)),
        },
        Sample {
            id: "2",
            company: "Meta",
            role: "Product Design Intern",
            location: "Menlo Park, CA",
            status: Applied,
            salary: 110_000,
            category: Design,
            recruiter: Some(("Mike Chen", "mike.c@meta.com")),
            resume: "v2.0",
            link: Some("https://metacareers.com"),
            notes: None,
            created: (1, 20),
            interview: None,
        },
        Sample {
            id: "3",
            company: "Amazon",
            role: "Data Science Intern",
            location: "Seattle, WA",
            status: Saved,
            salary: 115_000,
            category: Data,
            recruiter: None,
            resume: "v2.1",
            link: Some("https://amazon.jobs"),
            notes: None,
            created: (1, 22),
            interview: None,
        },
        Sample {
            id: "4",
            company: "Microsoft",
            role: "Software Engineer Intern",
            location: "Redmond, WA",
            status: Offer,
            salary: 125_000,
            category: SoftwareDeveloper,
            recruiter: Some(("Emily Davis", "emily.d@microsoft.com")),
            resume: "v2.1",
            link: None,
            notes: Some("Offer received! Need to respond by Feb 15"),
            created: (1, 10),
            interview: None,
        },
        Sample {
            id: "5",
            company: "Apple",
            role: "UX Design Intern",
            location: "Cupertino, CA",
            status: Rejected,
            salary: 118_000,
            category: Design,
            recruiter: None,
            resume: "v1.9",
            link: None,
            notes: None,
            created: (1, 5),
            interview: None,
        },
        Sample {
            id: "6",
            company: "Netflix",
            role: "Frontend Engineer Intern",
            location: "Los Gatos, CA",
            status: Interview,
            salary: 130_000,
            category: SoftwareDeveloper,
            recruiter: Some(("Alex Wong", "alex.w@netflix.com")),
            resume: "v2.1",
            link: None,
            notes: Some("Technical round next week"),
            created: (1, 18),
            interview: Some(((2, 5), InterviewType::Video)),
        },
        Sample {
            id: "7",
            company: "Spotify",
            role: "Data Analyst Intern",
            location: "New York, NY",
            status: Applied,
            salary: 95_000,
            category: Data,
            recruiter: None,
            resume: "v2.0",
            link: None,
            notes: None,
            created: (1, 25),
            interview: None,
        },
        Sample {
            id: "8",
            company: "Airbnb",
            role: "Product Manager Intern",
            location: "San Francisco, CA",
            status: Saved,
            salary: 105_000,
            category: Product,
            recruiter: None,
            resume: "v2.1",
            link: None,
            notes: None,
            created: (1, 28),
            interview: None,
        },
        Sample {
            id: "9",
            company: "Stripe",
            role: "Backend Engineer Intern",
            location: "San Francisco, CA",
            status: Interview,
            salary: 140_000,
            category: SoftwareDeveloper,
            recruiter: Some(("Lisa Park", "lisa.p@stripe.com")),
            resume: "v2.1",
            link: None,
            notes: None,
            created: (1, 12),
            interview: Some(((2, 8), InterviewType::Onsite)),
        },
        Sample {
            id: "10",
            company: "Slack",
            role: "Marketing Intern",
            location: "San Francisco, CA",
            status: Applied,
            salary: 75_000,
            category: Marketing,
            recruiter: None,
            resume: "v2.0",
            link: None,
            notes: None,
            created: (1, 26),
            interview: None,
        },
    ]
    .into_iter()
    .map(Sample::build)
    .collect()
}

fn mock_reminders() -> Vec<Reminder> {
    let rem = |id: &str,
               title: &str,
               description: &str,
               date: NaiveDateTime,
               category: ReminderCategory,
               completed: bool,
               app: &str| Reminder {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        date,
        category,
        completed,
        application_id: Some(app.to_string()),
    };

    vec![
        rem(
            "r1",
            "Follow up with Google recruiter",
            "Send thank you email after interview",
            day(2024, 2, 11),
            ReminderCategory::FollowUp,
            false,
            "1",
        ),
        rem(
            "r2",
            "Meta application deadline",
            "Submit final portfolio pieces",
            day(2024, 2, 15),
            ReminderCategory::Deadline,
            false,
            "2",
        ),
        rem(
            "r3",
            "Prepare for Netflix technical",
            "Review React hooks and system design",
            day(2024, 2, 4),
            ReminderCategory::InterviewPrep,
            false,
            "6",
        ),
        rem(
            "r4",
            "Respond to Microsoft offer",
            "Deadline to accept/decline offer",
            day(2024, 2, 15),
            ReminderCategory::Deadline,
            false,
            "4",
        ),
        rem(
            "r5",
            "Call Stripe recruiter",
            "Confirm interview logistics",
            day(2024, 2, 7),
            ReminderCategory::FollowUp,
            true,
            "9",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_data_shape() {
        let snapshot = mock_snapshot();
        assert_eq!(snapshot.applications.len(), 10);
        assert_eq!(snapshot.reminders.len(), 5);
        assert!(snapshot.applications.iter().all(|a| a.job_mode == JobMode::Onsite));
        assert!(snapshot.applications.iter().all(|a| a.date_applied == Some(a.created_at)));
    }

    #[test]
    fn test_snapshot_json_uses_camel_case() {
        let json = serde_json::to_string(&mock_snapshot()).unwrap();
        assert!(json.contains("\"resumeVersions\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"interviewStatus\":\"upcoming\""));
        assert!(json.contains("\"category\":\"follow-up\""));
    }

    #[test]
    fn test_snapshot_parses_minimal_document() {
        let json = r#"{
            "applications": [{
                "id": "a1",
                "company": "Figma",
                "role": "Design Intern",
                "location": "Remote",
                "status": "applied",
                "salary": 90000,
                "category": "Design",
                "resumeVersion": "v1",
                "createdAt": "2024-03-01T10:00:00"
            }]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.applications.len(), 1);
        assert_eq!(snapshot.applications[0].job_mode, JobMode::Onsite);
        assert!(snapshot.reminders.is_empty());
        assert_eq!(snapshot.profile.name, "Alex Thompson");
    }

    fn write_temp(name: &str, snapshot: &Snapshot) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pipeline-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, serde_json::to_string(snapshot).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_snapshot_reads_exported_document() {
        let path = write_temp("export", &mock_snapshot());
        let loaded = load_snapshot(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.applications, mock_snapshot().applications);
        assert_eq!(loaded.reminders.len(), 5);
    }

    #[test]
    fn test_load_snapshot_rejects_duplicate_ids() {
        let mut snapshot = mock_snapshot();
        let copy = snapshot.applications[0].clone();
        snapshot.applications.push(copy);
        let path = write_temp("dup-app", &snapshot);
        let err = load_snapshot(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Duplicate application id '1'"));

        let mut snapshot = mock_snapshot();
        snapshot.reminders[1].id = "r1".to_string();
        let path = write_temp("dup-rem", &snapshot);
        let err = load_snapshot(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Duplicate reminder id 'r1'"));
    }

    #[test]
    fn test_load_snapshot_reports_missing_file() {
        let err = load_snapshot(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot"));
    }
}
