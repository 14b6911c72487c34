//! Editable form state for applications, reminders and interviews.
//!
//! Forms hold raw field text until submit. Submitting validates the minimum
//! (required fields, parseable dates) and then writes through the store; a
//! refused submit leaves the store untouched.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{
    Application, ApplicationPatch, ApplicationStatus, InterviewStatus, InterviewType, JobCategory,
    JobMode, NewApplication, NewReminder, Reminder, ReminderCategory, ReminderPatch,
};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid {field}: '{value}'")]
    Invalid { field: &'static str, value: String },
}

/// Field-level access used by the terminal UI to render and edit any form.
pub trait Form {
    fn title(&self) -> &'static str;

    fn labels(&self) -> &'static [&'static str];

    fn display(&self, index: usize, store: &Store) -> String;

    fn is_choice(&self, index: usize) -> bool;

    /// The text buffer behind a free-text field; `None` for choice fields.
    fn text_mut(&mut self, index: usize) -> Option<&mut String>;

    /// Steps a choice field forward or backward. No-op on text fields.
    fn cycle(&mut self, index: usize, forward: bool, store: &Store);

    /// Validates and writes into the store. Returns the id of the record
    /// that was created or updated.
    fn submit(&self, store: &mut Store) -> Result<String, FormError>;
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn require(value: &str, field: &'static str) -> Result<String, FormError> {
    blank_to_none(value).ok_or(FormError::Required(field))
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::Invalid {
        field,
        value: value.to_string(),
    })
}

fn parse_time(value: &str) -> Result<NaiveTime, FormError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| FormError::Invalid {
        field: "time",
        value: value.to_string(),
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Steps through `options` (plus an empty slot when `allow_none`).
fn cycle_option(current: Option<&str>, options: &[String], allow_none: bool, forward: bool) -> Option<String> {
    let mut slots: Vec<Option<&str>> = Vec::with_capacity(options.len() + 1);
    if allow_none {
        slots.push(None);
    }
    slots.extend(options.iter().map(|o| Some(o.as_str())));
    if slots.is_empty() {
        return current.map(str::to_string);
    }
    let idx = slots.iter().position(|s| *s == current);
    let next = match (idx, forward) {
        (Some(i), true) => (i + 1) % slots.len(),
        (Some(i), false) => (i + slots.len() - 1) % slots.len(),
        (None, _) => 0,
    };
    slots[next].map(str::to_string)
}

fn application_label(store: &Store, id: Option<&str>) -> String {
    match id {
        None => "(none)".to_string(),
        Some(id) => match store.application(id) {
            Some(app) => format!("{} - {}", app.company, app.role),
            None => format!("#{} (missing)", id),
        },
    }
}

// --- Application form ---

#[derive(Debug, Clone)]
pub struct ApplicationForm {
    editing: Option<String>,
    pub company: String,
    pub role: String,
    pub location: String,
    pub salary: String,
    pub category: JobCategory,
    pub status: ApplicationStatus,
    pub job_mode: JobMode,
    pub date_applied: String,
    pub job_description_link: String,
    pub notes: String,
    pub resume_version: String,
}

impl ApplicationForm {
    const LABELS: &'static [&'static str] = &[
        "Company *",
        "Role *",
        "Location",
        "Salary",
        "Category",
        "Status",
        "Job mode",
        "Date applied",
        "Job link",
        "Notes",
        "Resume",
    ];

    pub fn new(store: &Store, today: NaiveDate) -> Self {
        Self {
            editing: None,
            company: String::new(),
            role: String::new(),
            location: String::new(),
            salary: String::new(),
            category: JobCategory::SoftwareDeveloper,
            status: ApplicationStatus::Saved,
            job_mode: JobMode::Onsite,
            date_applied: format_date(today),
            job_description_link: String::new(),
            notes: String::new(),
            resume_version: store.resume_versions().first().cloned().unwrap_or_default(),
        }
    }

    pub fn edit(app: &Application) -> Self {
        Self {
            editing: Some(app.id.clone()),
            company: app.company.clone(),
            role: app.role.clone(),
            location: app.location.clone(),
            salary: app.salary.to_string(),
            category: app.category,
            status: app.status,
            job_mode: app.job_mode,
            date_applied: app.date_applied.map(|d| format_date(d.date())).unwrap_or_default(),
            job_description_link: app.job_description_link.clone().unwrap_or_default(),
            notes: app.notes.clone().unwrap_or_default(),
            resume_version: app.resume_version.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn date_applied(&self) -> Result<Option<NaiveDateTime>, FormError> {
        if self.date_applied.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_date(&self.date_applied, "date applied")?.and_time(NaiveTime::MIN)))
    }
}

impl Form for ApplicationForm {
    fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Application"
        } else {
            "Add Application"
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        Self::LABELS
    }

    fn display(&self, index: usize, _store: &Store) -> String {
        match index {
            0 => self.company.clone(),
            1 => self.role.clone(),
            2 => self.location.clone(),
            3 => self.salary.clone(),
            4 => self.category.label().to_string(),
            5 => self.status.label().to_string(),
            6 => self.job_mode.label().to_string(),
            7 => self.date_applied.clone(),
            8 => self.job_description_link.clone(),
            9 => self.notes.clone(),
            10 => self.resume_version.clone(),
            _ => String::new(),
        }
    }

    fn is_choice(&self, index: usize) -> bool {
        matches!(index, 4 | 5 | 6 | 10)
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.company),
            1 => Some(&mut self.role),
            2 => Some(&mut self.location),
            3 => Some(&mut self.salary),
            7 => Some(&mut self.date_applied),
            8 => Some(&mut self.job_description_link),
            9 => Some(&mut self.notes),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize, forward: bool, store: &Store) {
        match (index, forward) {
            (4, true) => self.category = self.category.cycle_next(),
            (4, false) => self.category = self.category.cycle_prev(),
            (5, true) => self.status = self.status.cycle_next(),
            (5, false) => self.status = self.status.cycle_prev(),
            (6, true) => self.job_mode = self.job_mode.cycle_next(),
            (6, false) => self.job_mode = self.job_mode.cycle_prev(),
            (10, _) => {
                self.resume_version =
                    cycle_option(Some(self.resume_version.as_str()), store.resume_versions(), false, forward)
                        .unwrap_or_default();
            }
            _ => {}
        }
    }

    fn submit(&self, store: &mut Store) -> Result<String, FormError> {
        let company = require(&self.company, "company")?;
        let role = require(&self.role, "role")?;
        // Unparseable salary is recorded as 0 rather than refused.
        let salary = self.salary.trim().replace([',', '$'], "").parse::<i64>().unwrap_or(0);
        let date_applied = self.date_applied()?;

        match &self.editing {
            Some(id) => {
                let patch = ApplicationPatch {
                    company: Some(company),
                    role: Some(role),
                    location: Some(self.location.trim().to_string()),
                    salary: Some(salary),
                    category: Some(self.category),
                    status: Some(self.status),
                    job_mode: Some(self.job_mode),
                    date_applied: Some(date_applied),
                    job_description_link: Some(blank_to_none(&self.job_description_link)),
                    notes: Some(blank_to_none(&self.notes)),
                    resume_version: Some(self.resume_version.clone()),
                    ..ApplicationPatch::default()
                };
                store.update_application(id, patch);
                info!(id = %id, "application form saved");
                Ok(id.clone())
            }
            None => {
                let mut draft = NewApplication::new(&company, &role, self.category);
                draft.location = self.location.trim().to_string();
                draft.salary = salary;
                draft.status = self.status;
                draft.job_mode = self.job_mode;
                draft.date_applied = date_applied;
                draft.job_description_link = blank_to_none(&self.job_description_link);
                draft.notes = blank_to_none(&self.notes);
                draft.resume_version = self.resume_version.clone();
                let id = store.add_application(draft);
                info!(id = %id, "application form added");
                Ok(id)
            }
        }
    }
}

// --- Reminder form ---

#[derive(Debug, Clone)]
pub struct ReminderForm {
    editing: Option<Reminder>,
    pub title: String,
    pub description: String,
    pub date: String,
    pub category: ReminderCategory,
    pub application_id: Option<String>,
}

impl ReminderForm {
    const LABELS: &'static [&'static str] = &["Title *", "Description", "Date", "Category", "Application"];

    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            date: format_date(today),
            category: ReminderCategory::FollowUp,
            application_id: None,
        }
    }

    pub fn edit(reminder: &Reminder) -> Self {
        Self {
            editing: Some(reminder.clone()),
            title: reminder.title.clone(),
            description: reminder.description.clone().unwrap_or_default(),
            date: format_date(reminder.date.date()),
            category: reminder.category,
            application_id: reminder.application_id.clone(),
        }
    }

    /// Keeps the time of day of the reminder being edited.
    fn date(&self) -> Result<NaiveDateTime, FormError> {
        let day = parse_date(&self.date, "date")?;
        let time = self.editing.as_ref().map(|r| r.date.time()).unwrap_or(NaiveTime::MIN);
        Ok(day.and_time(time))
    }
}

impl Form for ReminderForm {
    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Reminder"
        } else {
            "Add Reminder"
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        Self::LABELS
    }

    fn display(&self, index: usize, store: &Store) -> String {
        match index {
            0 => self.title.clone(),
            1 => self.description.clone(),
            2 => self.date.clone(),
            3 => self.category.label().to_string(),
            4 => application_label(store, self.application_id.as_deref()),
            _ => String::new(),
        }
    }

    fn is_choice(&self, index: usize) -> bool {
        matches!(index, 3 | 4)
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.title),
            1 => Some(&mut self.description),
            2 => Some(&mut self.date),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize, forward: bool, store: &Store) {
        match index {
            3 if forward => self.category = self.category.cycle_next(),
            3 => self.category = self.category.cycle_prev(),
            4 => {
                let ids: Vec<String> = store.applications().iter().map(|a| a.id.clone()).collect();
                self.application_id = cycle_option(self.application_id.as_deref(), &ids, true, forward);
            }
            _ => {}
        }
    }

    fn submit(&self, store: &mut Store) -> Result<String, FormError> {
        let title = require(&self.title, "title")?;
        let date = self.date()?;

        match &self.editing {
            Some(existing) => {
                let patch = ReminderPatch {
                    title: Some(title),
                    description: Some(blank_to_none(&self.description)),
                    date: Some(date),
                    category: Some(self.category),
                    application_id: Some(self.application_id.clone()),
                    ..ReminderPatch::default()
                };
                store.update_reminder(&existing.id, patch);
                info!(id = %existing.id, "reminder form saved");
                Ok(existing.id.clone())
            }
            None => {
                let id = store.add_reminder(NewReminder {
                    title,
                    description: blank_to_none(&self.description),
                    date,
                    category: self.category,
                    completed: false,
                    application_id: self.application_id.clone(),
                });
                info!(id = %id, "reminder form added");
                Ok(id)
            }
        }
    }
}

// --- Interview form ---

#[derive(Debug, Clone)]
pub struct InterviewForm {
    editing: bool,
    pub application_id: Option<String>,
    pub date: String,
    pub time: String,
    pub interview_type: InterviewType,
    pub interview_status: InterviewStatus,
    pub recruiter_name: String,
    pub recruiter_email: String,
    pub notes: String,
}

impl InterviewForm {
    const LABELS: &'static [&'static str] = &[
        "Application *",
        "Date",
        "Time (HH:MM)",
        "Type",
        "Status",
        "Recruiter",
        "Recruiter email",
        "Notes",
    ];

    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: false,
            application_id: None,
            date: format_date(today),
            time: "10:00".to_string(),
            interview_type: InterviewType::Video,
            interview_status: InterviewStatus::Upcoming,
            recruiter_name: String::new(),
            recruiter_email: String::new(),
            notes: String::new(),
        }
    }

    /// Prefills from `app`. Counts as an edit only if an interview is
    /// already scheduled.
    pub fn for_application(app: &Application, today: NaiveDate) -> Self {
        let when = app.interview_date.unwrap_or_else(|| today.and_hms_opt(10, 0, 0).unwrap_or_default());
        Self {
            editing: app.interview_date.is_some(),
            application_id: Some(app.id.clone()),
            date: format_date(when.date()),
            time: when.format("%H:%M").to_string(),
            interview_type: app.interview_type.unwrap_or(InterviewType::Video),
            interview_status: app.interview_status.unwrap_or(InterviewStatus::Upcoming),
            recruiter_name: app.recruiter_name.clone().unwrap_or_default(),
            recruiter_email: app.recruiter_email.clone().unwrap_or_default(),
            notes: app.notes.clone().unwrap_or_default(),
        }
    }

    /// Applications that can receive a new interview: those without one,
    /// plus the application currently being edited.
    pub fn candidates(&self, store: &Store) -> Vec<String> {
        store
            .applications()
            .iter()
            .filter(|a| a.interview_date.is_none() || (self.editing && self.application_id.as_deref() == Some(a.id.as_str())))
            .map(|a| a.id.clone())
            .collect()
    }
}

impl Form for InterviewForm {
    fn title(&self) -> &'static str {
        if self.editing {
            "Edit Interview"
        } else {
            "Schedule Interview"
        }
    }

    fn labels(&self) -> &'static [&'static str] {
        Self::LABELS
    }

    fn display(&self, index: usize, store: &Store) -> String {
        match index {
            0 => application_label(store, self.application_id.as_deref()),
            1 => self.date.clone(),
            2 => self.time.clone(),
            3 => self.interview_type.label().to_string(),
            4 => self.interview_status.label().to_string(),
            5 => self.recruiter_name.clone(),
            6 => self.recruiter_email.clone(),
            7 => self.notes.clone(),
            _ => String::new(),
        }
    }

    fn is_choice(&self, index: usize) -> bool {
        matches!(index, 0 | 3 | 4)
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            1 => Some(&mut self.date),
            2 => Some(&mut self.time),
            5 => Some(&mut self.recruiter_name),
            6 => Some(&mut self.recruiter_email),
            7 => Some(&mut self.notes),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize, forward: bool, store: &Store) {
        match index {
            // The target of an existing interview is fixed.
            0 if !self.editing => {
                let candidates = self.candidates(store);
                self.application_id = cycle_option(self.application_id.as_deref(), &candidates, false, forward);
            }
            3 if forward => self.interview_type = self.interview_type.cycle_next(),
            3 => self.interview_type = self.interview_type.cycle_prev(),
            4 if forward => self.interview_status = self.interview_status.cycle_next(),
            4 => self.interview_status = self.interview_status.cycle_prev(),
            _ => {}
        }
    }

    fn submit(&self, store: &mut Store) -> Result<String, FormError> {
        let id = self
            .application_id
            .clone()
            .ok_or(FormError::Required("application"))?;
        let when = parse_date(&self.date, "date")?.and_time(parse_time(&self.time)?);

        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Interview),
            interview_date: Some(Some(when)),
            interview_type: Some(Some(self.interview_type)),
            interview_status: Some(Some(self.interview_status)),
            recruiter_name: Some(blank_to_none(&self.recruiter_name)),
            recruiter_email: Some(blank_to_none(&self.recruiter_email)),
            notes: Some(blank_to_none(&self.notes)),
            ..ApplicationPatch::default()
        };
        if !store.update_application(&id, patch) {
            debug!(id = %id, "interview target no longer exists");
            return Err(FormError::Invalid {
                field: "application",
                value: id,
            });
        }
        info!(id = %id, at = %when, "interview form saved");
        Ok(id)
    }
}
