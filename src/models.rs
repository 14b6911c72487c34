use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed string enum: serde spelling, `FromStr`, `Display`,
/// a display label and the full variant list in declaration order.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// The variant after `self`, wrapping around.
            pub fn cycle_next(self) -> Self {
                let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
                Self::ALL[(idx + 1) % Self::ALL.len()]
            }

            pub fn cycle_prev(self) -> Self {
                let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
                Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle) || v.label().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

string_enum! {
    /// Pipeline stage. Any stage may move to any other.
    ApplicationStatus, "status" {
        Saved => "saved", "Saved";
        Applied => "applied", "Applied";
        Interview => "interview", "Interview";
        Offer => "offer", "Offer";
        Rejected => "rejected", "Rejected";
    }
}

string_enum! {
    JobCategory, "category" {
        SoftwareDeveloper => "Software Developer", "Software Developer";
        Design => "Design", "Design";
        Data => "Data", "Data";
        Product => "Product", "Product";
        Marketing => "Marketing", "Marketing";
        Other => "Other", "Other";
    }
}

string_enum! {
    JobMode, "job mode" {
        Onsite => "onsite", "On-site";
        Remote => "remote", "Remote";
        Hybrid => "hybrid", "Hybrid";
    }
}

string_enum! {
    InterviewType, "interview type" {
        Phone => "phone", "Phone";
        Video => "video", "Video";
        Onsite => "onsite", "On-site";
    }
}

string_enum! {
    InterviewStatus, "interview status" {
        Upcoming => "upcoming", "Upcoming";
        Completed => "completed", "Completed";
        Cancelled => "cancelled", "Cancelled";
    }
}

string_enum! {
    ReminderCategory, "reminder category" {
        FollowUp => "follow-up", "Follow-up";
        Deadline => "deadline", "Deadline";
        InterviewPrep => "interview-prep", "Interview prep";
    }
}

impl Default for JobMode {
    fn default() -> Self {
        JobMode::Onsite
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub status: ApplicationStatus,
    pub salary: i64, // per year
    pub category: JobCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruiter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruiter_email: Option<String>,
    pub resume_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_type: Option<InterviewType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_status: Option<InterviewStatus>,
    #[serde(default)]
    pub job_mode: JobMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_applied: Option<NaiveDateTime>,
}

/// An application as submitted by a form, before the store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub location: String,
    pub status: ApplicationStatus,
    pub salary: i64,
    pub category: JobCategory,
    pub recruiter_name: Option<String>,
    pub recruiter_email: Option<String>,
    pub resume_version: String,
    pub job_description_link: Option<String>,
    pub notes: Option<String>,
    pub interview_date: Option<NaiveDateTime>,
    pub interview_type: Option<InterviewType>,
    pub interview_status: Option<InterviewStatus>,
    pub job_mode: JobMode,
    pub date_applied: Option<NaiveDateTime>,
}

impl NewApplication {
    pub fn new(company: &str, role: &str, category: JobCategory) -> Self {
        Self {
            company: company.to_string(),
            role: role.to_string(),
            location: String::new(),
            status: ApplicationStatus::Saved,
            salary: 0,
            category,
            recruiter_name: None,
            recruiter_email: None,
            resume_version: String::new(),
            job_description_link: None,
            notes: None,
            interview_date: None,
            interview_type: None,
            interview_status: None,
            job_mode: JobMode::default(),
            date_applied: None,
        }
    }

    pub fn into_application(self, id: String, created_at: NaiveDateTime) -> Application {
        Application {
            id,
            company: self.company,
            role: self.role,
            location: self.location,
            status: self.status,
            salary: self.salary,
            category: self.category,
            recruiter_name: self.recruiter_name,
            recruiter_email: self.recruiter_email,
            resume_version: self.resume_version,
            job_description_link: self.job_description_link,
            notes: self.notes,
            created_at,
            interview_date: self.interview_date,
            interview_type: self.interview_type,
            interview_status: self.interview_status,
            job_mode: self.job_mode,
            date_applied: self.date_applied,
        }
    }
}

/// Partial update for an [`Application`]. `None` leaves a field alone;
/// for optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub salary: Option<i64>,
    pub category: Option<JobCategory>,
    pub recruiter_name: Option<Option<String>>,
    pub recruiter_email: Option<Option<String>>,
    pub resume_version: Option<String>,
    pub job_description_link: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub interview_date: Option<Option<NaiveDateTime>>,
    pub interview_type: Option<Option<InterviewType>>,
    pub interview_status: Option<Option<InterviewStatus>>,
    pub job_mode: Option<JobMode>,
    pub date_applied: Option<Option<NaiveDateTime>>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, app: &mut Application) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut app.company, self.company);
        set(&mut app.role, self.role);
        set(&mut app.location, self.location);
        set(&mut app.status, self.status);
        set(&mut app.salary, self.salary);
        set(&mut app.category, self.category);
        set(&mut app.recruiter_name, self.recruiter_name);
        set(&mut app.recruiter_email, self.recruiter_email);
        set(&mut app.resume_version, self.resume_version);
        set(&mut app.job_description_link, self.job_description_link);
        set(&mut app.notes, self.notes);
        set(&mut app.interview_date, self.interview_date);
        set(&mut app.interview_type, self.interview_type);
        set(&mut app.interview_status, self.interview_status);
        set(&mut app.job_mode, self.job_mode);
        set(&mut app.date_applied, self.date_applied);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub category: ReminderCategory,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>, // may dangle
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub category: ReminderCategory,
    pub completed: bool,
    pub application_id: Option<String>,
}

impl NewReminder {
    pub fn into_reminder(self, id: String) -> Reminder {
        Reminder {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            category: self.category,
            completed: self.completed,
            application_id: self.application_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDateTime>,
    pub category: Option<ReminderCategory>,
    pub completed: Option<bool>,
    pub application_id: Option<Option<String>>,
}

impl ReminderPatch {
    pub fn apply(self, rem: &mut Reminder) {
        if let Some(title) = self.title {
            rem.title = title;
        }
        if let Some(description) = self.description {
            rem.description = description;
        }
        if let Some(date) = self.date {
            rem.date = date;
        }
        if let Some(category) = self.category {
            rem.category = category;
        }
        if let Some(completed) = self.completed {
            rem.completed = completed;
        }
        if let Some(application_id) = self.application_id {
            rem.application_id = application_id;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Interview,
    Reminder,
    Deadline,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Interview => "interview",
            EventKind::Reminder => "reminder",
            EventKind::Deadline => "deadline",
        }
    }
}

/// Synthesized from applications and reminders on every read; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDateTime,
    pub kind: EventKind,
    pub application_id: Option<String>,
    pub reminder_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notifications {
    pub email: bool,
    pub push: bool,
    pub reminders: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            reminders: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub notifications: Notifications,
}

impl UserProfile {
    /// Up to two uppercase initials, e.g. "Alex Thompson" -> "AT".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parse_accepts_wire_and_label() {
        assert_eq!("interview".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Interview));
        assert_eq!("OFFER".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Offer));
        assert_eq!("software developer".parse::<JobCategory>(), Ok(JobCategory::SoftwareDeveloper));
        assert_eq!("follow-up".parse::<ReminderCategory>(), Ok(ReminderCategory::FollowUp));
        assert_eq!("On-site".parse::<InterviewType>(), Ok(InterviewType::Onsite));
    }

    #[test]
    fn test_enum_parse_rejects_unknown() {
        let err = "pending".parse::<ApplicationStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
        assert_eq!(err.to_string(), "unknown status 'pending'");
    }

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(ApplicationStatus::Rejected.cycle_next(), ApplicationStatus::Saved);
        assert_eq!(ApplicationStatus::Saved.cycle_prev(), ApplicationStatus::Rejected);
        assert_eq!(ApplicationStatus::Applied.cycle_next(), ApplicationStatus::Interview);
    }

    #[test]
    fn test_enum_serde_spelling() {
        let json = serde_json::to_string(&ReminderCategory::InterviewPrep).unwrap();
        assert_eq!(json, "\"interview-prep\"");
        let cat: JobCategory = serde_json::from_str("\"Software Developer\"").unwrap();
        assert_eq!(cat, JobCategory::SoftwareDeveloper);
    }

    #[test]
    fn test_patch_clears_optional_field() {
        let created = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut app = NewApplication::new("Google", "SWE Intern", JobCategory::SoftwareDeveloper)
            .into_application("1".to_string(), created);
        app.notes = Some("Second round".to_string());

        ApplicationPatch {
            notes: Some(None),
            salary: Some(120_000),
            ..ApplicationPatch::default()
        }
        .apply(&mut app);

        assert_eq!(app.notes, None);
        assert_eq!(app.salary, 120_000);
        assert_eq!(app.company, "Google");
    }

    #[test]
    fn test_profile_initials() {
        let profile = UserProfile {
            name: "alex q thompson".to_string(),
            email: "a@example.com".to_string(),
            phone: None,
            linkedin_url: None,
            notifications: Notifications::default(),
        };
        assert_eq!(profile.initials(), "AQ");
    }
}
