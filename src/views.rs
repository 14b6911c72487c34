//! Read-only projections over a store snapshot.
//!
//! Every function here is total and recomputed on each call; nothing is
//! cached between renders.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{Application, ApplicationStatus, InterviewStatus, JobCategory, Reminder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub saved: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Saved => self.saved,
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::Interview => self.interview,
            ApplicationStatus::Offer => self.offer,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    /// `(status, count)` pairs in pipeline order.
    pub fn by_status(&self) -> impl Iterator<Item = (ApplicationStatus, usize)> + '_ {
        ApplicationStatus::ALL.iter().map(|s| (*s, self.get(*s)))
    }

    fn bump(&mut self, status: ApplicationStatus) {
        let slot = match status {
            ApplicationStatus::Saved => &mut self.saved,
            ApplicationStatus::Applied => &mut self.applied,
            ApplicationStatus::Interview => &mut self.interview,
            ApplicationStatus::Offer => &mut self.offer,
            ApplicationStatus::Rejected => &mut self.rejected,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.saved + self.applied + self.interview + self.offer + self.rejected
    }

    /// Everything past the "saved" stage.
    pub fn submitted(&self) -> usize {
        self.applied + self.interview + self.offer + self.rejected
    }
}

pub fn status_counts(apps: &[Application]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for app in apps {
        counts.bump(app.status);
    }
    counts
}

pub fn applications_by_status(apps: &[Application], status: ApplicationStatus) -> Vec<&Application> {
    apps.iter().filter(|a| a.status == status).collect()
}

fn take(limit: Option<usize>) -> usize {
    limit.unwrap_or(usize::MAX)
}

/// Interview-stage applications with an upcoming interview, soonest first.
pub fn upcoming_interviews(apps: &[Application], limit: Option<usize>) -> Vec<&Application> {
    let mut found: Vec<&Application> = apps
        .iter()
        .filter(|a| {
            a.status == ApplicationStatus::Interview
                && a.interview_date.is_some()
                && a.interview_status == Some(InterviewStatus::Upcoming)
        })
        .collect();
    found.sort_by_key(|a| a.interview_date);
    found.truncate(take(limit));
    found
}

/// Incomplete reminders, earliest first.
pub fn pending_reminders(reminders: &[Reminder], limit: Option<usize>) -> Vec<&Reminder> {
    let mut found = reminders_view(reminders, false);
    found.truncate(take(limit));
    found
}

pub fn reminders_view(reminders: &[Reminder], show_completed: bool) -> Vec<&Reminder> {
    let mut found: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| show_completed || !r.completed)
        .collect();
    found.sort_by_key(|r| r.date);
    found
}

/// Per-category counts for categories that occur, in first-seen order.
pub fn category_counts(apps: &[Application]) -> Vec<(JobCategory, usize)> {
    let mut counts: Vec<(JobCategory, usize)> = Vec::new();
    for app in apps {
        match counts.iter_mut().find(|(cat, _)| *cat == app.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((app.category, 1)),
        }
    }
    counts
}

pub fn recent_activity(apps: &[Application], limit: Option<usize>) -> Vec<&Application> {
    let mut found: Vec<&Application> = apps.iter().collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    found.truncate(take(limit));
    found
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub search: String,
    pub category: Option<JobCategory>,
    pub location: Option<String>,
}

impl ApplicationFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category.is_none() && self.location.is_none()
    }

    pub fn matches(&self, app: &Application) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || app.company.to_lowercase().contains(&needle)
            || app.role.to_lowercase().contains(&needle);
        let matches_category = self.category.is_none_or(|c| c == app.category);
        let matches_location = self.location.as_deref().is_none_or(|l| l == app.location);
        matches_search && matches_category && matches_location
    }
}

pub fn filter_applications<'a>(apps: &'a [Application], filter: &ApplicationFilter) -> Vec<&'a Application> {
    apps.iter().filter(|a| filter.matches(a)).collect()
}

/// Distinct locations in first-seen order.
pub fn locations(apps: &[Application]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for app in apps {
        if !seen.contains(&app.location) {
            seen.push(app.location.clone());
        }
    }
    seen
}

/// Interview-stage applications that have a date, optionally narrowed to
/// one interview status. Keeps store order.
pub fn interviews(apps: &[Application], tab: Option<InterviewStatus>) -> Vec<&Application> {
    apps.iter()
        .filter(|a| a.status == ApplicationStatus::Interview && a.interview_date.is_some())
        .filter(|a| tab.is_none() || a.interview_status == tab)
        .collect()
}

/// Resolves a reminder's link; dangling ids resolve to `None`.
pub fn linked_application<'a>(apps: &'a [Application], reminder: &Reminder) -> Option<&'a Application> {
    let id = reminder.application_id.as_deref()?;
    apps.iter().find(|a| a.id == id)
}

pub fn is_overdue(reminder: &Reminder, today: NaiveDate) -> bool {
    !reminder.completed && reminder.date.date() < today
}

pub fn date_label(date: NaiveDateTime, today: NaiveDate) -> String {
    let day = date.date();
    if day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(day) {
        "Tomorrow".to_string()
    } else if day < today {
        "Overdue".to_string()
    } else {
        day.format("%b %-d").to_string()
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Share of submitted applications currently at the interview stage.
pub fn interview_rate(counts: &StatusCounts) -> u32 {
    percent(counts.interview, counts.submitted())
}

/// Offers out of everything that reached interview or beyond. Zero while
/// nothing sits at the interview stage.
pub fn offer_rate(counts: &StatusCounts) -> u32 {
    if counts.interview == 0 {
        return 0;
    }
    percent(counts.offer, counts.interview + counts.offer)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Funnel {
    pub submitted: usize,
    pub interviewed: usize,
    pub offers: usize,
    pub offer_rate: u32,
}

pub fn funnel(counts: &StatusCounts) -> Funnel {
    Funnel {
        submitted: counts.submitted(),
        interviewed: counts.interview + counts.offer,
        offers: counts.offer,
        offer_rate: offer_rate(counts),
    }
}

/// Applications created per calendar month over the `months` months ending
/// with the month of `today`, oldest first. Labels are short month names.
pub fn applications_per_month(apps: &[Application], months: u32, today: NaiveDate) -> Vec<(String, usize)> {
    let current = today.with_day(1).unwrap_or(today);
    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|start| {
            let count = apps
                .iter()
                .filter(|a| {
                    let d = a.created_at.date();
                    d.year() == start.year() && d.month() == start.month()
                })
                .count();
            (start.format("%b").to_string(), count)
        })
        .collect()
}

/// Shortens `s` to at most `max` characters, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// `$120,000/year`
pub fn format_salary(salary: i64) -> String {
    let digits = salary.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if salary < 0 { "-" } else { "" };
    format!("{}${}/year", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewApplication, ReminderCategory};
    use crate::seed;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_with(status: ApplicationStatus, n: usize) -> Application {
        let mut draft = NewApplication::new(&format!("Co{}", n), "Intern", JobCategory::Other);
        draft.status = status;
        draft.into_application(n.to_string(), date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn test_status_counts_exact() {
        let apps: Vec<Application> = [
            ApplicationStatus::Saved,
            ApplicationStatus::Saved,
            ApplicationStatus::Saved,
            ApplicationStatus::Applied,
            ApplicationStatus::Applied,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, s)| app_with(s, i))
        .collect();

        let counts = status_counts(&apps);
        assert_eq!(
            counts,
            StatusCounts {
                saved: 3,
                applied: 2,
                interview: 0,
                offer: 0,
                rejected: 0,
            }
        );
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn test_status_counts_on_mock_data() {
        let store = seed::mock_store();
        let counts = status_counts(store.applications());
        assert_eq!(counts.saved, 2);
        assert_eq!(counts.applied, 3);
        assert_eq!(counts.interview, 3);
        assert_eq!(counts.offer, 1);
        assert_eq!(counts.rejected, 1);
    }

    #[test]
    fn test_upcoming_interviews_sorted_and_limited() {
        let store = seed::mock_store();
        let all = upcoming_interviews(store.applications(), None);
        let companies: Vec<&str> = all.iter().map(|a| a.company.as_str()).collect();
        assert_eq!(companies, vec!["Netflix", "Stripe", "Google"]);

        let limited = upcoming_interviews(store.applications(), Some(2));
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].company, "Netflix");
    }

    #[test]
    fn test_upcoming_interviews_skips_completed() {
        let mut store = seed::mock_store();
        store.update_application(
            "6",
            crate::models::ApplicationPatch {
                interview_status: Some(Some(InterviewStatus::Completed)),
                ..Default::default()
            },
        );
        let ids: Vec<&str> = upcoming_interviews(store.applications(), None)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["9", "1"]);
    }

    #[test]
    fn test_pending_reminders_non_decreasing() {
        let store = seed::mock_store();
        let pending = pending_reminders(store.reminders(), None);
        assert_eq!(pending.len(), 4);
        assert!(pending.iter().all(|r| !r.completed));
        assert!(pending.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(pending[0].id, "r3");
    }

    #[test]
    fn test_reminders_view_can_include_completed() {
        let store = seed::mock_store();
        let all = reminders_view(store.reminders(), true);
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_category_counts_first_seen_order() {
        let store = seed::mock_store();
        let counts = category_counts(store.applications());
        assert_eq!(
            counts,
            vec![
                (JobCategory::SoftwareDeveloper, 4),
                (JobCategory::Design, 2),
                (JobCategory::Data, 2),
                (JobCategory::Product, 1),
                (JobCategory::Marketing, 1),
            ]
        );
    }

    #[test]
    fn test_recent_activity_newest_first() {
        let store = seed::mock_store();
        let recent = recent_activity(store.applications(), Some(3));
        let ids: Vec<&str> = recent.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["8", "10", "7"]);
    }

    #[test]
    fn test_filter_applications() {
        let store = seed::mock_store();
        let apps = store.applications();

        let by_search = filter_applications(
            apps,
            &ApplicationFilter {
                search: "ENGINEER".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_search.len(), 4);

        let combined = filter_applications(
            apps,
            &ApplicationFilter {
                search: "intern".to_string(),
                category: Some(JobCategory::SoftwareDeveloper),
                location: Some("San Francisco, CA".to_string()),
            },
        );
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].company, "Stripe");

        assert_eq!(filter_applications(apps, &ApplicationFilter::default()).len(), apps.len());
    }

    #[test]
    fn test_locations_unique() {
        let store = seed::mock_store();
        let locs = locations(store.applications());
        assert_eq!(locs.len(), 8);
        assert_eq!(locs.iter().filter(|l| l.as_str() == "San Francisco, CA").count(), 1);
    }

    #[test]
    fn test_interviews_tab_filter() {
        let store = seed::mock_store();
        assert_eq!(interviews(store.applications(), None).len(), 3);
        assert_eq!(interviews(store.applications(), Some(InterviewStatus::Upcoming)).len(), 3);
        assert!(interviews(store.applications(), Some(InterviewStatus::Cancelled)).is_empty());
    }

    #[test]
    fn test_linked_application_tolerates_dangling_id() {
        let store = seed::mock_store();
        let mut rem = store.reminder("r1").cloned().unwrap();
        assert_eq!(linked_application(store.applications(), &rem).map(|a| a.company.as_str()), Some("Google"));

        rem.application_id = Some("gone".to_string());
        assert!(linked_application(store.applications(), &rem).is_none());
        rem.application_id = None;
        assert!(linked_application(store.applications(), &rem).is_none());
    }

    #[test]
    fn test_date_label() {
        let today = date(2024, 2, 10);
        let at = |d: NaiveDate| d.and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(date_label(at(date(2024, 2, 10)), today), "Today");
        assert_eq!(date_label(at(date(2024, 2, 11)), today), "Tomorrow");
        assert_eq!(date_label(at(date(2024, 2, 9)), today), "Overdue");
        assert_eq!(date_label(at(date(2024, 3, 5)), today), "Mar 5");
    }

    #[test]
    fn test_is_overdue_ignores_completed() {
        let store = seed::mock_store();
        let today = date(2024, 3, 1);
        let done = store.reminder("r5").unwrap();
        let open = store.reminder("r1").unwrap();
        assert_eq!(done.category, ReminderCategory::FollowUp);
        assert!(!is_overdue(done, today));
        assert!(is_overdue(open, today));
    }

    #[test]
    fn test_rates_and_funnel() {
        let store = seed::mock_store();
        let counts = status_counts(store.applications());
        // 3 interview out of 8 submitted; 1 offer out of 4 past interview
        assert_eq!(interview_rate(&counts), 38);
        assert_eq!(offer_rate(&counts), 25);
        assert_eq!(
            funnel(&counts),
            Funnel {
                submitted: 8,
                interviewed: 4,
                offers: 1,
                offer_rate: 25,
            }
        );

        let empty = StatusCounts::default();
        assert_eq!(interview_rate(&empty), 0);
        assert_eq!(offer_rate(&empty), 0);
    }

    #[test]
    fn test_offer_rate_zero_without_interviews() {
        let counts = StatusCounts {
            offer: 1,
            applied: 2,
            ..StatusCounts::default()
        };
        assert_eq!(offer_rate(&counts), 0);
        assert_eq!(funnel(&counts).offer_rate, 0);
    }

    #[test]
    fn test_by_status_follows_pipeline_order() {
        let store = seed::mock_store();
        let counts = status_counts(store.applications());
        let rows: Vec<(ApplicationStatus, usize)> = counts.by_status().collect();
        assert_eq!(
            rows,
            vec![
                (ApplicationStatus::Saved, 2),
                (ApplicationStatus::Applied, 3),
                (ApplicationStatus::Interview, 3),
                (ApplicationStatus::Offer, 1),
                (ApplicationStatus::Rejected, 1),
            ]
        );
        assert_eq!(rows.iter().map(|(_, n)| n).sum::<usize>(), counts.total());
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Google", 10), "Google");
        assert_eq!(truncate("Software Engineer Intern", 12), "Software ...");
        assert_eq!(truncate("Café Society", 6), "Caf...");
    }

    #[test]
    fn test_applications_per_month() {
        let store = seed::mock_store();
        let series = applications_per_month(store.applications(), 3, date(2024, 2, 20));
        assert_eq!(
            series,
            vec![
                ("Dec".to_string(), 0),
                ("Jan".to_string(), 10),
                ("Feb".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(120_000), "$120,000/year");
        assert_eq!(format_salary(950), "$950/year");
        assert_eq!(format_salary(1_250_000), "$1,250,000/year");
        assert_eq!(format_salary(0), "$0/year");
    }
}
