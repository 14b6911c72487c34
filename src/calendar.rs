use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Application, CalendarEvent, EventKind, Reminder, ReminderCategory};

/// Interviews first (store order), then reminders. Deadline-category
/// reminders surface as `deadline` events.
pub fn calendar_events(apps: &[Application], reminders: &[Reminder]) -> Vec<CalendarEvent> {
    let interviews = apps.iter().filter_map(|app| {
        let date = app.interview_date?;
        Some(CalendarEvent {
            id: format!("interview-{}", app.id),
            title: format!("{} Interview", app.company),
            date,
            kind: EventKind::Interview,
            application_id: Some(app.id.clone()),
            reminder_id: None,
        })
    });

    let reminders = reminders.iter().map(|rem| CalendarEvent {
        id: format!("reminder-{}", rem.id),
        title: rem.title.clone(),
        date: rem.date,
        kind: if rem.category == ReminderCategory::Deadline {
            EventKind::Deadline
        } else {
            EventKind::Reminder
        },
        application_id: None,
        reminder_id: Some(rem.id.clone()),
    });

    interviews.chain(reminders).collect()
}

pub fn events_on(events: &[CalendarEvent], day: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.date.date() == day).collect()
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn next_month(month: NaiveDate) -> NaiveDate {
    let start = first_of_month(month);
    start.checked_add_months(Months::new(1)).unwrap_or(start)
}

pub fn prev_month(month: NaiveDate) -> NaiveDate {
    let start = first_of_month(month);
    start.checked_sub_months(Months::new(1)).unwrap_or(start)
}

/// Days of the month containing `month`, laid out in Sunday-first weeks.
/// Cells before the 1st and after the last day are `None`.
pub fn month_grid(month: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let start = first_of_month(month);
    let lead = start.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; lead];
    cells.extend(
        start
            .iter_days()
            .take_while(|d| d.month() == start.month())
            .map(Some),
    );
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells
        .chunks(7)
        .map(|week| {
            let mut row = [None; 7];
            row.copy_from_slice(week);
            row
        })
        .collect()
}
