use chrono::NaiveDate;
use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};

use super::{App, Modal, Route};
use crate::calendar;
use crate::models::{Application, ApplicationStatus, EventKind, InterviewStatus, ReminderCategory};
use crate::views::{self, truncate};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);

    match app.route {
        Route::Dashboard => draw_dashboard(frame, app, chunks[1]),
        Route::Jobs => draw_jobs(frame, app, chunks[1]),
        Route::Interviews => draw_interviews(frame, app, chunks[1]),
        Route::Reminders => draw_reminders(frame, app, chunks[1]),
        Route::Analytics => draw_analytics(frame, app, chunks[1]),
        Route::Calendar => draw_calendar(frame, app, chunks[1]),
        Route::Profile => draw_profile(frame, app, chunks[1]),
    }

    draw_footer(frame, app, chunks[2]);

    if let Some(modal) = &app.modal {
        draw_modal(frame, app, modal);
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Saved => Style::default().fg(Color::Gray),
        ApplicationStatus::Applied => Style::default().fg(Color::Blue),
        ApplicationStatus::Interview => Style::default().fg(Color::Magenta),
        ApplicationStatus::Offer => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}

fn event_style(kind: EventKind) -> Style {
    match kind {
        EventKind::Interview => Style::default().fg(Color::Magenta),
        EventKind::Reminder => Style::default().fg(Color::Blue),
        EventKind::Deadline => Style::default().fg(Color::Red),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn panel(title: &str) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(format!(" {} ", title))
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Route::ALL
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{} {}", i + 1, r.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(panel("pipeline"))
        .select(app.route.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.message {
        Some(msg) => (format!(" {}", msg), Style::default().fg(Color::Yellow)),
        None => {
            let help = match app.route {
                Route::Jobs if app.searching => "type to search  Enter:keep  Esc:clear",
                Route::Jobs => "h/l/j/k:focus  H/L:move card  /:search c:category o:location x:clear  a:add e:edit i:interview d:delete",
                Route::Interviews => "h/l:tab  j/k:select  a:schedule  e:edit",
                Route::Reminders => "j/k:select  space:done  s:show completed  a:add e:edit d:delete",
                Route::Calendar => "h/l:day  j/k:week  [/]:month  t:today",
                Route::Profile => "u:upload resume  m/p/r:toggle notifications",
                Route::Dashboard | Route::Analytics => "",
            };
            (format!(" Tab/1-7:switch  {}  q:quit", help), dim())
        }
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

// --- Dashboard ---

fn stat_card<'a>(title: &'a str, value: usize, description: &'a str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(value.to_string(), bold())),
        Line::from(Span::styled(description, dim())),
    ])
    .block(panel(title))
}

fn draw_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let apps = app.store.applications();
    let counts = views::status_counts(apps);
    let pending = views::pending_reminders(app.store.reminders(), None);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    frame.render_widget(stat_card("Total Applications", apps.len(), "Across all stages"), cards[0]);
    frame.render_widget(stat_card("Interviews Scheduled", counts.interview, "Upcoming interviews"), cards[1]);
    frame.render_widget(stat_card("Offers Received", counts.offer, "Congratulations!"), cards[2]);
    frame.render_widget(stat_card("Pending Follow-ups", pending.len(), "Tasks to complete"), cards[3]);

    let stages = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(rows[1]);
    for (i, (status, n)) in counts.by_status().enumerate() {
        let block = panel(status.label()).border_style(status_style(status));
        let count = Paragraph::new(Span::styled(n.to_string(), bold()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(count, stages[i]);
    }

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[2]);

    let interviews: Vec<ListItem> = views::upcoming_interviews(apps, Some(5))
        .into_iter()
        .map(|a| {
            let when = a
                .interview_date
                .map(|d| d.format("%b %-d, %-I:%M %p").to_string())
                .unwrap_or_default();
            let kind = a.interview_type.map(|t| t.label()).unwrap_or("-");
            ListItem::new(vec![
                Line::from(Span::styled(format!("{} - {}", a.company, a.role), bold())),
                Line::from(Span::styled(format!("  {} · {}", when, kind), dim())),
            ])
        })
        .collect();
    frame.render_widget(List::new(interviews).block(panel("Upcoming Interviews")), lists[0]);

    let reminders: Vec<ListItem> = pending
        .iter()
        .take(5)
        .map(|r| {
            let label = views::date_label(r.date, app.today);
            let style = if views::is_overdue(r, app.today) {
                Style::default().fg(Color::Red)
            } else {
                dim()
            };
            ListItem::new(vec![
                Line::from(r.title.clone()),
                Line::from(Span::styled(format!("  {} · {}", label, r.category.label()), style)),
            ])
        })
        .collect();
    frame.render_widget(List::new(reminders).block(panel("Pending Reminders")), lists[1]);

    let recent: Vec<ListItem> = views::recent_activity(apps, Some(5))
        .into_iter()
        .map(|a| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", a.company), bold()),
                    Span::styled(a.status.label(), status_style(a.status)),
                ]),
                Line::from(Span::styled(
                    format!("  {} · {}", a.role, a.created_at.format("%b %-d")),
                    dim(),
                )),
            ])
        })
        .collect();
    frame.render_widget(List::new(recent).block(panel("Recent Activity")), lists[2]);
}

// --- Jobs board ---

fn draw_jobs(frame: &mut Frame, app: &App, area: Rect) {
    let apps = app.store.applications();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(9)])
        .split(area);

    let filter = &app.board.filter;
    let cursor = if app.searching { "_" } else { "" };
    let filter_line = Line::from(vec![
        Span::styled(" Search: ", dim()),
        Span::raw(format!("{}{}", filter.search, cursor)),
        Span::styled("   Category: ", dim()),
        Span::raw(filter.category.map(|c| c.label()).unwrap_or("All")),
        Span::styled("   Location: ", dim()),
        Span::raw(filter.location.as_deref().unwrap_or("All")),
        Span::styled(if filter.is_empty() { "" } else { "   (x to clear)" }, dim()),
    ]);
    frame.render_widget(Paragraph::new(filter_line), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(chunks[1]);

    for (i, status) in ApplicationStatus::ALL.iter().enumerate() {
        let cards = app.board.column_cards(apps, *status);
        let focused = i == app.board.column;
        let width = columns[i].width.saturating_sub(4) as usize;

        let items: Vec<ListItem> = cards
            .iter()
            .map(|a| {
                ListItem::new(vec![
                    Line::from(Span::styled(truncate(&a.company, width), bold())),
                    Line::from(truncate(&a.role, width)),
                    Line::from(Span::styled(views::format_salary(a.salary), dim())),
                ])
            })
            .collect();

        let mut block = panel(&format!("{} ({})", status.label(), cards.len())).title_style(status_style(*status));
        if focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let mut state = ListState::default();
        if focused && !cards.is_empty() {
            state.select(Some(app.board.row));
        }
        frame.render_stateful_widget(list, columns[i], &mut state);
    }

    let detail = match app.board.focused(apps) {
        Some(a) => application_detail(a),
        None => Text::styled("No application in this column", dim()),
    };
    let detail_widget = Paragraph::new(detail)
        .block(panel("Detail"))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail_widget, chunks[2]);
}

fn application_detail(app: &Application) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(format!("{} at {}", app.role, app.company), bold()),
        Span::raw("  "),
        Span::styled(app.status.label(), status_style(app.status)),
    ]));
    lines.push(Line::from(format!(
        "{} · {} · {} · {}",
        app.location,
        app.job_mode.label(),
        app.category.label(),
        views::format_salary(app.salary)
    )));

    let mut meta = vec![format!("Resume {}", app.resume_version)];
    if let Some(applied) = app.date_applied {
        meta.push(format!("Applied {}", applied.format("%Y-%m-%d")));
    }
    if let Some(name) = &app.recruiter_name {
        match &app.recruiter_email {
            Some(email) => meta.push(format!("Recruiter {} <{}>", name, email)),
            None => meta.push(format!("Recruiter {}", name)),
        }
    }
    lines.push(Line::from(Span::styled(meta.join(" · "), dim())));

    if let Some(when) = app.interview_date {
        let kind = app.interview_type.map(|t| t.label()).unwrap_or("-");
        let status = app.interview_status.map(|s| s.label()).unwrap_or("-");
        lines.push(Line::from(format!(
            "Interview: {} ({}, {})",
            when.format("%a %b %-d %Y %-I:%M %p"),
            kind,
            status
        )));
    }
    if let Some(link) = &app.job_description_link {
        lines.push(Line::from(format!("Link: {}", link)));
    }
    if let Some(notes) = &app.notes {
        for line in textwrap::fill(notes, 100).lines() {
            lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Cyan))));
        }
    }

    Text::from(lines)
}

// --- Interviews ---

fn draw_interviews(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let tabs = [None, Some(InterviewStatus::Upcoming), Some(InterviewStatus::Completed), Some(InterviewStatus::Cancelled)];
    let selected_tab = tabs.iter().position(|t| *t == app.interview_tab).unwrap_or(0);
    let titles: Vec<&str> = tabs.iter().map(|t| t.map(|s| s.label()).unwrap_or("All")).collect();
    let tab_bar = Tabs::new(titles)
        .block(panel("Interviews"))
        .select(selected_tab)
        .highlight_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD));
    frame.render_widget(tab_bar, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let interviews = views::interviews(app.store.applications(), app.interview_tab);
    let items: Vec<ListItem> = interviews
        .iter()
        .map(|a| {
            let when = a
                .interview_date
                .map(|d| d.format("%b %-d %-I:%M %p").to_string())
                .unwrap_or_default();
            let status = a.interview_status.map(|s| s.label()).unwrap_or("-");
            ListItem::new(format!("{:<14} {:<16} {}", truncate(&a.company, 14), when, status))
        })
        .collect();

    let list = List::new(items)
        .block(panel(&format!("Scheduled ({})", interviews.len())))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !interviews.is_empty() {
        state.select(Some(app.interview_selected.min(interviews.len() - 1)));
    }
    frame.render_stateful_widget(list, body[0], &mut state);

    let detail = match interviews.get(app.interview_selected) {
        Some(a) => application_detail(a),
        None => Text::styled("No interviews scheduled. Press a to schedule one.", dim()),
    };
    frame.render_widget(
        Paragraph::new(detail).block(panel("Detail")).wrap(Wrap { trim: false }),
        body[1],
    );
}

// --- Reminders ---

fn category_style(category: ReminderCategory) -> Style {
    match category {
        ReminderCategory::FollowUp => Style::default().fg(Color::Blue),
        ReminderCategory::Deadline => Style::default().fg(Color::Red),
        ReminderCategory::InterviewPrep => Style::default().fg(Color::Magenta),
    }
}

fn draw_reminders(frame: &mut Frame, app: &App, area: Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let apps = app.store.applications();
    let reminders = views::reminders_view(app.store.reminders(), app.show_completed);
    let items: Vec<ListItem> = reminders
        .iter()
        .map(|r| {
            let check = if r.completed { "[x]" } else { "[ ]" };
            let label = if r.completed {
                r.date.format("%b %-d").to_string()
            } else {
                views::date_label(r.date, app.today)
            };
            let label_style = if views::is_overdue(r, app.today) {
                Style::default().fg(Color::Red)
            } else {
                dim()
            };
            let title_style = if r.completed {
                Style::default().add_modifier(Modifier::CROSSED_OUT).fg(Color::DarkGray)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::raw(format!("{} ", check)),
                Span::styled(r.title.clone(), title_style),
                Span::raw("  "),
                Span::styled(format!("{:<9}", label), label_style),
                Span::styled(r.category.label(), category_style(r.category)),
            ];
            if let Some(linked) = views::linked_application(apps, r) {
                spans.push(Span::styled(format!("  -> {}", linked.company), dim()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.show_completed { "All Reminders" } else { "Pending Reminders" };
    let list = List::new(items)
        .block(panel(&format!("{} ({})", title, reminders.len())))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !reminders.is_empty() {
        state.select(Some(app.reminder_selected.min(reminders.len() - 1)));
    }
    frame.render_stateful_widget(list, body[0], &mut state);

    let detail = match reminders.get(app.reminder_selected) {
        Some(r) => {
            let mut lines = vec![
                Line::from(Span::styled(r.title.clone(), bold())),
                Line::from(format!("{} · {}", r.date.format("%A, %B %-d %Y"), r.category.label())),
            ];
            if let Some(desc) = &r.description {
                lines.push(Line::from(""));
                for line in textwrap::fill(desc, 60).lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            match (&r.application_id, views::linked_application(apps, r)) {
                (_, Some(linked)) => {
                    lines.push(Line::from(""));
                    lines.push(Line::from(format!("Linked: {} - {}", linked.company, linked.role)));
                }
                (Some(id), None) => lines.push(Line::from(Span::styled(format!("Linked application #{} no longer exists", id), dim()))),
                (None, None) => {}
            }
            Text::from(lines)
        }
        None => Text::styled("Nothing to do.", dim()),
    };
    frame.render_widget(
        Paragraph::new(detail).block(panel("Detail")).wrap(Wrap { trim: false }),
        body[1],
    );
}

// --- Analytics ---

fn draw_analytics(frame: &mut Frame, app: &App, area: Rect) {
    let apps = app.store.applications();
    let counts = views::status_counts(apps);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Percentage(55), Constraint::Min(0)])
        .split(area);

    let stats = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    let rate_card = |title: &'static str, value: String| {
        Paragraph::new(Line::from(Span::styled(value, bold()))).block(panel(title))
    };
    frame.render_widget(rate_card("Total Applications", apps.len().to_string()), stats[0]);
    frame.render_widget(rate_card("Interview Rate", format!("{}%", views::interview_rate(&counts))), stats[1]);
    frame.render_widget(rate_card("Offer Rate", format!("{}%", views::offer_rate(&counts))), stats[2]);
    frame.render_widget(rate_card("Resume Versions", app.store.resume_versions().len().to_string()), stats[3]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let status_data: Vec<(&str, u64)> = counts.by_status().map(|(s, n)| (s.label(), n as u64)).collect();
    let status_chart = BarChart::default()
        .block(panel("Applications by Status"))
        .data(status_data.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));
    frame.render_widget(status_chart, charts[0]);

    let category_labels: Vec<(String, u64)> = views::category_counts(apps)
        .into_iter()
        .map(|(c, n)| (truncate(c.label(), 12), n as u64))
        .collect();
    let category_data: Vec<(&str, u64)> = category_labels.iter().map(|(l, n)| (l.as_str(), *n)).collect();
    let category_chart = BarChart::default()
        .block(panel("Top Categories"))
        .data(category_data.as_slice())
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::Black).bg(Color::Blue));
    frame.render_widget(category_chart, charts[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    let monthly = views::applications_per_month(apps, 6, app.today);
    let monthly_data: Vec<(&str, u64)> = monthly.iter().map(|(m, n)| (m.as_str(), *n as u64)).collect();
    let monthly_chart = BarChart::default()
        .block(panel("Applications Over Time"))
        .data(monthly_data.as_slice())
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan));
    frame.render_widget(monthly_chart, bottom[0]);

    let funnel = views::funnel(&counts);
    let funnel_text = vec![
        Line::from(format!("Applications sent   {}", funnel.submitted)),
        Line::from(format!("Reached interview   {}", funnel.interviewed)),
        Line::from(format!("Offers              {}", funnel.offers)),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}% of interviews converted to offers", funnel.offer_rate),
            Style::default().fg(Color::Green),
        )),
    ];
    frame.render_widget(Paragraph::new(funnel_text).block(panel("Interview Conversion")), bottom[1]);
}

// --- Calendar ---

fn draw_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let events = calendar::calendar_events(app.store.applications(), app.store.reminders());
    let selected = app.calendar_day;

    let header = Row::new(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]).style(bold());
    let weeks: Vec<Row> = calendar::month_grid(selected)
        .into_iter()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|day| match day {
                    Some(d) => day_cell(*d, &events, selected, app.today),
                    None => Cell::from(""),
                })
                .collect();
            Row::new(cells).height(3)
        })
        .collect();

    let table = Table::new(weeks, [Constraint::Ratio(1, 7); 7])
        .header(header)
        .block(panel(&selected.format("%B %Y").to_string()));
    frame.render_widget(table, body[0]);

    let day_events = calendar::events_on(&events, selected);
    let items: Vec<ListItem> = day_events
        .iter()
        .map(|e| {
            let mut detail = format!("  {} · {}", e.kind.as_str(), e.date.format("%-I:%M %p"));
            if let Some(linked) = e.application_id.as_deref().and_then(|id| app.store.application(id)) {
                detail.push_str(&format!(" · {}", linked.role));
            }
            if e.reminder_id.as_deref().and_then(|id| app.store.reminder(id)).is_some_and(|r| r.completed) {
                detail.push_str(" · done");
            }
            ListItem::new(vec![
                Line::from(Span::styled(e.title.clone(), event_style(e.kind))),
                Line::from(Span::styled(detail, dim())),
            ])
        })
        .collect();
    let list = List::new(items).block(panel(&format!("Events for {}", selected.format("%B %-d, %Y"))));
    frame.render_widget(list, body[1]);
}

fn day_cell<'a>(day: NaiveDate, events: &[crate::models::CalendarEvent], selected: NaiveDate, today: NaiveDate) -> Cell<'a> {
    let on_day = calendar::events_on(events, day);
    let mut lines = vec![Line::from(day.format("%-d").to_string())];
    for event in on_day.iter().take(1) {
        lines.push(Line::from(Span::styled(truncate(&event.title, 12), event_style(event.kind))));
    }
    if on_day.len() > 1 {
        lines.push(Line::from(Span::styled(format!("+{} more", on_day.len() - 1), dim())));
    }

    let mut style = Style::default();
    if day == today {
        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    if day == selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Cell::from(Text::from(lines)).style(style)
}

// --- Profile ---

fn draw_profile(frame: &mut Frame, app: &App, area: Rect) {
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let profile = app.store.profile();
    let check = |on: bool| if on { "[x]" } else { "[ ]" };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("({}) ", profile.initials()), Style::default().fg(Color::Magenta)),
            Span::styled(profile.name.clone(), bold()),
        ]),
        Line::from(format!("Email     {}", profile.email)),
        Line::from(format!("Phone     {}", profile.phone.as_deref().unwrap_or("-"))),
        Line::from(format!("LinkedIn  {}", profile.linkedin_url.as_deref().unwrap_or("-"))),
        Line::from(""),
        Line::from(Span::styled("Notifications", bold())),
        Line::from(format!("  {} (m) Email updates", check(profile.notifications.email))),
        Line::from(format!("  {} (p) Push notifications", check(profile.notifications.push))),
        Line::from(format!("  {} (r) Reminder alerts", check(profile.notifications.reminders))),
    ];
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} applications · {} reminders", app.store.applications().len(), app.store.reminders().len()),
        dim(),
    )));
    frame.render_widget(Paragraph::new(lines).block(panel("Profile")), body[0]);

    let versions: Vec<ListItem> = app
        .store
        .resume_versions()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i == 0 {
                ListItem::new(Line::from(vec![
                    Span::styled(v.clone(), bold()),
                    Span::styled("  current", Style::default().fg(Color::Green)),
                ]))
            } else {
                ListItem::new(v.clone())
            }
        })
        .collect();
    frame.render_widget(
        List::new(versions).block(panel(&format!("Resume Versions (next: {})", app.store.next_resume_version()))),
        body[1],
    );
}

// --- Modal form ---

fn centered_rect(width_pct: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn draw_modal(frame: &mut Frame, app: &App, modal: &Modal) {
    let labels = modal.form.labels();
    let area = centered_rect(60, labels.len() as u16 + 4, frame.area());

    let mut lines: Vec<Line> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let focused = i == modal.focus;
            let value = modal.form.display(i, &app.store);
            let value = match (modal.form.is_choice(i), focused) {
                (true, true) => format!("< {} >", value),
                (false, true) => format!("{}_", value),
                _ => value,
            };
            let style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<16}", label), dim()),
                Span::styled(value, style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter:save  Esc:cancel  Tab/arrows:field  Left/Right:choose",
        dim(),
    )));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(modal.form.title()).border_style(Style::default().fg(Color::Yellow))),
        area,
    );
}
