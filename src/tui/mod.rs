mod draw;
mod kanban;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use tracing::{debug, info};

use crate::calendar;
use crate::forms::{ApplicationForm, Form, InterviewForm, ReminderForm};
use crate::models::InterviewStatus;
use crate::store::Store;
use crate::views;

pub use kanban::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Jobs,
    Interviews,
    Reminders,
    Analytics,
    Calendar,
    Profile,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Jobs,
        Route::Interviews,
        Route::Reminders,
        Route::Analytics,
        Route::Calendar,
        Route::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Jobs => "Jobs",
            Route::Interviews => "Interviews",
            Route::Reminders => "Reminders",
            Route::Analytics => "Analytics",
            Route::Calendar => "Calendar",
            Route::Profile => "Profile",
        }
    }

    fn index(self) -> usize {
        Route::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Route::ALL[(self.index() + 1) % Route::ALL.len()]
    }

    fn prev(self) -> Self {
        Route::ALL[(self.index() + Route::ALL.len() - 1) % Route::ALL.len()]
    }
}

/// An open form and the field that has focus.
pub struct Modal {
    pub form: Box<dyn Form>,
    pub focus: usize,
}

pub struct App {
    pub store: Store,
    pub route: Route,
    pub today: NaiveDate,
    pub board: Board,
    pub searching: bool,
    pub interview_tab: Option<InterviewStatus>,
    pub interview_selected: usize,
    pub reminder_selected: usize,
    pub show_completed: bool,
    pub calendar_day: NaiveDate,
    pub modal: Option<Modal>,
    pub message: Option<String>,
    pub quit: bool,
}

impl App {
    pub fn new(store: Store, today: NaiveDate) -> Self {
        Self {
            store,
            route: Route::Dashboard,
            today,
            board: Board::default(),
            searching: false,
            interview_tab: None,
            interview_selected: 0,
            reminder_selected: 0,
            show_completed: false,
            calendar_day: today,
            modal: None,
            message: None,
            quit: false,
        }
    }

    fn open(&mut self, form: impl Form + 'static) {
        self.modal = Some(Modal {
            form: Box::new(form),
            focus: 0,
        });
    }

    fn flash(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }
        if self.searching {
            self.handle_search_key(key);
            return;
        }

        self.message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => self.route = self.route.next(),
            KeyCode::BackTab => self.route = self.route.prev(),
            KeyCode::Char(c @ '1'..='7') => {
                let idx = c as usize - '1' as usize;
                self.route = Route::ALL[idx];
            }
            _ => match self.route {
                Route::Jobs => self.handle_jobs_key(key),
                Route::Interviews => self.handle_interviews_key(key),
                Route::Reminders => self.handle_reminders_key(key),
                Route::Calendar => self.handle_calendar_key(key),
                Route::Profile => self.handle_profile_key(key),
                Route::Dashboard | Route::Analytics => {}
            },
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.modal.as_mut() else { return };
        let field_count = modal.form.labels().len();

        match key.code {
            KeyCode::Esc => {
                self.modal = None;
            }
            KeyCode::Enter => match modal.form.submit(&mut self.store) {
                Ok(id) => {
                    let title = modal.form.title();
                    self.modal = None;
                    self.board.clamp(self.store.applications());
                    self.flash(format!("{}: saved #{}", title, id));
                }
                Err(e) => {
                    debug!(error = %e, "form refused");
                    self.flash(e.to_string());
                }
            },
            KeyCode::Tab | KeyCode::Down => modal.focus = (modal.focus + 1) % field_count,
            KeyCode::BackTab | KeyCode::Up => modal.focus = (modal.focus + field_count - 1) % field_count,
            KeyCode::Left => modal.form.cycle(modal.focus, false, &self.store),
            KeyCode::Right => modal.form.cycle(modal.focus, true, &self.store),
            KeyCode::Backspace => {
                if let Some(text) = modal.form.text_mut(modal.focus) {
                    text.pop();
                }
            }
            KeyCode::Char(c) => match modal.form.text_mut(modal.focus) {
                Some(text) => text.push(c),
                None if c == ' ' => modal.form.cycle(modal.focus, true, &self.store),
                None => {}
            },
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.searching = false,
            KeyCode::Esc => {
                self.searching = false;
                self.board.filter.search.clear();
            }
            KeyCode::Backspace => {
                self.board.filter.search.pop();
            }
            KeyCode::Char(c) => self.board.filter.search.push(c),
            _ => {}
        }
        self.board.clamp(self.store.applications());
    }

    fn handle_jobs_key(&mut self, key: KeyEvent) {
        let apps = self.store.applications();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.board.left(apps),
            KeyCode::Right | KeyCode::Char('l') => self.board.right(apps),
            KeyCode::Up | KeyCode::Char('k') => self.board.up(),
            KeyCode::Down | KeyCode::Char('j') => self.board.down(apps),
            KeyCode::Char('H') | KeyCode::Char('L') => {
                let forward = key.code == KeyCode::Char('L');
                if let Some((id, status)) = self.board.drag(&mut self.store, forward) {
                    info!(id = %id, status = %status, "moved card");
                    self.flash(format!("Moved #{} to {}", id, status.label()));
                }
            }
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('c') => self.board.cycle_category(apps),
            KeyCode::Char('o') => self.board.cycle_location(apps),
            KeyCode::Char('x') => self.board.clear_filter(apps),
            KeyCode::Char('a') => {
                let form = ApplicationForm::new(&self.store, self.today);
                self.open(form);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(app) = self.board.focused(apps) {
                    let form = ApplicationForm::edit(app);
                    self.open(form);
                }
            }
            KeyCode::Char('i') => {
                if let Some(app) = self.board.focused(apps) {
                    let form = InterviewForm::for_application(app, self.today);
                    self.open(form);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.board.focused(apps).map(|a| a.id.clone()) {
                    self.store.delete_application(&id);
                    self.board.clamp(self.store.applications());
                    self.flash(format!("Deleted #{}", id));
                }
            }
            _ => {}
        }
    }

    fn handle_interviews_key(&mut self, key: KeyEvent) {
        let count = views::interviews(self.store.applications(), self.interview_tab).len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.interview_tab = cycle_tab(self.interview_tab, false);
                self.interview_selected = 0;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.interview_tab = cycle_tab(self.interview_tab, true);
                self.interview_selected = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => self.interview_selected = self.interview_selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.interview_selected + 1 < count {
                    self.interview_selected += 1;
                }
            }
            KeyCode::Char('a') => self.open(InterviewForm::new(self.today)),
            KeyCode::Char('e') | KeyCode::Enter => {
                let form = views::interviews(self.store.applications(), self.interview_tab)
                    .get(self.interview_selected)
                    .map(|app| InterviewForm::for_application(app, self.today));
                if let Some(form) = form {
                    self.open(form);
                }
            }
            _ => {}
        }
    }

    fn selected_reminder_id(&self) -> Option<String> {
        views::reminders_view(self.store.reminders(), self.show_completed)
            .get(self.reminder_selected)
            .map(|r| r.id.clone())
    }

    fn clamp_reminders(&mut self) {
        let len = views::reminders_view(self.store.reminders(), self.show_completed).len();
        self.reminder_selected = self.reminder_selected.min(len.saturating_sub(1));
    }

    fn handle_reminders_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.reminder_selected = self.reminder_selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.reminder_selected += 1;
                self.clamp_reminders();
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_reminder_id() {
                    self.store.toggle_reminder_complete(&id);
                    self.clamp_reminders();
                }
            }
            KeyCode::Char('s') => {
                self.show_completed = !self.show_completed;
                self.clamp_reminders();
            }
            KeyCode::Char('a') => self.open(ReminderForm::new(self.today)),
            KeyCode::Char('e') | KeyCode::Enter => {
                let form = self
                    .selected_reminder_id()
                    .and_then(|id| self.store.reminder(&id))
                    .map(ReminderForm::edit);
                if let Some(form) = form {
                    self.open(form);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_reminder_id() {
                    self.store.delete_reminder(&id);
                    self.clamp_reminders();
                    self.flash(format!("Deleted reminder {}", id));
                }
            }
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        let day = self.calendar_day;
        self.calendar_day = match key.code {
            KeyCode::Left | KeyCode::Char('h') => day.checked_sub_days(Days::new(1)),
            KeyCode::Right | KeyCode::Char('l') => day.checked_add_days(Days::new(1)),
            KeyCode::Up | KeyCode::Char('k') => day.checked_sub_days(Days::new(7)),
            KeyCode::Down | KeyCode::Char('j') => day.checked_add_days(Days::new(7)),
            KeyCode::Char('[') => Some(calendar::prev_month(day)),
            KeyCode::Char(']') => Some(calendar::next_month(day)),
            KeyCode::Char('t') => Some(self.today),
            _ => None,
        }
        .unwrap_or(day);
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('u') => {
                let version = self.store.upload_resume();
                self.flash(format!("Resume uploaded as {}", version));
            }
            KeyCode::Char('m') => {
                let n = &mut self.store.profile_mut().notifications;
                n.email = !n.email;
            }
            KeyCode::Char('p') => {
                let n = &mut self.store.profile_mut().notifications;
                n.push = !n.push;
            }
            KeyCode::Char('r') => {
                let n = &mut self.store.profile_mut().notifications;
                n.reminders = !n.reminders;
            }
            _ => {}
        }
    }
}

fn cycle_tab(tab: Option<InterviewStatus>, forward: bool) -> Option<InterviewStatus> {
    let tabs = [
        None,
        Some(InterviewStatus::Upcoming),
        Some(InterviewStatus::Completed),
        Some(InterviewStatus::Cancelled),
    ];
    let idx = tabs.iter().position(|t| *t == tab).unwrap_or(0);
    let next = if forward {
        (idx + 1) % tabs.len()
    } else {
        (idx + tabs.len() - 1) % tabs.len()
    };
    tabs[next]
}

pub fn run(store: Store, today: NaiveDate) -> Result<()> {
    let mut app = App::new(store, today);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    info!("terminal board started");

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    info!("terminal board closed");

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.quit {
        terminal.draw(|frame| draw::draw(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicationStatus;
    use crate::seed;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(seed::mock_store(), NaiveDate::from_ymd_opt(2024, 2, 6).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|frame| draw::draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_route_switching() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.route, Route::Jobs);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.route, Route::Profile);
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.route, Route::Calendar);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn test_jobs_drag_updates_store() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        let id = app.board.focused(app.store.applications()).unwrap().id.clone();
        press(&mut app, KeyCode::Char('L'));
        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.store.application(&id).unwrap().status, ApplicationStatus::Interview);
        assert!(app.message.as_deref().unwrap_or_default().contains("Interview"));
    }

    #[test]
    fn test_add_application_through_modal() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('a'));
        assert!(app.modal.is_some());

        // Refused while required fields are empty
        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_some());
        assert_eq!(app.message.as_deref(), Some("company is required"));

        type_text(&mut app, "Figma");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Design Intern");
        press(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.store.applications().len(), 11);
        assert_eq!(app.store.applications()[0].company, "Figma");
    }

    #[test]
    fn test_modal_escape_discards() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Never saved");
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert!(!app.quit);
        assert_eq!(app.store.reminders().len(), 5);
    }

    #[test]
    fn test_search_mode_filters_board() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "air");
        press(&mut app, KeyCode::Enter);
        assert!(!app.searching);
        assert_eq!(app.board.filter.search, "air");
        assert_eq!(app.board.focused(app.store.applications()).unwrap().company, "Airbnb");
    }

    #[test]
    fn test_reminder_toggle_hides_completed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        // first pending by date is r3
        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.reminder("r3").unwrap().completed);
        assert_eq!(views::reminders_view(app.store.reminders(), false).len(), 3);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.show_completed);
    }

    #[test]
    fn test_calendar_navigation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.calendar_day, NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.calendar_day, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.calendar_day, app.today);
    }

    #[test]
    fn test_profile_upload_and_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('7'));
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.store.resume_versions()[0], "v2.2");
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.store.profile().notifications.push);
    }

    #[test]
    fn test_every_route_renders() {
        let mut app = app();
        let expectations = [
            (Route::Dashboard, "Netflix"),
            (Route::Jobs, "Amazon"),
            (Route::Interviews, "Stripe"),
            (Route::Reminders, "Prepare for Netflix technical"),
            (Route::Analytics, "Offer Rate"),
            (Route::Calendar, "February 2024"),
            (Route::Profile, "Alex Thompson"),
        ];
        for (route, needle) in expectations {
            app.route = route;
            let screen = render(&app);
            assert!(screen.contains(needle), "{:?} screen missing '{}'", route, needle);
        }
    }

    #[test]
    fn test_modal_renders_over_page() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('a'));
        let screen = render(&app);
        assert!(screen.contains("Schedule Interview"));
    }
}
