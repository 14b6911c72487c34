use crate::models::{Application, ApplicationStatus, JobCategory};
use crate::store::Store;
use crate::views::{self, ApplicationFilter};

/// Cursor and filter state for the jobs board. Columns follow the
/// pipeline order of [`ApplicationStatus::ALL`].
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub column: usize,
    pub row: usize,
    pub filter: ApplicationFilter,
}

impl Board {
    pub fn status(&self) -> ApplicationStatus {
        ApplicationStatus::ALL[self.column.min(ApplicationStatus::ALL.len() - 1)]
    }

    pub fn column_cards<'a>(&self, apps: &'a [Application], status: ApplicationStatus) -> Vec<&'a Application> {
        views::applications_by_status(apps, status)
            .into_iter()
            .filter(|a| self.filter.matches(a))
            .collect()
    }

    pub fn focused<'a>(&self, apps: &'a [Application]) -> Option<&'a Application> {
        self.column_cards(apps, self.status()).get(self.row).copied()
    }

    /// Keeps the row inside the focused column after the data changed.
    pub fn clamp(&mut self, apps: &[Application]) {
        let len = self.column_cards(apps, self.status()).len();
        self.row = self.row.min(len.saturating_sub(1));
    }

    pub fn left(&mut self, apps: &[Application]) {
        self.column = self.column.saturating_sub(1);
        self.clamp(apps);
    }

    pub fn right(&mut self, apps: &[Application]) {
        self.column = (self.column + 1).min(ApplicationStatus::ALL.len() - 1);
        self.clamp(apps);
    }

    pub fn up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn down(&mut self, apps: &[Application]) {
        let len = self.column_cards(apps, self.status()).len();
        if len > 0 && self.row < len - 1 {
            self.row += 1;
        }
    }

    /// Carries the focused card into the neighbouring column, the keyboard
    /// equivalent of dropping it there. The cursor follows the card.
    pub fn drag(&mut self, store: &mut Store, forward: bool) -> Option<(String, ApplicationStatus)> {
        let target = if forward {
            self.column + 1
        } else {
            self.column.checked_sub(1)?
        };
        let status = *ApplicationStatus::ALL.get(target)?;
        let id = self.focused(store.applications())?.id.clone();

        store.move_application(&id, status);

        self.column = target;
        self.row = self
            .column_cards(store.applications(), status)
            .iter()
            .position(|a| a.id == id)
            .unwrap_or(0);
        Some((id, status))
    }

    pub fn cycle_category(&mut self, apps: &[Application]) {
        self.filter.category = match self.filter.category {
            None => Some(JobCategory::ALL[0]),
            Some(c) if c == *JobCategory::ALL.last().unwrap_or(&c) => None,
            Some(c) => Some(c.cycle_next()),
        };
        self.clamp(apps);
    }

    pub fn cycle_location(&mut self, apps: &[Application]) {
        let locations = views::locations(apps);
        self.filter.location = match &self.filter.location {
            None => locations.first().cloned(),
            Some(current) => locations
                .iter()
                .position(|l| l == current)
                .and_then(|i| locations.get(i + 1))
                .cloned(),
        };
        self.clamp(apps);
    }

    pub fn clear_filter(&mut self, apps: &[Application]) {
        self.filter = ApplicationFilter::default();
        self.clamp(apps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_navigation_stays_in_bounds() {
        let store = seed::mock_store();
        let apps = store.applications();
        let mut board = Board::default();

        board.left(apps);
        assert_eq!(board.column, 0);
        for _ in 0..10 {
            board.right(apps);
        }
        assert_eq!(board.status(), ApplicationStatus::Rejected);

        board.column = 1; // applied: 3 cards
        for _ in 0..10 {
            board.down(apps);
        }
        assert_eq!(board.row, 2);
        board.left(apps); // saved: 2 cards
        assert_eq!(board.row, 1);
    }

    #[test]
    fn test_drag_moves_card_and_cursor() {
        let mut store = seed::mock_store();
        let mut board = Board::default();
        let first_saved = board.focused(store.applications()).unwrap().id.clone();

        let moved = board.drag(&mut store, true);
        assert_eq!(moved, Some((first_saved.clone(), ApplicationStatus::Applied)));
        assert_eq!(store.application(&first_saved).unwrap().status, ApplicationStatus::Applied);
        assert_eq!(board.status(), ApplicationStatus::Applied);
        assert_eq!(board.focused(store.applications()).unwrap().id, first_saved);

        assert!(board.drag(&mut store, false).is_some());
        assert_eq!(store.application(&first_saved).unwrap().status, ApplicationStatus::Saved);
    }

    #[test]
    fn test_drag_past_edge_is_noop() {
        let mut store = seed::mock_store();
        let mut board = Board::default();
        let before = store.applications().to_vec();
        assert!(board.drag(&mut store, false).is_none());
        assert_eq!(store.applications(), before.as_slice());
    }

    #[test]
    fn test_filters_narrow_columns() {
        let store = seed::mock_store();
        let apps = store.applications();
        let mut board = Board::default();

        board.cycle_category(apps);
        assert_eq!(board.filter.category, Some(JobCategory::SoftwareDeveloper));
        assert!(board.column_cards(apps, ApplicationStatus::Saved).is_empty());
        assert_eq!(board.column_cards(apps, ApplicationStatus::Interview).len(), 3);

        for _ in 0..JobCategory::ALL.len() {
            board.cycle_category(apps);
        }
        assert_eq!(board.filter.category, None);

        board.cycle_location(apps);
        assert_eq!(board.filter.location.as_deref(), Some("Mountain View, CA"));
        board.clear_filter(apps);
        assert!(board.filter.is_empty());
    }
}
