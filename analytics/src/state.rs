use crate::filter::FilterState;
use crate::selection::CrossFilter;
use crate::table::{Pagination, SortField, SortState};
use sentiview_core::SentimentLabel;

/// Every user intent the pipeline reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Choosing a subreddit clears the group.
    SetSubreddit(Option<String>),
    /// Choosing a group clears the subreddit.
    SetGroup(Option<String>),
    SetKeywords(String),
    SetSearch(String),
    SetMinScore(String),
    ClearFilters,
    SortBy(SortField),
    ToggleLabel(SentimentLabel),
    ToggleHour(String),
    ClearSelection,
    NextPage,
    PreviousPage,
    GoToPage(usize),
}

impl ViewAction {
    fn changes_base_filters(&self) -> bool {
        matches!(
            self,
            ViewAction::SetSubreddit(_)
                | ViewAction::SetGroup(_)
                | ViewAction::SetKeywords(_)
                | ViewAction::SetSearch(_)
                | ViewAction::SetMinScore(_)
                | ViewAction::ClearFilters
        )
    }
}

/// Immutable snapshot of the user-controlled view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: FilterState,
    pub selection: CrossFilter,
    pub sort: SortState,
    pub pagination: Pagination,
}

fn optional_text(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ViewState {
    /// Applies `action` and returns the next snapshot. `row_count` is the
    /// table size under the current state, used to bound page navigation;
    /// callers clamp again once the new row count is known.
    pub fn reduce(&self, action: ViewAction, row_count: usize) -> ViewState {
        let mut next = self.clone();
        let resets_selection =
            action.changes_base_filters() || matches!(action, ViewAction::SortBy(_));

        match action {
            ViewAction::SetSubreddit(subreddit) => {
                if subreddit.is_some() {
                    next.filter.group = None;
                }
                next.filter.subreddit = subreddit;
            }
            ViewAction::SetGroup(group) => {
                if group.is_some() {
                    next.filter.subreddit = None;
                }
                next.filter.group = group;
            }
            ViewAction::SetKeywords(keywords) => next.filter.keywords = optional_text(keywords),
            ViewAction::SetSearch(search) => next.filter.search = optional_text(search),
            ViewAction::SetMinScore(min_score) => next.filter.min_score = optional_text(min_score),
            ViewAction::ClearFilters => next.filter = FilterState::default(),
            ViewAction::SortBy(field) => next.sort = self.sort.toggle(field),
            ViewAction::ToggleLabel(label) => next.selection = self.selection.toggle_label(label),
            ViewAction::ToggleHour(hour) => next.selection = self.selection.toggle_hour(hour),
            ViewAction::ClearSelection => next.selection = CrossFilter::Unselected,
            ViewAction::NextPage => next.pagination = self.pagination.next(row_count),
            ViewAction::PreviousPage => next.pagination = self.pagination.previous(row_count),
            ViewAction::GoToPage(page) => next.pagination = self.pagination.go_to(page, row_count),
        }

        if resets_selection {
            next.selection = CrossFilter::Unselected;
        }
        next
    }

    /// Same state with the page cursor pulled back into range.
    pub fn clamped(mut self, row_count: usize) -> ViewState {
        self.pagination = self.pagination.clamp(row_count);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subreddit_and_group_clear_each_other() {
        let state = ViewState::default()
            .reduce(ViewAction::SetGroup(Some("tech".to_string())), 0)
            .reduce(ViewAction::SetSubreddit(Some("rust".to_string())), 0);
        assert_eq!(state.filter.subreddit.as_deref(), Some("rust"));
        assert_eq!(state.filter.group, None);

        let state = state.reduce(ViewAction::SetGroup(Some("tech".to_string())), 0);
        assert_eq!(state.filter.subreddit, None);
        assert_eq!(state.filter.group.as_deref(), Some("tech"));

        let state = state.reduce(ViewAction::SetSubreddit(None), 0);
        assert_eq!(state.filter.group.as_deref(), Some("tech"));
    }

    #[test]
    fn test_filter_and_sort_changes_reset_selection() {
        let selected = ViewState::default().reduce(ViewAction::ToggleLabel(SentimentLabel::Positive), 0);
        assert!(selected.selection.is_active());

        let actions = vec![
            ViewAction::SetSearch("rust".to_string()),
            ViewAction::SetMinScore("5".to_string()),
            ViewAction::SetKeywords("async".to_string()),
            ViewAction::ClearFilters,
            ViewAction::SortBy(SortField::Subreddit),
        ];
        for action in actions {
            assert_eq!(selected.reduce(action, 0).selection, CrossFilter::Unselected);
        }

        let paged = selected.reduce(ViewAction::NextPage, 100);
        assert!(paged.selection.is_active());
    }

    #[test]
    fn test_blank_text_clears_dimension() {
        let state = ViewState::default()
            .reduce(ViewAction::SetMinScore("10".to_string()), 0)
            .reduce(ViewAction::SetMinScore("  ".to_string()), 0);
        assert_eq!(state.filter.min_score, None);
        assert!(state.filter.is_empty());
    }

    #[test]
    fn test_reduce_leaves_original_untouched() {
        let state = ViewState::default();
        let next = state.reduce(ViewAction::SortBy(SortField::SentimentScore), 0);
        assert_eq!(state, ViewState::default());
        assert_ne!(next, state);
    }

    #[test]
    fn test_clamped() {
        let state = ViewState::default().reduce(ViewAction::GoToPage(4), 80);
        assert_eq!(state.pagination.current_page(), 4);
        assert_eq!(state.clamped(25).pagination.current_page(), 2);
    }
}
