use sentiview_core::PostRecord;
use std::cmp::Ordering;
use std::fmt;

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    CreatedAt,
    Subreddit,
    SentimentLabel,
    SentimentScore,
    EngagementScore,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::CreatedAt,
        SortField::SentimentLabel,
        SortField::SentimentScore,
        SortField::Subreddit,
        SortField::EngagementScore,
    ];

    fn compare(&self, a: &PostRecord, b: &PostRecord) -> Ordering {
        match self {
            // Unparseable timestamps sort before every real instant.
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortField::Subreddit => a.subreddit.cmp(&b.subreddit),
            SortField::SentimentLabel => a.sentiment_label.cmp(&b.sentiment_label),
            SortField::SentimentScore => a.sentiment_score.total_cmp(&b.sentiment_score),
            SortField::EngagementScore => a.engagement_score.cmp(&b.engagement_score),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Header click: the active field flips direction, any other field
    /// becomes active ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Stable sort; ties keep their input order in both directions.
pub fn sort_records(records: &mut [&PostRecord], sort: SortState) {
    records.sort_by(|a, b| {
        let ordering = sort.field.compare(a, b);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// 1-based page cursor over a list of `PAGE_SIZE` rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

impl Pagination {
    pub fn total_pages(row_count: usize) -> usize {
        row_count.div_ceil(PAGE_SIZE).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn clamp(self, row_count: usize) -> Self {
        Self {
            current_page: self.current_page.clamp(1, Self::total_pages(row_count)),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self, row_count: usize) -> bool {
        self.current_page < Self::total_pages(row_count)
    }

    pub fn next(self, row_count: usize) -> Self {
        self.go_to(self.current_page + 1, row_count)
    }

    pub fn previous(self, row_count: usize) -> Self {
        self.go_to(self.current_page.saturating_sub(1), row_count)
    }

    /// Pages outside `[1, total_pages]` leave the cursor where it is.
    pub fn go_to(self, page: usize, row_count: usize) -> Self {
        if (1..=Self::total_pages(row_count)).contains(&page) {
            Self { current_page: page }
        } else {
            self
        }
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.current_page - 1) * PAGE_SIZE;
        if start >= rows.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(rows.len());
        &rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, created: &str, sentiment: f64) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            subreddit: "rust".to_string(),
            content: None,
            created_utc: created.to_string(),
            engagement_score: 0,
            sentiment_score: sentiment,
            sentiment_label: None,
            url: None,
            author: None,
            item_type: None,
        }
    }

    fn ids(records: &[&PostRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let records = vec![
            post("old", "2024-03-01T08:00:00", 0.0),
            post("new", "2024-03-02T08:00:00", 0.0),
            post("bad", "not a date", 0.0),
        ];
        let mut rows: Vec<&PostRecord> = records.iter().collect();
        sort_records(&mut rows, SortState::default());
        assert_eq!(ids(&rows), vec!["new", "old", "bad"]);
    }

    #[test]
    fn test_created_at_compares_instants_not_strings() {
        let records = vec![
            post("a", "2024-03-01T10:00:00+02:00", 0.0),
            post("b", "2024-03-01T09:00:00", 0.0),
        ];
        let mut rows: Vec<&PostRecord> = records.iter().collect();
        sort_records(
            &mut rows,
            SortState {
                field: SortField::CreatedAt,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(ids(&rows), vec!["a", "b"]);
    }

    #[test]
    fn test_toggle_rule() {
        let sort = SortState::default().toggle(SortField::SentimentScore);
        assert_eq!(sort.field, SortField::SentimentScore);
        assert_eq!(sort.direction, SortDirection::Ascending);

        let sort = sort.toggle(SortField::SentimentScore);
        assert_eq!(sort.direction, SortDirection::Descending);

        let sort = sort.toggle(SortField::Subreddit);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records = vec![
            post("a", "2024-03-01T08:00:00", 0.5),
            post("b", "2024-03-01T08:00:00", 0.1),
            post("c", "2024-03-01T08:00:00", 0.5),
        ];
        let mut rows: Vec<&PostRecord> = records.iter().collect();
        let ascending = SortState {
            field: SortField::SentimentScore,
            direction: SortDirection::Ascending,
        };
        sort_records(&mut rows, ascending);
        assert_eq!(ids(&rows), vec!["b", "a", "c"]);

        let mut rows: Vec<&PostRecord> = records.iter().collect();
        sort_records(&mut rows, ascending.toggle(SortField::SentimentScore));
        assert_eq!(ids(&rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::total_pages(0), 1);
        assert_eq!(Pagination::total_pages(20), 1);
        assert_eq!(Pagination::total_pages(21), 2);
        assert_eq!(Pagination::total_pages(100), 5);
    }

    #[test]
    fn test_navigation_is_bounded() {
        let page = Pagination::default();
        assert_eq!(page.previous(45), page);
        assert!(!page.has_previous());

        let last = page.next(45).next(45);
        assert_eq!(last.current_page(), 3);
        assert!(!last.has_next(45));
        assert_eq!(last.next(45), last);
        assert_eq!(last.go_to(0, 45), last);
        assert_eq!(last.go_to(1, 45).current_page(), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let page = Pagination::default().go_to(5, 100);
        assert_eq!(page.current_page(), 5);
        assert_eq!(page.clamp(30).current_page(), 2);
        assert_eq!(page.clamp(0).current_page(), 1);
    }

    #[test]
    fn test_slice() {
        let rows: Vec<usize> = (0..45).collect();
        let page = Pagination::default();
        assert_eq!(page.slice(&rows).len(), PAGE_SIZE);
        assert_eq!(page.next(45).next(45).slice(&rows), &[40, 41, 42, 43, 44]);
        assert!(Pagination::default().slice::<usize>(&[]).is_empty());
    }
}
