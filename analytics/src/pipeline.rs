use crate::aggregate::ChartSet;
use crate::filter::{apply_filters, FilterPredicate};
use crate::selection::CrossFilter;
use crate::state::{ViewAction, ViewState};
use crate::table::{sort_records, Pagination, SortState};
use sentiview_core::{GroupMap, PostRecord};
use tracing::debug;

/// One page of the drill-down table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    pub rows: Vec<&'a PostRecord>,
    pub total_rows: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub sort: SortState,
    pub selection: CrossFilter,
}

/// Holds the fetched records plus the current [`ViewState`] and derives
/// charts and table pages from them on demand.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsPipeline {
    records: Vec<PostRecord>,
    groups: GroupMap,
    state: ViewState,
}

impl AnalyticsPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PostRecord] {
        &self.records
    }

    pub fn groups(&self) -> &GroupMap {
        &self.groups
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn replace_records(&mut self, records: Vec<PostRecord>) {
        debug!("Pipeline received {} records", records.len());
        self.records = records;
        self.settle();
    }

    pub fn set_groups(&mut self, groups: GroupMap) {
        self.groups = groups;
        self.settle();
    }

    pub fn dispatch(&mut self, action: ViewAction) -> &ViewState {
        debug!("Pipeline action: {:?}", action);
        let row_count = self.table_row_count();
        self.state = self.state.reduce(action, row_count);
        self.settle();
        &self.state
    }

    fn settle(&mut self) {
        let row_count = self.table_row_count();
        self.state = self.state.clone().clamped(row_count);
    }

    /// Records passing the base filters, in fetch order.
    pub fn filtered(&self) -> Vec<&PostRecord> {
        let predicate = FilterPredicate::new(&self.state.filter, &self.groups);
        apply_filters(&self.records, &predicate)
    }

    /// Chart aggregates over the base-filtered set. The cross-filter
    /// selection never narrows the charts.
    pub fn charts(&self) -> ChartSet {
        ChartSet::build(&self.filtered())
    }

    fn table_rows(&self) -> Vec<&PostRecord> {
        let mut rows: Vec<&PostRecord> = self
            .filtered()
            .into_iter()
            .filter(|record| self.state.selection.matches(record))
            .collect();
        sort_records(&mut rows, self.state.sort);
        rows
    }

    fn table_row_count(&self) -> usize {
        let predicate = FilterPredicate::new(&self.state.filter, &self.groups);
        self.records
            .iter()
            .filter(|record| predicate.matches(record) && self.state.selection.matches(record))
            .count()
    }

    pub fn table(&self) -> TableView<'_> {
        let rows = self.table_rows();
        let total_rows = rows.len();
        let pagination = self.state.pagination;

        TableView {
            rows: pagination.slice(&rows).to_vec(),
            total_rows,
            current_page: pagination.current_page(),
            total_pages: Pagination::total_pages(total_rows),
            has_previous: pagination.has_previous(),
            has_next: pagination.has_next(total_rows),
            sort: self.state.sort,
            selection: self.state.selection.clone(),
        }
    }
}
