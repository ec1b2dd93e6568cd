//! Client-side view pipeline for sentiment-labelled posts.
//!
//! Records flow through the filter predicates into two consumers: the chart
//! aggregates in [`aggregate`] and the drill-down table, which is further
//! narrowed by the cross-filter [`selection`] before being sorted and paged
//! in [`table`]. Every stage is a pure re-derivation from current state.

pub mod aggregate;
pub mod filter;
pub mod pipeline;
pub mod selection;
pub mod state;
pub mod table;

pub use aggregate::*;
pub use filter::{apply_filters, parse_min_score, FilterPredicate, FilterState};
pub use pipeline::{AnalyticsPipeline, TableView};
pub use selection::CrossFilter;
pub use state::{ViewAction, ViewState};
pub use table::{sort_records, Pagination, SortDirection, SortField, SortState, PAGE_SIZE};
