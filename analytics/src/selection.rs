use sentiview_core::{PostRecord, SentimentLabel};

/// Chart-click selection layered over the base filters. Only the drill-down
/// table honours it; charts always show the unselected set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CrossFilter {
    #[default]
    Unselected,
    Label(SentimentLabel),
    Hour(String),
}

impl CrossFilter {
    /// Pie-slice click. The same label twice clears the selection.
    pub fn toggle_label(&self, label: SentimentLabel) -> Self {
        match self {
            CrossFilter::Label(current) if *current == label => CrossFilter::Unselected,
            _ => CrossFilter::Label(label),
        }
    }

    /// Trend-point click, keyed by hour bucket.
    pub fn toggle_hour(&self, hour: impl Into<String>) -> Self {
        let hour = hour.into();
        match self {
            CrossFilter::Hour(current) if *current == hour => CrossFilter::Unselected,
            _ => CrossFilter::Hour(hour),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CrossFilter::Unselected)
    }

    pub fn matches(&self, record: &PostRecord) -> bool {
        match self {
            CrossFilter::Unselected => true,
            CrossFilter::Label(label) => record.label() == Some(*label),
            CrossFilter::Hour(hour) => record.hour_key().as_deref() == Some(hour.as_str()),
        }
    }
}
