use chrono::{Datelike, Timelike};
use sentiview_core::{PostRecord, SentimentLabel};
use std::collections::{BTreeMap, HashMap};

pub const TOP_SUBREDDIT_LIMIT: usize = 10;
pub const RADAR_SUBREDDIT_LIMIT: usize = 5;
pub const PREVIEW_CHARS: usize = 50;
pub const UNKNOWN_SERIES: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelDistribution {
    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Slices in pie order, zero-count labels included.
    pub fn entries(&self) -> [(SentimentLabel, usize); 3] {
        SentimentLabel::ALL.map(|label| (label, self.get(label)))
    }

    fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }
}

/// Counts records per recognized label. Missing or foreign labels are skipped.
pub fn label_distribution<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> LabelDistribution {
    let mut distribution = LabelDistribution::default();
    for label in records.into_iter().filter_map(PostRecord::label) {
        distribution.bump(label);
    }
    distribution
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourBucket {
    pub hour: String,
    pub average_sentiment: f64,
    pub count: usize,
}

/// Mean sentiment per hour, ascending by hour key.
pub fn hourly_trend<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> Vec<HourBucket> {
    let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        if let Some(hour) = record.hour_key() {
            let entry = buckets.entry(hour).or_insert((0.0, 0));
            entry.0 += record.sentiment_score;
            entry.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(hour, (sum, count))| HourBucket {
            hour,
            average_sentiment: sum / count as f64,
            count,
        })
        .collect()
}

/// Post counts by weekday (rows, Monday first) and UTC hour (columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityGrid {
    cells: [[usize; 24]; 7],
}

impl Default for ActivityGrid {
    fn default() -> Self {
        Self {
            cells: [[0; 24]; 7],
        }
    }
}

impl ActivityGrid {
    pub fn get(&self, weekday: usize, hour: usize) -> usize {
        self.cells
            .get(weekday)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &[[usize; 24]; 7] {
        &self.cells
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    pub fn max_cell(&self) -> usize {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

pub fn activity_grid<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> ActivityGrid {
    let mut grid = ActivityGrid::default();
    for at in records.into_iter().filter_map(PostRecord::created_at) {
        let day = at.weekday().num_days_from_monday() as usize;
        let hour = at.hour() as usize;
        grid.cells[day][hour] += 1;
    }
    grid
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubredditCount {
    pub subreddit: String,
    pub count: usize,
}

/// Per-subreddit counts in first-appearance order.
fn counts_by_subreddit<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> Vec<SubredditCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SubredditCount> = Vec::new();
    for record in records {
        match index.get(record.subreddit.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(record.subreddit.as_str(), counts.len());
                counts.push(SubredditCount {
                    subreddit: record.subreddit.clone(),
                    count: 1,
                });
            }
        }
    }
    counts
}

/// Busiest subreddits first; equal counts keep first-appearance order.
fn ranked_subreddits<'a>(
    records: impl IntoIterator<Item = &'a PostRecord>,
    limit: usize,
) -> Vec<SubredditCount> {
    let mut counts = counts_by_subreddit(records);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopSubreddits {
    ranked: Vec<SubredditCount>,
}

impl TopSubreddits {
    /// Descending by count.
    pub fn ranked(&self) -> &[SubredditCount] {
        &self.ranked
    }

    /// Ascending by count, the order horizontal bars are drawn in.
    pub fn display_order(&self) -> impl Iterator<Item = &SubredditCount> {
        self.ranked.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

pub fn top_subreddits<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> TopSubreddits {
    TopSubreddits {
        ranked: ranked_subreddits(records, TOP_SUBREDDIT_LIMIT),
    }
}

/// Three radar axes for one subreddit, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarProfile {
    pub subreddit: String,
    pub sentiment: f64,
    pub engagement: f64,
    pub activity: f64,
}

pub fn radar_profiles<'a>(records: impl IntoIterator<Item = &'a PostRecord> + Clone) -> Vec<RadarProfile> {
    let top = ranked_subreddits(records.clone(), RADAR_SUBREDDIT_LIMIT);
    if top.is_empty() {
        return Vec::new();
    }

    let mut sums: HashMap<&str, (f64, i64)> = top
        .iter()
        .map(|entry| (entry.subreddit.as_str(), (0.0, 0)))
        .collect();
    for record in records {
        if let Some(sum) = sums.get_mut(record.subreddit.as_str()) {
            sum.0 += record.sentiment_score;
            sum.1 += record.engagement_score;
        }
    }

    let averages: Vec<(f64, f64)> = top
        .iter()
        .map(|entry| {
            let (sentiment, engagement) = sums.get(entry.subreddit.as_str()).copied().unwrap_or((0.0, 0));
            let n = entry.count as f64;
            (sentiment / n, engagement as f64 / n)
        })
        .collect();

    let max_engagement = averages.iter().map(|(_, e)| *e).fold(0.0_f64, f64::max);
    let max_count = top.iter().map(|entry| entry.count).max().unwrap_or(1) as f64;

    top.iter()
        .zip(averages)
        .map(|(entry, (sentiment, engagement))| RadarProfile {
            subreddit: entry.subreddit.clone(),
            sentiment: ((sentiment + 1.0) / 2.0).clamp(0.0, 1.0),
            engagement: if max_engagement > 0.0 {
                (engagement / max_engagement).clamp(0.0, 1.0)
            } else {
                0.0
            },
            activity: entry.count as f64 / max_count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub sentiment_score: f64,
    pub engagement_score: i64,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    /// The raw label, or [`UNKNOWN_SERIES`] when the record has none.
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

/// Hover text for a scatter point: the first 50 characters of the content
/// (or `r/<subreddit>` when there is none) followed by the subreddit.
pub fn content_preview(record: &PostRecord) -> String {
    let content = record.content_text();
    let head = if content.is_empty() {
        format!("r/{}", record.subreddit)
    } else {
        let truncated: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    };
    format!("{} (r/{})", head, record.subreddit)
}

/// One series per distinct label, in first-appearance order. Unlike the
/// label-keyed aggregates, records without a label land in an "Unknown"
/// series instead of being dropped.
pub fn scatter_series<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> Vec<ScatterSeries> {
    let mut series: Vec<ScatterSeries> = Vec::new();
    for record in records {
        let name = record
            .sentiment_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(UNKNOWN_SERIES);

        let point = ScatterPoint {
            sentiment_score: record.sentiment_score,
            engagement_score: record.engagement_score,
            preview: content_preview(record),
        };

        match series.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.points.push(point),
            None => series.push(ScatterSeries {
                name: name.to_string(),
                points: vec![point],
            }),
        }
    }
    series
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubredditSentiment {
    pub subreddit: String,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

/// Label counts per subreddit for the stacked bar chart.
pub fn sentiment_by_subreddit<'a>(
    records: impl IntoIterator<Item = &'a PostRecord>,
) -> Vec<SubredditSentiment> {
    let mut rows: Vec<SubredditSentiment> = Vec::new();
    for record in records {
        let index = match rows.iter().position(|row| row.subreddit == record.subreddit) {
            Some(index) => index,
            None => {
                rows.push(SubredditSentiment {
                    subreddit: record.subreddit.clone(),
                    positive: 0,
                    neutral: 0,
                    negative: 0,
                });
                rows.len() - 1
            }
        };
        match record.label() {
            Some(SentimentLabel::Positive) => rows[index].positive += 1,
            Some(SentimentLabel::Neutral) => rows[index].neutral += 1,
            Some(SentimentLabel::Negative) => rows[index].negative += 1,
            None => {}
        }
    }
    rows
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryStats {
    pub total: usize,
    pub average_sentiment: Option<f64>,
}

pub fn summary_stats<'a>(records: impl IntoIterator<Item = &'a PostRecord>) -> SummaryStats {
    let (total, sum) = records
        .into_iter()
        .fold((0usize, 0.0_f64), |(n, sum), r| (n + 1, sum + r.sentiment_score));
    SummaryStats {
        total,
        average_sentiment: (total > 0).then(|| sum / total as f64),
    }
}

/// Every chart aggregate for one filtered record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSet {
    pub summary: SummaryStats,
    pub labels: LabelDistribution,
    pub trend: Vec<HourBucket>,
    pub activity: ActivityGrid,
    pub top_subreddits: TopSubreddits,
    pub radar: Vec<RadarProfile>,
    pub scatter: Vec<ScatterSeries>,
    pub stacked: Vec<SubredditSentiment>,
}

impl ChartSet {
    pub fn build(records: &[&PostRecord]) -> Self {
        let records = || records.iter().copied();
        Self {
            summary: summary_stats(records()),
            labels: label_distribution(records()),
            trend: hourly_trend(records()),
            activity: activity_grid(records()),
            top_subreddits: top_subreddits(records()),
            radar: radar_profiles(records()),
            scatter: scatter_series(records()),
            stacked: sentiment_by_subreddit(records()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(subreddit: &str, created: &str, label: Option<&str>, sentiment: f64, score: i64) -> PostRecord {
        PostRecord {
            id: format!("{}-{}", subreddit, created),
            subreddit: subreddit.to_string(),
            content: Some(format!("post in {}", subreddit)),
            created_utc: created.to_string(),
            engagement_score: score,
            sentiment_score: sentiment,
            sentiment_label: label.map(str::to_string),
            url: None,
            author: None,
            item_type: None,
        }
    }

    #[test]
    fn test_label_distribution_skips_foreign_labels() {
        let records = vec![
            post("a", "2024-03-01T10:00:00", Some("positive"), 0.5, 1),
            post("a", "2024-03-01T10:00:00", Some("mixed"), 0.0, 1),
            post("a", "2024-03-01T10:00:00", None, 0.0, 1),
            post("a", "2024-03-01T10:00:00", Some("negative"), -0.5, 1),
        ];
        let distribution = label_distribution(&records);
        assert_eq!(distribution.positive, 1);
        assert_eq!(distribution.negative, 1);
        assert_eq!(distribution.neutral, 0);
        assert_eq!(distribution.total(), 2);
        assert_eq!(distribution.entries()[2], (SentimentLabel::Neutral, 0));
    }

    #[test]
    fn test_hourly_trend_groups_and_averages() {
        let records = vec![
            post("a", "2024-03-01T11:45:00", Some("positive"), 0.2, 1),
            post("a", "2024-03-01T10:05:00", Some("positive"), 0.6, 1),
            post("a", "2024-03-01T10:55:00", Some("negative"), -0.2, 1),
            post("a", "garbage", Some("neutral"), 0.9, 1),
        ];
        let trend = hourly_trend(&records);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].hour, "2024-03-01T10:00:00");
        assert_eq!(trend[0].count, 2);
        assert!((trend[0].average_sentiment - 0.2).abs() < 1e-9);
        assert_eq!(trend[1].hour, "2024-03-01T11:00:00");
    }

    #[test]
    fn test_activity_grid_starts_on_monday() {
        // 2024-03-04 is a Monday, 2024-03-10 a Sunday.
        let records = vec![
            post("a", "2024-03-04T00:30:00", None, 0.0, 1),
            post("a", "2024-03-10T23:10:00", None, 0.0, 1),
            post("a", "2024-03-10T23:50:00+00:00", None, 0.0, 1),
            post("a", "", None, 0.0, 1),
        ];
        let grid = activity_grid(&records);
        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.get(6, 23), 2);
        assert_eq!(grid.total(), 3);
        assert_eq!(grid.max_cell(), 2);
        assert_eq!(grid.get(9, 0), 0);
    }

    #[test]
    fn test_top_subreddits_ranks_and_reverses() {
        let mut records = Vec::new();
        for (i, name) in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"]
            .iter()
            .enumerate()
        {
            for _ in 0..(i % 4 + 1) {
                records.push(post(name, "2024-03-01T10:00:00", None, 0.0, 1));
            }
        }

        let top = top_subreddits(&records);
        assert_eq!(top.len(), TOP_SUBREDDIT_LIMIT);
        let counts: Vec<usize> = top.ranked().iter().map(|e| e.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        // Ties keep first-appearance order: "d" and "h" both have 4.
        assert_eq!(top.ranked()[0].subreddit, "d");
        assert_eq!(top.ranked()[1].subreddit, "h");
        assert_eq!(top.display_order().next().map(|e| e.count), counts.last().copied());
    }

    #[test]
    fn test_radar_profiles_are_normalized() {
        let records = vec![
            post("a", "2024-03-01T10:00:00", None, 1.0, 100),
            post("a", "2024-03-01T10:00:00", None, 0.0, 50),
            post("b", "2024-03-01T10:00:00", None, -1.0, 25),
        ];
        let radar = radar_profiles(&records);
        assert_eq!(radar.len(), 2);

        assert_eq!(radar[0].subreddit, "a");
        assert!((radar[0].sentiment - 0.75).abs() < 1e-9);
        assert!((radar[0].engagement - 1.0).abs() < 1e-9);
        assert!((radar[0].activity - 1.0).abs() < 1e-9);

        assert_eq!(radar[1].sentiment, 0.0);
        assert!((radar[1].engagement - 25.0 / 75.0).abs() < 1e-9);
        assert!((radar[1].activity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_radar_engagement_zero_when_no_positive_average() {
        let records = vec![
            post("a", "2024-03-01T10:00:00", None, 0.0, -4),
            post("b", "2024-03-01T10:00:00", None, 0.0, 0),
        ];
        assert!(radar_profiles(&records).iter().all(|p| p.engagement == 0.0));
    }

    #[test]
    fn test_scatter_series_and_previews() {
        let mut long = post("rust", "2024-03-01T10:00:00", Some("positive"), 0.4, 9);
        long.content = Some("x".repeat(80));
        let mut empty = post("news", "2024-03-01T10:00:00", None, 0.0, 2);
        empty.content = None;
        let records = vec![long, empty, post("rust", "2024-03-01T10:00:00", Some("positive"), 0.1, 1)];

        let series = scatter_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "positive");
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[1].name, UNKNOWN_SERIES);
        assert_eq!(series[1].points[0].preview, "r/news (r/news)");
        assert_eq!(
            series[0].points[0].preview,
            format!("{}... (r/rust)", "x".repeat(PREVIEW_CHARS))
        );
    }

    #[test]
    fn test_sentiment_by_subreddit() {
        let records = vec![
            post("b", "2024-03-01T10:00:00", Some("positive"), 0.0, 1),
            post("a", "2024-03-01T10:00:00", Some("negative"), 0.0, 1),
            post("b", "2024-03-01T10:00:00", Some("neutral"), 0.0, 1),
            post("b", "2024-03-01T10:00:00", Some("other"), 0.0, 1),
        ];
        let rows = sentiment_by_subreddit(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subreddit, "b");
        assert_eq!((rows[0].positive, rows[0].neutral, rows[0].negative), (1, 1, 0));
        assert_eq!(rows[1].negative, 1);
    }

    #[test]
    fn test_empty_input_yields_empty_charts() {
        let charts = ChartSet::build(&[]);
        assert!(charts.is_empty());
        assert!(charts.labels.is_empty());
        assert!(charts.trend.is_empty());
        assert_eq!(charts.activity.total(), 0);
        assert!(charts.top_subreddits.is_empty());
        assert!(charts.radar.is_empty());
        assert!(charts.scatter.is_empty());
        assert!(charts.stacked.is_empty());
        assert_eq!(charts.summary.average_sentiment, None);
    }
}
