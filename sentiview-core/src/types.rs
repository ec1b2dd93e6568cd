use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Group name -> member subreddit names, as served by `GET /groups`.
pub type GroupMap = BTreeMap<String, Vec<String>>;

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One ingested post (or comment) with its upstream sentiment annotation.
///
/// Records are read-only once fetched. `sentiment_label` is kept as the raw
/// string the backend sent so that foreign or missing labels survive
/// deserialization; use [`PostRecord::label`] for the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub subreddit: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_utc: String,
    #[serde(rename = "score", default, deserialize_with = "null_as_default")]
    pub engagement_score: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment_score: f64,
    #[serde(default)]
    pub sentiment_label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
}

impl PostRecord {
    pub fn label(&self) -> Option<SentimentLabel> {
        self.sentiment_label.as_deref().and_then(SentimentLabel::parse)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_utc)
    }

    /// Hour bucket key, e.g. `2024-03-01T14:00:00`. `None` when the
    /// timestamp cannot be parsed.
    pub fn hour_key(&self) -> Option<String> {
        self.created_at().map(|at| hour_key(&at))
    }

    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses the backend's timestamp strings. Offset-less timestamps are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

pub fn hour_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:00:00").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Exact match on the backend's lowercase label names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse reading of an average sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentTone {
    Positive,
    Negative,
    Neutral,
}

impl SentimentTone {
    pub const STATS_THRESHOLD: f64 = 0.2;

    /// Stats bar reading: only averages beyond +/-0.2 count as non-neutral.
    pub fn from_average(score: f64) -> Self {
        if score > Self::STATS_THRESHOLD {
            SentimentTone::Positive
        } else if score < -Self::STATS_THRESHOLD {
            SentimentTone::Negative
        } else {
            SentimentTone::Neutral
        }
    }

    pub fn from_sign(score: f64) -> Self {
        if score > 0.0 {
            SentimentTone::Positive
        } else if score < 0.0 {
            SentimentTone::Negative
        } else {
            SentimentTone::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditRef {
    pub subreddit: String,
    #[serde(default)]
    pub avg_sentiment: Option<f64>,
}

/// KPI summary served by `GET /stats`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(alias = "total_posts_24h", default)]
    pub total_posts: u64,
    #[serde(alias = "avg_sentiment_24h", default)]
    pub avg_sentiment: Option<f64>,
    #[serde(default)]
    pub most_positive_sub: Option<SubredditRef>,
    #[serde(default)]
    pub most_negative_sub: Option<SubredditRef>,
}

/// Everything the dashboard needs before it can render: the result of the
/// three concurrent startup fetches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSnapshot {
    pub posts: Vec<PostRecord>,
    pub subreddits: Vec<String>,
    pub groups: GroupMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Lookback windows offered by the comparison panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [
        Timeframe::Last24Hours,
        Timeframe::Last7Days,
        Timeframe::Last30Days,
    ];

    pub fn hours(&self) -> u32 {
        match self {
            Timeframe::Last24Hours => 24,
            Timeframe::Last7Days => 168,
            Timeframe::Last30Days => 720,
        }
    }
}

/// Query parameters for `GET /data` and `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataQuery {
    pub subreddit: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub keywords: Option<String>,
    pub subreddits: Vec<String>,
}

impl DataQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_subreddit(subreddit: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            subreddit: Some(subreddit.into()),
            timeframe: Some(timeframe),
            ..Self::default()
        }
    }

    /// Query pairs with empty values left out.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(subreddit) = self.subreddit.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("subreddit", subreddit.to_string()));
        }
        if let Some(timeframe) = self.timeframe {
            pairs.push(("timeframe", timeframe.hours().to_string()));
        }
        if let Some(keywords) = self.keywords.as_deref().map(str::trim) {
            if !keywords.is_empty() {
                pairs.push(("keywords", keywords.to_string()));
            }
        }
        if !self.subreddits.is_empty() {
            pairs.push(("subreddits", self.subreddits.join(",")));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_post_record_decoding() {
        let json = r#"{
            "id": "abc",
            "subreddit": "rust",
            "content": null,
            "created_utc": "2024-03-01T14:25:00",
            "score": null,
            "sentiment_score": 0.42,
            "sentiment_label": "positive",
            "url": "https://www.reddit.com/r/rust/abc"
        }"#;

        let record: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.engagement_score, 0);
        assert_eq!(record.content_text(), "");
        assert_eq!(record.label(), Some(SentimentLabel::Positive));
        assert_eq!(record.hour_key().as_deref(), Some("2024-03-01T14:00:00"));
    }

    #[test]
    fn test_foreign_label_is_kept_raw() {
        let json = r#"{"id":"1","subreddit":"news","created_utc":"x","sentiment_label":"mixed"}"#;
        let record: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sentiment_label.as_deref(), Some("mixed"));
        assert_eq!(record.label(), None);
        assert_eq!(record.created_at(), None);
    }

    #[test]
    fn test_null_timestamp_does_not_reject_the_list() {
        let json = r#"[
            {"id":"1","subreddit":"rust","created_utc":"2024-03-01T14:25:00","sentiment_label":"positive"},
            {"id":"2","subreddit":"rust","created_utc":null,"sentiment_label":"neutral"},
            {"id":"3","subreddit":"news"}
        ]"#;
        let records: Vec<PostRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].created_utc, "");
        assert_eq!(records[1].created_at(), None);
        assert_eq!(records[1].hour_key(), None);
        assert_eq!(records[2].created_at(), None);
    }

    #[test]
    fn test_timestamp_formats() {
        let with_offset = parse_timestamp("2024-03-01T14:25:00+02:00").unwrap();
        assert_eq!(with_offset.hour(), 12);

        let fractional = parse_timestamp("2024-03-01T14:25:00.123456").unwrap();
        assert_eq!(fractional.minute(), 25);

        let spaced = parse_timestamp("2024-03-01 09:00:00").unwrap();
        assert_eq!(spaced.day(), 1);

        let http_date = parse_timestamp("Fri, 01 Mar 2024 14:25:00 GMT").unwrap();
        assert_eq!(http_date.hour(), 14);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_sentiment_tone_thresholds() {
        assert_eq!(SentimentTone::from_average(0.21), SentimentTone::Positive);
        assert_eq!(SentimentTone::from_average(0.2), SentimentTone::Neutral);
        assert_eq!(SentimentTone::from_average(-0.5), SentimentTone::Negative);
        assert_eq!(SentimentTone::from_sign(0.01), SentimentTone::Positive);
        assert_eq!(SentimentTone::from_sign(0.0), SentimentTone::Neutral);
    }

    #[test]
    fn test_stats_accepts_windowed_field_names() {
        let json = r#"{
            "total_posts_24h": 100,
            "avg_sentiment_24h": 0.5,
            "most_positive_sub": {"subreddit": "aww"},
            "most_negative_sub": null
        }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_posts, 100);
        assert_eq!(stats.avg_sentiment, Some(0.5));
        assert_eq!(stats.most_positive_sub.unwrap().subreddit, "aww");
        assert!(stats.most_negative_sub.is_none());
    }

    #[test]
    fn test_query_pairs_skip_empty_values() {
        let query = DataQuery {
            subreddit: Some(String::new()),
            timeframe: Some(Timeframe::Last7Days),
            keywords: Some("  ".to_string()),
            subreddits: vec!["python".to_string(), "rust".to_string()],
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("timeframe", "168".to_string()),
                ("subreddits", "python,rust".to_string()),
            ]
        );
        assert!(DataQuery::all().to_query_pairs().is_empty());
    }
}
