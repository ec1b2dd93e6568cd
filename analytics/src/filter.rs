use sentiview_core::{GroupMap, PostRecord};
use tracing::debug;

/// User-controlled base filters. `None` (or blank text) means no constraint
/// on that dimension.
///
/// `keywords` is the server-side content search sent with `GET /data`; it is
/// not re-applied here. `search` is the client-side table search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub subreddit: Option<String>,
    pub group: Option<String>,
    pub keywords: Option<String>,
    pub search: Option<String>,
    pub min_score: Option<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.subreddit.is_none()
            && self.group.is_none()
            && non_blank(&self.keywords).is_none()
            && non_blank(&self.search).is_none()
            && non_blank(&self.min_score).is_none()
    }

    /// Subreddits to request from the backend for the selected group, if
    /// the group is known.
    pub fn group_members<'g>(&self, groups: &'g GroupMap) -> Option<&'g [String]> {
        self.group
            .as_deref()
            .and_then(|group| groups.get(group))
            .map(Vec::as_slice)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Minimum-score text as typed by the user. Anything that is not a number
/// disables the filter instead of failing.
pub fn parse_min_score(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.floor() as i64)
}

/// A [`FilterState`] resolved against the group map, ready to test records.
#[derive(Debug, Clone)]
pub struct FilterPredicate<'a> {
    subreddit: Option<&'a str>,
    group_members: Option<&'a [String]>,
    search: Option<String>,
    min_score: Option<i64>,
}

impl<'a> FilterPredicate<'a> {
    pub fn new(state: &'a FilterState, groups: &'a GroupMap) -> Self {
        let group_members = state.group_members(groups);
        if let (Some(group), None) = (state.group.as_deref(), group_members) {
            debug!("Group {} is not in the group map, ignoring it", group);
        }

        Self {
            subreddit: state.subreddit.as_deref().filter(|s| !s.is_empty()),
            group_members,
            search: non_blank(&state.search).map(str::to_lowercase),
            min_score: state.min_score.as_deref().and_then(parse_min_score),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.subreddit.is_none()
            && self.group_members.is_none()
            && self.search.is_none()
            && self.min_score.is_none()
    }

    pub fn matches(&self, record: &PostRecord) -> bool {
        if let Some(subreddit) = self.subreddit {
            if record.subreddit != subreddit {
                return false;
            }
        }

        if let Some(members) = self.group_members {
            if !members.iter().any(|member| *member == record.subreddit) {
                return false;
            }
        }

        if let Some(threshold) = self.min_score {
            if record.engagement_score < threshold {
                return false;
            }
        }

        if let Some(needle) = self.search.as_deref() {
            let label = record.sentiment_label.as_deref().unwrap_or("");
            let hit = [record.content_text(), record.subreddit.as_str(), label]
                .iter()
                .any(|field| field.to_lowercase().contains(needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

pub fn apply_filters<'r>(
    records: impl IntoIterator<Item = &'r PostRecord>,
    predicate: &FilterPredicate<'_>,
) -> Vec<&'r PostRecord> {
    records
        .into_iter()
        .filter(|record| predicate.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, subreddit: &str, content: &str, label: &str, score: i64) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            subreddit: subreddit.to_string(),
            content: Some(content.to_string()),
            created_utc: "2024-03-01T10:00:00".to_string(),
            engagement_score: score,
            sentiment_score: 0.0,
            sentiment_label: Some(label.to_string()),
            url: None,
            author: None,
            item_type: None,
        }
    }

    fn sample() -> Vec<PostRecord> {
        vec![
            post("1", "python", "Async is great", "positive", 10),
            post("2", "rust", "Borrow checker woes", "negative", 3),
            post("3", "news", "Markets flat today", "neutral", 50),
            post("4", "python", "Packaging again", "negative", -2),
        ]
    }

    fn ids(records: &[&PostRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_state_passes_everything() {
        let records = sample();
        let state = FilterState::default();
        let groups = GroupMap::new();
        let predicate = FilterPredicate::new(&state, &groups);

        assert!(state.is_empty());
        assert!(predicate.is_unconstrained());
        assert_eq!(apply_filters(&records, &predicate).len(), 4);
    }

    #[test]
    fn test_subreddit_is_exact_match() {
        let records = sample();
        let state = FilterState {
            subreddit: Some("python".to_string()),
            ..Default::default()
        };
        let groups = GroupMap::new();
        let filtered = apply_filters(&records, &FilterPredicate::new(&state, &groups));
        assert_eq!(ids(&filtered), vec!["1", "4"]);

        let state = FilterState {
            subreddit: Some("pyth".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &FilterPredicate::new(&state, &groups)).is_empty());
    }

    #[test]
    fn test_group_and_subreddit_both_apply() {
        let records = sample();
        let mut groups = GroupMap::new();
        groups.insert(
            "dev".to_string(),
            vec!["python".to_string(), "rust".to_string()],
        );

        let state = FilterState {
            group: Some("dev".to_string()),
            ..Default::default()
        };
        let filtered = apply_filters(&records, &FilterPredicate::new(&state, &groups));
        assert_eq!(ids(&filtered), vec!["1", "2", "4"]);

        let state = FilterState {
            group: Some("dev".to_string()),
            subreddit: Some("news".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &FilterPredicate::new(&state, &groups)).is_empty());
    }

    #[test]
    fn test_unknown_group_is_ignored() {
        let records = sample();
        let state = FilterState {
            group: Some("missing".to_string()),
            ..Default::default()
        };
        let groups = GroupMap::new();
        assert_eq!(
            apply_filters(&records, &FilterPredicate::new(&state, &groups)).len(),
            4
        );
    }

    #[test]
    fn test_search_matches_content_subreddit_or_label() {
        let records = sample();
        let groups = GroupMap::new();
        let search = |term: &str| {
            let state = FilterState {
                search: Some(term.to_string()),
                ..Default::default()
            };
            ids(&apply_filters(&records, &FilterPredicate::new(&state, &groups)))
        };

        assert_eq!(search("ASYNC"), vec!["1"]);
        assert_eq!(search("pyTHon"), vec!["1", "4"]);
        assert_eq!(search("negative"), vec!["2", "4"]);
        assert_eq!(search("   "), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_min_score_threshold() {
        let records = sample();
        let groups = GroupMap::new();
        let state = FilterState {
            min_score: Some("10".to_string()),
            ..Default::default()
        };
        let filtered = apply_filters(&records, &FilterPredicate::new(&state, &groups));
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn test_non_numeric_min_score_is_ignored() {
        let records = sample();
        let groups = GroupMap::new();
        let state = FilterState {
            min_score: Some("abc".to_string()),
            ..Default::default()
        };
        let predicate = FilterPredicate::new(&state, &groups);
        assert!(predicate.is_unconstrained());
        assert_eq!(apply_filters(&records, &predicate).len(), 4);
    }

    #[test]
    fn test_parse_min_score() {
        assert_eq!(parse_min_score("42"), Some(42));
        assert_eq!(parse_min_score(" -5 "), Some(-5));
        assert_eq!(parse_min_score("3.7"), Some(3));
        assert_eq!(parse_min_score(""), None);
        assert_eq!(parse_min_score("abc"), None);
        assert_eq!(parse_min_score("NaN"), None);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = sample();
        let groups = GroupMap::new();
        let state = FilterState {
            search: Some("o".to_string()),
            min_score: Some("0".to_string()),
            ..Default::default()
        };
        let predicate = FilterPredicate::new(&state, &groups);

        let once = apply_filters(&records, &predicate);
        let twice = apply_filters(once.iter().copied(), &predicate);
        assert_eq!(ids(&once), ids(&twice));
        assert!(once.iter().all(|r| records.iter().any(|orig| orig == *r)));
    }
}
