pub mod comparison;
pub mod dashboard;
pub mod data_tools;
pub mod table;

use std::fmt;

/// Fetch lifecycle shared by every page that shows backend data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Pick-list entry: `value == None` is the "all"/"none selected" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: Option<String>,
    label: String,
}

impl Choice {
    pub fn any(label: impl Into<String>) -> Self {
        Self {
            value: None,
            label: label.into(),
        }
    }

    pub fn named(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
        }
    }

    /// Options list with the "any" entry first, plus the entry matching
    /// `current`.
    pub fn options<'a>(
        any_label: &str,
        values: impl IntoIterator<Item = &'a String>,
        label_for: impl Fn(&str) -> String,
        current: Option<&str>,
    ) -> (Vec<Choice>, Choice) {
        let any = Choice::any(any_label);
        let mut options = vec![any.clone()];
        let mut selected = any;
        for value in values {
            let choice = Choice::named(value.clone(), label_for(value));
            if current == Some(value.as_str()) {
                selected = choice.clone();
            }
            options.push(choice);
        }
        (options, selected)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_select_current_value() {
        let values = vec!["python".to_string(), "rust".to_string()];
        let (options, selected) =
            Choice::options("All", &values, |v| format!("r/{}", v), Some("rust"));

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, None);
        assert_eq!(selected.value.as_deref(), Some("rust"));
        assert_eq!(selected.to_string(), "r/rust");
    }

    #[test]
    fn test_unknown_current_value_falls_back_to_any() {
        let values = vec!["python".to_string()];
        let (_, selected) = Choice::options("All", &values, str::to_string, Some("gone"));
        assert_eq!(selected, Choice::any("All"));
    }
}
