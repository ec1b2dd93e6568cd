use crate::i18n::{Language, TextKey};
use crate::{widgets, Effect};
use iced::widget::{button, column, container, text, text_input};
use iced::{Element, Length};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum DataToolsMessage {
    InputChanged(String),
    SubmitSubreddit,
    FetchRandom,
    Finished(Result<String, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionKind {
    Subreddit,
    Random,
}

/// Outcome of the last ingestion trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Failure(String),
}

impl Banner {
    pub fn text(&self) -> String {
        match self {
            Banner::Success(message) => message.clone(),
            Banner::Failure(message) => format!("Error: {}", message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataToolsPage {
    input: String,
    pending: Option<IngestionKind>,
    banner: Option<Banner>,
}

impl DataToolsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn update(&mut self, message: DataToolsMessage) -> Vec<Effect> {
        match message {
            DataToolsMessage::InputChanged(input) => {
                self.input = input;
                Vec::new()
            }
            DataToolsMessage::SubmitSubreddit => {
                let subreddit = self.input.trim();
                if subreddit.is_empty() || self.is_busy() {
                    return Vec::new();
                }
                info!("Requesting ingestion of r/{}", subreddit);
                let subreddit = subreddit.to_string();
                self.begin(IngestionKind::Subreddit);
                vec![Effect::FetchSubreddit { subreddit }]
            }
            DataToolsMessage::FetchRandom => {
                if self.is_busy() {
                    return Vec::new();
                }
                info!("Requesting ingestion from a random subreddit");
                self.begin(IngestionKind::Random);
                vec![Effect::FetchRandom]
            }
            DataToolsMessage::Finished(result) => {
                if self.pending.take() == Some(IngestionKind::Subreddit) {
                    self.input.clear();
                }
                self.banner = Some(match result {
                    Ok(message) => Banner::Success(message),
                    Err(message) => {
                        warn!("Ingestion failed: {}", message);
                        Banner::Failure(message)
                    }
                });
                Vec::new()
            }
        }
    }

    fn begin(&mut self, kind: IngestionKind) {
        self.pending = Some(kind);
        self.banner = None;
    }

    pub fn view(&self, language: Language) -> Element<'_, DataToolsMessage> {
        let busy = self.is_busy();

        let mut input = text_input(language.text(TextKey::SubredditPlaceholder), &self.input)
            .width(Length::Fixed(320.0));
        if !busy {
            input = input
                .on_input(DataToolsMessage::InputChanged)
                .on_submit(DataToolsMessage::SubmitSubreddit);
        }

        let fetch_label = if self.pending == Some(IngestionKind::Subreddit) {
            TextKey::Fetching
        } else {
            TextKey::Fetch
        };
        let mut fetch = button(text(language.text(fetch_label)));
        if !busy && !self.input.trim().is_empty() {
            fetch = fetch.on_press(DataToolsMessage::SubmitSubreddit);
        }

        let random_label = if self.pending == Some(IngestionKind::Random) {
            TextKey::Fetching
        } else {
            TextKey::FetchRandom
        };
        let mut random = button(text(language.text(random_label)));
        if !busy {
            random = random.on_press(DataToolsMessage::FetchRandom);
        }

        let mut content = column![
            text(language.text(TextKey::DataFetchingTools)).size(30),
            text(language.text(TextKey::DataToolsIntro)),
            widgets::section(
                column![
                    text(language.text(TextKey::FetchFromSubreddit)).size(20),
                    text(language.text(TextKey::FetchFromSubredditDesc)).size(14),
                    input,
                    fetch,
                ]
                .spacing(10),
            ),
            widgets::section(
                column![
                    text(language.text(TextKey::FetchRandomTitle)).size(20),
                    text(language.text(TextKey::FetchRandomDesc)).size(14),
                    random,
                ]
                .spacing(10),
            ),
        ]
        .spacing(20)
        .padding(20);

        if let Some(banner) = &self.banner {
            let color = match banner {
                Banner::Success(_) => widgets::POSITIVE,
                Banner::Failure(_) => widgets::NEGATIVE,
            };
            content = content.push(container(text(banner.text()).style(color)).padding(10));
        }

        content.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_subreddit_is_ignored() {
        let mut page = DataToolsPage::new();
        page.update(DataToolsMessage::InputChanged("   ".to_string()));
        assert!(page.update(DataToolsMessage::SubmitSubreddit).is_empty());
        assert!(!page.is_busy());
    }

    #[test]
    fn test_subreddit_fetch_trims_and_clears_input_on_completion() {
        let mut page = DataToolsPage::new();
        page.update(DataToolsMessage::InputChanged("  rust ".to_string()));
        let effects = page.update(DataToolsMessage::SubmitSubreddit);
        assert_eq!(
            effects,
            vec![Effect::FetchSubreddit {
                subreddit: "rust".to_string()
            }]
        );
        assert!(page.is_busy());

        page.update(DataToolsMessage::Finished(Ok("Fetched 25 posts".to_string())));
        assert!(!page.is_busy());
        assert_eq!(page.input(), "");
        assert_eq!(page.banner(), Some(&Banner::Success("Fetched 25 posts".to_string())));
    }

    #[test]
    fn test_requests_are_blocked_while_busy() {
        let mut page = DataToolsPage::new();
        assert_eq!(page.update(DataToolsMessage::FetchRandom), vec![Effect::FetchRandom]);
        assert!(page.update(DataToolsMessage::FetchRandom).is_empty());

        page.update(DataToolsMessage::InputChanged("news".to_string()));
        assert!(page.update(DataToolsMessage::SubmitSubreddit).is_empty());
    }

    #[test]
    fn test_failure_banner_and_random_keeps_input() {
        let mut page = DataToolsPage::new();
        page.update(DataToolsMessage::InputChanged("draft".to_string()));
        page.update(DataToolsMessage::FetchRandom);
        page.update(DataToolsMessage::Finished(Err("backend down".to_string())));

        assert_eq!(page.input(), "draft");
        assert_eq!(page.banner().map(Banner::text).as_deref(), Some("Error: backend down"));
    }
}
