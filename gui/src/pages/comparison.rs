use super::{Choice, LoadState};
use crate::i18n::{Language, TextKey};
use crate::sequence::{RequestSequencer, RequestTicket};
use crate::{widgets, Effect};
use analytics::{hourly_trend, label_distribution, summary_stats, HourBucket, LabelDistribution, SummaryStats};
use iced::widget::{column, pick_list, row, scrollable, text, Column};
use iced::{Element, Length};
use sentiview_core::{DataQuery, PostRecord, SentimentTone, Timeframe};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    A,
    B,
}

/// Timeframe pick-list entry with its localized caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeChoice {
    pub timeframe: Timeframe,
    label: &'static str,
}

impl fmt::Display for TimeframeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

#[derive(Debug, Clone)]
pub enum ComparisonMessage {
    SubredditsLoaded(RequestTicket, Result<Vec<String>, String>),
    SubredditChosen(PanelId, Choice),
    TimeframeChosen(PanelId, TimeframeChoice),
    PanelLoaded(PanelId, RequestTicket, Result<Vec<PostRecord>, String>),
}

/// One side of the comparison.
#[derive(Debug, Clone, Default)]
pub struct ComparisonPanel {
    subreddit: Option<String>,
    timeframe: Timeframe,
    records: Vec<PostRecord>,
    load: LoadState,
    requests: RequestSequencer,
}

impl ComparisonPanel {
    pub fn subreddit(&self) -> Option<&str> {
        self.subreddit.as_deref()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn records(&self) -> &[PostRecord] {
        &self.records
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn summary(&self) -> SummaryStats {
        summary_stats(&self.records)
    }

    pub fn labels(&self) -> LabelDistribution {
        label_distribution(&self.records)
    }

    pub fn trend(&self) -> Vec<HourBucket> {
        hourly_trend(&self.records)
    }

    /// Fetches data for the current selection, or clears the panel when
    /// no subreddit is chosen.
    fn reload(&mut self, panel: PanelId) -> Vec<Effect> {
        match self.subreddit.clone() {
            Some(subreddit) => {
                self.load = LoadState::Loading;
                vec![Effect::LoadPanel {
                    panel,
                    ticket: self.requests.issue(),
                    query: DataQuery::for_subreddit(subreddit, self.timeframe),
                }]
            }
            None => {
                self.requests.invalidate();
                self.records.clear();
                self.load = LoadState::Idle;
                Vec::new()
            }
        }
    }

    fn apply(&mut self, ticket: RequestTicket, result: Result<Vec<PostRecord>, String>) {
        if !self.requests.complete(ticket) {
            return;
        }
        match result {
            Ok(records) => {
                self.records = records;
                self.load = LoadState::Ready;
            }
            Err(message) => {
                warn!("Comparison panel load failed: {}", message);
                self.load = LoadState::Failed(message);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonPage {
    subreddits: Vec<String>,
    subreddit_requests: RequestSequencer,
    subreddits_loaded: bool,
    panel_a: ComparisonPanel,
    panel_b: ComparisonPanel,
}

impl ComparisonPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, id: PanelId) -> &ComparisonPanel {
        match id {
            PanelId::A => &self.panel_a,
            PanelId::B => &self.panel_b,
        }
    }

    fn panel_mut(&mut self, id: PanelId) -> &mut ComparisonPanel {
        match id {
            PanelId::A => &mut self.panel_a,
            PanelId::B => &mut self.panel_b,
        }
    }

    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    /// Loads the subreddit list the first time the page is shown.
    pub fn enter(&mut self) -> Vec<Effect> {
        if self.subreddits_loaded || self.subreddit_requests.is_in_flight() {
            return Vec::new();
        }
        vec![Effect::LoadSubredditList {
            ticket: self.subreddit_requests.issue(),
        }]
    }

    pub fn update(&mut self, message: ComparisonMessage) -> Vec<Effect> {
        match message {
            ComparisonMessage::SubredditsLoaded(ticket, result) => {
                if self.subreddit_requests.complete(ticket) {
                    match result {
                        Ok(subreddits) => {
                            self.subreddits = subreddits;
                            self.subreddits_loaded = true;
                        }
                        Err(message) => warn!("Subreddit list unavailable: {}", message),
                    }
                }
                Vec::new()
            }
            ComparisonMessage::SubredditChosen(id, choice) => {
                let panel = self.panel_mut(id);
                panel.subreddit = choice.value;
                panel.reload(id)
            }
            ComparisonMessage::TimeframeChosen(id, choice) => {
                let panel = self.panel_mut(id);
                panel.timeframe = choice.timeframe;
                panel.reload(id)
            }
            ComparisonMessage::PanelLoaded(id, ticket, result) => {
                self.panel_mut(id).apply(ticket, result);
                Vec::new()
            }
        }
    }

    pub fn view(&self, language: Language) -> Element<'_, ComparisonMessage> {
        scrollable(
            column![
                text(language.text(TextKey::Comparison)).size(30),
                text(language.text(TextKey::ComparisonSubtitle)),
                row![
                    self.panel_view(language, PanelId::A),
                    column![text("VS").size(24)].padding(10),
                    self.panel_view(language, PanelId::B),
                ]
                .spacing(12),
            ]
            .spacing(16)
            .padding(20),
        )
        .height(Length::Fill)
        .into()
    }

    fn panel_view(&self, language: Language, id: PanelId) -> Element<'_, ComparisonMessage> {
        let panel = self.panel(id);
        let title = match id {
            PanelId::A => language.text(TextKey::PanelA),
            PanelId::B => language.text(TextKey::PanelB),
        };

        let (options, selected) = Choice::options(
            language.text(TextKey::SelectSubreddit),
            &self.subreddits,
            str::to_string,
            panel.subreddit(),
        );
        let timeframes: Vec<TimeframeChoice> = Timeframe::ALL
            .iter()
            .map(|&timeframe| TimeframeChoice {
                timeframe,
                label: language.timeframe(timeframe),
            })
            .collect();
        let current_timeframe = TimeframeChoice {
            timeframe: panel.timeframe(),
            label: language.timeframe(panel.timeframe()),
        };

        let controls = column![
            pick_list(options, Some(selected), move |choice| {
                ComparisonMessage::SubredditChosen(id, choice)
            })
            .width(Length::Fill),
            pick_list(timeframes, Some(current_timeframe), move |choice| {
                ComparisonMessage::TimeframeChosen(id, choice)
            })
            .width(Length::Fill),
        ]
        .spacing(8);

        let body: Element<'_, ComparisonMessage> = match panel.load_state() {
            LoadState::Loading => text(language.text(TextKey::Loading)).into(),
            LoadState::Failed(message) => widgets::error_state(language, message),
            _ => self.panel_body(language, panel),
        };

        widgets::section(
            Column::new()
                .spacing(12)
                .push(text(title).size(22))
                .push(controls)
                .push(body),
        )
    }

    fn panel_body(&self, language: Language, panel: &ComparisonPanel) -> Element<'_, ComparisonMessage> {
        let summary = panel.summary();
        let average = match summary.average_sentiment {
            Some(average) => average,
            None => return text(language.text(TextKey::NoData)).into(),
        };

        let stats = row![
            column![
                text(language.text(TextKey::TotalPosts)).size(13),
                text(summary.total.to_string()).size(20),
            ]
            .spacing(4)
            .width(Length::FillPortion(1)),
            column![
                text(language.text(TextKey::AvgSentiment)).size(13),
                text(format!("{:.2}", average))
                    .size(20)
                    .style(widgets::tone_color(SentimentTone::from_sign(average))),
            ]
            .spacing(4)
            .width(Length::FillPortion(1)),
        ];

        column![
            stats,
            text(language.text(TextKey::SentimentDistribution)).size(16),
            widgets::label_distribution::<ComparisonMessage>(language, &panel.labels(), None, None),
            text(language.text(TextKey::SentimentOverTime)).size(16),
            widgets::hourly_trend::<ComparisonMessage>(language, &panel.trend(), None, None),
        ]
        .spacing(10)
        .into()
    }
}
