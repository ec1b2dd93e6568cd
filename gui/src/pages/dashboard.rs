use super::{Choice, LoadState};
use crate::debounce::Debouncer;
use crate::i18n::{Language, TextKey};
use crate::sequence::{RequestSequencer, RequestTicket};
use crate::{widgets, Effect};
use analytics::{AnalyticsPipeline, CrossFilter, SortField, ViewAction};
use iced::widget::{button, column, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Element, Length};
use sentiview_core::{DashboardSnapshot, DashboardStats, DataQuery, SentimentLabel, SentimentTone};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Collapsible chart cards. The pie and the trend share `Overview`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    Overview,
    Scatter,
    Radar,
    TopSubreddits,
    Activity,
    SubredditSentiment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardState {
    #[default]
    Expanded,
    Collapsed,
}

impl CardState {
    pub fn toggled(self) -> Self {
        match self {
            CardState::Expanded => CardState::Collapsed,
            CardState::Collapsed => CardState::Expanded,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == CardState::Expanded
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatsState {
    #[default]
    Loading,
    Ready(DashboardStats),
    Unavailable,
}

#[derive(Debug, Clone)]
pub enum DashboardMessage {
    Loaded(RequestTicket, Result<DashboardSnapshot, String>),
    StatsLoaded(RequestTicket, Result<DashboardStats, String>),
    SubredditSelected(Choice),
    GroupSelected(Choice),
    KeywordsChanged(String),
    KeywordsSettled(u64),
    MinScoreChanged(String),
    SearchChanged(String),
    ClearFilters,
    SortBy(SortField),
    LabelClicked(SentimentLabel),
    HourClicked(String),
    ClearSelection,
    NextPage,
    PreviousPage,
    ToggleCard(Card),
    Refresh,
}

#[derive(Debug, Clone)]
pub struct DashboardPage {
    pipeline: AnalyticsPipeline,
    subreddits: Vec<String>,
    load: LoadState,
    stats: StatsState,
    keyword_input: String,
    search_input: String,
    min_score_input: String,
    debouncer: Debouncer,
    data_requests: RequestSequencer,
    stats_requests: RequestSequencer,
    cards: HashMap<Card, CardState>,
}

impl DashboardPage {
    pub fn new(keyword_debounce: Duration) -> Self {
        Self {
            pipeline: AnalyticsPipeline::new(),
            subreddits: Vec::new(),
            load: LoadState::Idle,
            stats: StatsState::Loading,
            keyword_input: String::new(),
            search_input: String::new(),
            min_score_input: String::new(),
            debouncer: Debouncer::new(keyword_debounce),
            data_requests: RequestSequencer::new(),
            stats_requests: RequestSequencer::new(),
            cards: HashMap::new(),
        }
    }

    pub fn pipeline(&self) -> &AnalyticsPipeline {
        &self.pipeline
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn stats(&self) -> &StatsState {
        &self.stats
    }

    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    pub fn keyword_input(&self) -> &str {
        &self.keyword_input
    }

    pub fn card_state(&self, card: Card) -> CardState {
        self.cards.get(&card).copied().unwrap_or_default()
    }

    /// Server query for the current subreddit, group and committed keywords.
    pub fn query(&self) -> DataQuery {
        let filter = &self.pipeline.state().filter;
        DataQuery {
            subreddit: filter.subreddit.clone(),
            timeframe: None,
            keywords: filter.keywords.clone(),
            subreddits: filter
                .group_members(self.pipeline.groups())
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        }
    }

    pub fn has_active_filters(&self) -> bool {
        let filter = &self.pipeline.state().filter;
        filter.subreddit.is_some()
            || filter.group.is_some()
            || !self.keyword_input.is_empty()
            || !self.min_score_input.is_empty()
            || !self.search_input.is_empty()
    }

    /// Issues the data and stats fetches for the current filters.
    pub fn refresh(&mut self) -> Vec<Effect> {
        let query = self.query();
        debug!("Dashboard fetch with {:?}", query);
        self.load = LoadState::Loading;
        self.stats = StatsState::Loading;

        vec![
            Effect::LoadDashboard {
                ticket: self.data_requests.issue(),
                query: query.clone(),
            },
            Effect::LoadStats {
                ticket: self.stats_requests.issue(),
                query,
            },
        ]
    }

    fn dispatch(&mut self, action: ViewAction) {
        self.pipeline.dispatch(action);
    }

    pub fn update(&mut self, message: DashboardMessage) -> Vec<Effect> {
        match message {
            DashboardMessage::Loaded(ticket, result) => {
                if !self.data_requests.complete(ticket) {
                    return Vec::new();
                }
                match result {
                    Ok(snapshot) => {
                        self.subreddits = snapshot.subreddits;
                        self.pipeline.set_groups(snapshot.groups);
                        self.pipeline.replace_records(snapshot.posts);
                        self.load = LoadState::Ready;
                    }
                    Err(message) => {
                        warn!("Dashboard load failed: {}", message);
                        self.load = LoadState::Failed(message);
                    }
                }
                Vec::new()
            }
            DashboardMessage::StatsLoaded(ticket, result) => {
                if !self.stats_requests.complete(ticket) {
                    return Vec::new();
                }
                self.stats = match result {
                    Ok(stats) => StatsState::Ready(stats),
                    Err(message) => {
                        warn!("Stats load failed: {}", message);
                        StatsState::Unavailable
                    }
                };
                Vec::new()
            }
            DashboardMessage::SubredditSelected(choice) => {
                self.dispatch(ViewAction::SetSubreddit(choice.value));
                self.refresh()
            }
            DashboardMessage::GroupSelected(choice) => {
                self.dispatch(ViewAction::SetGroup(choice.value));
                self.refresh()
            }
            DashboardMessage::KeywordsChanged(keywords) => {
                self.keyword_input = keywords;
                vec![Effect::SettleKeywords {
                    generation: self.debouncer.bump(),
                    after: self.debouncer.quiet_period(),
                }]
            }
            DashboardMessage::KeywordsSettled(generation) => {
                if !self.debouncer.is_settled(generation) {
                    return Vec::new();
                }
                let settled = self.keyword_input.trim().to_string();
                let committed = self.pipeline.state().filter.keywords.as_deref().unwrap_or("");
                if settled == committed {
                    return Vec::new();
                }
                self.dispatch(ViewAction::SetKeywords(settled));
                self.refresh()
            }
            DashboardMessage::MinScoreChanged(min_score) => {
                self.min_score_input = min_score.clone();
                self.dispatch(ViewAction::SetMinScore(min_score));
                Vec::new()
            }
            DashboardMessage::SearchChanged(search) => {
                self.search_input = search.clone();
                self.dispatch(ViewAction::SetSearch(search));
                Vec::new()
            }
            DashboardMessage::ClearFilters => {
                self.keyword_input.clear();
                self.search_input.clear();
                self.min_score_input.clear();
                self.debouncer.cancel();
                self.dispatch(ViewAction::ClearFilters);
                self.refresh()
            }
            DashboardMessage::SortBy(field) => {
                self.dispatch(ViewAction::SortBy(field));
                Vec::new()
            }
            DashboardMessage::LabelClicked(label) => {
                self.dispatch(ViewAction::ToggleLabel(label));
                Vec::new()
            }
            DashboardMessage::HourClicked(hour) => {
                self.dispatch(ViewAction::ToggleHour(hour));
                Vec::new()
            }
            DashboardMessage::ClearSelection => {
                self.dispatch(ViewAction::ClearSelection);
                Vec::new()
            }
            DashboardMessage::NextPage => {
                self.dispatch(ViewAction::NextPage);
                Vec::new()
            }
            DashboardMessage::PreviousPage => {
                self.dispatch(ViewAction::PreviousPage);
                Vec::new()
            }
            DashboardMessage::ToggleCard(card) => {
                let next = self.card_state(card).toggled();
                self.cards.insert(card, next);
                Vec::new()
            }
            DashboardMessage::Refresh => self.refresh(),
        }
    }

    pub fn view(&self, language: Language) -> Element<'_, DashboardMessage> {
        let body: Element<'_, DashboardMessage> = match &self.load {
            LoadState::Idle | LoadState::Loading => widgets::loading(language),
            LoadState::Failed(message) => widgets::error_state(language, message),
            LoadState::Ready if self.pipeline.records().is_empty() => widgets::empty_state(language),
            LoadState::Ready => self.charts_view(language),
        };

        scrollable(
            column![
                text(language.text(TextKey::Dashboard)).size(30),
                self.stats_view(language),
                self.filter_bar(language),
                body,
            ]
            .spacing(20)
            .padding(20),
        )
        .height(Length::Fill)
        .into()
    }

    fn stats_view(&self, language: Language) -> Element<'_, DashboardMessage> {
        let stats = match &self.stats {
            StatsState::Loading => return text(language.text(TextKey::StatsLoading)).into(),
            StatsState::Unavailable => return text(language.text(TextKey::StatsUnavailable)).into(),
            StatsState::Ready(stats) => stats,
        };

        let average: Element<'_, DashboardMessage> = match stats.avg_sentiment {
            Some(average) => {
                let tone = SentimentTone::from_average(average);
                let label = match tone {
                    SentimentTone::Positive => language.label(SentimentLabel::Positive),
                    SentimentTone::Negative => language.label(SentimentLabel::Negative),
                    SentimentTone::Neutral => language.label(SentimentLabel::Neutral),
                };
                text(format!("{} ({:.2})", label, average))
                    .size(20)
                    .style(widgets::tone_color(tone))
                    .into()
            }
            None => text("-").size(20).into(),
        };
        let subreddit_name = |sub: &Option<sentiview_core::SubredditRef>| {
            sub.as_ref()
                .map(|s| format!("r/{}", s.subreddit))
                .unwrap_or_else(|| "-".to_string())
        };

        let tile = |title: &str, value: Element<'static, DashboardMessage>| -> Element<'static, DashboardMessage> {
            widgets::section(column![text(title.to_string()).size(14), value].spacing(6))
        };

        row![
            tile(
                language.text(TextKey::TotalPosts),
                text(stats.total_posts.to_string()).size(20).into()
            ),
            tile(language.text(TextKey::AvgSentiment), average),
            tile(
                language.text(TextKey::MostPositive),
                text(subreddit_name(&stats.most_positive_sub))
                    .size(20)
                    .style(widgets::tone_color(SentimentTone::Positive))
                    .into()
            ),
            tile(
                language.text(TextKey::MostNegative),
                text(subreddit_name(&stats.most_negative_sub))
                    .size(20)
                    .style(widgets::tone_color(SentimentTone::Negative))
                    .into()
            ),
        ]
        .spacing(12)
        .into()
    }

    fn filter_bar(&self, language: Language) -> Element<'_, DashboardMessage> {
        let filter = &self.pipeline.state().filter;

        let (subreddit_options, subreddit_selected) = Choice::options(
            language.text(TextKey::AllSubreddits),
            &self.subreddits,
            |name| format!("r/{}", name),
            filter.subreddit.as_deref(),
        );
        let (group_options, group_selected) = Choice::options(
            language.text(TextKey::AllGroups),
            self.pipeline.groups().keys(),
            str::to_string,
            filter.group.as_deref(),
        );

        let labelled = |key: TextKey, control: Element<'static, DashboardMessage>| -> Element<'static, DashboardMessage> {
            column![text(format!("{}:", language.text(key))).size(13), control]
                .spacing(4)
                .width(Length::FillPortion(1))
                .into()
        };

        let mut bar = Row::new()
            .spacing(12)
            .align_items(Alignment::End)
            .push(labelled(
                TextKey::FilterBySubreddit,
                iced::widget::pick_list(
                    subreddit_options,
                    Some(subreddit_selected),
                    DashboardMessage::SubredditSelected,
                )
                .into(),
            ))
            .push(labelled(
                TextKey::FilterByGroup,
                iced::widget::pick_list(group_options, Some(group_selected), DashboardMessage::GroupSelected).into(),
            ))
            .push(labelled(
                TextKey::SearchKeywords,
                text_input(language.text(TextKey::KeywordsPlaceholder), &self.keyword_input)
                    .on_input(DashboardMessage::KeywordsChanged)
                    .into(),
            ))
            .push(labelled(
                TextKey::MinScore,
                text_input("0", &self.min_score_input)
                    .on_input(DashboardMessage::MinScoreChanged)
                    .into(),
            ))
            .push(labelled(
                TextKey::Search,
                text_input("", &self.search_input)
                    .on_input(DashboardMessage::SearchChanged)
                    .into(),
            ));

        if self.has_active_filters() {
            bar = bar.push(button(text(language.text(TextKey::ClearFilter))).on_press(DashboardMessage::ClearFilters));
        }
        bar = bar.push(button(text(language.text(TextKey::Refresh))).on_press(DashboardMessage::Refresh));

        widgets::section(bar)
    }

    fn charts_view(&self, language: Language) -> Element<'_, DashboardMessage> {
        let charts = self.pipeline.charts();
        let selection = &self.pipeline.state().selection;
        let overview_open = self.card_state(Card::Overview).is_expanded();

        let pie = widgets::collapsible(
            language.text(TextKey::SentimentDistribution),
            language.text(TextKey::SentimentPieDesc),
            overview_open,
            DashboardMessage::ToggleCard(Card::Overview),
            || {
                widgets::label_distribution(
                    language,
                    &charts.labels,
                    Some(selection),
                    Some(&DashboardMessage::LabelClicked),
                )
            },
        );
        let trend = widgets::collapsible(
            language.text(TextKey::SentimentOverTime),
            language.text(TextKey::SentimentTimeDesc),
            overview_open,
            DashboardMessage::ToggleCard(Card::Overview),
            || {
                widgets::hourly_trend(
                    language,
                    &charts.trend,
                    Some(selection),
                    Some(&DashboardMessage::HourClicked),
                )
            },
        );
        let scatter = widgets::collapsible(
            language.text(TextKey::SentimentVsEngagement),
            "",
            self.card_state(Card::Scatter).is_expanded(),
            DashboardMessage::ToggleCard(Card::Scatter),
            || widgets::scatter(language, &charts.scatter),
        );
        let radar = widgets::collapsible(
            language.text(TextKey::SubredditComparison),
            language.text(TextKey::RadarChartDesc),
            self.card_state(Card::Radar).is_expanded(),
            DashboardMessage::ToggleCard(Card::Radar),
            || widgets::radar(language, &charts.radar),
        );
        let top = widgets::collapsible(
            language.text(TextKey::TopSubreddits),
            language.text(TextKey::SubredditBarDesc),
            self.card_state(Card::TopSubreddits).is_expanded(),
            DashboardMessage::ToggleCard(Card::TopSubreddits),
            || widgets::top_subreddits(language, &charts.top_subreddits),
        );
        let activity = widgets::collapsible(
            language.text(TextKey::ActivityHeatmap),
            language.text(TextKey::ActivityHeatmapDesc),
            self.card_state(Card::Activity).is_expanded(),
            DashboardMessage::ToggleCard(Card::Activity),
            || widgets::activity_heatmap(language, &charts.activity),
        );
        let stacked = widgets::collapsible(
            language.text(TextKey::SentimentBySubreddit),
            language.text(TextKey::SentimentStackedDesc),
            self.card_state(Card::SubredditSentiment).is_expanded(),
            DashboardMessage::ToggleCard(Card::SubredditSentiment),
            || widgets::sentiment_by_subreddit(language, &charts.stacked),
        );

        let overview_body: Element<'_, DashboardMessage> = if charts.is_empty() {
            widgets::section(text(language.text(TextKey::NoData)))
        } else {
            Column::new()
                .spacing(16)
                .push(row![pie, trend].spacing(16))
                .push(row![scatter, radar].spacing(16))
                .push(top)
                .push(activity)
                .push(stacked)
                .into()
        };

        column![overview_body, self.explorer_view(language)]
            .spacing(20)
            .into()
    }

    fn explorer_view(&self, language: Language) -> Element<'_, DashboardMessage> {
        let table = self.pipeline.table();

        let banner: Element<'_, DashboardMessage> = match &table.selection {
            CrossFilter::Unselected => text(language.text(TextKey::ClickPlotToFilter)).size(13).into(),
            selection => {
                let value = match selection {
                    CrossFilter::Label(label) => language.label(*label).to_string(),
                    CrossFilter::Hour(hour) => hour.clone(),
                    CrossFilter::Unselected => String::new(),
                };
                row![
                    text(format!(
                        "{}: {}. {}",
                        language.text(TextKey::FilteredByClick),
                        value,
                        language.text(TextKey::ClickPlotToClear)
                    ))
                    .size(13),
                    button(text("×")).on_press(DashboardMessage::ClearSelection),
                ]
                .spacing(10)
                .align_items(Alignment::Center)
                .into()
            }
        };

        widgets::section(
            column![
                text(language.text(TextKey::DataExplorer)).size(20),
                banner,
                text(format!(
                    "{} {} {}",
                    language.text(TextKey::Showing),
                    table.total_rows,
                    language.text(TextKey::Items)
                ))
                .size(13),
                widgets::post_table(
                    language,
                    &table,
                    &DashboardMessage::SortBy,
                    DashboardMessage::PreviousPage,
                    DashboardMessage::NextPage,
                ),
            ]
            .spacing(10),
        )
    }
}
