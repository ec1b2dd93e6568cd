use super::LoadState;
use crate::i18n::{Language, TextKey};
use crate::sequence::{RequestSequencer, RequestTicket};
use crate::{widgets, Effect};
use analytics::{AnalyticsPipeline, SortField, ViewAction};
use iced::widget::{button, column, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length};
use sentiview_core::{DataQuery, PostRecord, Timeframe};

#[derive(Debug, Clone)]
pub enum TableMessage {
    Loaded(RequestTicket, Result<Vec<PostRecord>, String>),
    SearchChanged(String),
    SortBy(SortField),
    NextPage,
    PreviousPage,
    Refresh,
}

/// Full data table over the last week of posts.
#[derive(Debug, Clone, Default)]
pub struct TablePage {
    pipeline: AnalyticsPipeline,
    load: LoadState,
    search_input: String,
    requests: RequestSequencer,
}

impl TablePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipeline(&self) -> &AnalyticsPipeline {
        &self.pipeline
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn query() -> DataQuery {
        DataQuery {
            timeframe: Some(Timeframe::Last7Days),
            ..DataQuery::all()
        }
    }

    /// Loads the data set the first time the page is shown.
    pub fn enter(&mut self) -> Vec<Effect> {
        if self.load == LoadState::Idle {
            self.refresh()
        } else {
            Vec::new()
        }
    }

    pub fn refresh(&mut self) -> Vec<Effect> {
        self.load = LoadState::Loading;
        vec![Effect::LoadTable {
            ticket: self.requests.issue(),
            query: Self::query(),
        }]
    }

    pub fn update(&mut self, message: TableMessage) -> Vec<Effect> {
        match message {
            TableMessage::Loaded(ticket, result) => {
                if self.requests.complete(ticket) {
                    match result {
                        Ok(records) => {
                            self.pipeline.replace_records(records);
                            self.load = LoadState::Ready;
                        }
                        Err(message) => self.load = LoadState::Failed(message),
                    }
                }
            }
            TableMessage::SearchChanged(search) => {
                self.search_input = search.clone();
                self.pipeline.dispatch(ViewAction::SetSearch(search));
            }
            TableMessage::SortBy(field) => {
                self.pipeline.dispatch(ViewAction::SortBy(field));
            }
            TableMessage::NextPage => {
                self.pipeline.dispatch(ViewAction::NextPage);
            }
            TableMessage::PreviousPage => {
                self.pipeline.dispatch(ViewAction::PreviousPage);
            }
            TableMessage::Refresh => return self.refresh(),
        }
        Vec::new()
    }

    pub fn view(&self, language: Language) -> Element<'_, TableMessage> {
        let header = row![
            text(language.text(TextKey::FullDataTable)).size(30).width(Length::Fill),
            button(text(language.text(TextKey::Refresh))).on_press(TableMessage::Refresh),
        ]
        .align_items(Alignment::Center);

        let body: Element<'_, TableMessage> = match &self.load {
            LoadState::Idle | LoadState::Loading => widgets::loading(language),
            LoadState::Failed(message) => widgets::error_state(language, message),
            LoadState::Ready if self.pipeline.records().is_empty() => widgets::empty_state(language),
            LoadState::Ready => {
                let table = self.pipeline.table();
                column![
                    text(format!(
                        "{} {} {}",
                        language.text(TextKey::ShowingAllItems),
                        self.pipeline.records().len(),
                        language.text(TextKey::FromLast7Days)
                    )),
                    text_input(language.text(TextKey::Search), &self.search_input)
                        .on_input(TableMessage::SearchChanged)
                        .width(Length::Fixed(320.0)),
                    widgets::section(widgets::post_table(
                        language,
                        &table,
                        &TableMessage::SortBy,
                        TableMessage::PreviousPage,
                        TableMessage::NextPage,
                    )),
                ]
                .spacing(12)
                .into()
            }
        };

        scrollable(column![header, body].spacing(20).padding(20))
            .height(Length::Fill)
            .into()
    }
}
