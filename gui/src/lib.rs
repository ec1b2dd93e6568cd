pub mod debounce;
pub mod i18n;
pub mod pages;
pub mod sequence;
mod widgets;

use i18n::{Language, TextKey};
use iced::widget::{button, column, container, horizontal_rule, row, text, Space};
use iced::{theme, Alignment, Element, Length, Theme};
use pages::comparison::{ComparisonMessage, ComparisonPage, PanelId};
use pages::dashboard::{DashboardMessage, DashboardPage};
use pages::data_tools::{DataToolsMessage, DataToolsPage};
use pages::table::{TableMessage, TablePage};
use sentiview_core::{DataQuery, UiConfig};
use sequence::RequestTicket;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dashboard,
    Table,
    Comparison,
    DataTools,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Table, Page::Comparison, Page::DataTools];

    fn title(self) -> TextKey {
        match self {
            Page::Dashboard => TextKey::Dashboard,
            Page::Table => TextKey::DataTable,
            Page::Comparison => TextKey::Comparison,
            Page::DataTools => TextKey::DataTools,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Page),
    ToggleLanguage,
    Dashboard(DashboardMessage),
    Table(TableMessage),
    Comparison(ComparisonMessage),
    DataTools(DataToolsMessage),
}

/// Side effects requested by `App::update`. The binary turns each one into
/// an async command and feeds the outcome back as a `Message`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadDashboard { ticket: RequestTicket, query: DataQuery },
    LoadStats { ticket: RequestTicket, query: DataQuery },
    LoadTable { ticket: RequestTicket, query: DataQuery },
    LoadSubredditList { ticket: RequestTicket },
    LoadPanel { panel: PanelId, ticket: RequestTicket, query: DataQuery },
    FetchSubreddit { subreddit: String },
    FetchRandom,
    SettleKeywords { generation: u64, after: Duration },
}

pub struct App {
    page: Page,
    language: Language,
    dashboard: DashboardPage,
    table: TablePage,
    comparison: ComparisonPage,
    data_tools: DataToolsPage,
}

impl App {
    /// Builds the app and the effects that start the dashboard load.
    pub fn new(config: &UiConfig) -> (Self, Vec<Effect>) {
        let language = Language::parse(&config.language).unwrap_or_else(|| {
            warn!("Unknown UI language {:?}, using English", config.language);
            Language::default()
        });

        let mut app = Self {
            page: Page::default(),
            language,
            dashboard: DashboardPage::new(Duration::from_millis(config.keyword_debounce_ms)),
            table: TablePage::new(),
            comparison: ComparisonPage::new(),
            data_tools: DataToolsPage::new(),
        };
        let effects = app.dashboard.refresh();
        (app, effects)
    }

    pub fn title(&self) -> String {
        format!(
            "{} - {}",
            self.language.text(TextKey::AppTitle),
            self.language.text(self.page.title())
        )
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn dashboard(&self) -> &DashboardPage {
        &self.dashboard
    }

    pub fn table(&self) -> &TablePage {
        &self.table
    }

    pub fn comparison(&self) -> &ComparisonPage {
        &self.comparison
    }

    pub fn data_tools(&self) -> &DataToolsPage {
        &self.data_tools
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Navigate(page) => {
                if page == self.page {
                    return Vec::new();
                }
                info!("Navigating to {:?}", page);
                self.page = page;
                match page {
                    Page::Table => self.table.enter(),
                    Page::Comparison => self.comparison.enter(),
                    Page::Dashboard | Page::DataTools => Vec::new(),
                }
            }
            Message::ToggleLanguage => {
                self.language = self.language.toggled();
                debug!("Language switched to {}", self.language);
                Vec::new()
            }
            Message::Dashboard(message) => self.dashboard.update(message),
            Message::Table(message) => self.table.update(message),
            Message::Comparison(message) => self.comparison.update(message),
            Message::DataTools(message) => self.data_tools.update(message),
        }
    }

    pub fn view(&self) -> Element<Message, Theme> {
        let language = self.language;

        let mut nav = row![text(language.text(TextKey::AppTitle)).size(22)]
            .spacing(8)
            .align_items(Alignment::Center);
        nav = nav.push(Space::with_width(Length::Fixed(24.0)));
        for page in Page::ALL {
            let style = if page == self.page {
                theme::Button::Primary
            } else {
                theme::Button::Text
            };
            nav = nav.push(
                button(text(language.text(page.title())))
                    .style(style)
                    .on_press(Message::Navigate(page)),
            );
        }
        nav = nav
            .push(Space::with_width(Length::Fill))
            .push(button(text(language.toggled().to_string())).on_press(Message::ToggleLanguage));

        let content: Element<Message, Theme> = match self.page {
            Page::Dashboard => self.dashboard.view(language).map(Message::Dashboard),
            Page::Table => self.table.view(language).map(Message::Table),
            Page::Comparison => self.comparison.view(language).map(Message::Comparison),
            Page::DataTools => self.data_tools.view(language).map(Message::DataTools),
        };

        column![
            container(nav).padding(10).width(Length::Fill),
            horizontal_rule(1),
            container(content).width(Length::Fill).height(Length::Fill),
        ]
        .into()
    }
}
