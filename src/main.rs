use anyhow::Context;
use gui::pages::comparison::ComparisonMessage;
use gui::pages::dashboard::DashboardMessage;
use gui::pages::data_tools::DataToolsMessage;
use gui::pages::table::TableMessage;
use gui::{App, Effect, Message};
use iced::{Application, Command, Settings};
use sentiment_api::SentimentApiClient;
use sentiview_core::{ApiError, AppConfig, CoreError, ErrorExt, ErrorReporter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "sentiview=debug,gui=debug,sentiment_api=info,analytics=info";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!("Starting Sentiview - Reddit sentiment dashboard");

    let config = AppConfig::load().context("failed to load configuration")?;
    let client = SentimentApiClient::new(&config).context("failed to create API client")?;
    tracing::info!("Using backend at {}", client.base_url());
    check_backend(&client)?;

    let settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1280.0, 860.0),
            min_size: Some(iced::Size::new(900.0, 600.0)),
            ..Default::default()
        },
        ..Settings::with_flags(Flags {
            client: Arc::new(client),
            config,
        })
    };

    SentiviewApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        anyhow::anyhow!("GUI error: {e}")
    })
}

/// An unhealthy backend is logged but does not stop the dashboard from opening.
fn check_backend(client: &SentimentApiClient) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start health check runtime")?;
    match runtime.block_on(client.health()) {
        Ok(health) => tracing::info!(
            "Backend status: {} ({})",
            health.status,
            health.service.as_deref().unwrap_or("unnamed service")
        ),
        Err(e) => {
            ErrorReporter::default().report_error(&e);
            tracing::warn!("Backend health check failed: {}", e.user_friendly_message());
        }
    }
    Ok(())
}

struct Flags {
    client: Arc<SentimentApiClient>,
    config: AppConfig,
}

struct SentiviewApp {
    app: App,
    client: Arc<SentimentApiClient>,
}

impl SentiviewApp {
    fn perform(&self, effects: Vec<Effect>) -> Command<Message> {
        Command::batch(effects.into_iter().map(|effect| self.perform_one(effect)))
    }

    fn perform_one(&self, effect: Effect) -> Command<Message> {
        let client = Arc::clone(&self.client);
        match effect {
            Effect::LoadDashboard { ticket, query } => Command::perform(
                async move { client.load_dashboard(&query).await.map_err(report) },
                move |result| Message::Dashboard(DashboardMessage::Loaded(ticket, result)),
            ),
            Effect::LoadStats { ticket, query } => Command::perform(
                async move { client.get_stats(&query).await.map_err(report) },
                move |result| Message::Dashboard(DashboardMessage::StatsLoaded(ticket, result)),
            ),
            Effect::LoadTable { ticket, query } => Command::perform(
                async move { client.get_data(&query).await.map_err(report) },
                move |result| Message::Table(TableMessage::Loaded(ticket, result)),
            ),
            Effect::LoadSubredditList { ticket } => Command::perform(
                async move { client.get_subreddits().await.map_err(report) },
                move |result| Message::Comparison(ComparisonMessage::SubredditsLoaded(ticket, result)),
            ),
            Effect::LoadPanel {
                panel,
                ticket,
                query,
            } => Command::perform(
                async move { client.get_data(&query).await.map_err(report) },
                move |result| {
                    Message::Comparison(ComparisonMessage::PanelLoaded(panel, ticket, result))
                },
            ),
            Effect::FetchSubreddit { subreddit } => Command::perform(
                async move {
                    client
                        .fetch_subreddit(&subreddit)
                        .await
                        .map(|response| response.message)
                        .map_err(ingestion_message)
                },
                |result| Message::DataTools(DataToolsMessage::Finished(result)),
            ),
            Effect::FetchRandom => Command::perform(
                async move {
                    client
                        .fetch_random()
                        .await
                        .map(|response| response.message)
                        .map_err(ingestion_message)
                },
                |result| Message::DataTools(DataToolsMessage::Finished(result)),
            ),
            Effect::SettleKeywords { generation, after } => Command::perform(
                tokio::time::sleep(after),
                move |()| Message::Dashboard(DashboardMessage::KeywordsSettled(generation)),
            ),
        }
    }
}

fn report(error: CoreError) -> String {
    ErrorReporter::default().report_error(&error);
    error.to_string()
}

/// The ingestion panel shows the backend's own message when it sent one.
fn ingestion_message(error: CoreError) -> String {
    ErrorReporter::default().report_error(&error);
    match error {
        CoreError::Api(ApiError::IngestionFailed { message }) => message,
        other => other.to_string(),
    }
}

impl Application for SentiviewApp {
    type Message = Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = Flags;

    fn new(flags: Self::Flags) -> (Self, Command<Self::Message>) {
        tracing::info!("Initializing application");
        let (app, effects) = App::new(&flags.config.ui);
        let this = Self {
            app,
            client: flags.client,
        };
        let command = this.perform(effects);
        (this, command)
    }

    fn title(&self) -> String {
        self.app.title()
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        let effects = self.app.update(message);
        self.perform(effects)
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_failure_shows_backend_message() {
        let error = CoreError::Api(ApiError::IngestionFailed {
            message: "Subreddit r/doesnotexist not found".to_string(),
        });
        assert_eq!(ingestion_message(error), "Subreddit r/doesnotexist not found");
    }

    #[test]
    fn test_other_ingestion_errors_show_their_description() {
        let error = CoreError::Api(ApiError::Status {
            endpoint: "fetch/random".to_string(),
            status_code: 400,
            message: "bad request".to_string(),
        });
        let expected = error.to_string();
        assert_eq!(ingestion_message(error), expected);
        assert_eq!(report(CoreError::Api(ApiError::RequestTimeout)), "Backend API error: Request timed out");
    }
}
