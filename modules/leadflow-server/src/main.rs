use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use apify_client::ApifyClient;
use apollo_client::ApolloClient;
use instantly_client::InstantlyClient;
use leadflow_common::Config;
use leadflow_pipeline::adapters::{ApifyScraper, ApolloEnricher, InstantlyDelivery, SlackNotifier};
use leadflow_pipeline::{PipelineConfig, PipelineController};
use slack_client::{SlackOptions, SlackService};

mod routes;

use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("leadflow=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_redacted();

    let scraper = ApifyScraper::new(
        ApifyClient::new(config.apify_token.clone()),
        config.apify_actor_id.clone(),
        config.apify_max_items,
    );
    let enricher = ApolloEnricher::new(ApolloClient::new(config.apollo_api_key.clone()));
    let delivery = InstantlyDelivery::new(InstantlyClient::new(
        config.instantly_api_key.clone(),
        config.instantly_campaign_id.clone(),
    ));
    let slack = SlackService::new(SlackOptions {
        bot_token: config.slack_bot_token.clone(),
        signing_secret: config.slack_signing_secret.clone(),
    });
    let notifier = SlackNotifier::new(slack.clone());

    let controller = PipelineController::new(
        Arc::new(scraper),
        Arc::new(enricher),
        Arc::new(delivery),
        Arc::new(notifier),
    )
    .with_config(PipelineConfig {
        batch_width: config.enrich_batch_width,
        batch_delay: Duration::from_millis(config.enrich_batch_delay_ms),
        rate_limit_backoff: Duration::from_millis(config.rate_limit_backoff_ms),
        max_rate_limit_retries: config.max_rate_limit_retries,
        delivery_pacing: Duration::from_millis(config.delivery_pacing_ms),
    });

    let state = Arc::new(AppState {
        controller: Arc::new(controller),
        slack,
    });

    // Method + path + status + latency only; Slack payloads stay out of the logs.
    let app = routes::build_router(state).layer(
        tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            },
        ),
    );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Leadflow listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
