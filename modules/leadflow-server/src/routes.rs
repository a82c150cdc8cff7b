use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{debug, error, info, warn};

use leadflow_pipeline::{PipelineController, ThreadRef};
use slack_client::{EventEnvelope, MessageEvent, SlackService};

pub struct AppState {
    pub controller: Arc<PipelineController>,
    pub slack: SlackService,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slack/events", post(slack_events))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn slack_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (Some(timestamp), Some(sig)) = (
        header(&headers, "x-slack-request-timestamp"),
        header(&headers, "x-slack-signature"),
    ) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let now = chrono::Utc::now().timestamp();
    if let Err(e) = state.slack.verify_request(timestamp, &body, sig, now) {
        warn!(error = %e, "Rejected Slack request");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    // Slack re-sends events it thinks we missed; the first delivery already started a run.
    if let Some(retry) = header(&headers, "x-slack-retry-num") {
        debug!(retry, "Ignoring Slack retry");
        return StatusCode::OK.into_response();
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Malformed Slack event payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            Json(json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            handle_message(&state, event);
            StatusCode::OK.into_response()
        }
        EventEnvelope::Unsupported => StatusCode::OK.into_response(),
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Start a run if the message carries a post link. Runs in the background so
/// Slack gets its acknowledgement within the 3 second window.
fn handle_message(state: &Arc<AppState>, event: MessageEvent) {
    if !event.is_user_message() {
        return;
    }
    let (Some(text), Some(channel)) = (event.text.as_deref(), event.channel.as_deref()) else {
        return;
    };
    let controller = state.controller.clone();
    let Some(trigger) = controller.notifier().parse_trigger(text) else {
        debug!(channel, "Message has no LinkedIn post link");
        return;
    };
    let thread = ThreadRef::new(channel, event.reply_thread_ts().map(String::from));

    info!(post_url = trigger.post_url.as_str(), channel, "Pipeline triggered");
    tokio::spawn(async move {
        if let Err(e) = controller.run(&trigger, &thread).await {
            error!(post_url = trigger.post_url.as_str(), error = %e, "Pipeline run failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use leadflow_pipeline::testing::*;
    use slack_client::{signature, SlackOptions};
    use tower::ServiceExt;

    use super::*;

    const SECRET: &str = "test-signing-secret";

    struct Fixture {
        scraper: Arc<MockScraper>,
        notifier: Arc<MockNotifier>,
        router: Router,
    }

    fn fixture() -> Fixture {
        let scraper = Arc::new(MockScraper::returning(vec![engager_row(&profile("a"))]));
        let notifier = Arc::new(MockNotifier::new());
        let controller = PipelineController::new(
            scraper.clone(),
            Arc::new(MockEnricher::new()),
            Arc::new(MockDelivery::new()),
            notifier.clone(),
        )
        .with_throttle(Arc::new(RecordingThrottle::new()));
        let router = build_router(Arc::new(AppState {
            controller: Arc::new(controller),
            slack: SlackService::new(SlackOptions {
                bot_token: "xoxb-test".to_string(),
                signing_secret: SECRET.to_string(),
            }),
        }));
        Fixture {
            scraper,
            notifier,
            router,
        }
    }

    fn signed(body: &str) -> Request<Body> {
        let ts = chrono::Utc::now().timestamp().to_string();
        let sig = signature::sign(SECRET, &ts, body.as_bytes());
        Request::post("/slack/events")
            .header("content-type", "application/json")
            .header("x-slack-request-timestamp", ts)
            .header("x-slack-signature", sig)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn message(text: &str) -> String {
        json!({
            "type": "event_callback",
            "event": {
                "type": "message",
                "text": text,
                "user": "U1",
                "channel": "C1",
                "ts": "1700000000.000100"
            }
        })
        .to_string()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let f = fixture();
        let resp = f
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn url_verification_echoes_challenge() {
        let f = fixture();
        let resp = f
            .router
            .oneshot(signed(r#"{"type":"url_verification","challenge":"c-123"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["challenge"], "c-123");
    }

    #[tokio::test]
    async fn unsigned_and_badly_signed_requests_are_rejected() {
        let f = fixture();
        let unsigned = Request::post("/slack/events")
            .body(Body::from("{}"))
            .unwrap();
        let resp = f.router.clone().oneshot(unsigned).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let mut forged = signed(r#"{"type":"url_verification","challenge":"x"}"#);
        forged
            .headers_mut()
            .insert("x-slack-signature", "v0=deadbeef".parse().unwrap());
        let resp = f.router.oneshot(forged).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn post_link_message_starts_a_run() {
        let f = fixture();
        let resp = f
            .router
            .oneshot(signed(&message(
                "<https://www.linkedin.com/posts/foo-activity-123|post>",
            )))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        tokio::time::timeout(Duration::from_secs(5), async {
            while f.notifier.summaries().is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("run should finish");
        assert_eq!(f.scraper.calls(), 1);
        assert_eq!(f.notifier.summaries()[0].engagers, 1);
    }

    #[tokio::test]
    async fn messages_without_post_links_are_ignored() {
        let f = fixture();
        let resp = f
            .router
            .oneshot(signed(&message("morning all, see https://www.linkedin.com/in/someone")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(f.scraper.calls(), 0);
        assert!(f.notifier.sent().is_empty());
    }
}
