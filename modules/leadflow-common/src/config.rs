use std::env;

use crate::error::LeadflowError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Slack
    pub slack_bot_token: String,
    pub slack_signing_secret: String,

    // Backends
    pub apify_token: String,
    pub apify_actor_id: Option<String>,
    pub apify_max_items: u32,
    pub apollo_api_key: String,
    pub instantly_api_key: String,
    pub instantly_campaign_id: String,

    // Pipeline tuning
    pub enrich_batch_width: usize,
    pub enrich_batch_delay_ms: u64,
    pub rate_limit_backoff_ms: u64,
    pub max_rate_limit_retries: u32,
    pub delivery_pacing_ms: u64,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, LeadflowError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Used by `from_env` and by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LeadflowError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, LeadflowError> {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                LeadflowError::Config(format!("{key} environment variable is required"))
            })
        };

        Ok(Self {
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            apify_token: required("APIFY_TOKEN")?,
            apify_actor_id: lookup("APIFY_ACTOR_ID").filter(|v| !v.is_empty()),
            apify_max_items: parse_or(&lookup, "APIFY_MAX_ITEMS", 1000)?,
            apollo_api_key: required("APOLLO_API_KEY")?,
            instantly_api_key: required("INSTANTLY_API_KEY")?,
            instantly_campaign_id: required("INSTANTLY_CAMPAIGN_ID")?,
            enrich_batch_width: parse_or(&lookup, "ENRICH_BATCH_WIDTH", 5)?,
            enrich_batch_delay_ms: parse_or(&lookup, "ENRICH_BATCH_DELAY_MS", 1000)?,
            rate_limit_backoff_ms: parse_or(&lookup, "RATE_LIMIT_BACKOFF_MS", 5000)?,
            max_rate_limit_retries: parse_or(&lookup, "MAX_RATE_LIMIT_RETRIES", 3)?,
            delivery_pacing_ms: parse_or(&lookup, "DELIVERY_PACING_MS", 200)?,
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parse_or(&lookup, "PORT", 3000)?,
        })
    }

    /// Log which secrets are set without printing them.
    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  SLACK_BOT_TOKEN: {}", preview(&self.slack_bot_token));
        tracing::info!("  APIFY_TOKEN: {}", preview(&self.apify_token));
        tracing::info!("  APOLLO_API_KEY: {}", preview(&self.apollo_api_key));
        tracing::info!("  INSTANTLY_API_KEY: {}", preview(&self.instantly_api_key));
        tracing::info!("  INSTANTLY_CAMPAIGN_ID: {}", self.instantly_campaign_id);
        tracing::info!(
            batch_width = self.enrich_batch_width,
            batch_delay_ms = self.enrich_batch_delay_ms,
            rate_limit_backoff_ms = self.rate_limit_backoff_ms,
            max_rate_limit_retries = self.max_rate_limit_retries,
            delivery_pacing_ms = self.delivery_pacing_ms,
            "  Pipeline tuning"
        );
    }
}

/// First few characters of a secret plus its length, safe to log.
fn preview(val: &str) -> String {
    let head: String = val.chars().take(4).collect();
    format!("{head}...({} chars)", val.chars().count())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, LeadflowError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| LeadflowError::Config(format!("{key} must be a number, got '{raw}'"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SLACK_BOT_TOKEN", "xoxb-test"),
            ("SLACK_SIGNING_SECRET", "secret"),
            ("APIFY_TOKEN", "apify_api_test"),
            ("APOLLO_API_KEY", "apollo"),
            ("INSTANTLY_API_KEY", "instantly"),
            ("INSTANTLY_CAMPAIGN_ID", "camp-1"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, LeadflowError> {
        Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_tuning_unset() {
        let config = load(&base()).unwrap();
        assert_eq!(config.enrich_batch_width, 5);
        assert_eq!(config.enrich_batch_delay_ms, 1000);
        assert_eq!(config.rate_limit_backoff_ms, 5000);
        assert_eq!(config.delivery_pacing_ms, 200);
        assert_eq!(config.web_port, 3000);
        assert!(config.apify_actor_id.is_none());
    }

    #[test]
    fn missing_required_key_is_reported_by_name() {
        let mut vars = base();
        vars.remove("APOLLO_API_KEY");
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("APOLLO_API_KEY"));
    }

    #[test]
    fn non_numeric_tuning_value_is_rejected() {
        let mut vars = base();
        vars.insert("ENRICH_BATCH_WIDTH", "five");
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("ENRICH_BATCH_WIDTH"));
    }

    #[test]
    fn preview_keeps_multibyte_secrets_intact() {
        assert_eq!(preview("xoxb-123456"), "xoxb...(11 chars)");
        assert_eq!(preview("ключ-секрет"), "ключ...(11 chars)");
        assert_eq!(preview("ab"), "ab...(2 chars)");
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = base();
        vars.insert("ENRICH_BATCH_WIDTH", "10");
        vars.insert("PORT", "8080");
        vars.insert("APIFY_ACTOR_ID", "someone~post-reactions");
        let config = load(&vars).unwrap();
        assert_eq!(config.enrich_batch_width, 10);
        assert_eq!(config.web_port, 8080);
        assert_eq!(config.apify_actor_id.as_deref(), Some("someone~post-reactions"));
    }
}
