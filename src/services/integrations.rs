use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IntegrationStatus {
    pub name: String,
    pub configured: bool,
    /// Setting names that still need a value. Never carries the values.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntegrationsReport {
    pub integrations: Vec<IntegrationStatus>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).is_some_and(|v| !v.is_empty())
}

fn status(name: &'static str, settings: &[(&'static str, &Option<String>)]) -> IntegrationStatus {
    let missing: Vec<String> = settings
        .iter()
        .filter(|(_, value)| !present(value))
        .map(|(key, _)| key.to_string())
        .collect();
    IntegrationStatus {
        name: name.to_string(),
        configured: missing.is_empty(),
        missing,
    }
}

/// Reports which third-party integrations have credentials configured.
pub fn integrations_status(config: &AppConfig) -> IntegrationsReport {
    IntegrationsReport {
        integrations: vec![
            status(
                "slack",
                &[
                    ("slack_bot_token", &config.slack_bot_token),
                    ("slack_channel_id", &config.slack_channel_id),
                ],
            ),
            status("hubspot", &[("hubspot_api_key", &config.hubspot_api_key)]),
            status(
                "quickbooks",
                &[
                    ("quickbooks_client_id", &config.quickbooks_client_id),
                    ("quickbooks_client_secret", &config.quickbooks_client_secret),
                ],
            ),
            status(
                "ssactivewear",
                &[
                    ("ssactivewear_account", &config.ssactivewear_account),
                    ("ssactivewear_api_key", &config.ssactivewear_api_key),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            8080,
            "development".to_string(),
        )
    }

    #[test]
    fn nothing_configured_by_default() {
        let report = integrations_status(&config());
        assert_eq!(report.integrations.len(), 4);
        assert!(report.integrations.iter().all(|i| !i.configured));
    }

    #[test]
    fn secrets_are_not_echoed() {
        let mut cfg = config();
        cfg.hubspot_api_key = Some("pat-na1-secret".to_string());
        cfg.slack_bot_token = Some("xoxb-secret".to_string());
        cfg.slack_channel_id = Some("  ".to_string());

        let report = integrations_status(&cfg);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("secret"));

        let hubspot = &report.integrations[1];
        assert!(hubspot.configured);
        let slack = &report.integrations[0];
        assert!(!slack.configured);
        assert_eq!(slack.missing, vec!["slack_channel_id"]);
    }
}
