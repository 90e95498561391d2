mod error;
mod gateway;
mod mail;
mod metrics;
mod web;

use std::path::{Path, PathBuf};

use donation_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};

pub use self::error::Error;
use self::{
    gateway::PaymentGatewayConfig, mail::NotificationConfig, metrics::MetricsConfig,
    web::WebConfig,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub payment_gateway: PaymentGatewayConfig,

    #[serde(default)]
    pub notification: Option<NotificationConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            web: WebConfig::default(),
            metrics: MetricsConfig::default(),
            payment_gateway: PaymentGatewayConfig::default(),
            notification: Some(NotificationConfig::default()),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            donation_backend_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(donation_backend_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = config
            .log
            .file_path
            .map(|path| {
                path.try_resolve()
                    .map(|resolved| resolved.to_path_buf())
                    .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
            })
            .transpose()?;

        Ok(config)
    }
}

/// Validates the file config and turns it into the config the server runs on.
#[inline]
pub fn load_server_config(
    Config { web, metrics, payment_gateway, notification, .. }: Config,
) -> Result<donation_backend_core::config::Config, Error> {
    let notification = match notification {
        Some(notification) => Some(notification.try_into()?),
        None => {
            tracing::warn!("No `notification` section is configured");
            None
        }
    };

    Ok(donation_backend_core::config::Config {
        web: web.into(),
        metrics: metrics.into(),
        payment_gateway: payment_gateway.try_into()?,
        notification,
    })
}

fn non_empty(field: &'static str, value: String) -> Result<String, Error> {
    ensure!(!value.trim().is_empty(), error::EmptyValueSnafu { field });
    Ok(value)
}

fn non_zero_timeout(field: &'static str, secs: u64) -> Result<u64, Error> {
    ensure!(secs > 0, error::ZeroTimeoutSnafu { field });
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono_tz::Tz;
    use notification::smtp::TlsMode;

    use super::*;

    const FULL_CONFIG: &str = r"
web:
  host: 0.0.0.0
  port: 8080
metrics:
  enable: true
payment_gateway:
  secret_key: sk_test_123
  currency: USD
notification:
  alert_sender:
    host: smtp.example.org
    username: alerts@example.org
    password: hunter2
    from_address: Donation Alerts <alerts@example.org>
  receipt_sender:
    host: smtp.example.org
    port: 465
    username: receipts@example.org
    password: hunter3
    from_address: Robotics Boosters <receipts@example.org>
    tls: tls
    timeout_secs: 10
  finance_address: finance@example.org
  teams:
    iron_owls: owls@example.org
    steel_sparrows: sparrows@example.org
  organization:
    name: Robotics Boosters
    address: 1 Main St
    city: Springfield
    state: IL
    zip: '62701'
    phone: 555-0100
    tax_id: 12-3456789
    time_zone: America/Denver
";

    fn full_config() -> Config { serde_yaml::from_str(FULL_CONFIG).unwrap() }

    #[test]
    fn test_load_server_config() {
        let config = load_server_config(full_config()).unwrap();

        assert_eq!(config.web.listen_address.to_string(), "0.0.0.0:8080");
        assert!(config.metrics.enable);
        assert_eq!(config.metrics.listen_address.port(), donation_backend_core::DEFAULT_METRICS_PORT);

        assert_eq!(config.payment_gateway.api_base, payment_gateway::stripe::DEFAULT_API_BASE);
        assert_eq!(config.payment_gateway.secret_key, "sk_test_123");
        assert_eq!(config.payment_gateway.timeout, Duration::from_secs(30));

        let notification = config.notification.unwrap();
        assert_eq!(notification.alert_sender.port, 587);
        assert_eq!(notification.alert_sender.tls, TlsMode::Starttls);
        assert_eq!(notification.receipt_sender.port, 465);
        assert_eq!(notification.receipt_sender.tls, TlsMode::Tls);
        assert_eq!(notification.receipt_sender.timeout, Duration::from_secs(10));
        assert_eq!(notification.teams.steel_sparrows, "sparrows@example.org");
        assert_eq!(notification.organization.zip, "62701");
        assert_eq!(notification.organization.time_zone, Tz::America__Denver);
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("payment_gateway:\n  secret_key: sk\n").unwrap();

        assert_eq!(config.web, WebConfig::default());
        assert_eq!(config.metrics, MetricsConfig::default());
        assert!(config.notification.is_none());

        let config = load_server_config(config).unwrap();
        assert_eq!(config.payment_gateway.currency, "usd");
        assert!(config.notification.is_none());
    }

    #[test]
    fn test_missing_secret_key() {
        let err = load_server_config(serde_yaml::from_str("{}").unwrap()).unwrap_err();

        assert!(
            matches!(err, Error::EmptyValue { field: "payment_gateway.secret_key" }),
            "{err}"
        );
    }

    #[test]
    fn test_blank_team_address() {
        let mut config = full_config();
        if let Some(notification) = config.notification.as_mut() {
            notification.teams.iron_owls = "  ".to_string();
        }

        let err = load_server_config(config).unwrap_err();
        assert!(matches!(err, Error::EmptyValue { field: "notification.teams.iron_owls" }));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = full_config();
        if let Some(notification) = config.notification.as_mut() {
            notification.alert_sender.timeout_secs = 0;
        }

        let err = load_server_config(config).unwrap_err();
        assert!(matches!(
            err,
            Error::ZeroTimeout { field: "notification.alert_sender.timeout_secs" }
        ));
    }

    #[test]
    fn test_unknown_time_zone() {
        let yaml = FULL_CONFIG.replace("America/Denver", "Mars/Phobos");

        assert!(serde_yaml::from_str::<Config>(&yaml).is_err());
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = serde_yaml::to_string(&Config::default()).unwrap();
        let config: Config = serde_yaml::from_str(&text).unwrap();

        assert!(config.notification.is_some());
        assert_eq!(config.web, WebConfig::default());
    }
}
