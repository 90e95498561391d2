use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{non_empty, non_zero_timeout, Error};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PaymentGatewayConfig {
    #[serde(default = "PaymentGatewayConfig::default_api_base")]
    pub api_base: String,

    /// Stripe secret key, `sk_live_...` in production.
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "PaymentGatewayConfig::default_currency")]
    pub currency: String,

    #[serde(default = "PaymentGatewayConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PaymentGatewayConfig {
    #[inline]
    pub fn default_api_base() -> String { payment_gateway::stripe::DEFAULT_API_BASE.to_string() }

    #[inline]
    pub fn default_currency() -> String { "usd".to_string() }

    #[inline]
    pub const fn default_timeout_secs() -> u64 { 30 }
}

impl Default for PaymentGatewayConfig {
    fn default() -> Self {
        Self {
            api_base: Self::default_api_base(),
            secret_key: String::new(),
            currency: Self::default_currency(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl TryFrom<PaymentGatewayConfig> for payment_gateway::stripe::Config {
    type Error = Error;

    fn try_from(
        PaymentGatewayConfig { api_base, secret_key, currency, timeout_secs }: PaymentGatewayConfig,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            api_base: non_empty("payment_gateway.api_base", api_base)?,
            secret_key: non_empty("payment_gateway.secret_key", secret_key)?,
            currency: non_empty("payment_gateway.currency", currency)?,
            timeout: Duration::from_secs(non_zero_timeout(
                "payment_gateway.timeout_secs",
                timeout_secs,
            )?),
        })
    }
}
