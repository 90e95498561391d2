//! Stripe REST API client.
//!
//! Requests are form encoded and authenticated with the account's secret key,
//! see <https://docs.stripe.com/api>.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use snafu::ResultExt;

use crate::{error, Charge, Customer, Error, PaymentGateway, PaymentIntent, PaymentRequest};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Configuration for the Stripe client.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the API, without the `/v1` prefix.
    pub api_base: String,

    /// Secret API key (`sk_live_...` or `sk_test_...`).
    pub secret_key: String,

    /// Three-letter ISO currency code applied to every payment.
    pub currency: String,

    /// Timeout of a whole request, connect included.
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
    currency: String,
}

impl Client {
    /// Creates a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Error> {
        let Config { api_base, secret_key, currency, timeout } = config;

        tracing::info!(%api_base, %currency, "Using Stripe as payment gateway");

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context(error::BuildHttpClientSnafu)?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key,
            currency: currency.to_lowercase(),
        })
    }

    async fn post<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.api_base);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.secret_key)
            .form(params)
            .send()
            .await
            .context(error::TransportSnafu)?;

        let status = response.status();
        let body = response.text().await.context(error::TransportSnafu)?;

        if status.is_client_error() {
            let ApiError { type_, code, message } = ApiError::parse(&body);
            if status == StatusCode::PAYMENT_REQUIRED || type_.as_deref() == Some("card_error") {
                return error::CardDeclinedSnafu { code: code.unwrap_or_default(), message }.fail();
            }
            return error::OtherClientSideSnafu { status, message }.fail();
        }

        if status.is_server_error() {
            return error::ServerSideSnafu { status, message: ApiError::parse(&body).message }
                .fail();
        }

        serde_json::from_str(&body).context(error::DeserializeJsonResponseSnafu)
    }

    fn payment_params(&self, request: &PaymentRequest) -> Vec<(&'static str, String)> {
        let PaymentRequest { amount, description, customer } = request;
        let Customer { name, email, phone, address } = customer;

        vec![
            ("amount", amount.to_string()),
            ("currency", self.currency.clone()),
            ("description", description.clone()),
            ("shipping[name]", name.clone()),
            ("shipping[phone]", phone.clone()),
            ("shipping[address][line1]", address.line1.clone()),
            ("shipping[address][line2]", address.line2.clone()),
            ("shipping[address][city]", address.city.clone()),
            ("shipping[address][state]", address.state.clone()),
            ("shipping[address][postal_code]", address.postal_code.clone()),
            ("metadata[donor_email]", email.clone()),
            ("metadata[donor_phone]", phone.clone()),
        ]
    }
}

#[async_trait]
impl PaymentGateway for Client {
    #[tracing::instrument(skip_all, fields(amount = request.amount))]
    async fn create_intent(&self, request: &PaymentRequest) -> Result<PaymentIntent, Error> {
        let mut params = self.payment_params(request);
        params.push(("payment_method_types[]", "card".to_string()));

        let intent: PaymentIntent = self.post("/v1/payment_intents", &params).await?;

        tracing::info!(id = %intent.id, "Created payment intent");
        Ok(intent)
    }

    #[tracing::instrument(skip_all, fields(amount = request.amount))]
    async fn charge(&self, request: &PaymentRequest, token: &str) -> Result<Charge, Error> {
        let mut params = self.payment_params(request);
        params.push(("source", token.to_string()));

        let charge: Charge = self.post("/v1/charges", &params).await?;

        tracing::info!(id = %charge.id, paid = charge.paid, "Created charge");
        Ok(charge)
    }
}

/// The `error` object of a failed API call.
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    type_: Option<String>,

    #[serde(default)]
    code: Option<String>,

    #[serde(default)]
    message: String,
}

impl ApiError {
    fn parse(body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ApiError,
        }

        serde_json::from_str::<Envelope>(body)
            .map_or_else(|_| Self { message: body.to_string(), ..Self::default() }, |e| e.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;

    fn client() -> Client {
        Client::new(Config {
            api_base: "http://localhost:12111/".to_string(),
            secret_key: "sk_test_123".to_string(),
            currency: "USD".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            amount: 2550,
            description: "Iron Owls FRC Robotics Program".to_string(),
            customer: Customer {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
                address: Address {
                    line1: "1 Main St".to_string(),
                    line2: String::new(),
                    city: "Springfield".to_string(),
                    state: "IL".to_string(),
                    postal_code: "62701".to_string(),
                },
            },
        }
    }

    #[test]
    fn test_new_normalizes_base_and_currency() {
        let client = client();

        assert_eq!(client.api_base, "http://localhost:12111");
        assert_eq!(client.currency, "usd");
    }

    #[test]
    fn test_payment_params() {
        let params = client().payment_params(&request());
        let get = |key: &str| params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());

        assert_eq!(get("amount"), Some("2550"));
        assert_eq!(get("currency"), Some("usd"));
        assert_eq!(get("shipping[name]"), Some("Ada Lovelace"));
        assert_eq!(get("shipping[address][line2]"), Some(""));
        assert_eq!(get("shipping[address][postal_code]"), Some("62701"));
        assert_eq!(get("metadata[donor_email]"), Some("ada@example.com"));
        assert_eq!(get("source"), None);
    }

    #[test]
    fn test_parse_api_error() {
        let error = ApiError::parse(
            r#"{"error":{"type":"card_error","code":"card_declined","message":"Your card was declined."}}"#,
        );

        assert_eq!(error.type_.as_deref(), Some("card_error"));
        assert_eq!(error.code.as_deref(), Some("card_declined"));
        assert_eq!(error.message, "Your card was declined.");
    }

    #[test]
    fn test_parse_api_error_falls_back_to_body() {
        let error = ApiError::parse("upstream connect error");

        assert!(error.type_.is_none());
        assert_eq!(error.message, "upstream connect error");
    }
}
