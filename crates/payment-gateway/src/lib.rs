//! # Payment Gateway Crate
//!
//! Adapters for the card payment processor used by the donation backend.
//!
//! Two flows are supported:
//!
//! - **Intent**: register a payment intent and hand its client secret to the
//!   browser, which confirms the payment itself. No money moves.
//! - **Charge**: finalize a payment with a card token collected by the
//!   browser and report whether the processor marked it as paid.

mod error;
pub mod stripe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use self::error::Error;

/// Postal address of the paying customer.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Shipping and contact details attached to a payment.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

/// A payment of `amount` minor currency units.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub amount: u64,
    pub description: String,
    pub customer: Customer,
}

/// A registered payment intent.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// The outcome of a finalized charge.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Charge {
    pub id: String,
    pub paid: bool,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers a payment intent for the browser to confirm.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor is unreachable, rejects the request
    /// or answers with an unexpected body.
    async fn create_intent(&self, request: &PaymentRequest) -> Result<PaymentIntent, Error>;

    /// Charges the card represented by `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor is unreachable, declines the card,
    /// rejects the request or answers with an unexpected body.
    async fn charge(&self, request: &PaymentRequest, token: &str) -> Result<Charge, Error>;
}
