//! # Notification Crate
//!
//! This crate provides functionality for sending the notifications of the
//! donation backend. Currently supports email delivery over an authenticated
//! SMTP relay.
//!
//! ## Features
//!
//! - SMTP delivery with `STARTTLS`, implicit TLS or plaintext connections
//! - Plain-text donation alerts for team and finance staff
//! - HTML donation receipts for donors
//! - Async/await support

mod error;
pub mod smtp;

use async_trait::async_trait;
pub use error::Error;

/// Represents different types of notifications that can be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Plain-text summary of a donation for the beneficiary team.
    DonationAlert {
        /// The team's email address.
        to: String,
        /// Additional visible recipients, usually the finance office.
        cc: Vec<String>,
        /// Subject line.
        subject: String,
        /// Plain-text body.
        body: String,
    },

    /// Rendered HTML receipt for the donor.
    DonationReceipt {
        /// The donor's email address.
        to: String,
        /// Hidden recipients that keep a copy of the receipt.
        bcc: Vec<String>,
        /// Subject line.
        subject: String,
        /// HTML document.
        html: String,
    },
}

impl Notification {
    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DonationAlert { .. } => "alert",
            Self::DonationReceipt { .. } => "receipt",
        }
    }

    /// The primary recipient.
    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::DonationAlert { to, .. } | Self::DonationReceipt { to, .. } => to,
        }
    }
}

/// Trait for notification clients that can send notifications.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification fails to send.
    async fn send_notification(&self, notification: &Notification) -> Result<(), Error>;
}
