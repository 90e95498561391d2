//! Example: Send a donation receipt through an SMTP relay.
//!
//! # Prerequisites
//!
//! 1. An SMTP relay reachable from this machine
//! 2. Credentials for a mailbox allowed to send through it
//!
//! # Usage
//!
//! ```bash
//! export SMTP_HOST="smtp.example.org"
//! export SMTP_USERNAME="receipts@example.org"
//! export SMTP_PASSWORD="app-password"
//! cargo run --example send_donation_receipt -- donor@example.com
//! ```

use std::time::Duration;

use notification::{
    smtp::{Client, Config, TlsMode},
    Notification, NotificationClient,
};

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let variable = |name: &str, fallback: &str| {
        std::env::var(name).unwrap_or_else(|_| fallback.to_string())
    };
    let username = variable("SMTP_USERNAME", "receipts@example.org");

    let config = Config {
        host: variable("SMTP_HOST", "localhost"),
        port: 587,
        from_address: format!("Donation Receipts <{username}>"),
        username,
        password: variable("SMTP_PASSWORD", ""),
        tls: TlsMode::Starttls,
        timeout: Duration::from_secs(30),
    };

    let client = Client::new(config)?;

    let donor = std::env::args().nth(1).unwrap_or_else(|| "donor@example.com".to_string());
    let notification = Notification::DonationReceipt {
        to: donor,
        bcc: Vec::new(),
        subject: "Thank you for your donation".to_string(),
        html: "<h1>Thank you!</h1><p>Your gift of $25 was received.</p>".to_string(),
    };

    tracing::info!("Sending donation receipt");
    client.send_notification(&notification).await?;

    tracing::info!("Email sent successfully");
    Ok(())
}
