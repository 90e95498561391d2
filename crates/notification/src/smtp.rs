//! SMTP client implementation for sending emails through an authenticated
//! relay.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MessageBuilder},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{error, Error, Notification, NotificationClient};

/// How the connection to the relay is secured.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plaintext connection, only meant for local relays.
    None,
    /// Upgrade a plaintext connection with `STARTTLS`.
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (usually port 465).
    Tls,
}

/// Configuration for the SMTP client.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Relay host name.
    pub host: String,

    /// Relay port.
    pub port: u16,

    /// Login user name.
    pub username: String,

    /// Login password.
    pub password: String,

    /// Sender mailbox, e.g. `Donations <donations@example.org>`.
    pub from_address: String,

    /// Connection security.
    #[serde(default)]
    pub tls: TlsMode,

    /// Timeout applied to every SMTP command.
    pub timeout: Duration,
}

/// SMTP client for sending emails.
#[derive(Clone)]
pub struct Client {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Client {
    /// Creates a new SMTP client. No connection is opened until the first
    /// message is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sender address is not a valid mailbox
    /// - TLS parameters cannot be built for the relay host
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use notification::smtp::{Client, Config, TlsMode};
    ///
    /// # fn example() -> Result<(), notification::Error> {
    /// let config = Config {
    ///     host: "smtp.example.org".to_string(),
    ///     port: 587,
    ///     username: "donations@example.org".to_string(),
    ///     password: "app-password".to_string(),
    ///     from_address: "Donations <donations@example.org>".to_string(),
    ///     tls: TlsMode::Starttls,
    ///     timeout: Duration::from_secs(30),
    /// };
    ///
    /// let client = Client::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config) -> Result<Self, Error> {
        let Config { host, port, username, password, from_address, tls, timeout } = config;

        tracing::info!(%host, port, ?tls, from = %from_address, "Using SMTP relay for notifications");

        let from = parse_mailbox(&from_address)?;

        let tls = match tls {
            TlsMode::None => Tls::None,
            TlsMode::Starttls => {
                Tls::Required(TlsParameters::new(host.clone()).context(error::CreateMailerSnafu)?)
            }
            TlsMode::Tls => {
                Tls::Wrapper(TlsParameters::new(host.clone()).context(error::CreateMailerSnafu)?)
            }
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .tls(tls)
            .credentials(Credentials::new(username, password))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationClient for Client {
    async fn send_notification(&self, notification: &Notification) -> Result<(), Error> {
        let email = build_message(&self.from, notification)?;

        let _response = self.transport.send(email).await.map_err(|source| {
            tracing::error!(
                kind = notification.kind(),
                to = %notification.recipient(),
                error = %source,
                "Failed to send email"
            );
            Error::SendEmail { source }
        })?;

        tracing::info!(
            kind = notification.kind(),
            to = %notification.recipient(),
            "Successfully sent email"
        );
        Ok(())
    }
}

/// Builds the email message for a notification.
///
/// # Errors
///
/// Returns an error if any of the email addresses is invalid or the message
/// cannot be built.
pub fn build_message(from: &Mailbox, notification: &Notification) -> Result<Message, Error> {
    match notification {
        Notification::DonationAlert { to, cc, subject, body } => {
            let builder = cc.iter().try_fold(header(from, to, subject)?, |builder, address| {
                parse_mailbox(address).map(|mailbox| builder.cc(mailbox))
            })?;

            builder
                .header(ContentType::TEXT_PLAIN)
                .body(body.clone())
                .context(error::BuildEmailSnafu)
        }
        Notification::DonationReceipt { to, bcc, subject, html } => {
            let builder = bcc.iter().try_fold(header(from, to, subject)?, |builder, address| {
                parse_mailbox(address).map(|mailbox| builder.bcc(mailbox))
            })?;

            builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .context(error::BuildEmailSnafu)
        }
    }
}

fn header(from: &Mailbox, to: &str, subject: &str) -> Result<MessageBuilder, Error> {
    Ok(Message::builder().from(from.clone()).to(parse_mailbox(to)?).subject(subject))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, Error> {
    address.parse().context(error::InvalidMailboxSnafu { address })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Mailbox { "Donations <donations@example.org>".parse().unwrap() }

    fn envelope_recipients(message: &Message) -> Vec<String> {
        let mut recipients: Vec<String> =
            message.envelope().to().iter().map(ToString::to_string).collect();
        recipients.sort();
        recipients
    }

    #[test]
    fn test_build_donation_alert() {
        let notification = Notification::DonationAlert {
            to: "owls@example.org".to_string(),
            cc: vec!["finance@example.org".to_string()],
            subject: "New donation for Iron Owls".to_string(),
            body: "Amount: $25.50".to_string(),
        };

        let message = build_message(&sender(), &notification).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("donations@example.org"));
        assert!(formatted.contains("To: owls@example.org"));
        assert!(formatted.contains("Cc: finance@example.org"));
        assert!(formatted.contains("New donation for Iron Owls"));
        assert!(formatted.contains("text/plain"));
        assert_eq!(envelope_recipients(&message), ["finance@example.org", "owls@example.org"]);
    }

    #[test]
    fn test_build_donation_receipt_hides_copies() {
        let notification = Notification::DonationReceipt {
            to: "donor@example.com".to_string(),
            bcc: vec!["owls@example.org".to_string(), "finance@example.org".to_string()],
            subject: "Thank you for your donation".to_string(),
            html: "<p>Thank you!</p>".to_string(),
        };

        let message = build_message(&sender(), &notification).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("To: donor@example.com"));
        assert!(formatted.contains("text/html"));
        assert!(!formatted.contains("finance@example.org"));
        assert_eq!(
            envelope_recipients(&message),
            ["donor@example.com", "finance@example.org", "owls@example.org"]
        );
    }

    #[test]
    fn test_build_message_invalid_to() {
        let notification = Notification::DonationReceipt {
            to: "invalid-email".to_string(),
            bcc: Vec::new(),
            subject: "Thank you for your donation".to_string(),
            html: "<p>Thank you!</p>".to_string(),
        };

        let result = build_message(&sender(), &notification);

        assert!(matches!(result, Err(Error::InvalidMailbox { ref address, .. }) if address == "invalid-email"));
    }

    #[test]
    fn test_build_message_invalid_cc() {
        let notification = Notification::DonationAlert {
            to: "owls@example.org".to_string(),
            cc: vec!["finance at example".to_string()],
            subject: "New donation".to_string(),
            body: "Amount: $1".to_string(),
        };

        assert!(build_message(&sender(), &notification).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_sender() {
        let config = Config {
            host: "localhost".to_string(),
            port: 2525,
            username: "user".to_string(),
            password: "password".to_string(),
            from_address: "not a mailbox".to_string(),
            tls: TlsMode::None,
            timeout: Duration::from_secs(5),
        };

        assert!(matches!(Client::new(config), Err(Error::InvalidMailbox { .. })));
    }

    #[test]
    fn test_kind_and_recipient() {
        let notification = Notification::DonationAlert {
            to: "owls@example.org".to_string(),
            cc: Vec::new(),
            subject: String::new(),
            body: String::new(),
        };

        assert_eq!(notification.kind(), "alert");
        assert_eq!(notification.recipient(), "owls@example.org");
    }
}
