use snafu::Snafu;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Failed to create mailer client.
    #[snafu(display("Failed to create mailer client: {source}"))]
    CreateMailer {
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },

    /// An address could not be parsed as a mailbox.
    #[snafu(display("Invalid email address `{address}`: {source}"))]
    InvalidMailbox {
        /// The offending address.
        address: String,
        /// The underlying parse error.
        source: lettre::address::AddressError,
    },

    /// Failed to build email.
    #[snafu(display("Failed to build email message: {source}"))]
    BuildEmail {
        /// The underlying builder error.
        source: lettre::error::Error,
    },

    /// Failed to send email.
    #[snafu(display("Failed to send email: {source}"))]
    SendEmail {
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },
}
