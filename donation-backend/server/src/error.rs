use snafu::Snafu;

use crate::web;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error occurs while creating payment gateway client, error: {source}"))]
    CreatePaymentGateway { source: payment_gateway::Error },

    #[snafu(display("Error occurs while creating {identity} mailer, error: {source}"))]
    CreateMailer { identity: &'static str, source: notification::Error },

    #[snafu(display("Error occurs while loading receipt template, error: {source}"))]
    LoadReceiptTemplate { source: donation_backend_core::error::Error },

    #[snafu(display("Error occurs while creating donation metrics, error: {source}"))]
    CreateDonationMetrics { source: prometheus::Error },

    #[snafu(display("{source}"))]
    Metrics { source: donation_metrics::Error },

    #[snafu(display("{source}"))]
    Web { source: web::Error },
}

impl From<donation_metrics::Error> for Error {
    fn from(source: donation_metrics::Error) -> Self { Self::Metrics { source } }
}

impl From<web::Error> for Error {
    fn from(source: web::Error) -> Self { Self::Web { source } }
}
