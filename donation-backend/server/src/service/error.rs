use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use donation_axum::{json_response, response};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Fail to create payment intent, error: {source}"))]
    CreatePaymentIntent { source: payment_gateway::Error },
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        match self {
            // gateway details stay in the log
            Self::CreatePaymentIntent { .. } => json_response! {
                reason: self,
                status: StatusCode::BAD_GATEWAY,
                error: response::Error::new(
                    response::ErrorType::BadGateway,
                    "Payment gateway is unavailable",
                )
            },
        }
    }
}
