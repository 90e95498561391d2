use snafu::{Location, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to build HTTP client: {source}, location: {location}"))]
    BuildHttpClient {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },

    #[snafu(display("Failed to reach payment gateway: {source}, location: {location}"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },

    #[snafu(display("Card declined: {message}, code: {code}, location: {location}"))]
    CardDeclined {
        #[snafu(implicit)]
        location: Location,
        code: String,
        message: String,
    },

    #[snafu(display(
        "Other client side error: {message}, status code: {status}, location: {location}"
    ))]
    OtherClientSide {
        #[snafu(implicit)]
        location: Location,
        status: reqwest::StatusCode,
        message: String,
    },

    #[snafu(display("Server side error: {message}, status code: {status}, location: {location}"))]
    ServerSide {
        #[snafu(implicit)]
        location: Location,
        status: reqwest::StatusCode,
        message: String,
    },

    #[snafu(display(
        "Failed to deserialize JSON from HTTP response, error: {source}, location: {location}"
    ))]
    DeserializeJsonResponse {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
}

impl Error {
    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BuildHttpClient { .. } => "build_client",
            Self::Transport { .. } => "transport",
            Self::CardDeclined { .. } => "card_declined",
            Self::OtherClientSide { .. } => "client_side",
            Self::ServerSide { .. } => "server_side",
            Self::DeserializeJsonResponse { .. } => "deserialize",
        }
    }
}
