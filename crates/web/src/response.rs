pub use axum::{http::StatusCode, response::IntoResponse};
use axum::{
    body,
    http::header,
    response::Response,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EncapsulatedResponse<T> {
    #[serde(rename = "_status", with = "http_serde::status_code")]
    status_code: StatusCode,

    data: T,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EncapsulatedResponseError<E> {
    #[serde(rename = "_status", with = "http_serde::status_code")]
    status_code: StatusCode,

    error: E,
}

/// Successful JSON response wrapped in [`EncapsulatedResponse`].
#[derive(Debug, Deserialize, Serialize)]
pub struct EncapsulatedJson<T>(pub EncapsulatedResponse<T>);

impl<T> EncapsulatedJson<T> {
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn ok(data: T) -> Self {
        Self(EncapsulatedResponse { status_code: StatusCode::OK, data })
    }
}

/// Failed JSON response wrapped in [`EncapsulatedResponseError`].
#[derive(Debug, Deserialize, Serialize)]
pub struct EncapsulatedJsonError<E>(pub EncapsulatedResponseError<E>);

impl<E> EncapsulatedJsonError<E> {
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(status_code: StatusCode, error: E) -> Self {
        Self(EncapsulatedResponseError { status_code, error })
    }
}

fn json_body<B: Serialize>(status_code: StatusCode, body: &B) -> Response {
    let body = body::Body::from(serde_json::to_vec(body).expect("envelope is serializable"));

    Response::builder()
        .status(status_code)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(body)
        .expect("Build `Axum` response successfully; qed")
}

impl<T> IntoResponse for EncapsulatedJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response { json_body(self.0.status_code, &self.0) }
}

impl<E> IntoResponse for EncapsulatedJsonError<E>
where
    E: Serialize,
{
    fn into_response(self) -> Response { json_body(self.0.status_code, &self.0) }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Error {
    #[serde(rename = "type")]
    pub type_: ErrorType,

    pub message: String,

    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub additional_fields: IndexMap<String, serde_json::Value>,
}

impl Error {
    #[inline]
    #[must_use]
    pub fn new(type_: ErrorType, message: impl Into<String>) -> Self {
        Self { type_, message: message.into(), additional_fields: IndexMap::default() }
    }
}

/// Builds an `axum::response::Response` from an envelope.
///
/// The `reason:` forms additionally log the underlying cause: server errors at
/// `error` level, everything else at `warn`.
#[macro_export]
macro_rules! json_response {
    (status: $status:expr,error: $error:expr) => {
        $crate::response::IntoResponse::into_response(
            $crate::response::EncapsulatedJsonError::new($status, $error),
        )
    };

    (reason: $reason:expr,status: $status:expr,error: $error:expr) => {{
        if $status.is_server_error() {
            tracing::error!(status_code = $status.as_u16(), "Internal Server Error: {:?}", $reason);
        } else {
            tracing::warn!(status_code = $status.as_u16(), "Response Error: {:?}", $reason);
        }

        $crate::json_response! { status: $status, error: $error }
    }};
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    Validation,
    NotFound,
    BadGateway,
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ok_envelope() {
        let response = EncapsulatedJson::<_>::ok("hello").into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            mime::APPLICATION_JSON.as_ref()
        );
        assert_eq!(body_json(response).await, serde_json::json!({ "_status": 200, "data": "hello" }));
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = crate::json_response! {
            status: StatusCode::BAD_REQUEST,
            error: Error::new(ErrorType::Validation, "missing field `amount`")
        };

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "_status": 400,
                "error": { "type": "VALIDATION", "message": "missing field `amount`" }
            })
        );
    }

    #[test]
    fn test_additional_fields_are_flattened() {
        let mut error = Error::new(ErrorType::BadGateway, "payment gateway unavailable");
        let _previous = error.additional_fields.insert("retryable".to_string(), true.into());

        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["type"], "BAD_GATEWAY");
        assert_eq!(value["retryable"], true);
    }

    #[test]
    fn test_error_type_names() {
        let names: Vec<_> = [ErrorType::Validation, ErrorType::NotFound, ErrorType::BadGateway]
            .iter()
            .map(|type_| serde_json::to_value(type_).unwrap())
            .collect();

        assert_eq!(names, ["VALIDATION", "NOT_FOUND", "BAD_GATEWAY"]);
        assert!(serde_json::from_str::<ErrorType>("\"INTERNAL\"").is_err());
    }
}
