use std::result::Result;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::web::controller::Error;

/// JSON body extractor that turns every rejection (missing field, wrong type,
/// malformed JSON, wrong content type) into a validation error.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn handler(ValidatedJson(request): ValidatedJson<DonationRequest>) -> Response {
///     // `request` has every required field
/// }
/// ```
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(request, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| Error::InvalidRequestBody { message: rejection.body_text() })
    }
}
