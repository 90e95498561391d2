use axum::{extract::State, Json};
use donation_backend_core::model::{ChargeRequest, ChargeResponse, DonationRequest, IntentResponse};

use crate::{
    web::{controller::Result, extractor::ValidatedJson},
    ServiceState,
};

/// Create a payment intent
///
/// Registers the donation with the payment gateway and returns the client
/// secret the browser needs to confirm the payment. Nothing is charged yet.
#[utoipa::path(
    post,
    operation_id = "create_payment_intent",
    path = "/api/v1/donations/intents",
    request_body = DonationRequest,
    responses(
        (status = 200, description = "Payment intent created", body = IntentResponse),
        (status = 400, description = "Missing or malformed field"),
        (status = 502, description = "Payment gateway failed")
    ),
    tag = "Donations"
)]
pub async fn create_intent(
    State(state): State<ServiceState>,
    ValidatedJson(request): ValidatedJson<DonationRequest>,
) -> Result<Json<IntentResponse>> {
    let secret = state.donation_service.create_intent(&request).await?;

    Ok(Json(IntentResponse { secret }))
}

/// Charge a donation
///
/// Charges the card token. Gateway failures of any kind are reported as
/// `success: false`. On success the team alert and the donor receipt are sent
/// in the background.
#[utoipa::path(
    post,
    operation_id = "charge_donation",
    path = "/api/v1/donations/charges",
    request_body = ChargeRequest,
    responses(
        (status = 200, description = "Charge attempted", body = ChargeResponse),
        (status = 400, description = "Missing or malformed field")
    ),
    tag = "Donations"
)]
pub async fn charge(
    State(state): State<ServiceState>,
    ValidatedJson(request): ValidatedJson<ChargeRequest>,
) -> Json<ChargeResponse> {
    // dropping the dispatch handle detaches the email task
    let outcome = state.donation_service.charge(request).await;

    Json(ChargeResponse { success: outcome.succeeded })
}

/// Send donation emails
///
/// Sends the team alert and the donor receipt for an already completed
/// payment. Delivery happens in the background; the response does not
/// reflect it.
#[utoipa::path(
    post,
    operation_id = "notify_donation",
    path = "/api/v1/donations/notifications",
    request_body = DonationRequest,
    responses(
        (status = 200, description = "Dispatch started", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or malformed field")
    ),
    tag = "Donations"
)]
// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
pub async fn notify(
    State(state): State<ServiceState>,
    ValidatedJson(request): ValidatedJson<DonationRequest>,
) -> &'static str {
    let _handle = state.donation_service.notify(request);

    "Success"
}
