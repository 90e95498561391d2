// FIXME: remove this after this utoipa issue is fixed: https://github.com/juhaku/utoipa/pull/1423
#![allow(clippy::needless_for_each)]
mod donation;
mod error;

use axum::{routing, Extension, Router};
use donation_axum::response::EncapsulatedJson;
use donation_backend_core::{
    model::{ChargeRequest, ChargeResponse, DonationRequest, IntentResponse},
    ServerInfo,
};
use utoipa::OpenApi;

pub use self::error::{Error, Result};
use crate::ServiceState;

pub fn api_v1_router(service_state: &ServiceState) -> Router {
    let routes = Router::new()
        .route("/v1/info", routing::get(server_info))
        .route("/v1/donations/intents", routing::post(donation::create_intent))
        .route("/v1/donations/charges", routing::post(donation::charge))
        .route("/v1/donations/notifications", routing::post(donation::notify));

    Router::new().nest("/api", routes).with_state(service_state.clone())
}

/// Get server info
#[utoipa::path(
    get,
    operation_id = "get_server_info",
    path = "/api/v1/info",
    responses(
        (status = 200, body = ServerInfo)
    )
)]
pub async fn server_info(
    Extension(server_info): Extension<ServerInfo>,
) -> Result<EncapsulatedJson<ServerInfo>> {
    Ok(EncapsulatedJson::ok(server_info))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        server_info,
        donation::create_intent,
        donation::charge,
        donation::notify,
    ),
    components(schemas(
        ServerInfo,
        DonationRequest,
        ChargeRequest,
        IntentResponse,
        ChargeResponse,
    )),
    tags(
        (name = "Donations", description = "Donation intake endpoints")
    )
)]
pub struct ApiDoc;
