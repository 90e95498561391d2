pub mod controller;
pub mod error;
pub mod extractor;

use std::{future::Future, net::SocketAddr};

use axum::{extract::Request, http, routing, Extension, Json, Router, ServiceExt};
use donation_axum::{json_response, response};
use donation_backend_core::ServerInfo;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer, normalize_path::NormalizePathLayer, trace::TraceLayer,
};
use utoipa::OpenApi;

pub use self::{controller::ApiDoc, error::Error};
use crate::service::DonationService;

pub async fn new_api_server<ShutdownSignal>(
    socket_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router = {
        let router = api_router(&service_state, server_info);
        let router = NormalizePathLayer::trim_trailing_slash().layer(router);
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(router)
    };

    let listener = bind_listener(socket_address).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

async fn bind_listener(socket_address: SocketAddr) -> Result<TcpListener, Error> {
    TcpListener::bind(socket_address).await.context(error::BindTcpServerSnafu)
}

/// Every route of the public API, with tracing and compression.
pub fn api_router(service_state: &ServiceState, server_info: ServerInfo) -> Router {
    let middleware_stack =
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CompressionLayer::new());

    Router::new()
        // For load balancer default health check
        .route("/", routing::get(controller::server_info))
        .route("/openapi.json", routing::get(openapi_json))
        .merge(controller::api_v1_router(service_state))
        .layer(Extension(server_info))
        .layer(middleware_stack)
        .fallback(fallback)
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn fallback(uri: http::Uri) -> axum::response::Response {
    json_response! {
        status: http::StatusCode::NOT_FOUND,
        error: response::Error::new(response::ErrorType::NotFound, format!("No route for {uri}"))
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> { Json(ApiDoc::openapi()) }

#[derive(Clone)]
pub struct ServiceState {
    pub donation_service: DonationService,
}

impl ServiceState {
    #[must_use]
    pub const fn new(donation_service: DonationService) -> Self { Self { donation_service } }
}
