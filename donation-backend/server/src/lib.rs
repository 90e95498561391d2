mod error;
mod metrics;
mod service;
mod web;

use std::{future::Future, net::SocketAddr, pin::Pin, sync::Arc};

use donation_backend_core::{
    config::{Config, NotificationConfig},
    ServerInfo,
};
use donation_metrics::DefaultMetrics;
use futures::{future::BoxFuture, FutureExt};
use notification::smtp;
use payment_gateway::{stripe, PaymentGateway};
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;

pub use self::{
    error::{Error, Result},
    metrics::DonationMetrics,
    service::{
        ChargeOutcome, DeliveryReport, DispatchError, DispatchHandle, DonationService,
        NotificationDispatcher,
    },
    web::{api_router, controller, ApiDoc, ServiceState},
};

/// # Errors
/// Returns errors when server fails to start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { web, metrics, payment_gateway, notification } = config;

    let donation_metrics = DonationMetrics::new().context(error::CreateDonationMetricsSnafu)?;

    let gateway = initialize_payment_gateway(payment_gateway)?;

    let dispatcher = initialize_notification_dispatcher(notification, donation_metrics.clone())?;

    let service_state =
        ServiceState::new(DonationService::new(gateway, dispatcher, donation_metrics.clone()));

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Http Server",
        create_web_http_server_future(web.listen_address, service_state, server_info),
    );

    if metrics.enable {
        let default_metrics = DefaultMetrics::new()?;
        donation_metrics.register(&default_metrics)?;

        let _handle = lifecycle_manager.spawn(
            "Metrics server",
            create_metrics_server_future(metrics.listen_address, default_metrics),
        );
    }

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

#[tracing::instrument(
    skip(config),
    fields(
        api_base = %config.api_base,
        currency = %config.currency
    )
)]
fn initialize_payment_gateway(config: stripe::Config) -> Result<Arc<dyn PaymentGateway>> {
    tracing::info!("Initializing payment gateway client");

    let client = stripe::Client::new(config).context(error::CreatePaymentGatewaySnafu)?;

    Ok(Arc::new(client))
}

#[tracing::instrument(skip_all)]
fn initialize_notification_dispatcher(
    config: Option<NotificationConfig>,
    metrics: DonationMetrics,
) -> Result<NotificationDispatcher> {
    let Some(NotificationConfig {
        alert_sender,
        receipt_sender,
        finance_address,
        teams,
        organization,
    }) = config
    else {
        tracing::warn!("Notification is not configured, no donation email will be sent");
        return Ok(NotificationDispatcher::unconfigured(metrics));
    };

    tracing::info!("Initializing SMTP mailers");

    let alert_client =
        smtp::Client::new(alert_sender).context(error::CreateMailerSnafu { identity: "alert" })?;
    let receipt_client = smtp::Client::new(receipt_sender)
        .context(error::CreateMailerSnafu { identity: "receipt" })?;

    NotificationDispatcher::new(
        Arc::new(alert_client),
        Arc::new(receipt_client),
        finance_address,
        teams,
        organization,
        metrics,
    )
    .context(error::LoadReceiptTemplateSnafu)
}

fn create_web_http_server_future(
    listen_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!("Listen Web HTTP server endpoint on {listen_address}");

            let result =
                web::new_api_server(listen_address, service_state, server_info, shutdown_signal)
                    .await;

            match result {
                Ok(()) => {
                    tracing::info!("HTTP server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}

fn create_metrics_server_future<Metrics>(
    listen_address: SocketAddr,
    metrics: Metrics,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>>
where
    Metrics: donation_metrics::Metrics + 'static,
{
    move |signal| {
        async move {
            tracing::info!("Listen metrics endpoint on {listen_address}");
            let result = donation_metrics::start_metrics_server(listen_address, metrics, signal).await;
            match result {
                Ok(()) => {
                    tracing::info!("Metrics server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
