use std::{future::Future, net::SocketAddr};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Router,
};
use prometheus::{Encoder, TextEncoder};
use snafu::ResultExt;
use tokio::net::TcpListener;

use crate::{error, Error, Metrics};

/// Serves `GET /metrics` in the Prometheus text format until `shutdown_signal`
/// resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn start_metrics_server<M, S>(
    listen_address: SocketAddr,
    metrics: M,
    shutdown_signal: S,
) -> Result<(), Error>
where
    M: Metrics + 'static,
    S: Future<Output = ()> + Send + 'static,
{
    let router = Router::new().route("/metrics", routing::get(export::<M>)).with_state(metrics);

    let listener = TcpListener::bind(listen_address)
        .await
        .context(error::BindMetricsServerSnafu { listen_address })?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context(error::ServeMetricsServerSnafu)
}

async fn export<M: Metrics>(State(metrics): State<M>) -> Response {
    match render(&metrics) {
        Ok(buffer) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], buffer).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

fn render<M: Metrics>(metrics: &M) -> Result<Vec<u8>, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use prometheus::IntCounter;

    use super::render;
    use crate::DefaultMetrics;

    #[test]
    fn test_render_text_format() {
        let metrics = DefaultMetrics::new().unwrap();
        let counter = IntCounter::new("donation_render_total", "render test").unwrap();
        metrics.register(&counter).unwrap();
        counter.inc_by(3);

        let text = String::from_utf8(render(&metrics).unwrap()).unwrap();
        assert!(text.contains("# TYPE donation_render_total counter"));
        assert!(text.contains("donation_render_total 3"));
    }
}
