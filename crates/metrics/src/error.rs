use std::net::SocketAddr;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not bind metrics server on {listen_address}, error: {source}"))]
    BindMetricsServer { listen_address: SocketAddr, source: std::io::Error },

    #[snafu(display("Error occurs while serving metrics server, error: {source}"))]
    ServeMetricsServer { source: std::io::Error },

    #[snafu(display("Could not register metrics collector, error: {source}"))]
    RegisterCollector { source: prometheus::Error },
}
