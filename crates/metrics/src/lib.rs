pub mod error;
mod server;
mod traits;

use prometheus::core::Collector;
use snafu::ResultExt;

pub use self::{error::Error, server::start_metrics_server, traits::Metrics};

#[derive(Clone, Debug)]
pub struct DefaultMetrics {
    registry: prometheus::Registry,
}

impl DefaultMetrics {
    // FIXME: we have to check the result in the near future
    #[allow(clippy::unnecessary_wraps, clippy::missing_errors_doc)]
    pub fn new() -> Result<Self, Error> {
        let registry = prometheus::Registry::new();

        Ok(Self { registry })
    }

    /// Registers a collector; the registry keeps its own clone.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector with the same descriptor is already
    /// registered.
    pub fn register<C>(&self, collector: &C) -> Result<(), Error>
    where
        C: Collector + Clone + 'static,
    {
        self.registry.register(Box::new(collector.clone())).context(error::RegisterCollectorSnafu)
    }
}

impl Metrics for DefaultMetrics {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily> { self.registry.gather() }
}
