use donation_metrics::DefaultMetrics;
use prometheus::{IntCounterVec, Opts};

/// Counters of the donation pipeline.
#[derive(Clone, Debug)]
pub struct DonationMetrics {
    intents: IntCounterVec,
    charges: IntCounterVec,
    dispatches: IntCounterVec,
    emails: IntCounterVec,
}

impl DonationMetrics {
    /// # Errors
    ///
    /// Returns an error if a counter descriptor is invalid.
    pub fn new() -> Result<Self, prometheus::Error> {
        let intents = IntCounterVec::new(
            Opts::new("donation_intents_total", "Payment intents requested, by outcome"),
            &["outcome"],
        )?;
        let charges = IntCounterVec::new(
            Opts::new("donation_charges_total", "Charges attempted, by outcome"),
            &["outcome"],
        )?;
        let dispatches = IntCounterVec::new(
            Opts::new("donation_dispatches_total", "Notification dispatches, by outcome"),
            &["outcome"],
        )?;
        let emails = IntCounterVec::new(
            Opts::new("donation_emails_total", "Emails sent, by kind and outcome"),
            &["kind", "outcome"],
        )?;

        Ok(Self { intents, charges, dispatches, emails })
    }

    /// Exposes the counters through `metrics`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counters are already registered.
    pub fn register(&self, metrics: &DefaultMetrics) -> Result<(), donation_metrics::Error> {
        metrics.register(&self.intents)?;
        metrics.register(&self.charges)?;
        metrics.register(&self.dispatches)?;
        metrics.register(&self.emails)
    }

    pub fn record_intent(&self, outcome: &str) { self.intents.with_label_values(&[outcome]).inc(); }

    pub fn record_charge(&self, outcome: &str) { self.charges.with_label_values(&[outcome]).inc(); }

    pub fn record_dispatch(&self, outcome: &str) {
        self.dispatches.with_label_values(&[outcome]).inc();
    }

    pub fn record_email(&self, kind: &str, succeeded: bool) {
        let outcome = if succeeded { "sent" } else { "failed" };
        self.emails.with_label_values(&[kind, outcome]).inc();
    }

    #[cfg(test)]
    pub(crate) fn dispatch_count(&self, outcome: &str) -> u64 {
        self.dispatches.with_label_values(&[outcome]).get()
    }

    #[cfg(test)]
    pub(crate) fn email_count(&self, kind: &str, outcome: &str) -> u64 {
        self.emails.with_label_values(&[kind, outcome]).get()
    }
}
