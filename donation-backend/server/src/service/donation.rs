use std::sync::Arc;

use donation_backend_core::model::{ChargeRequest, DonationRequest};
use payment_gateway::PaymentGateway;
use snafu::ResultExt;

use super::{
    error::{self, Result},
    DispatchHandle, NotificationDispatcher,
};
use crate::metrics::DonationMetrics;

#[derive(Debug)]
pub struct ChargeOutcome {
    pub succeeded: bool,

    /// Present only when the charge succeeded.
    pub dispatch: Option<DispatchHandle>,
}

/// Takes donations through the payment gateway and hands successful ones to
/// the [`NotificationDispatcher`].
#[derive(Clone)]
pub struct DonationService {
    gateway: Arc<dyn PaymentGateway>,
    dispatcher: NotificationDispatcher,
    metrics: DonationMetrics,
}

impl DonationService {
    #[inline]
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        dispatcher: NotificationDispatcher,
        metrics: DonationMetrics,
    ) -> Self {
        Self { gateway, dispatcher, metrics }
    }

    /// Registers a payment intent and returns its client secret. Nothing is
    /// charged and no email is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway fails for any reason.
    pub async fn create_intent(&self, donation: &DonationRequest) -> Result<String> {
        let intent = self
            .gateway
            .create_intent(&donation.to_payment_request())
            .await
            .inspect_err(|err| self.metrics.record_intent(err.kind()))
            .context(error::CreatePaymentIntentSnafu)?;

        self.metrics.record_intent("created");
        Ok(intent.client_secret)
    }

    /// Charges the donation. Gateway failures are logged and reported as an
    /// unsuccessful charge; the notification dispatch starts only after a
    /// paid charge.
    pub async fn charge(&self, request: ChargeRequest) -> ChargeOutcome {
        let ChargeRequest { donation, token } = request;

        match self.gateway.charge(&donation.to_payment_request(), &token).await {
            Ok(charge) if charge.paid => {
                self.metrics.record_charge("paid");
                ChargeOutcome { succeeded: true, dispatch: Some(self.dispatcher.spawn(donation)) }
            }
            Ok(charge) => {
                self.metrics.record_charge("unpaid");
                tracing::warn!(id = %charge.id, "Charge was not paid");
                ChargeOutcome { succeeded: false, dispatch: None }
            }
            Err(err) => {
                self.metrics.record_charge(err.kind());
                tracing::warn!(kind = err.kind(), "Charge failed: {err}");
                ChargeOutcome { succeeded: false, dispatch: None }
            }
        }
    }

    /// Sends the donation emails without charging anything.
    pub fn notify(&self, donation: DonationRequest) -> DispatchHandle {
        self.dispatcher.spawn(donation)
    }
}
