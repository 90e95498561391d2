use std::sync::Arc;

use chrono::{DateTime, Utc};
use donation_backend_core::{
    config::{Organization, TeamAddresses},
    email::{self, EmailContext, ReceiptRenderer},
    model::DonationRequest,
    Team,
};
use notification::{Notification, NotificationClient};
use snafu::{ResultExt, Snafu};
use tokio::task::JoinHandle;

use crate::metrics::DonationMetrics;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DispatchError {
    #[snafu(display("Notification is not configured"))]
    NotConfigured,

    #[snafu(display("No team matches donation description `{description}`"))]
    UnresolvedTeam { description: String },

    #[snafu(display("Failed to render donation receipt, error: {source}"))]
    RenderReceipt { source: donation_backend_core::error::Error },

    #[snafu(display("Dispatch task did not finish, error: {source}"))]
    JoinDispatchTask { source: tokio::task::JoinError },
}

/// Per-message result of a dispatch that got as far as sending.
#[derive(Debug)]
pub struct DeliveryReport {
    pub team: Team,
    pub alert: Result<(), notification::Error>,
    pub receipt: Result<(), notification::Error>,
}

impl DeliveryReport {
    #[must_use]
    pub const fn is_complete(&self) -> bool { self.alert.is_ok() && self.receipt.is_ok() }

    const fn outcome(&self) -> &'static str {
        match (self.alert.is_ok(), self.receipt.is_ok()) {
            (true, true) => "delivered",
            (false, false) => "undelivered",
            _ => "partially_delivered",
        }
    }
}

/// Handle of a background dispatch. Dropping it detaches the task.
#[derive(Debug)]
pub struct DispatchHandle(JoinHandle<Result<DeliveryReport, DispatchError>>);

impl DispatchHandle {
    /// Waits for the dispatch to finish.
    ///
    /// # Errors
    ///
    /// Returns the dispatch error, or [`DispatchError::JoinDispatchTask`] if
    /// the task panicked, e.g. inside a [`NotificationClient`].
    pub async fn join(self) -> Result<DeliveryReport, DispatchError> {
        self.0.await.context(JoinDispatchTaskSnafu)?
    }
}

struct Mailing {
    alert_client: Arc<dyn NotificationClient>,
    receipt_client: Arc<dyn NotificationClient>,
    finance_address: String,
    teams: TeamAddresses,
    organization: Organization,
    renderer: ReceiptRenderer,
}

/// Sends the team alert and the donor receipt of a donation.
#[derive(Clone)]
pub struct NotificationDispatcher {
    mailing: Option<Arc<Mailing>>,
    metrics: DonationMetrics,
}

impl NotificationDispatcher {
    /// # Errors
    ///
    /// Returns an error if the receipt template cannot be loaded.
    pub fn new(
        alert_client: Arc<dyn NotificationClient>,
        receipt_client: Arc<dyn NotificationClient>,
        finance_address: String,
        teams: TeamAddresses,
        organization: Organization,
        metrics: DonationMetrics,
    ) -> Result<Self, donation_backend_core::error::Error> {
        let mailing = Mailing {
            alert_client,
            receipt_client,
            finance_address,
            teams,
            organization,
            renderer: ReceiptRenderer::new()?,
        };
        Ok(Self { mailing: Some(Arc::new(mailing)), metrics })
    }

    /// A dispatcher without mail settings; every dispatch fails as not
    /// configured.
    #[must_use]
    pub const fn unconfigured(metrics: DonationMetrics) -> Self { Self { mailing: None, metrics } }

    /// Runs [`Self::dispatch`] on a background task.
    pub fn spawn(&self, donation: DonationRequest) -> DispatchHandle {
        let dispatcher = self.clone();
        DispatchHandle(tokio::spawn(async move { dispatcher.dispatch(&donation, Utc::now()).await }))
    }

    /// Composes both messages, then sends them concurrently. A failed send
    /// does not stop the other one and is never retried.
    ///
    /// # Errors
    ///
    /// Returns an error, before anything is sent, if mail is not configured,
    /// no team matches the description or the receipt cannot be rendered.
    #[tracing::instrument(skip_all, fields(description = %donation.description))]
    pub async fn dispatch(
        &self,
        donation: &DonationRequest,
        now: DateTime<Utc>,
    ) -> Result<DeliveryReport, DispatchError> {
        let result = self.try_dispatch(donation, now).await;

        match result {
            Ok(ref report) => {
                self.metrics.record_dispatch(report.outcome());
                tracing::info!(
                    team = %report.team,
                    outcome = report.outcome(),
                    "Dispatched donation emails"
                );
            }
            Err(ref err) => {
                let outcome = match err {
                    DispatchError::NotConfigured => "not_configured",
                    DispatchError::UnresolvedTeam { .. } => "unresolved_team",
                    DispatchError::RenderReceipt { .. } => "render_failed",
                    DispatchError::JoinDispatchTask { .. } => "task_failed",
                };
                self.metrics.record_dispatch(outcome);
                tracing::error!("Donation emails are not sent: {err}");
            }
        }

        result
    }

    async fn try_dispatch(
        &self,
        donation: &DonationRequest,
        now: DateTime<Utc>,
    ) -> Result<DeliveryReport, DispatchError> {
        let Some(mailing) = self.mailing.as_deref() else {
            return NotConfiguredSnafu.fail();
        };

        let team = Team::resolve(&donation.description).ok_or_else(|| {
            UnresolvedTeamSnafu { description: donation.description.clone() }.build()
        })?;
        let team_address = mailing.teams.address(team).to_string();

        let context = EmailContext::new(donation, team, &mailing.organization, now);
        let html = mailing.renderer.render(&context).context(RenderReceiptSnafu)?;

        let alert = Notification::DonationAlert {
            to: team_address.clone(),
            cc: vec![mailing.finance_address.clone()],
            subject: context.alert_subject(),
            body: email::alert_body(&context),
        };
        let receipt = Notification::DonationReceipt {
            to: donation.email.clone(),
            bcc: vec![team_address, mailing.finance_address.clone()],
            subject: context.receipt_subject(),
            html,
        };

        let (alert_result, receipt_result) = tokio::join!(
            mailing.alert_client.send_notification(&alert),
            mailing.receipt_client.send_notification(&receipt),
        );

        for (notification, result) in [(&alert, &alert_result), (&receipt, &receipt_result)] {
            self.metrics.record_email(notification.kind(), result.is_ok());
            if let Err(err) = result {
                tracing::warn!(
                    kind = notification.kind(),
                    to = %notification.recipient(),
                    "Failed to deliver donation email: {err}"
                );
            }
        }

        Ok(DeliveryReport { team, alert: alert_result, receipt: receipt_result })
    }
}
