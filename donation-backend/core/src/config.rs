use std::{fmt::Debug, net::SocketAddr};

use chrono_tz::Tz;

use crate::Team;

#[derive(Clone, Debug)]
pub struct Config {
    pub web: WebConfig,

    pub metrics: MetricsConfig,

    pub payment_gateway: payment_gateway::stripe::Config,

    /// Without it payments are still taken, but no email is ever sent.
    pub notification: Option<NotificationConfig>,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enable: bool,

    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct NotificationConfig {
    /// Identity used for the internal donation alert.
    pub alert_sender: notification::smtp::Config,

    /// Identity used for the donor receipt.
    pub receipt_sender: notification::smtp::Config,

    pub finance_address: String,

    pub teams: TeamAddresses,

    pub organization: Organization,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TeamAddresses {
    pub iron_owls: String,

    pub steel_sparrows: String,
}

impl TeamAddresses {
    #[must_use]
    pub fn address(&self, team: Team) -> &str {
        match team {
            Team::IronOwls => &self.iron_owls,
            Team::SteelSparrows => &self.steel_sparrows,
        }
    }
}

/// The organization issuing receipts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Organization {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub tax_id: String,

    /// Time zone the receipt date and season are computed in.
    pub time_zone: Tz,
}
