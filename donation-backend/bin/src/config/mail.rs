use std::time::Duration;

use chrono_tz::Tz;
use donation_backend_core::config::{Organization, TeamAddresses};
use notification::smtp::TlsMode;
use serde::{Deserialize, Serialize};

use super::{non_empty, non_zero_timeout, Error};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Sends the internal alert to the team and finance.
    pub alert_sender: SmtpSenderConfig,

    /// Sends the receipt to the donor.
    pub receipt_sender: SmtpSenderConfig,

    pub finance_address: String,

    pub teams: TeamAddressesConfig,

    pub organization: OrganizationConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SmtpSenderConfig {
    pub host: String,

    #[serde(default = "SmtpSenderConfig::default_port")]
    pub port: u16,

    pub username: String,

    pub password: String,

    pub from_address: String,

    #[serde(default)]
    pub tls: TlsMode,

    #[serde(default = "SmtpSenderConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SmtpSenderConfig {
    #[inline]
    pub const fn default_port() -> u16 { 587 }

    #[inline]
    pub const fn default_timeout_secs() -> u64 { 30 }

    fn into_smtp_config(
        self,
        section: &'static SmtpFieldNames,
    ) -> Result<notification::smtp::Config, Error> {
        let Self { host, port, username, password, from_address, tls, timeout_secs } = self;

        Ok(notification::smtp::Config {
            host: non_empty(section.host, host)?,
            port,
            username: non_empty(section.username, username)?,
            password: non_empty(section.password, password)?,
            from_address: non_empty(section.from_address, from_address)?,
            tls,
            timeout: Duration::from_secs(non_zero_timeout(section.timeout_secs, timeout_secs)?),
        })
    }
}

impl Default for SmtpSenderConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: Self::default_port(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            tls: TlsMode::default(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

struct SmtpFieldNames {
    host: &'static str,
    username: &'static str,
    password: &'static str,
    from_address: &'static str,
    timeout_secs: &'static str,
}

static ALERT_SENDER_FIELDS: SmtpFieldNames = SmtpFieldNames {
    host: "notification.alert_sender.host",
    username: "notification.alert_sender.username",
    password: "notification.alert_sender.password",
    from_address: "notification.alert_sender.from_address",
    timeout_secs: "notification.alert_sender.timeout_secs",
};

static RECEIPT_SENDER_FIELDS: SmtpFieldNames = SmtpFieldNames {
    host: "notification.receipt_sender.host",
    username: "notification.receipt_sender.username",
    password: "notification.receipt_sender.password",
    from_address: "notification.receipt_sender.from_address",
    timeout_secs: "notification.receipt_sender.timeout_secs",
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TeamAddressesConfig {
    pub iron_owls: String,

    pub steel_sparrows: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrganizationConfig {
    pub name: String,

    pub address: String,

    pub city: String,

    pub state: String,

    pub zip: String,

    pub phone: String,

    pub tax_id: String,

    /// IANA name, e.g. `America/Chicago`.
    #[serde(default = "OrganizationConfig::default_time_zone")]
    pub time_zone: Tz,
}

impl OrganizationConfig {
    #[inline]
    pub const fn default_time_zone() -> Tz { Tz::America__Chicago }
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            phone: String::new(),
            tax_id: String::new(),
            time_zone: Self::default_time_zone(),
        }
    }
}

impl TryFrom<NotificationConfig> for donation_backend_core::config::NotificationConfig {
    type Error = Error;

    fn try_from(
        NotificationConfig {
            alert_sender,
            receipt_sender,
            finance_address,
            teams,
            organization,
        }: NotificationConfig,
    ) -> Result<Self, Self::Error> {
        let OrganizationConfig { name, address, city, state, zip, phone, tax_id, time_zone } =
            organization;

        Ok(Self {
            alert_sender: alert_sender.into_smtp_config(&ALERT_SENDER_FIELDS)?,
            receipt_sender: receipt_sender.into_smtp_config(&RECEIPT_SENDER_FIELDS)?,
            finance_address: non_empty("notification.finance_address", finance_address)?,
            teams: TeamAddresses {
                iron_owls: non_empty("notification.teams.iron_owls", teams.iron_owls)?,
                steel_sparrows: non_empty(
                    "notification.teams.steel_sparrows",
                    teams.steel_sparrows,
                )?,
            },
            organization: Organization {
                name: non_empty("notification.organization.name", name)?,
                address: non_empty("notification.organization.address", address)?,
                city: non_empty("notification.organization.city", city)?,
                state: non_empty("notification.organization.state", state)?,
                zip: non_empty("notification.organization.zip", zip)?,
                phone: non_empty("notification.organization.phone", phone)?,
                tax_id: non_empty("notification.organization.tax_id", tax_id)?,
                time_zone,
            },
        })
    }
}
