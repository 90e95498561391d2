//! Composition of the two emails sent for every donation.
//!
//! [`EmailContext`] gathers everything the messages need. It is built fresh
//! for each donation from the request, the resolved team, the organization
//! settings and the current instant.

mod alert;
mod receipt;

use chrono::{DateTime, Datelike, Utc};

pub use self::{alert::alert_body, receipt::ReceiptRenderer};
use crate::{config::Organization, model::DonationRequest, Team};

#[derive(Clone, Debug)]
pub struct EmailContext<'a> {
    pub donation: &'a DonationRequest,
    pub team: Team,
    pub organization: &'a Organization,
    /// "Month Day, Year" in the organization's time zone.
    pub receipt_date: String,
    pub season: String,
}

impl<'a> EmailContext<'a> {
    #[must_use]
    pub fn new(
        donation: &'a DonationRequest,
        team: Team,
        organization: &'a Organization,
        now: DateTime<Utc>,
    ) -> Self {
        let local = now.with_timezone(&organization.time_zone);

        Self {
            donation,
            team,
            organization,
            receipt_date: local.format("%B %-d, %Y").to_string(),
            season: season(&local),
        }
    }

    #[must_use]
    pub fn amount(&self) -> String { format_amount(self.donation.amount.get()) }

    #[must_use]
    pub fn alert_subject(&self) -> String {
        format!("New donation for {}: ${}", self.team, self.amount())
    }

    #[must_use]
    pub fn receipt_subject(&self) -> String {
        format!("Thank you for supporting {}", self.team)
    }
}

/// Formats minor units as a decimal with trailing zeros trimmed:
/// `2500` is `25`, `2550` is `25.5` and `1` is `0.01`.
#[must_use]
pub fn format_amount(minor_units: u64) -> String {
    let (whole, cents) = (minor_units / 100, minor_units % 100);

    if cents == 0 {
        whole.to_string()
    } else if cents % 10 == 0 {
        format!("{whole}.{}", cents / 10)
    } else {
        format!("{whole}.{cents:02}")
    }
}

/// Seasons start in May: before May the season began the previous year.
#[must_use]
pub fn season<D: Datelike>(date: &D) -> String {
    let year = date.year();

    if date.month() < 5 {
        format!("{}-{year}", year - 1)
    } else {
        format!("{year}-{}", year + 1)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use chrono::{NaiveDate, TimeZone};

    use super::*;

    pub(super) fn organization() -> Organization {
        Organization {
            name: "Robotics Boosters".to_string(),
            address: "100 School Ln".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
            phone: "555-0000".to_string(),
            tax_id: "12-3456789".to_string(),
            time_zone: chrono_tz::America::Chicago,
        }
    }

    pub(super) fn donation() -> DonationRequest {
        DonationRequest {
            amount: NonZeroU64::new(2550).unwrap(),
            description: "Iron Owls FRC Robotics Program".to_string(),
            name: "Ada Lovelace".to_string(),
            address_line1: "1 Main St".to_string(),
            address_line2: String::new(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62704".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2500), "25");
        assert_eq!(format_amount(2550), "25.5");
        assert_eq!(format_amount(1), "0.01");
        assert_eq!(format_amount(10), "0.1");
        assert_eq!(format_amount(100_005), "1000.05");
        assert_eq!(format_amount(u64::MAX), "184467440737095516.15");
    }

    #[test]
    fn test_season_boundary() {
        let april = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        let may = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        assert_eq!(season(&april), "2024-2025");
        assert_eq!(season(&may), "2025-2026");
        assert_eq!(season(&NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), "2024-2025");
        assert_eq!(season(&NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()), "2025-2026");
    }

    #[test]
    fn test_context_uses_organization_time_zone() {
        let organization = organization();
        let donation = donation();
        // 03:00 UTC on May 1st is still April 30th in Chicago
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 3, 0, 0).unwrap();

        let context = EmailContext::new(&donation, Team::IronOwls, &organization, now);

        assert_eq!(context.receipt_date, "April 30, 2025");
        assert_eq!(context.season, "2024-2025");
    }

    #[test]
    fn test_context_date_format() {
        let organization = organization();
        let donation = donation();
        let now = Utc.with_ymd_and_hms(2025, 9, 7, 18, 0, 0).unwrap();

        let context = EmailContext::new(&donation, Team::SteelSparrows, &organization, now);

        assert_eq!(context.receipt_date, "September 7, 2025");
        assert_eq!(context.season, "2025-2026");
        assert_eq!(context.amount(), "25.5");
        assert_eq!(context.alert_subject(), "New donation for Steel Sparrows: $25.5");
    }
}
