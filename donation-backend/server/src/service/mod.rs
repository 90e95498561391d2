mod dispatcher;
mod donation;
pub mod error;

pub use self::{
    dispatcher::{DeliveryReport, DispatchError, DispatchHandle, NotificationDispatcher},
    donation::{ChargeOutcome, DonationService},
};
