// API input and output of the donation endpoints.

use std::num::NonZeroU64;

use payment_gateway::{Address, Customer, PaymentRequest};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use utoipa::ToSchema;

/// A donation as submitted by the donation form.
///
/// Every field is required except `addressLine2`, which defaults to the empty
/// string. Field contents are not validated beyond presence.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    /// Amount in minor currency units (cents).
    #[schema(value_type = u64, minimum = 1, example = 2500)]
    pub amount: NonZeroU64,

    /// Free text naming the team the donation is meant for.
    #[schema(example = "Iron Owls FRC Robotics Program")]
    pub description: String,

    pub name: String,

    pub address_line1: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub address_line2: String,

    pub city: String,

    pub state: String,

    pub postal_code: String,

    pub email: String,

    pub phone: String,
}

impl DonationRequest {
    #[must_use]
    pub fn to_payment_request(&self) -> PaymentRequest {
        PaymentRequest {
            amount: self.amount.get(),
            description: self.description.clone(),
            customer: Customer {
                name: self.name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                address: Address {
                    line1: self.address_line1.clone(),
                    line2: self.address_line2.clone(),
                    city: self.city.clone(),
                    state: self.state.clone(),
                    postal_code: self.postal_code.clone(),
                },
            },
        }
    }
}

/// A donation together with the card token collected by the browser.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub struct ChargeRequest {
    #[serde(flatten)]
    pub donation: DonationRequest,

    /// Payment method token.
    pub token: String,
}

impl From<ChargeRequest> for DonationRequest {
    fn from(request: ChargeRequest) -> Self { request.donation }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub struct IntentResponse {
    /// Client secret of the created payment intent.
    pub secret: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub struct ChargeResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn donation_json() -> serde_json::Value {
        json!({
            "amount": 2500,
            "description": "Iron Owls FRC Robotics Program",
            "name": "Ada Lovelace",
            "addressLine1": "1 Main St",
            "addressLine2": "Suite 2",
            "city": "Springfield",
            "state": "IL",
            "postalCode": "62701",
            "email": "ada@example.com",
            "phone": "555-0100"
        })
    }

    #[test]
    fn test_decode_donation_request() {
        let request: DonationRequest = serde_json::from_value(donation_json()).unwrap();

        assert_eq!(request.amount.get(), 2500);
        assert_eq!(request.address_line1, "1 Main St");
        assert_eq!(request.address_line2, "Suite 2");
        assert_eq!(request.postal_code, "62701");
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        let mut value = donation_json();
        let _amount = value.as_object_mut().unwrap().remove("amount");

        assert!(serde_json::from_value::<DonationRequest>(value).is_err());
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let mut value = donation_json();
        value["amount"] = json!(0);

        assert!(serde_json::from_value::<DonationRequest>(value).is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut value = donation_json();
        value["amount"] = json!("25.00");

        assert!(serde_json::from_value::<DonationRequest>(value).is_err());
    }

    #[test]
    fn test_null_field_is_rejected() {
        let mut value = donation_json();
        value["email"] = serde_json::Value::Null;

        assert!(serde_json::from_value::<DonationRequest>(value).is_err());
    }

    #[test]
    fn test_address_line2_is_optional() {
        let mut value = donation_json();
        let _line2 = value.as_object_mut().unwrap().remove("addressLine2");
        let request: DonationRequest = serde_json::from_value(value).unwrap();
        assert_eq!(request.address_line2, "");

        let mut value = donation_json();
        value["addressLine2"] = serde_json::Value::Null;
        let request: DonationRequest = serde_json::from_value(value).unwrap();
        assert_eq!(request.address_line2, "");
    }

    #[test]
    fn test_empty_strings_are_accepted() {
        let mut value = donation_json();
        value["name"] = json!("");
        value["phone"] = json!("");

        let request: DonationRequest = serde_json::from_value(value).unwrap();
        assert!(request.name.is_empty());
    }

    #[test]
    fn test_charge_request_drops_token() {
        let mut value = donation_json();
        value["token"] = json!("tok_visa");

        let request: ChargeRequest = serde_json::from_value(value).unwrap();
        assert_eq!(request.token, "tok_visa");

        let donation = DonationRequest::from(request);
        assert_eq!(donation, serde_json::from_value::<DonationRequest>(donation_json()).unwrap());
    }

    #[test]
    fn test_charge_request_requires_token() {
        assert!(serde_json::from_value::<ChargeRequest>(donation_json()).is_err());
    }

    #[test]
    fn test_to_payment_request() {
        let request: DonationRequest = serde_json::from_value(donation_json()).unwrap();
        let payment = request.to_payment_request();

        assert_eq!(payment.amount, 2500);
        assert_eq!(payment.customer.email, "ada@example.com");
        assert_eq!(payment.customer.address.line2, "Suite 2");
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(
            serde_json::to_value(ChargeResponse { success: true }).unwrap(),
            json!({ "success": true })
        );
        assert_eq!(
            serde_json::to_value(IntentResponse { secret: "pi_1_secret".to_string() }).unwrap(),
            json!({ "secret": "pi_1_secret" })
        );
    }
}
