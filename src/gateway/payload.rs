use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decimal::normalize_amounts_deep;
use crate::errors::{GatewayError, Result};
use crate::schedule::{Installment, LeaseTerm, PropertyAddress, ScheduleResult};
use crate::types::Frequency;

/// one tenancy as the gateway models it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TenantRecord {
    pub post_code: String,
    pub address_1: String,
    pub city: String,
    pub country: String,
    pub is_primary: bool,
    pub start_rent_date: String,
    pub end_rent_date: String,
    pub rent_due_day: i32,
    pub amount: String,
    pub frequency: Frequency,
    pub is_active: bool,
    pub payment_reference: String,
    pub recipient_bank_sort_code: String,
    pub recipient_bank_account_number: String,
    pub recipient_bank_account_name: String,
    pub agreement: String,
}

impl TenantRecord {
    /// rent terms of this tenancy
    pub fn lease_term(&self) -> LeaseTerm {
        LeaseTerm::new(
            self.start_rent_date.clone(),
            self.end_rent_date.clone(),
            self.rent_due_day,
            self.amount.clone(),
            self.frequency,
        )
        .with_address(PropertyAddress {
            address_1: Some(self.address_1.clone()),
            city: Some(self.city.clone()),
        })
    }
}

/// identity documents, references to uploaded files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Kyc {
    pub photo: Option<String>,
    pub pii_front: Option<String>,
    pub pii_back: Option<String>,
    pub status: String,
}

/// tenant profile sent to the onboarding endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OnboardingPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub tenant: Vec<TenantRecord>,
    #[serde(default)]
    pub kyc: Kyc,
    #[serde(default)]
    pub installments: Vec<Installment>,
}

impl OnboardingPayload {
    /// the primary tenancy, else the first one
    pub fn primary_tenant(&self) -> Option<&TenantRecord> {
        self.tenant
            .iter()
            .find(|t| t.is_primary)
            .or_else(|| self.tenant.first())
    }

    /// schedule for the primary tenancy, empty when there is none
    pub fn schedule(&self) -> ScheduleResult {
        match self.primary_tenant() {
            Some(tenant) => ScheduleResult::generate(&tenant.lease_term()),
            None => ScheduleResult::empty(crate::schedule::UNKNOWN_PROPERTY),
        }
    }

    /// attach the primary tenancy's generated installments
    pub fn with_generated_installments(mut self) -> Self {
        self.installments = self.schedule().installments;
        self
    }

    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// wire body, every `amount` field rewritten to two decimals
    pub fn to_wire(&self) -> Result<Value> {
        encode_body("onboarding payload", self).map(normalize_amounts_deep)
    }
}

fn encode_body<T: Serialize>(what: &str, body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| GatewayError::Encode {
        message: format!("{what}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstallmentStatus;

    fn sample_tenant(amount: &str, is_primary: bool) -> TenantRecord {
        TenantRecord {
            post_code: "LS2 9JT".into(),
            address_1: "42 Campus View".into(),
            city: "Leeds".into(),
            country: "GB".into(),
            is_primary,
            start_rent_date: "2025-01-01".into(),
            end_rent_date: "2025-05-01".into(),
            rent_due_day: 1,
            amount: amount.into(),
            frequency: Frequency::Monthly,
            is_active: true,
            payment_reference: "BH-001".into(),
            recipient_bank_sort_code: "040004".into(),
            recipient_bank_account_number: "12345678".into(),
            recipient_bank_account_name: "Best Homes Ltd".into(),
            agreement: "agreement.pdf".into(),
        }
    }

    fn sample_payload() -> OnboardingPayload {
        OnboardingPayload {
            email: "tenant@example.com".into(),
            first_name: "Sam".into(),
            last_name: "Okafor".into(),
            phone_number: "+447700900123".into(),
            date_of_birth: "1999-04-12".into(),
            tenant: vec![sample_tenant("650", false), sample_tenant("700.5", true)],
            kyc: Kyc {
                photo: None,
                pii_front: Some("front.jpg".into()),
                pii_back: None,
                status: "pending".into(),
            },
            installments: Vec::new(),
        }
    }

    #[test]
    fn test_primary_tenant() {
        let payload = sample_payload();
        assert_eq!(payload.primary_tenant().unwrap().amount, "700.5");

        let mut no_primary = sample_payload();
        no_primary.tenant.iter_mut().for_each(|t| t.is_primary = false);
        assert_eq!(no_primary.primary_tenant().unwrap().amount, "650");

        assert!(OnboardingPayload::default().primary_tenant().is_none());
    }

    #[test]
    fn test_lease_term_projection() {
        let term = sample_tenant("650", true).lease_term();
        assert_eq!(term.start_date, "2025-01-01");
        assert_eq!(term.due_day, 1);
        assert_eq!(term.property_label(), "42 Campus View, Leeds");
    }

    #[test]
    fn test_generated_installments() {
        let payload = sample_payload().with_generated_installments();
        assert_eq!(payload.installments.len(), 5);
        assert!(payload
            .installments
            .iter()
            .all(|i| i.amount == "700.50" && i.status == InstallmentStatus::Pending));
    }

    #[test]
    fn test_wire_amounts_are_two_decimal() {
        let wire = sample_payload().with_generated_installments().to_wire().unwrap();

        assert_eq!(wire["tenant"][0]["amount"], "650.00");
        assert_eq!(wire["tenant"][1]["amount"], "700.50");
        assert_eq!(wire["tenant"][1]["frequency"], "every_1_month");
        assert_eq!(wire["installments"][0]["amount"], "700.50");
        assert_eq!(wire["installments"][0]["due_date"], "2025-01-01");
        assert_eq!(wire["kyc"]["photo"], Value::Null);
        assert_eq!(wire["email"], "tenant@example.com");
    }

    #[test]
    fn test_encode_failure_is_not_a_decode_error() {
        let mut body = std::collections::HashMap::new();
        body.insert((1u8, 2u8), "not a string key");

        let err = encode_body("onboarding payload", &body).unwrap_err();
        match err {
            GatewayError::Encode { message } => assert!(message.starts_with("onboarding payload: ")),
            other => panic!("expected Encode, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_lists_default_empty() {
        let payload: OnboardingPayload = serde_json::from_str(
            r#"{"email":"a@b.c","first_name":"A","last_name":"B","phone_number":"1","date_of_birth":"2000-01-01"}"#,
        )
        .unwrap();
        assert!(payload.tenant.is_empty());
        assert!(payload.installments.is_empty());
        assert!(payload.has_email());
        assert!(payload.schedule().is_empty());
    }
}
