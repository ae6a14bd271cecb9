use serde::{Deserialize, Serialize};

/// billing frequency of a lease, spelled the way the gateway spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    #[default]
    #[serde(rename = "every_1_month")]
    Monthly,
    #[serde(rename = "every_2_month")]
    EveryTwoMonths,
    #[serde(rename = "every_3_month")]
    Quarterly,
    #[serde(rename = "every_half_year")]
    SemiAnnual,
    #[serde(rename = "every_year")]
    Annual,
    /// anything the gateway sends that we do not know; billed monthly
    #[serde(other, rename = "unrecognized")]
    Unrecognized,
}

impl Frequency {
    /// months between two consecutive due dates
    pub fn interval_months(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::EveryTwoMonths => 2,
            Frequency::Quarterly => 3,
            Frequency::SemiAnnual => 6,
            Frequency::Annual => 12,
            Frequency::Unrecognized => 1,
        }
    }
}

/// lifecycle of a single installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// generated, not yet paid
    #[default]
    Pending,
    /// gateway confirmed payment
    Paid,
    /// gateway reported failure
    Failed,
}

impl InstallmentStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, InstallmentStatus::Pending)
    }
}

/// outcome of a completed payment session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Paid,
    Failed,
}

impl From<PaymentOutcome> for InstallmentStatus {
    fn from(outcome: PaymentOutcome) -> Self {
        match outcome {
            PaymentOutcome::Paid => InstallmentStatus::Paid,
            PaymentOutcome::Failed => InstallmentStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_wire_names() {
        let parsed: Frequency = serde_json::from_str("\"every_3_month\"").unwrap();
        assert_eq!(parsed, Frequency::Quarterly);
        assert_eq!(serde_json::to_string(&Frequency::SemiAnnual).unwrap(), "\"every_half_year\"");
    }

    #[test]
    fn test_unknown_frequency_bills_monthly() {
        let parsed: Frequency = serde_json::from_str("\"every_fortnight\"").unwrap();
        assert_eq!(parsed, Frequency::Unrecognized);
        assert_eq!(parsed.interval_months(), 1);
    }

    #[test]
    fn test_interval_months() {
        assert_eq!(Frequency::Monthly.interval_months(), 1);
        assert_eq!(Frequency::EveryTwoMonths.interval_months(), 2);
        assert_eq!(Frequency::Quarterly.interval_months(), 3);
        assert_eq!(Frequency::SemiAnnual.interval_months(), 6);
        assert_eq!(Frequency::Annual.interval_months(), 12);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&InstallmentStatus::Pending).unwrap(), "\"pending\"");
        assert!(InstallmentStatus::Paid.is_settled());
        assert!(!InstallmentStatus::Pending.is_settled());
        assert_eq!(InstallmentStatus::from(PaymentOutcome::Failed), InstallmentStatus::Failed);
    }
}
