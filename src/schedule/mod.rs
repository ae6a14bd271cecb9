pub mod generator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::ScheduleError;
use crate::types::{Frequency, InstallmentStatus, PaymentOutcome};

pub use generator::{clamp_due_day, generate_schedule, MAX_DUE_DAY};

pub const UNKNOWN_PROPERTY: &str = "Unknown Property";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// address fields a property label is derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PropertyAddress {
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl PropertyAddress {
    pub fn new(address_1: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            address_1: Some(address_1.into()),
            city: Some(city.into()),
        }
    }

    /// "address, city", whichever half exists, or the placeholder
    pub fn label(&self) -> String {
        let address = self.address_1.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let city = self.city.as_deref().map(str::trim).filter(|s| !s.is_empty());

        match (address, city) {
            (Some(a), Some(c)) => format!("{a}, {c}"),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => UNKNOWN_PROPERTY.to_string(),
        }
    }
}

/// agreed rent terms a schedule is generated from
///
/// Dates and amount stay as the caller supplied them; anything that fails to
/// parse degrades the schedule to empty instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTerm {
    /// ISO calendar date, `YYYY-MM-DD`
    pub start_date: String,
    /// ISO calendar date, inclusive
    pub end_date: String,
    /// 1..=31, clamped to 28 when generating
    pub due_day: i32,
    pub amount: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub address: PropertyAddress,
}

impl LeaseTerm {
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        due_day: i32,
        amount: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            due_day,
            amount: amount.into(),
            frequency,
            address: PropertyAddress::default(),
        }
    }

    pub fn with_address(mut self, address: PropertyAddress) -> Self {
        self.address = address;
        self
    }

    /// start and end as dates, none if either fails to parse
    pub fn parse_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(self.end_date.trim(), DATE_FORMAT).ok()?;
        Some((start, end))
    }

    pub fn property_label(&self) -> String {
        self.address.label()
    }
}

/// one scheduled rent payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// sequence id, gapless from 1 in generation order
    pub id: u32,
    pub installment_number: u32,
    pub due_date: NaiveDate,
    /// two-decimal text
    pub amount: String,
    pub status: InstallmentStatus,
}

impl Installment {
    pub fn pending(id: u32, installment_number: u32, due_date: NaiveDate, amount: String) -> Self {
        Self {
            id,
            installment_number,
            due_date,
            amount,
            status: InstallmentStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InstallmentStatus::Pending
    }

    pub fn amount_money(&self) -> Money {
        Money::parse_lossy(&self.amount)
    }

    /// move out of pending; a settled installment never changes again
    pub fn settle(&mut self, outcome: PaymentOutcome) -> Result<(), ScheduleError> {
        if self.status.is_settled() {
            return Err(ScheduleError::AlreadySettled {
                id: self.id,
                status: self.status,
            });
        }
        self.status = outcome.into();
        Ok(())
    }

    pub fn mark_paid(&mut self) -> Result<(), ScheduleError> {
        self.settle(PaymentOutcome::Paid)
    }

    pub fn mark_failed(&mut self) -> Result<(), ScheduleError> {
        self.settle(PaymentOutcome::Failed)
    }
}

/// generated schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// ascending by due date, installment_number == index + 1
    pub installments: Vec<Installment>,
    pub property_name: String,
}

impl ScheduleResult {
    /// generate the schedule for a lease, never fails
    pub fn generate(term: &LeaseTerm) -> Self {
        generate_schedule(term)
    }

    pub fn empty(property_name: impl Into<String>) -> Self {
        Self {
            installments: Vec::new(),
            property_name: property_name.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn get(&self, id: u32) -> Option<&Installment> {
        self.installments.iter().find(|i| i.id == id)
    }

    /// earliest installment still pending
    pub fn first_pending(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| i.is_pending())
    }

    /// earliest pending installment due on or after `on`
    pub fn next_due(&self, on: NaiveDate) -> Option<&Installment> {
        self.installments
            .iter()
            .find(|i| i.is_pending() && i.due_date >= on)
    }

    /// pending installments due strictly before `on`
    pub fn overdue(&self, on: NaiveDate) -> impl Iterator<Item = &Installment> {
        self.installments
            .iter()
            .filter(move |i| i.is_pending() && i.due_date < on)
    }

    /// apply a payment outcome to one installment
    pub fn record_outcome(&mut self, id: u32, outcome: PaymentOutcome) -> Result<(), ScheduleError> {
        self.installments
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(ScheduleError::InstallmentNotFound { id })?
            .settle(outcome)
    }

    /// mark the earliest pending installment paid, returning its id
    pub fn mark_first_pending_paid(&mut self) -> Result<u32, ScheduleError> {
        let installment = self
            .installments
            .iter_mut()
            .find(|i| i.is_pending())
            .ok_or(ScheduleError::NothingPending)?;
        installment.mark_paid()?;
        Ok(installment.id)
    }

    pub fn total_amount(&self) -> Money {
        self.installments.iter().map(Installment::amount_money).sum()
    }

    /// sum of everything not yet paid, failed installments included
    pub fn outstanding_amount(&self) -> Money {
        self.installments
            .iter()
            .filter(|i| i.status != InstallmentStatus::Paid)
            .map(Installment::amount_money)
            .sum()
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
