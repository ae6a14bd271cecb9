use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::decimal::normalize_amount_str;
use crate::schedule::{Installment, LeaseTerm, ScheduleResult};

/// highest recurring due day; every month has one
pub const MAX_DUE_DAY: u32 = 28;

/// clamp a due day into 1..=28
pub fn clamp_due_day(due_day: i32) -> u32 {
    due_day.clamp(1, MAX_DUE_DAY as i32) as u32
}

/// turn lease terms into an ordered installment list
///
/// Invalid dates or a start that is not before the end give an empty schedule,
/// which callers read as "nothing due yet".
pub fn generate_schedule(term: &LeaseTerm) -> ScheduleResult {
    let property_name = term.property_label();

    let Some((start, end)) = term.parse_dates() else {
        debug!(
            start_date = %term.start_date,
            end_date = %term.end_date,
            "lease dates did not parse, empty schedule"
        );
        return ScheduleResult::empty(property_name);
    };

    if start >= end {
        debug!(%start, %end, "lease start not before end, empty schedule");
        return ScheduleResult::empty(property_name);
    }

    let interval = term.frequency.interval_months();
    let day = clamp_due_day(term.due_day);
    let amount = normalize_amount_str(&term.amount);

    let Some(mut current) = NaiveDate::from_ymd_opt(start.year(), start.month(), day) else {
        return ScheduleResult::empty(property_name);
    };

    // roll forward to the first due date inside the lease
    while current < start && current <= end {
        match add_months(current, interval, day) {
            Some(next) => current = next,
            None => return ScheduleResult::empty(property_name),
        }
    }

    let mut installments = Vec::new();
    let mut next_id = 1;

    while current <= end {
        let installment_number = installments.len() as u32 + 1;
        installments.push(Installment::pending(
            next_id,
            installment_number,
            current,
            amount.clone(),
        ));
        next_id += 1;

        match add_months(current, interval, day) {
            Some(next) => current = next,
            None => break,
        }
    }

    debug!(
        count = installments.len(),
        interval_months = interval,
        due_day = day,
        "generated schedule"
    );

    ScheduleResult {
        installments,
        property_name,
    }
}

/// add months to date, pinning the day of month again
fn add_months(date: NaiveDate, months: u32, day: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))?
        .with_day(day.min(MAX_DUE_DAY))
}
