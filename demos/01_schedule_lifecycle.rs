/// schedule lifecycle - settle installments as payments complete
use rent_payments_rs::chrono::NaiveDate;
use rent_payments_rs::{Frequency, LeaseTerm, PaymentOutcome, ScheduleResult};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lease = LeaseTerm::new("2025-01-01", "2025-12-31", 1, "650", Frequency::Quarterly);
    let mut schedule = ScheduleResult::generate(&lease);

    println!("=== {} installments ===", schedule.len());

    // tenant returns from the payment page
    let paid = schedule.mark_first_pending_paid()?;
    println!("installment {paid} paid");

    // a later attempt fails
    schedule.record_outcome(2, PaymentOutcome::Failed)?;

    // settled installments never change again
    if let Err(e) = schedule.record_outcome(2, PaymentOutcome::Paid) {
        println!("rejected: {e}");
    }

    let today = NaiveDate::from_ymd_opt(2025, 5, 1).ok_or("bad date")?;
    for installment in schedule.overdue(today) {
        println!("overdue: #{} due {}", installment.installment_number, installment.due_date);
    }
    if let Some(next) = schedule.next_due(today) {
        println!("next due: {} ({})", next.due_date, next.amount);
    }
    println!("outstanding: {}", schedule.outstanding_amount());

    Ok(())
}
