/// quick start - generate a rent schedule from lease terms
use rent_payments_rs::{generate_schedule, Frequency, LeaseTerm, PropertyAddress};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a monthly lease, rent due on the 31st (billed on the 28th)
    let lease = LeaseTerm::new("2025-01-15", "2025-05-15", 31, "750", Frequency::Monthly)
        .with_address(PropertyAddress::new("42 Campus View", "Leeds"));

    let schedule = generate_schedule(&lease);

    println!("{}", schedule.to_json_pretty()?);
    println!("total rent: {}", schedule.total_amount());

    Ok(())
}
