/// checkout - onboard a tenant and fetch a payment page url
///
/// Needs GATEWAY_INSTITUTION_EMAIL and GATEWAY_INSTITUTION_PASSWORD, and
/// optionally GATEWAY_API_URL, in the environment.
use rent_payments_rs::{
    Frequency, GatewayClient, GatewayConfig, GatewayError, Kyc, OnboardingPayload, TenantRecord,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = GatewayConfig::from_env();
    let client = GatewayClient::from_config(config)?;

    let profile = OnboardingPayload {
        email: "tenant@example.com".into(),
        first_name: "Sam".into(),
        last_name: "Okafor".into(),
        phone_number: "+447700900123".into(),
        date_of_birth: "1999-04-12".into(),
        tenant: vec![TenantRecord {
            post_code: "LS2 9JT".into(),
            address_1: "42 Campus View".into(),
            city: "Leeds".into(),
            country: "GB".into(),
            is_primary: true,
            start_rent_date: "2025-01-01".into(),
            end_rent_date: "2025-12-31".into(),
            rent_due_day: 1,
            amount: "650".into(),
            frequency: Frequency::Monthly,
            is_active: true,
            ..TenantRecord::default()
        }],
        kyc: Kyc {
            status: "pending".into(),
            ..Kyc::default()
        },
        installments: Vec::new(),
    }
    .with_generated_installments();

    match client.checkout(&profile, false).await {
        Ok(outcome) => {
            println!("redirect to: {}", outcome.url);
            println!("onboarded now: {}", outcome.onboarded_now);
        }
        Err(e @ GatewayError::Configuration { .. }) => {
            tracing::error!("{e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
