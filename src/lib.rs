pub mod config;
pub mod decimal;
pub mod errors;
pub mod gateway;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::GatewayConfig;
pub use decimal::{normalize_amount, normalize_amount_str, normalize_amounts_deep, Money};
pub use errors::{GatewayError, Result, ScheduleError};
pub use gateway::{
    rewrite_redirect_url, CheckoutOutcome, GatewayClient, GatewayResponse, GatewayToken,
    GatewayTransport, Kyc, OnboardingPayload, ReqwestTransport, TenantRecord, TokenCache,
};
pub use schedule::{generate_schedule, Installment, LeaseTerm, PropertyAddress, ScheduleResult};
pub use types::{Frequency, InstallmentStatus, PaymentOutcome};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
