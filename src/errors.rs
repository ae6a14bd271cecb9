use thiserror::Error;

use crate::types::InstallmentStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway configuration error: {message}")]
    Configuration {
        message: String,
    },

    #[error("gateway authentication failed: status {status}, body {body}")]
    Authentication {
        status: u16,
        body: String,
    },

    #[error("gateway returned status {status}: {body}")]
    Upstream {
        status: u16,
        body: String,
    },

    #[error("gateway response missing `{missing_field}`, keys present: [{}]", .present_keys.join(", "))]
    ResponseShape {
        missing_field: String,
        present_keys: Vec<String>,
    },

    #[error("gateway transport error: {message}")]
    Transport {
        message: String,
    },

    #[error("gateway response could not be decoded: {message}")]
    Decode {
        message: String,
    },

    /// request body could not be built; nothing was sent
    #[error("gateway request could not be encoded: {message}")]
    Encode {
        message: String,
    },

    #[error("profile incomplete: {message}")]
    IncompleteProfile {
        message: String,
    },
}

impl GatewayError {
    /// true for failures that should be reported to the operator rather than the tenant
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::Configuration { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("installment not found: {id}")]
    InstallmentNotFound {
        id: u32,
    },

    #[error("installment {id} already settled as {status:?}")]
    AlreadySettled {
        id: u32,
        status: InstallmentStatus,
    },

    #[error("no pending installment left in schedule")]
    NothingPending,
}

pub type Result<T> = std::result::Result<T, GatewayError>;
