//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use healthprobe_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const PROBE_ERROR: i32 = 5001;
    pub const SYSTEM_ERROR: i32 = 5002;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Probe(e) => ErrorObjectOwned::owned(code::PROBE_ERROR, e.to_string(), None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::SYSTEM_ERROR, e.to_string(), None::<()>),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthprobe_core::domain::DomainError;
    use healthprobe_core::port::ProbeError;

    #[test]
    fn test_client_mistakes_are_validation_errors() {
        let err = to_rpc_error(AppError::Domain(DomainError::InvalidLevel("deep".into())));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert!(err.message().contains("deep"));

        let err = to_rpc_error(AppError::Validation("bad".into()));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }

    #[test]
    fn test_probe_failures_keep_their_message() {
        let err = to_rpc_error(AppError::Probe(ProbeError::Timeout(250)));
        assert_eq!(err.code(), code::PROBE_ERROR);
        assert_eq!(err.message(), "FAILURE - No response within 250ms");
    }
}
