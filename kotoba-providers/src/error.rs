//! Conversions from transport errors into core errors

use kotoba_core::Error as CoreError;

/// Convert a non-success HTTP status into a core error
///
/// 401 and 403 become [`CoreError::Authentication`]; everything else is a
/// [`CoreError::Provider`] carrying the status.
pub fn status_error(provider: impl Into<String>, status: u16, body: impl Into<String>) -> CoreError {
    let body = body.into();
    match status {
        401 | 403 => CoreError::Authentication(format!("HTTP {}: {}", status, body)),
        _ => CoreError::Provider {
            provider: provider.into(),
            status,
            message: body,
        },
    }
}

/// Convert network errors to core errors
pub fn network_error(error: reqwest::Error) -> CoreError {
    CoreError::Network {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Convert a response body that failed to decode into a core error
pub fn malformed_response(error: &serde_json::Error) -> CoreError {
    CoreError::malformed(format!("response body is not a completion: {}", error))
}
