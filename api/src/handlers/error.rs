//! Mapping of verifier errors onto HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use thiserror::Error;
use validator::ValidationErrors;

use vf_core::{StoreError, VerifierError};
use vf_shared::{error_codes, ErrorResponse};

/// Error type returned by every route handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Verifier(#[from] VerifierError),

    #[error("Invalid request data")]
    Validation(#[from] ValidationErrors),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => error_codes::VALIDATION_ERROR,
            ApiError::Verifier(error) => match error {
                VerifierError::InvalidEmail => error_codes::INVALID_EMAIL,
                VerifierError::InvalidMobileNumber => error_codes::INVALID_MOBILE_NUMBER,
                VerifierError::EmptyEmailBody | VerifierError::EmptySmsBody => {
                    error_codes::EMPTY_BODY
                }
                VerifierError::NotFound { .. } => error_codes::NOT_FOUND,
                VerifierError::MaximumAttemptsExceeded => error_codes::MAXIMUM_ATTEMPTS_EXCEEDED,
                VerifierError::SecretExpired => error_codes::SECRET_EXPIRED,
                VerifierError::InvalidSecret => error_codes::INVALID_SECRET,
                VerifierError::ChannelMismatch { .. } | VerifierError::NotPending { .. } => {
                    error_codes::VALIDATION_ERROR
                }
                VerifierError::Dispatch { .. } => error_codes::DISPATCH_FAILED,
                VerifierError::Store(StoreError::NotFound { .. }) => error_codes::NOT_FOUND,
                VerifierError::Store(_) => error_codes::STORE_UNAVAILABLE,
                VerifierError::InvalidCallbackUrl { .. } => error_codes::INTERNAL_ERROR,
            },
        }
    }

    /// Message safe to show to clients; provider and store details stay in the logs
    fn public_message(&self) -> String {
        match self {
            ApiError::Verifier(VerifierError::Dispatch { channel, .. }) => {
                format!("The {} provider could not deliver the secret", channel)
            }
            ApiError::Verifier(VerifierError::Store(_)) => {
                "Verification storage is unavailable".to_string()
            }
            ApiError::Verifier(VerifierError::InvalidCallbackUrl { .. }) => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Verifier(error) => match error {
                VerifierError::InvalidEmail
                | VerifierError::InvalidMobileNumber
                | VerifierError::EmptyEmailBody
                | VerifierError::EmptySmsBody
                | VerifierError::ChannelMismatch { .. }
                | VerifierError::InvalidSecret => StatusCode::BAD_REQUEST,
                VerifierError::NotFound { .. } => StatusCode::NOT_FOUND,
                VerifierError::NotPending { .. } => StatusCode::CONFLICT,
                VerifierError::SecretExpired => StatusCode::GONE,
                VerifierError::MaximumAttemptsExceeded => StatusCode::TOO_MANY_REQUESTS,
                VerifierError::Dispatch { .. } => StatusCode::BAD_GATEWAY,
                VerifierError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
                VerifierError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                VerifierError::InvalidCallbackUrl { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut body = ErrorResponse::new(self.code(), self.public_message());
        if let ApiError::Validation(errors) = self {
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                body = body.add_detail(field, messages);
            }
        }

        HttpResponse::build(status).json(body)
    }
}

/// Turns malformed JSON bodies into the common error envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string());
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Turns malformed query strings into the common error envelope
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string());
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_core::{Channel, ChannelError, VerificationStatus};

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (VerifierError::InvalidEmail, StatusCode::BAD_REQUEST),
            (VerifierError::InvalidSecret, StatusCode::BAD_REQUEST),
            (
                VerifierError::NotFound {
                    channel: Channel::Email,
                },
                StatusCode::NOT_FOUND,
            ),
            (VerifierError::SecretExpired, StatusCode::GONE),
            (
                VerifierError::MaximumAttemptsExceeded,
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                VerifierError::NotPending {
                    status: VerificationStatus::Verified,
                },
                StatusCode::CONFLICT,
            ),
            (
                VerifierError::Dispatch {
                    channel: Channel::Mobile,
                    source: ChannelError::new("aws-sns", "throttled"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                VerifierError::Store(StoreError::backend("connection reset")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status_code(), expected);
        }
    }

    #[test]
    fn test_provider_details_are_not_exposed() {
        let error = ApiError::from(VerifierError::Dispatch {
            channel: Channel::Mobile,
            source: ChannelError::new("aws-sns", "invalid credentials AKIA123"),
        });

        let message = error.public_message();
        assert!(!message.contains("AKIA123"));
        assert_eq!(error.code(), error_codes::DISPATCH_FAILED);
    }
}
