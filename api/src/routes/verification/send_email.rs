use actix_web::{web, HttpResponse};
use validator::Validate;

use vf_shared::mask_email;

use crate::app::SharedVerifier;
use crate::dto::verification::{SendEmailRequest, VerificationAcceptedResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/verifications/email
///
/// Creates a request and mails a link carrying the secret.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "subject": "Confirm your address" }
/// ```
///
/// # Response
///
/// `202 Accepted` with the request ID and the expiry of the secret.
pub async fn send_email(
    verifier: web::Data<SharedVerifier>,
    payload: web::Json<SendEmailRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    tracing::info!(
        recipient = %mask_email(&payload.email),
        "Processing email verification request"
    );

    let request = verifier
        .new_email(&payload.email, payload.subject.as_deref())
        .await?;

    Ok(HttpResponse::Accepted().json(VerificationAcceptedResponse::from_request(
        &request,
        "Verification email sent",
    )))
}
