use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::SharedVerifier;
use crate::dto::verification::{VerificationResultResponse, VerifyRequest};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/verifications/verify
///
/// # Request Body
///
/// ```json
/// { "channel": "mobile", "recipient": "+15555550100", "secret": "123456" }
/// ```
///
/// # Response
///
/// `200 OK` with `"status": "verified"` on success. A wrong secret answers
/// `400` and counts against the attempt budget; an expired secret `410`;
/// an exhausted budget `429`.
pub async fn verify(
    verifier: web::Data<SharedVerifier>,
    payload: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    let request = verifier
        .verify_secret(payload.channel, &payload.recipient, &payload.secret)
        .await?;

    Ok(HttpResponse::Ok().json(VerificationResultResponse::from(&request)))
}
