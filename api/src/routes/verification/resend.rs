use actix_web::{web, HttpResponse};
use validator::Validate;

use vf_shared::mask_recipient;

use crate::app::SharedVerifier;
use crate::dto::verification::{ResendRequest, VerificationAcceptedResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/verifications/resend
///
/// Sends the latest pending secret again. The secret itself is not
/// regenerated, so the expiry set at creation still applies.
pub async fn resend(
    verifier: web::Data<SharedVerifier>,
    payload: web::Json<ResendRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    tracing::info!(
        channel = %payload.channel,
        recipient = %mask_recipient(&payload.recipient),
        "Processing resend request"
    );

    let request = verifier.resend(payload.channel, &payload.recipient).await?;

    Ok(HttpResponse::Accepted().json(VerificationAcceptedResponse::from_request(
        &request,
        "Verification resent",
    )))
}
