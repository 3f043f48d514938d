use actix_web::{web, HttpResponse};
use validator::Validate;

use vf_shared::mask_phone_number;

use crate::app::SharedVerifier;
use crate::dto::verification::{SendMobileRequest, VerificationAcceptedResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/verifications/mobile
///
/// Creates a request and texts a numeric OTP to the number.
pub async fn send_mobile(
    verifier: web::Data<SharedVerifier>,
    payload: web::Json<SendMobileRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    tracing::info!(
        recipient = %mask_phone_number(&payload.mobile),
        "Processing mobile verification request"
    );

    let request = verifier.new_mobile(&payload.mobile).await?;

    Ok(HttpResponse::Accepted().json(VerificationAcceptedResponse::from_request(
        &request,
        "Verification code sent",
    )))
}
