use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::SharedVerifier;
use crate::dto::verification::{EmailCallbackQuery, VerificationResultResponse};
use crate::handlers::ApiError;

/// Handler for GET /api/v1/verifications/email/callback
///
/// Target of the link in verification emails; `email` and `secret` arrive
/// form-urlencoded in the query string.
pub async fn email_callback(
    verifier: web::Data<SharedVerifier>,
    query: web::Query<EmailCallbackQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    query.validate()?;

    let request = verifier
        .verify_email_secret(&query.email, &query.secret)
        .await?;

    Ok(HttpResponse::Ok().json(VerificationResultResponse::from(&request)))
}
