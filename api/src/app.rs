//! Application factory
//!
//! Builds the actix-web `App` around a shared verifier. Request tracing
//! middleware is added by the binary so tests get the bare app.

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};

use vf_core::{EmailChannel, MobileChannel, VerificationStore, Verifier};
use vf_shared::{error_codes, ErrorResponse};

use crate::handlers::{json_error_handler, query_error_handler};
use crate::routes::{health::health_check, verification};

/// Verifier over whichever backends were configured at startup
pub type SharedVerifier = Verifier<dyn VerificationStore, dyn EmailChannel, dyn MobileChannel>;

/// Create the application with all routes
pub fn create_app(
    verifier: web::Data<SharedVerifier>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(verifier)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/health", web::get().to(health_check))
        .service(web::scope("/api/v1").configure(verification::configure))
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
