//! Verification routes
//!
//! All handlers share one [`SharedVerifier`](crate::app::SharedVerifier)
//! through `web::Data`.

pub mod callback;
pub mod resend;
pub mod send_email;
pub mod send_mobile;
pub mod verify;

use actix_web::web;

pub use callback::email_callback;
pub use resend::resend;
pub use send_email::send_email;
pub use send_mobile::send_mobile;
pub use verify::verify;

/// Mount the verification routes on the current scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/verifications")
            .route("/email", web::post().to(send_email))
            .route("/mobile", web::post().to(send_mobile))
            .route("/resend", web::post().to(resend))
            .route("/verify", web::post().to(verify))
            .route("/email/callback", web::get().to(email_callback)),
    );
}
