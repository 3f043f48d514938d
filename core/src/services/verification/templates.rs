//! Default message bodies and the email callback URL

use url::{form_urlencoded, Url};

use crate::errors::{VerifierError, VerifierResult};

/// Subject used when neither the caller nor the configuration provides one
pub const FALLBACK_EMAIL_SUBJECT: &str = "Verify your email address";

/// HTML body of the verification email.
/// Placeholders: `{callback_url}`, `{validity}`.
pub const DEFAULT_EMAIL_OTP_PAYLOAD: &str = r#"<html style="background: #fefefe; font-size: 14px; font-family: sans-serif; color: #333;">
<body style="max-width: 780px; margin: 0 auto; padding: 2rem;">
    <div>Hello,</div>
    <p>
        Please click
        <a href="{callback_url}" style="font-weight: 700; text-decoration: underline">here</a>
        to verify your email.
    </p>
    <h5>Note: This link is valid only for {validity}.</h5>
    <p style="margin-top: 3rem; color: #999; font-size: 0.75rem;">
        <em>This is a system generated email, please do not reply to this address.</em>
    </p>
</body>
</html>
"#;

/// SMS body. Placeholders: `{secret}`, `{validity}`.
pub const DEFAULT_SMS_OTP_PAYLOAD: &str =
    "{secret} is the OTP to verify your mobile number. It is valid only for {validity}.";

/// Render the default email body
pub fn email_body(callback_url: &str, validity_secs: u64) -> String {
    DEFAULT_EMAIL_OTP_PAYLOAD
        .replace("{callback_url}", &callback_url.replace('&', "&amp;"))
        .replace("{validity}", &humanize_duration(validity_secs))
}

/// Render the default SMS body
pub fn sms_body(secret: &str, validity_secs: u64) -> String {
    DEFAULT_SMS_OTP_PAYLOAD
        .replace("{secret}", secret)
        .replace("{validity}", &humanize_duration(validity_secs))
}

/// Pick the email subject: caller's, then configured, then the fallback
pub fn resolve_subject<'a>(requested: Option<&'a str>, configured: &'a str) -> &'a str {
    match requested.map(str::trim) {
        Some(subject) if !subject.is_empty() => subject,
        _ if !configured.trim().is_empty() => configured.trim(),
        _ => FALLBACK_EMAIL_SUBJECT,
    }
}

/// Render a number of seconds for humans, e.g. `1 hour 30 minutes`
pub fn humanize_duration(total_secs: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (86_400, "day"),
        (3_600, "hour"),
        (60, "minute"),
        (1, "second"),
    ];

    if total_secs == 0 {
        return "0 seconds".to_string();
    }

    let mut remaining = total_secs;
    let mut parts = Vec::new();
    for (unit_secs, name) in UNITS {
        let count = remaining / unit_secs;
        if count > 0 {
            remaining %= unit_secs;
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", count, name, plural));
        }
    }

    parts.join(" ")
}

/// Check that a callback base URL is absolute and parseable
pub fn validate_callback_base(base: &str) -> VerifierResult<Url> {
    Url::parse(base.trim()).map_err(|e| VerifierError::InvalidCallbackUrl {
        message: e.to_string(),
    })
}

/// Append `email` and `secret` to the callback base URL
///
/// Existing query pairs are kept. All pairs are ordered by key and
/// form-urlencoded, so the output is deterministic. The base's scheme, host
/// and path are kept exactly as written and the fragment is preserved.
pub fn build_callback_url(base: &str, email: &str, secret: &str) -> VerifierResult<String> {
    let base = base.trim();
    let parsed = validate_callback_base(base)?;

    let mut pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    pairs.push(("email".to_string(), email.to_string()));
    pairs.push(("secret".to_string(), secret.to_string()));
    // Stable sort: repeated keys keep their relative order
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish();

    let prefix_end = base.find(|c| c == '?' || c == '#').unwrap_or(base.len());
    let fragment = parsed
        .fragment()
        .map(|f| format!("#{}", f))
        .unwrap_or_default();

    Ok(format!("{}?{}{}", &base[..prefix_end], query, fragment))
}
