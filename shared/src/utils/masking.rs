//! Recipient masking for log output

/// Mask a phone number, keeping only the last 4 digits.
///
/// ```
/// use vf_shared::mask_phone_number;
/// assert_eq!(mask_phone_number("+919876543210"), "+********3210");
/// ```
pub fn mask_phone_number(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }

    let visible: String = phone.chars().skip(len - 4).collect();
    if let Some(rest) = phone.strip_prefix('+') {
        format!("+{}{}", "*".repeat(rest.chars().count() - 4), visible)
    } else {
        format!("{}{}", "*".repeat(len - 4), visible)
    }
}

/// Mask the local part of an email address, keeping its first character
/// and the full domain (`j***@example.com`).
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => "***".to_string(),
    }
}

/// Mask either kind of recipient
pub fn mask_recipient(recipient: &str) -> String {
    if recipient.contains('@') {
        mask_email(recipient)
    } else {
        mask_phone_number(recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+1234567890"), "+******7890");
        assert_eq!(mask_phone_number("1234567890"), "******7890");
        assert_eq!(mask_phone_number("123"), "***");
        assert_eq!(mask_phone_number("+1234"), "+1234");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john.doe@example.com"), "j***@example.com");
        assert_eq!(mask_email("@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_mask_recipient() {
        assert_eq!(mask_recipient("hello@example.com"), "h***@example.com");
        assert_eq!(mask_recipient("+919876543210"), "+********3210");
    }
}
