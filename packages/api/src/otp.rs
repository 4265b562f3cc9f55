//! One-time codes for email-change confirmation.
//!
//! A pending change is a single row per user in `pending_email_changes`;
//! issuing a new code upserts that row, so at most one change can ever be
//! in flight. The server-side expiry here is independent of the client's
//! cosmetic countdown — this check is what actually decides validity.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

/// Digits in an issued code.
pub const OTP_LEN: usize = 6;

/// Server-side lifetime of an issued code.
pub const OTP_TTL_MINUTES: i64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("No pending email change for this account")]
    NotFound,
    #[error("The code was issued for a different email address")]
    WrongEmail,
    #[error("The code has expired — request a new one")]
    Expired,
    #[error("Incorrect verification code")]
    Mismatch,
}

/// The stored half of a pending email change.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCode {
    pub new_email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a zero-padded numeric code.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

/// Expiry timestamp for a code issued at `now`.
pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_TTL_MINUTES)
}

/// Check a submitted `(email, code)` pair against the stored pending
/// change. Order matters: a stale target email is reported before expiry,
/// expiry before a plain mismatch.
pub fn validate(
    pending: &PendingCode,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<(), OtpError> {
    if !pending.new_email.eq_ignore_ascii_case(email.trim()) {
        return Err(OtpError::WrongEmail);
    }
    if now > pending.expires_at {
        return Err(OtpError::Expired);
    }
    if pending.code != code.trim() {
        return Err(OtpError::Mismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(now: DateTime<Utc>) -> PendingCode {
        PendingCode {
            new_email: "b@x.com".to_string(),
            code: "123456".to_string(),
            expires_at: expiry_from(now),
        }
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn matching_code_within_ttl_is_accepted() {
        let now = Utc::now();
        let p = pending(now);
        assert_eq!(validate(&p, "b@x.com", "123456", now), Ok(()));
        assert_eq!(validate(&p, " B@X.COM ", " 123456 ", now), Ok(()));
    }

    #[test]
    fn expired_code_is_rejected() {
        let now = Utc::now();
        let p = pending(now);
        let later = now + Duration::minutes(OTP_TTL_MINUTES + 1);
        assert_eq!(validate(&p, "b@x.com", "123456", later), Err(OtpError::Expired));
    }

    #[test]
    fn wrong_email_reported_before_wrong_code() {
        let now = Utc::now();
        let p = pending(now);
        assert_eq!(
            validate(&p, "c@x.com", "000000", now),
            Err(OtpError::WrongEmail)
        );
        assert_eq!(
            validate(&p, "b@x.com", "000000", now),
            Err(OtpError::Mismatch)
        );
    }
}
