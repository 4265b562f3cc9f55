//! Password-change dialog state.
//!
//! The new/confirm inputs stay locked until the current password has been
//! confirmed against the server. Below the minimum length no check is sent
//! at all and the status falls back to `Unknown`.

/// Minimum trimmed current-password length before a liveness check runs.
pub const MIN_CURRENT_LEN: usize = 4;

/// Result of the last current-password check against the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurrentPasswordStatus {
    /// Too short to check, or no check has completed yet.
    #[default]
    Unknown,
    Verified,
    Rejected,
}

/// Why a password submit was rejected client-side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasswordFormError {
    MissingFields,
    Mismatch,
    CurrentNotVerified,
}

impl PasswordFormError {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordFormError::MissingFields => "All password fields are required",
            PasswordFormError::Mismatch => "New passwords do not match",
            PasswordFormError::CurrentNotVerified => "Confirm your current password first",
        }
    }
}

/// Transient state of the change-password dialog. Cleared on success or
/// when the dialog closes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PasswordChangeAttempt {
    pub current: String,
    pub new: String,
    pub confirm: String,
    status: CurrentPasswordStatus,
}

impl PasswordChangeAttempt {
    /// Update the current-password field. Returns `true` when the value is
    /// long enough that a server check should be issued; otherwise the
    /// status resets to `Unknown` and the dependent fields stay locked.
    pub fn set_current(&mut self, value: String) -> bool {
        self.current = value;
        if self.current.trim().len() < MIN_CURRENT_LEN {
            self.status = CurrentPasswordStatus::Unknown;
            false
        } else {
            true
        }
    }

    /// Record the server's answer for the value that was sent. Ignored if
    /// the field has since changed or dropped below the checkable length,
    /// so a stale response can neither unlock the dialog nor flag a
    /// corrected entry as wrong.
    pub fn record_check(&mut self, checked: &str, verified: bool) {
        if self.current != checked || self.current.trim().len() < MIN_CURRENT_LEN {
            return;
        }
        self.status = if verified {
            CurrentPasswordStatus::Verified
        } else {
            CurrentPasswordStatus::Rejected
        };
    }

    pub fn status(&self) -> CurrentPasswordStatus {
        self.status
    }

    /// The new/confirm inputs unlock only on a confirmed current password.
    pub fn inputs_unlocked(&self) -> bool {
        self.status == CurrentPasswordStatus::Verified
    }

    /// Client-side submit gate, checked in order: current verified, all
    /// fields present, new == confirm.
    pub fn validate(&self) -> Result<(), PasswordFormError> {
        if !self.inputs_unlocked() {
            return Err(PasswordFormError::CurrentNotVerified);
        }
        if self.current.is_empty() || self.new.is_empty() || self.confirm.is_empty() {
            return Err(PasswordFormError::MissingFields);
        }
        if self.new != self.confirm {
            return Err(PasswordFormError::Mismatch);
        }
        Ok(())
    }

    /// Reset every field, on success or dialog close.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_current_password_stays_unknown_and_triggers_no_check() {
        let mut attempt = PasswordChangeAttempt::default();
        assert!(!attempt.set_current("abc".to_string()));
        assert_eq!(attempt.status(), CurrentPasswordStatus::Unknown);
        assert!(!attempt.inputs_unlocked());
    }

    #[test]
    fn status_reflects_the_last_server_answer() {
        let mut attempt = PasswordChangeAttempt::default();
        assert!(attempt.set_current("hunter2".to_string()));

        attempt.record_check("hunter2", false);
        assert_eq!(attempt.status(), CurrentPasswordStatus::Rejected);

        attempt.record_check("hunter2", true);
        assert_eq!(attempt.status(), CurrentPasswordStatus::Verified);
        assert!(attempt.inputs_unlocked());
    }

    #[test]
    fn shrinking_below_minimum_resets_to_unknown_and_blocks_stale_answers() {
        let mut attempt = PasswordChangeAttempt::default();
        attempt.set_current("hunter2".to_string());
        attempt.record_check("hunter2", true);

        attempt.set_current("hu".to_string());
        assert_eq!(attempt.status(), CurrentPasswordStatus::Unknown);

        // A response for the old value arrives late.
        attempt.record_check("hunter2", true);
        assert_eq!(attempt.status(), CurrentPasswordStatus::Unknown);
    }

    #[test]
    fn answer_for_an_outdated_value_is_ignored() {
        let mut attempt = PasswordChangeAttempt::default();
        attempt.set_current("hunter".to_string());
        attempt.set_current("hunter2".to_string());

        // The check for the shorter value resolves after the edit; its
        // rejection must not mark the corrected entry as wrong.
        attempt.record_check("hunter", false);
        assert_eq!(attempt.status(), CurrentPasswordStatus::Unknown);

        attempt.record_check("hunter2", true);
        assert_eq!(attempt.status(), CurrentPasswordStatus::Verified);
    }

    #[test]
    fn validation_order_is_verified_then_presence_then_match() {
        let mut attempt = PasswordChangeAttempt::default();
        attempt.set_current("hunter2".to_string());
        assert_eq!(
            attempt.validate(),
            Err(PasswordFormError::CurrentNotVerified)
        );

        attempt.record_check("hunter2", true);
        assert_eq!(attempt.validate(), Err(PasswordFormError::MissingFields));

        attempt.new = "s3cret-new".to_string();
        attempt.confirm = "s3cret-other".to_string();
        assert_eq!(attempt.validate(), Err(PasswordFormError::Mismatch));

        attempt.confirm = "s3cret-new".to_string();
        assert_eq!(attempt.validate(), Ok(()));
    }

    #[test]
    fn clear_resets_every_field() {
        let mut attempt = PasswordChangeAttempt::default();
        attempt.set_current("hunter2".to_string());
        attempt.record_check("hunter2", true);
        attempt.new = "a".to_string();
        attempt.confirm = "a".to_string();

        attempt.clear();
        assert_eq!(attempt, PasswordChangeAttempt::default());
    }
}
