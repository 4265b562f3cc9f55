//! The email-change verification state machine.
//!
//! After the server accepts a new email address it issues a one-time code
//! and the UI enters a bounded entry window. The machine has two concrete
//! states: `Idle` and `CodeIssued`. Verified and cancelled both collapse
//! back to `Idle`; expiry is `CodeIssued` with an exhausted countdown,
//! recoverable only through a resend. The countdown is client-clock
//! backpressure — the server's verification response stays the source of
//! truth for code validity.

/// Entry window, in countdown ticks (one tick per second in the UI).
pub const CODE_WINDOW_TICKS: u32 = 30;

/// Minimum entered-code length before a verify attempt is sent.
pub const MIN_CODE_LEN: usize = 6;

/// Why a verify attempt was rejected without a network call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyReject {
    /// No code has been issued.
    NotIssued,
    /// The entered code is shorter than [`MIN_CODE_LEN`].
    CodeTooShort,
    /// The countdown reached zero; the code is considered dead.
    Expired,
}

impl VerifyReject {
    pub fn message(&self) -> &'static str {
        match self {
            VerifyReject::NotIssued => "No verification code has been requested",
            VerifyReject::CodeTooShort => "Enter the 6-digit code from your email",
            VerifyReject::Expired => "The code has expired — request a new one",
        }
    }
}

/// State of the email-change verification sub-flow.
///
/// At most one verification is active at a time; issuing a new code
/// replaces any prior state wholesale, which also invalidates any running
/// countdown (the owner must restart its timer task on every issuance).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EmailVerification {
    #[default]
    Idle,
    CodeIssued {
        /// The email address awaiting confirmation. The confirmed snapshot
        /// keeps the old address until verification succeeds.
        target_email: String,
        /// Remaining ticks in the entry window.
        remaining: u32,
        /// The code typed so far.
        code: String,
        /// Last server rejection, shown inline.
        last_error: Option<String>,
    },
}

impl EmailVerification {
    /// Server accepted a new email and issued a code: enter `CodeIssued`
    /// with a fresh window. Replaces any previous issuance.
    pub fn issue(&mut self, target_email: String) {
        *self = EmailVerification::CodeIssued {
            target_email,
            remaining: CODE_WINDOW_TICKS,
            code: String::new(),
            last_error: None,
        };
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EmailVerification::CodeIssued { .. })
    }

    pub fn target_email(&self) -> Option<&str> {
        match self {
            EmailVerification::CodeIssued { target_email, .. } => Some(target_email),
            EmailVerification::Idle => None,
        }
    }

    pub fn remaining(&self) -> u32 {
        match self {
            EmailVerification::CodeIssued { remaining, .. } => *remaining,
            EmailVerification::Idle => 0,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            EmailVerification::CodeIssued { code, .. } => code,
            EmailVerification::Idle => "",
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            EmailVerification::CodeIssued { last_error, .. } => last_error.as_deref(),
            EmailVerification::Idle => None,
        }
    }

    /// One countdown tick. Returns the remaining window, saturating at zero.
    pub fn tick(&mut self) -> u32 {
        match self {
            EmailVerification::CodeIssued { remaining, .. } => {
                *remaining = remaining.saturating_sub(1);
                *remaining
            }
            EmailVerification::Idle => 0,
        }
    }

    pub fn set_code(&mut self, entry: String) {
        if let EmailVerification::CodeIssued { code, .. } = self {
            *code = entry;
        }
    }

    /// Resend is only offered once the current window is exhausted.
    pub fn can_resend(&self) -> bool {
        matches!(
            self,
            EmailVerification::CodeIssued { remaining: 0, .. }
        )
    }

    /// A resend re-opens the window and clears the entered code and any
    /// prior error. Returns `false` (and changes nothing) while the current
    /// window is still running.
    pub fn resend(&mut self) -> bool {
        if !self.can_resend() {
            return false;
        }
        if let EmailVerification::CodeIssued {
            remaining,
            code,
            last_error,
            ..
        } = self
        {
            *remaining = CODE_WINDOW_TICKS;
            code.clear();
            *last_error = None;
        }
        true
    }

    /// Client-side gate in front of the verify call.
    pub fn check_verify(&self) -> Result<(), VerifyReject> {
        match self {
            EmailVerification::Idle => Err(VerifyReject::NotIssued),
            EmailVerification::CodeIssued {
                remaining, code, ..
            } => {
                if code.trim().len() < MIN_CODE_LEN {
                    Err(VerifyReject::CodeTooShort)
                } else if *remaining == 0 {
                    Err(VerifyReject::Expired)
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn can_verify(&self) -> bool {
        self.check_verify().is_ok()
    }

    /// Server rejected the code: stay in `CodeIssued`, record the message.
    /// The window keeps running; failed attempts do not shorten it.
    pub fn record_failure(&mut self, message: String) {
        if let EmailVerification::CodeIssued { last_error, .. } = self {
            *last_error = Some(message);
        }
    }

    /// Server confirmed the code. Returns the now-live email address and
    /// resets to `Idle`; the owner must tear down its countdown task.
    pub fn complete(&mut self) -> Option<String> {
        match std::mem::take(self) {
            EmailVerification::CodeIssued { target_email, .. } => Some(target_email),
            EmailVerification::Idle => None,
        }
    }

    /// Abandon the pending change: back to `Idle`, code and target
    /// discarded, the confirmed email untouched.
    pub fn cancel(&mut self) {
        *self = EmailVerification::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_opens_a_full_window_for_the_target() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());

        assert!(flow.is_active());
        assert_eq!(flow.target_email(), Some("b@x.com"));
        assert_eq!(flow.remaining(), CODE_WINDOW_TICKS);
        assert_eq!(flow.code(), "");
        assert_eq!(flow.last_error(), None);
    }

    #[test]
    fn countdown_saturates_at_zero() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());

        for t in 1..=CODE_WINDOW_TICKS {
            assert_eq!(flow.tick(), CODE_WINDOW_TICKS - t);
        }
        assert_eq!(flow.tick(), 0);
        assert_eq!(flow.remaining(), 0);
    }

    #[test]
    fn verify_rejected_until_code_is_long_enough() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());

        flow.set_code("12345".to_string());
        assert_eq!(flow.check_verify(), Err(VerifyReject::CodeTooShort));

        flow.set_code("123456".to_string());
        assert_eq!(flow.check_verify(), Ok(()));
    }

    #[test]
    fn verify_rejected_after_expiry_without_network_call() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());
        flow.set_code("123456".to_string());
        for _ in 0..CODE_WINDOW_TICKS {
            flow.tick();
        }

        assert_eq!(flow.check_verify(), Err(VerifyReject::Expired));
        assert!(VerifyReject::Expired.message().contains("expired"));
    }

    #[test]
    fn resend_only_offered_at_zero_and_resets_everything() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());
        flow.set_code("999999".to_string());
        flow.record_failure("Incorrect code".to_string());

        assert!(!flow.can_resend());
        assert!(!flow.resend());
        assert_eq!(flow.code(), "999999");

        for _ in 0..CODE_WINDOW_TICKS {
            flow.tick();
        }
        assert!(flow.can_resend());
        assert!(flow.resend());
        assert_eq!(flow.remaining(), CODE_WINDOW_TICKS);
        assert_eq!(flow.code(), "");
        assert_eq!(flow.last_error(), None);
        assert_eq!(flow.target_email(), Some("b@x.com"));
    }

    #[test]
    fn failure_keeps_the_window_running() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());
        flow.tick();
        flow.record_failure("Incorrect code".to_string());

        assert_eq!(flow.remaining(), CODE_WINDOW_TICKS - 1);
        assert_eq!(flow.last_error(), Some("Incorrect code"));
        assert!(flow.is_active());
    }

    #[test]
    fn complete_returns_the_target_and_resets() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());
        flow.set_code("123456".to_string());

        assert_eq!(flow.complete(), Some("b@x.com".to_string()));
        assert_eq!(flow, EmailVerification::Idle);
        assert_eq!(flow.complete(), None);
    }

    #[test]
    fn cancel_abandons_the_pending_change() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());
        flow.cancel();

        assert_eq!(flow, EmailVerification::Idle);
        assert_eq!(flow.target_email(), None);
    }

    #[test]
    fn reissue_replaces_a_running_window() {
        let mut flow = EmailVerification::default();
        flow.issue("b@x.com".to_string());
        flow.tick();
        flow.set_code("111111".to_string());

        flow.issue("c@x.com".to_string());
        assert_eq!(flow.target_email(), Some("c@x.com"));
        assert_eq!(flow.remaining(), CODE_WINDOW_TICKS);
        assert_eq!(flow.code(), "");
    }
}
