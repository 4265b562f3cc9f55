//! # Profile update session — domain logic
//!
//! Everything stateful about editing a CourseHub profile lives here, with no
//! UI or transport dependencies, so the whole workflow is unit-testable.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`snapshot`] | [`ProfileSnapshot`] — the last server-confirmed profile |
//! | [`draft`] | [`EditDraft`] and [`PhotoSlot`] — local unsaved edits and change detection |
//! | [`payload`] | [`UpdatePayload`] — the tagged union dispatched on save |
//! | [`verification`] | [`EmailVerification`] — the one-time-code state machine for email changes |
//! | [`password`] | [`PasswordChangeAttempt`] — the password dialog's validation state |
//!
//! The UI crate binds these types to signals; the api crate shares
//! [`payload::ProfileFields`] across the server-function boundary.

pub mod draft;
pub mod password;
pub mod payload;
pub mod snapshot;
pub mod verification;

pub use draft::{EditDraft, PhotoFile, PhotoSlot};
pub use password::{
    CurrentPasswordStatus, PasswordChangeAttempt, PasswordFormError, MIN_CURRENT_LEN,
};
pub use payload::{build_payload, PhotoAction, ProfileFields, UpdatePayload};
pub use snapshot::ProfileSnapshot;
pub use verification::{EmailVerification, VerifyReject, CODE_WINDOW_TICKS, MIN_CODE_LEN};
