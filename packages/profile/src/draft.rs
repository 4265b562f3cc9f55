//! Local unsaved edits derived from a [`ProfileSnapshot`].

use serde::{Deserialize, Serialize};

use crate::snapshot::ProfileSnapshot;

/// A photo file chosen in the form, ready for upload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// What should happen to the profile photo on the next save.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PhotoSlot {
    /// Keep whatever the server has.
    #[default]
    Unchanged,
    /// Replace the photo with a newly selected file.
    New(PhotoFile),
    /// Remove the existing photo.
    PendingRemoval,
}

impl PhotoSlot {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, PhotoSlot::Unchanged)
    }
}

/// Locally edited, unsaved profile state.
///
/// Created from a snapshot when the profile loads; discarded (rebuilt from
/// the fresh snapshot) after a successful save. Text fields are plain public
/// strings driven by input handlers; the photo slot goes through methods so
/// the select/remove interplay stays consistent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditDraft {
    pub name: String,
    pub email: String,
    pub biography: String,
    pub linkedin: String,
    pub instagram: String,
    pub twitter: String,
    photo: PhotoSlot,
    had_photo: bool,
}

impl EditDraft {
    /// Initialise a draft from the snapshot, trimming every text field.
    pub fn from_snapshot(snapshot: &ProfileSnapshot) -> Self {
        Self {
            name: snapshot.name.trim().to_string(),
            email: snapshot.email.trim().to_string(),
            biography: snapshot.biography().trim().to_string(),
            linkedin: snapshot.linkedin().trim().to_string(),
            instagram: snapshot.instagram().trim().to_string(),
            twitter: snapshot.twitter().trim().to_string(),
            photo: PhotoSlot::Unchanged,
            had_photo: snapshot.has_photo(),
        }
    }

    pub fn photo(&self) -> &PhotoSlot {
        &self.photo
    }

    /// Select a new photo. Clears any pending removal.
    pub fn select_photo(&mut self, file: PhotoFile) {
        self.photo = PhotoSlot::New(file);
    }

    /// Whether the remove-photo action is currently meaningful: there must
    /// be either an existing server photo or a newly selected file to drop.
    pub fn can_remove_photo(&self) -> bool {
        self.had_photo || matches!(self.photo, PhotoSlot::New(_))
    }

    /// Request removal of the profile photo.
    ///
    /// Dropping a newly selected file just clears the slot; it only becomes
    /// a pending removal when the server actually stores a photo. Returns
    /// `false` when there is nothing to remove.
    pub fn request_photo_removal(&mut self) -> bool {
        match (&self.photo, self.had_photo) {
            (PhotoSlot::New(_), true) | (PhotoSlot::Unchanged, true) => {
                self.photo = PhotoSlot::PendingRemoval;
                true
            }
            (PhotoSlot::New(_), false) => {
                self.photo = PhotoSlot::Unchanged;
                true
            }
            _ => false,
        }
    }

    /// Reset the photo slot after a successful save.
    pub fn clear_photo_slot(&mut self) {
        self.photo = PhotoSlot::Unchanged;
    }

    /// Whether saving this draft would change anything on the server.
    ///
    /// Name and email compare trimmed; the free-text fields compare as
    /// possibly-empty strings (absent server fields count as empty); any
    /// non-`Unchanged` photo slot is a change.
    pub fn has_changes(&self, snapshot: &ProfileSnapshot) -> bool {
        self.name.trim() != snapshot.name.trim()
            || self.email.trim() != snapshot.email.trim()
            || self.biography != snapshot.biography()
            || self.linkedin != snapshot.linkedin()
            || self.instagram != snapshot.instagram()
            || self.twitter != snapshot.twitter()
            || !self.photo.is_unchanged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProfileSnapshot {
        ProfileSnapshot {
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            biography: Some("".to_string()),
            linkedin: None,
            instagram: Some("".to_string()),
            twitter: None,
            photo_url: Some("/media/photo/ada".to_string()),
        }
    }

    #[test]
    fn pristine_draft_has_no_changes() {
        let snap = snapshot();
        let draft = EditDraft::from_snapshot(&snap);
        assert!(!draft.has_changes(&snap));
    }

    #[test]
    fn absent_optional_fields_compare_as_empty() {
        let mut snap = snapshot();
        snap.biography = None;
        snap.linkedin = None;
        let draft = EditDraft::from_snapshot(&snap);
        assert_eq!(draft.biography, "");
        assert!(!draft.has_changes(&snap));
    }

    #[test]
    fn biography_edit_is_a_change() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        draft.biography = "hi".to_string();
        assert!(draft.has_changes(&snap));
    }

    #[test]
    fn whitespace_only_name_edit_is_not_a_change() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        draft.name = "  Ada ".to_string();
        assert!(!draft.has_changes(&snap));
    }

    #[test]
    fn selecting_a_photo_clears_pending_removal() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        assert!(draft.request_photo_removal());
        assert_eq!(*draft.photo(), PhotoSlot::PendingRemoval);

        draft.select_photo(PhotoFile {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        });
        assert!(matches!(draft.photo(), PhotoSlot::New(_)));
        assert!(draft.has_changes(&snap));
    }

    #[test]
    fn removal_without_existing_photo_is_rejected() {
        let mut snap = snapshot();
        snap.photo_url = None;
        let mut draft = EditDraft::from_snapshot(&snap);
        assert!(!draft.can_remove_photo());
        assert!(!draft.request_photo_removal());
        assert!(draft.photo().is_unchanged());
    }

    #[test]
    fn removing_a_freshly_selected_file_without_server_photo_resets_the_slot() {
        let mut snap = snapshot();
        snap.photo_url = None;
        let mut draft = EditDraft::from_snapshot(&snap);
        draft.select_photo(PhotoFile {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1],
        });
        assert!(draft.can_remove_photo());
        assert!(draft.request_photo_removal());
        assert!(draft.photo().is_unchanged());
        assert!(!draft.has_changes(&snap));
    }
}
