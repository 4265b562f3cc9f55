//! The request payload dispatched on save.
//!
//! The shape is an explicit tagged union rather than a runtime decision:
//! photo changes require a multipart-style payload carrying every text field
//! plus exactly one photo action, anything else goes out as plain fields.

use serde::{Deserialize, Serialize};

use crate::draft::{EditDraft, PhotoFile, PhotoSlot};
use crate::snapshot::ProfileSnapshot;

/// The six editable text fields, trimmed and ready to send.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
    pub biography: String,
    pub linkedin: String,
    pub instagram: String,
    pub twitter: String,
}

impl ProfileFields {
    /// The text half of a draft, trimmed the same way a save would send it.
    pub fn from_draft(draft: &EditDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            biography: draft.biography.clone(),
            linkedin: draft.linkedin.clone(),
            instagram: draft.instagram.clone(),
            twitter: draft.twitter.clone(),
        }
    }
}

/// The photo half of a multipart payload. Upload and removal are mutually
/// exclusive by construction.
#[derive(Clone, Debug, PartialEq)]
pub enum PhotoAction {
    Upload(PhotoFile),
    Remove,
}

/// Payload shape for the update call.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdatePayload {
    /// Text fields only.
    Structured(ProfileFields),
    /// Text fields plus a photo action.
    Multipart {
        fields: ProfileFields,
        photo: PhotoAction,
    },
}

impl UpdatePayload {
    pub fn fields(&self) -> &ProfileFields {
        match self {
            UpdatePayload::Structured(fields) => fields,
            UpdatePayload::Multipart { fields, .. } => fields,
        }
    }
}

/// Build the payload for a save, or `None` when the draft matches the
/// snapshot and no network call should be made.
pub fn build_payload(draft: &EditDraft, snapshot: &ProfileSnapshot) -> Option<UpdatePayload> {
    if !draft.has_changes(snapshot) {
        return None;
    }

    let fields = ProfileFields::from_draft(draft);
    Some(match draft.photo() {
        PhotoSlot::Unchanged => UpdatePayload::Structured(fields),
        PhotoSlot::New(file) => UpdatePayload::Multipart {
            fields,
            photo: PhotoAction::Upload(file.clone()),
        },
        PhotoSlot::PendingRemoval => UpdatePayload::Multipart {
            fields,
            photo: PhotoAction::Remove,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProfileSnapshot {
        ProfileSnapshot {
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            biography: Some("".to_string()),
            linkedin: Some("".to_string()),
            instagram: Some("".to_string()),
            twitter: Some("".to_string()),
            photo_url: Some("/media/photo/ada".to_string()),
        }
    }

    #[test]
    fn no_changes_builds_no_payload() {
        let snap = snapshot();
        let draft = EditDraft::from_snapshot(&snap);
        assert_eq!(build_payload(&draft, &snap), None);
    }

    #[test]
    fn biography_only_change_builds_structured_payload() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        draft.biography = "hi".to_string();

        let payload = build_payload(&draft, &snap).unwrap();
        match &payload {
            UpdatePayload::Structured(fields) => {
                assert_eq!(fields.biography, "hi");
                assert_eq!(fields.name, "Ada");
                assert_eq!(fields.email, "a@x.com");
            }
            other => panic!("expected structured payload, got {other:?}"),
        }
    }

    #[test]
    fn photo_upload_builds_multipart_with_every_text_field() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        draft.linkedin = "in/ada".to_string();
        draft.select_photo(PhotoFile {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0xff],
        });

        match build_payload(&draft, &snap).unwrap() {
            UpdatePayload::Multipart { fields, photo } => {
                assert_eq!(fields.name, "Ada");
                assert_eq!(fields.email, "a@x.com");
                assert_eq!(fields.biography, "");
                assert_eq!(fields.linkedin, "in/ada");
                assert_eq!(fields.instagram, "");
                assert_eq!(fields.twitter, "");
                assert!(matches!(photo, PhotoAction::Upload(_)));
            }
            other => panic!("expected multipart payload, got {other:?}"),
        }
    }

    #[test]
    fn pending_removal_builds_multipart_remove() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        assert!(draft.request_photo_removal());

        match build_payload(&draft, &snap).unwrap() {
            UpdatePayload::Multipart { photo, .. } => {
                assert_eq!(photo, PhotoAction::Remove);
            }
            other => panic!("expected multipart payload, got {other:?}"),
        }
    }

    #[test]
    fn payload_trims_name_and_email() {
        let snap = snapshot();
        let mut draft = EditDraft::from_snapshot(&snap);
        draft.name = " Ada Lovelace ".to_string();

        let payload = build_payload(&draft, &snap).unwrap();
        assert_eq!(payload.fields().name, "Ada Lovelace");
    }
}
