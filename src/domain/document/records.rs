//! Record types stored in the shared document's fields.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryId, Timestamp};

/// A timestamped memory: category, title and an optional note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub id: EntryId,
    pub category: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// An anonymous wish. Only the text and its identity are shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: EntryId,
    pub text: String,
    pub created_at: Timestamp,
}

/// A positioned annotation on the body map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMark {
    pub id: EntryId,
    pub x: f64,
    pub y: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// A shared prompt with one answer slot per partner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TandemEntry {
    pub prompt: String,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub second: Option<String>,
}

/// Faces of the two dice: what to do, and where.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceConfig {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub places: Vec<String>,
}

/// Incoming stamp; `id` and `createdAt` are filled in when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampDraft {
    #[serde(default)]
    pub id: Option<EntryId>,
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Incoming wish; `id` and `createdAt` are filled in when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishDraft {
    #[serde(default)]
    pub id: Option<EntryId>,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Incoming body mark; `id` and `createdAt` are filled in when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMarkDraft {
    #[serde(default)]
    pub id: Option<EntryId>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl StampDraft {
    pub fn into_stamp(self, now: Timestamp) -> Stamp {
        Stamp {
            id: self.id.unwrap_or_else(EntryId::generate),
            category: self.category,
            title: self.title,
            note: self.note,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

impl WishDraft {
    pub fn into_wish(self, now: Timestamp) -> Wish {
        Wish {
            id: self.id.unwrap_or_else(EntryId::generate),
            text: self.text,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

impl BodyMarkDraft {
    pub fn into_body_mark(self, now: Timestamp) -> BodyMark {
        BodyMark {
            id: self.id.unwrap_or_else(EntryId::generate),
            x: self.x,
            y: self.y,
            label: self.label,
            note: self.note,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_draft_without_id_gets_one() {
        let draft: StampDraft =
            serde_json::from_str(r#"{"category": "date", "title": "Beach night"}"#).unwrap();
        let now = Timestamp::now();
        let stamp = draft.into_stamp(now);

        assert!(!stamp.id.as_str().is_empty());
        assert_eq!(stamp.title, "Beach night");
        assert_eq!(stamp.created_at, now);
    }

    #[test]
    fn stamp_draft_keeps_client_supplied_id() {
        let draft: StampDraft =
            serde_json::from_str(r#"{"id": "stamp-1", "title": "Picnic"}"#).unwrap();
        let stamp = draft.into_stamp(Timestamp::now());
        assert_eq!(stamp.id.as_str(), "stamp-1");
        assert_eq!(stamp.category, "");
    }

    #[test]
    fn stamp_serializes_camel_case_and_skips_empty_note() {
        let stamp = StampDraft {
            id: Some(EntryId::new("s1").unwrap()),
            category: "trip".into(),
            title: "Lisbon".into(),
            note: None,
            created_at: None,
        }
        .into_stamp(Timestamp::now());

        let json = serde_json::to_value(&stamp).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("note").is_none());
    }

    #[test]
    fn tandem_entry_slots_default_to_empty() {
        let entry: TandemEntry = serde_json::from_str(r#"{"prompt": "Finish the story"}"#).unwrap();
        assert_eq!(entry.first, None);
        assert_eq!(entry.second, None);
    }
}
