//! The shared document: a flat record of independently mutable fields.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::records::{BodyMark, DiceConfig, Stamp, TandemEntry, Wish};
use crate::domain::foundation::EntryId;

/// Structured state shared by both partners of a session.
///
/// Every field can be replaced on its own. Lists and the key counter are
/// also updated in place by the mutator so concurrent partners never lose
/// an append or an increment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDocument {
    #[serde(default)]
    pub stamps: Vec<Stamp>,
    #[serde(default)]
    pub wishes: Vec<Wish>,
    #[serde(default)]
    pub body_marks: Vec<BodyMark>,
    #[serde(default)]
    pub tandem_entry: Option<TandemEntry>,
    #[serde(default)]
    pub keys: i64,
    #[serde(default)]
    pub preferences: BTreeMap<String, f64>,
    #[serde(default)]
    pub dice_config: DiceConfig,
}

impl SharedDocument {
    /// Finds a stamp by id.
    pub fn stamp(&self, id: &EntryId) -> Option<&Stamp> {
        self.stamps.iter().find(|s| &s.id == id)
    }

    /// Finds a wish by id.
    pub fn wish(&self, id: &EntryId) -> Option<&Wish> {
        self.wishes.iter().find(|w| &w.id == id)
    }

    /// Finds a body mark by id.
    pub fn body_mark(&self, id: &EntryId) -> Option<&BodyMark> {
        self.body_marks.iter().find(|m| &m.id == id)
    }
}

/// Addressable fields of [`SharedDocument`], named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentField {
    Stamps,
    Wishes,
    BodyMarks,
    TandemEntry,
    Keys,
    Preferences,
    DiceConfig,
}

impl DocumentField {
    pub const ALL: [DocumentField; 7] = [
        DocumentField::Stamps,
        DocumentField::Wishes,
        DocumentField::BodyMarks,
        DocumentField::TandemEntry,
        DocumentField::Keys,
        DocumentField::Preferences,
        DocumentField::DiceConfig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentField::Stamps => "stamps",
            DocumentField::Wishes => "wishes",
            DocumentField::BodyMarks => "bodyMarks",
            DocumentField::TandemEntry => "tandemEntry",
            DocumentField::Keys => "keys",
            DocumentField::Preferences => "preferences",
            DocumentField::DiceConfig => "diceConfig",
        }
    }

    /// True for the fields that hold id-addressed lists.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            DocumentField::Stamps | DocumentField::Wishes | DocumentField::BodyMarks
        )
    }
}

impl fmt::Display for DocumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown document field '{}'", s))
    }
}
