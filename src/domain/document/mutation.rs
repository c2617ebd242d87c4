//! Field mutations: the wire request, its validated typed form, and the
//! mutator that applies it to a [`SharedDocument`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::DocumentError;
use super::records::{
    BodyMark, BodyMarkDraft, DiceConfig, Stamp, StampDraft, TandemEntry, Wish, WishDraft,
};
use super::shared_document::{DocumentField, SharedDocument};
use crate::domain::foundation::{EntryId, Timestamp};

/// The fixed set of mutation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    ReplaceField,
    AppendToList,
    RemoveFromListById,
    IncrementCounter,
    SetMapEntry,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::ReplaceField => "replaceField",
            OperationKind::AppendToList => "appendToList",
            OperationKind::RemoveFromListById => "removeFromListById",
            OperationKind::IncrementCounter => "incrementCounter",
            OperationKind::SetMapEntry => "setMapEntry",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of a mutation: `{field, operation, payload}`.
///
/// Payload by operation:
/// - `replaceField`: the new field value
/// - `appendToList`: the item (`id`/`createdAt` optional)
/// - `removeFromListById`: `{"id": "..."}`
/// - `incrementCounter`: `{"delta": n}` (defaults to 1)
/// - `setMapEntry`: `{"key": "...", "value": n}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRequest {
    pub field: DocumentField,
    pub operation: OperationKind,
    #[serde(default)]
    pub payload: Value,
}

impl MutationRequest {
    pub fn new(field: DocumentField, operation: OperationKind, payload: Value) -> Self {
        Self {
            field,
            operation,
            payload,
        }
    }

    /// Gives an appended item an id if it has none.
    ///
    /// A client that assigns the id itself sees the same entry locally and
    /// on the server, and may resend the request without duplicating it.
    pub fn with_entry_id(mut self) -> Self {
        if self.operation == OperationKind::AppendToList {
            if let Value::Object(map) = &mut self.payload {
                map.entry("id")
                    .or_insert_with(|| Value::String(EntryId::generate().to_string()));
            }
        }
        self
    }

    /// Stamps screen: record a memory.
    pub fn append_stamp(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            DocumentField::Stamps,
            OperationKind::AppendToList,
            json!({ "category": category.into(), "title": title.into() }),
        )
    }

    /// Wishes screen: add an anonymous wish.
    pub fn append_wish(text: impl Into<String>) -> Self {
        Self::new(
            DocumentField::Wishes,
            OperationKind::AppendToList,
            json!({ "text": text.into() }),
        )
    }

    /// Body map screen: place a mark.
    pub fn append_body_mark(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self::new(
            DocumentField::BodyMarks,
            OperationKind::AppendToList,
            json!({ "x": x, "y": y, "label": label.into() }),
        )
    }

    /// Delete an entry from one of the lists.
    pub fn remove_entry(field: DocumentField, id: &EntryId) -> Self {
        Self::new(
            field,
            OperationKind::RemoveFromListById,
            json!({ "id": id.as_str() }),
        )
    }

    /// Tandem screen: replace the shared prompt and both slots.
    pub fn replace_tandem_entry(entry: Option<&TandemEntry>) -> Self {
        Self::new(
            DocumentField::TandemEntry,
            OperationKind::ReplaceField,
            json!(entry),
        )
    }

    /// Keys screen: earn or spend keys.
    pub fn increment_keys(delta: i64) -> Self {
        Self::new(
            DocumentField::Keys,
            OperationKind::IncrementCounter,
            json!({ "delta": delta }),
        )
    }

    /// Generator feedback: score one preference.
    pub fn set_preference(key: impl Into<String>, score: f64) -> Self {
        Self::new(
            DocumentField::Preferences,
            OperationKind::SetMapEntry,
            json!({ "key": key.into(), "value": score }),
        )
    }

    /// Dice screen: replace both face lists.
    pub fn replace_dice_config(config: &DiceConfig) -> Self {
        Self::new(
            DocumentField::DiceConfig,
            OperationKind::ReplaceField,
            json!(config),
        )
    }
}

/// A complete replacement value for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Stamps(Vec<Stamp>),
    Wishes(Vec<Wish>),
    BodyMarks(Vec<BodyMark>),
    TandemEntry(Option<TandemEntry>),
    Keys(i64),
    Preferences(BTreeMap<String, f64>),
    DiceConfig(DiceConfig),
}

/// An item appended to one of the id-addressed lists.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Stamp(Stamp),
    Wish(Wish),
    BodyMark(BodyMark),
}

/// A validated mutation of exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMutation {
    Replace(FieldValue),
    Append(ListItem),
    RemoveById { field: DocumentField, id: EntryId },
    Increment { delta: i64 },
    SetEntry { key: String, value: f64 },
}

/// Whether applying a mutation changed the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Unchanged,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }

    fn from_changed(changed: bool) -> Self {
        if changed {
            MutationOutcome::Applied
        } else {
            MutationOutcome::Unchanged
        }
    }
}

#[derive(Deserialize)]
struct IdPayload {
    id: String,
}

#[derive(Deserialize)]
struct DeltaPayload {
    #[serde(default = "default_delta")]
    delta: i64,
}

fn default_delta() -> i64 {
    1
}

#[derive(Deserialize)]
struct MapEntryPayload {
    key: String,
    value: f64,
}

impl FieldMutation {
    /// Validates a wire request against the field's type.
    ///
    /// `now` stamps appended items that arrive without `createdAt`.
    pub fn from_request(request: MutationRequest, now: Timestamp) -> Result<Self, DocumentError> {
        let MutationRequest {
            field,
            operation,
            payload,
        } = request;

        match operation {
            OperationKind::ReplaceField => Ok(FieldMutation::Replace(parse_field_value(
                field, payload,
            )?)),
            OperationKind::AppendToList => {
                let item = match field {
                    DocumentField::Stamps => {
                        let stamp = parse_payload::<StampDraft>(field, payload)?.into_stamp(now);
                        validate_stamp(&stamp).map_err(|r| DocumentError::invalid_payload(field, r))?;
                        ListItem::Stamp(stamp)
                    }
                    DocumentField::Wishes => {
                        let wish = parse_payload::<WishDraft>(field, payload)?.into_wish(now);
                        validate_wish(&wish).map_err(|r| DocumentError::invalid_payload(field, r))?;
                        ListItem::Wish(wish)
                    }
                    DocumentField::BodyMarks => {
                        let mark =
                            parse_payload::<BodyMarkDraft>(field, payload)?.into_body_mark(now);
                        validate_body_mark(&mark)
                            .map_err(|r| DocumentError::invalid_payload(field, r))?;
                        ListItem::BodyMark(mark)
                    }
                    _ => return Err(DocumentError::unsupported(field, operation)),
                };
                Ok(FieldMutation::Append(item))
            }
            OperationKind::RemoveFromListById => {
                if !field.is_list() {
                    return Err(DocumentError::unsupported(field, operation));
                }
                let IdPayload { id } = parse_payload(field, payload)?;
                let id = EntryId::new(id)
                    .map_err(|e| DocumentError::invalid_payload(field, e.to_string()))?;
                Ok(FieldMutation::RemoveById { field, id })
            }
            OperationKind::IncrementCounter => {
                if field != DocumentField::Keys {
                    return Err(DocumentError::unsupported(field, operation));
                }
                let DeltaPayload { delta } = parse_payload(field, payload)?;
                Ok(FieldMutation::Increment { delta })
            }
            OperationKind::SetMapEntry => {
                if field != DocumentField::Preferences {
                    return Err(DocumentError::unsupported(field, operation));
                }
                let MapEntryPayload { key, value } = parse_payload(field, payload)?;
                if key.trim().is_empty() {
                    return Err(DocumentError::invalid_payload(field, "key cannot be empty"));
                }
                if !value.is_finite() {
                    return Err(DocumentError::invalid_payload(field, "value must be finite"));
                }
                Ok(FieldMutation::SetEntry { key, value })
            }
        }
    }

    /// The single field this mutation touches.
    pub fn field(&self) -> DocumentField {
        match self {
            FieldMutation::Replace(value) => match value {
                FieldValue::Stamps(_) => DocumentField::Stamps,
                FieldValue::Wishes(_) => DocumentField::Wishes,
                FieldValue::BodyMarks(_) => DocumentField::BodyMarks,
                FieldValue::TandemEntry(_) => DocumentField::TandemEntry,
                FieldValue::Keys(_) => DocumentField::Keys,
                FieldValue::Preferences(_) => DocumentField::Preferences,
                FieldValue::DiceConfig(_) => DocumentField::DiceConfig,
            },
            FieldMutation::Append(item) => match item {
                ListItem::Stamp(_) => DocumentField::Stamps,
                ListItem::Wish(_) => DocumentField::Wishes,
                ListItem::BodyMark(_) => DocumentField::BodyMarks,
            },
            FieldMutation::RemoveById { field, .. } => *field,
            FieldMutation::Increment { .. } => DocumentField::Keys,
            FieldMutation::SetEntry { .. } => DocumentField::Preferences,
        }
    }

    /// Applies the mutation in place.
    ///
    /// Appending an id that is already present and removing an id that is
    /// absent both succeed without changing the document.
    pub fn apply(&self, doc: &mut SharedDocument) -> Result<MutationOutcome, DocumentError> {
        let changed = match self {
            FieldMutation::Replace(value) => replace_field(doc, value.clone()),
            FieldMutation::Append(item) => match item {
                ListItem::Stamp(stamp) => append_unique(&mut doc.stamps, stamp, |s| &s.id),
                ListItem::Wish(wish) => append_unique(&mut doc.wishes, wish, |w| &w.id),
                ListItem::BodyMark(mark) => append_unique(&mut doc.body_marks, mark, |m| &m.id),
            },
            FieldMutation::RemoveById { field, id } => match field {
                DocumentField::Stamps => remove_by_id(&mut doc.stamps, id, |s| &s.id),
                DocumentField::Wishes => remove_by_id(&mut doc.wishes, id, |w| &w.id),
                DocumentField::BodyMarks => remove_by_id(&mut doc.body_marks, id, |m| &m.id),
                other => {
                    return Err(DocumentError::unsupported(
                        *other,
                        OperationKind::RemoveFromListById,
                    ))
                }
            },
            FieldMutation::Increment { delta } => {
                doc.keys = doc
                    .keys
                    .checked_add(*delta)
                    .ok_or(DocumentError::CounterOverflow {
                        field: DocumentField::Keys,
                    })?;
                *delta != 0
            }
            FieldMutation::SetEntry { key, value } => {
                doc.preferences.insert(key.clone(), *value) != Some(*value)
            }
        };

        Ok(MutationOutcome::from_changed(changed))
    }
}

fn parse_payload<T: DeserializeOwned>(
    field: DocumentField,
    payload: Value,
) -> Result<T, DocumentError> {
    serde_json::from_value(payload).map_err(|e| DocumentError::invalid_payload(field, e.to_string()))
}

fn parse_field_value(field: DocumentField, payload: Value) -> Result<FieldValue, DocumentError> {
    let invalid = |reason: String| DocumentError::invalid_payload(field, reason);

    let value = match field {
        DocumentField::Stamps => {
            let stamps: Vec<Stamp> = parse_payload(field, payload)?;
            for stamp in &stamps {
                validate_stamp(stamp).map_err(invalid)?;
            }
            ensure_unique_ids(stamps.iter().map(|s| &s.id)).map_err(invalid)?;
            FieldValue::Stamps(stamps)
        }
        DocumentField::Wishes => {
            let wishes: Vec<Wish> = parse_payload(field, payload)?;
            for wish in &wishes {
                validate_wish(wish).map_err(invalid)?;
            }
            ensure_unique_ids(wishes.iter().map(|w| &w.id)).map_err(invalid)?;
            FieldValue::Wishes(wishes)
        }
        DocumentField::BodyMarks => {
            let marks: Vec<BodyMark> = parse_payload(field, payload)?;
            for mark in &marks {
                validate_body_mark(mark).map_err(invalid)?;
            }
            ensure_unique_ids(marks.iter().map(|m| &m.id)).map_err(invalid)?;
            FieldValue::BodyMarks(marks)
        }
        DocumentField::TandemEntry => FieldValue::TandemEntry(parse_payload(field, payload)?),
        DocumentField::Keys => FieldValue::Keys(parse_payload(field, payload)?),
        DocumentField::Preferences => {
            let scores: BTreeMap<String, f64> = parse_payload(field, payload)?;
            if scores.values().any(|v| !v.is_finite()) {
                return Err(invalid("scores must be finite".to_string()));
            }
            FieldValue::Preferences(scores)
        }
        DocumentField::DiceConfig => FieldValue::DiceConfig(parse_payload(field, payload)?),
    };

    Ok(value)
}

fn replace_field(doc: &mut SharedDocument, value: FieldValue) -> bool {
    fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    }

    match value {
        FieldValue::Stamps(v) => set(&mut doc.stamps, v),
        FieldValue::Wishes(v) => set(&mut doc.wishes, v),
        FieldValue::BodyMarks(v) => set(&mut doc.body_marks, v),
        FieldValue::TandemEntry(v) => set(&mut doc.tandem_entry, v),
        FieldValue::Keys(v) => set(&mut doc.keys, v),
        FieldValue::Preferences(v) => set(&mut doc.preferences, v),
        FieldValue::DiceConfig(v) => set(&mut doc.dice_config, v),
    }
}

fn append_unique<T: Clone>(list: &mut Vec<T>, item: &T, id: impl Fn(&T) -> &EntryId) -> bool {
    if list.iter().any(|existing| id(existing) == id(item)) {
        return false;
    }
    list.push(item.clone());
    true
}

fn remove_by_id<T>(list: &mut Vec<T>, target: &EntryId, id: impl Fn(&T) -> &EntryId) -> bool {
    let before = list.len();
    list.retain(|item| id(item) != target);
    list.len() != before
}

fn ensure_unique_ids<'a>(ids: impl Iterator<Item = &'a EntryId>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.as_str().trim().is_empty() {
            return Err("entry id cannot be empty".to_string());
        }
        if !seen.insert(id) {
            return Err(format!("duplicate entry id '{}'", id));
        }
    }
    Ok(())
}

fn validate_stamp(stamp: &Stamp) -> Result<(), String> {
    if stamp.title.trim().is_empty() {
        return Err("stamp title cannot be empty".to_string());
    }
    Ok(())
}

fn validate_wish(wish: &Wish) -> Result<(), String> {
    if wish.text.trim().is_empty() {
        return Err("wish text cannot be empty".to_string());
    }
    Ok(())
}

fn validate_body_mark(mark: &BodyMark) -> Result<(), String> {
    if !mark.x.is_finite() || !mark.y.is_finite() {
        return Err("body mark position must be finite".to_string());
    }
    Ok(())
}
