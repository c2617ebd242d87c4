//! Pending local edits layered over the last confirmed snapshot.
//!
//! An edit shows up in the local view as soon as it is submitted. Once the
//! server acknowledges it with a revision, it stays in the overlay until a
//! snapshot at or past that revision arrives; from then on the snapshot
//! already contains it.
//!
//! The server publishes before it answers the request, so a snapshot newer
//! than the one an edit was submitted against usually lands before the ack.
//! Such a snapshot wins: the unacknowledged edit leaves the overlay rather
//! than being applied a second time on top of it.

use crate::domain::document::{FieldMutation, SharedDocument};

/// Identifies one pending edit.
pub type EditToken = u64;

#[derive(Debug, Clone)]
struct PendingEdit {
    token: EditToken,
    mutation: FieldMutation,
    submitted_at: u64,
    acked_at: Option<u64>,
}

impl PendingEdit {
    fn covered_by(&self, revision: u64) -> bool {
        match self.acked_at {
            Some(acked) => acked <= revision,
            None => revision > self.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PendingEdits {
    edits: Vec<PendingEdit>,
    next_token: EditToken,
}

impl PendingEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unacknowledged edit made against `confirmed_revision`.
    pub fn push(&mut self, mutation: FieldMutation, confirmed_revision: u64) -> EditToken {
        let token = self.next_token;
        self.next_token += 1;
        self.edits.push(PendingEdit {
            token,
            mutation,
            submitted_at: confirmed_revision,
            acked_at: None,
        });
        token
    }

    /// Records the revision the server acknowledged the edit at.
    ///
    /// If `confirmed_revision` already covers it, the edit is dropped.
    pub fn ack(&mut self, token: EditToken, revision: u64, confirmed_revision: u64) {
        if let Some(edit) = self.edits.iter_mut().find(|e| e.token == token) {
            edit.acked_at = Some(revision);
        }
        self.reconcile(confirmed_revision);
    }

    /// Removes an edit the server rejected.
    pub fn discard(&mut self, token: EditToken) {
        self.edits.retain(|e| e.token != token);
    }

    /// Drops every edit a snapshot at `revision` supersedes.
    ///
    /// Acknowledged edits go once the snapshot reaches their revision.
    /// Unacknowledged ones go as soon as the snapshot is newer than the
    /// revision they were submitted against.
    pub fn reconcile(&mut self, revision: u64) {
        self.edits.retain(|e| !e.covered_by(revision));
    }

    /// Confirmed document with every pending edit applied in submission order.
    pub fn apply_to(&self, confirmed: &SharedDocument) -> SharedDocument {
        let mut doc = confirmed.clone();
        for edit in &self.edits {
            // An edit that no longer applies is shown as not yet visible.
            let _ = edit.mutation.apply(&mut doc);
        }
        doc
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::MutationRequest;
    use crate::domain::foundation::Timestamp;

    fn wish(text: &str) -> FieldMutation {
        FieldMutation::from_request(MutationRequest::append_wish(text), Timestamp::now()).unwrap()
    }

    fn add_key() -> FieldMutation {
        FieldMutation::from_request(MutationRequest::increment_keys(1), Timestamp::now()).unwrap()
    }

    #[test]
    fn pending_edit_is_visible_before_ack() {
        let mut pending = PendingEdits::new();
        pending.push(wish("Beach night"), 0);

        let view = pending.apply_to(&SharedDocument::default());

        assert_eq!(view.wishes.len(), 1);
        assert_eq!(view.wishes[0].text, "Beach night");
    }

    #[test]
    fn acked_edit_survives_older_snapshot() {
        let mut pending = PendingEdits::new();
        let token = pending.push(wish("Beach night"), 3);
        pending.ack(token, 5, 3);

        pending.reconcile(4);

        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn acked_edit_dropped_once_snapshot_catches_up() {
        let mut pending = PendingEdits::new();
        let token = pending.push(wish("Beach night"), 3);
        pending.ack(token, 5, 3);

        pending.reconcile(5);

        assert!(pending.is_empty());
    }

    #[test]
    fn ack_at_already_confirmed_revision_drops_immediately() {
        let mut pending = PendingEdits::new();
        let token = pending.push(wish("Beach night"), 3);

        pending.ack(token, 2, 2);

        assert!(pending.is_empty());
    }

    #[test]
    fn unacked_edit_survives_snapshot_it_was_made_against() {
        let mut pending = PendingEdits::new();
        pending.push(wish("Beach night"), 4);

        pending.reconcile(4);

        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn newer_snapshot_replaces_unacked_increment() {
        let mut pending = PendingEdits::new();
        pending.push(add_key(), 0);

        // The server applied the increment and published revision 1 before
        // the request returned.
        let server = SharedDocument {
            keys: 1,
            ..SharedDocument::default()
        };
        pending.reconcile(1);

        assert!(pending.is_empty());
        assert_eq!(pending.apply_to(&server).keys, 1);
    }

    #[test]
    fn late_ack_after_snapshot_is_harmless() {
        let mut pending = PendingEdits::new();
        let token = pending.push(add_key(), 0);
        pending.reconcile(1);

        pending.ack(token, 1, 1);

        assert!(pending.is_empty());
    }

    #[test]
    fn discard_removes_only_that_edit() {
        let mut pending = PendingEdits::new();
        let first = pending.push(wish("one"), 0);
        pending.push(wish("two"), 0);

        pending.discard(first);

        let view = pending.apply_to(&SharedDocument::default());
        assert_eq!(view.wishes.len(), 1);
        assert_eq!(view.wishes[0].text, "two");
    }
}
