//! Immutable snapshot of a session's document at one revision.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::shared_document::SharedDocument;
use crate::domain::foundation::SessionId;

/// The unit of fan-out: what every subscriber receives after a mutation.
///
/// The document is shared behind an `Arc` so one mutation produces one
/// allocation no matter how many channels are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub session_id: SessionId,
    /// Incremented by every mutation that changed the document.
    pub revision: u64,
    pub document: Arc<SharedDocument>,
}

impl DocumentSnapshot {
    pub fn new(session_id: SessionId, revision: u64, document: SharedDocument) -> Self {
        Self {
            session_id,
            revision,
            document: Arc::new(document),
        }
    }

    /// True if this snapshot supersedes one at `revision`.
    pub fn is_newer_than(&self, revision: u64) -> bool {
        self.revision > revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_revision_supersedes() {
        let snapshot = DocumentSnapshot::new(SessionId::new(), 4, SharedDocument::default());
        assert!(snapshot.is_newer_than(3));
        assert!(!snapshot.is_newer_than(4));
    }

    #[test]
    fn clones_share_the_document() {
        let snapshot = DocumentSnapshot::new(SessionId::new(), 1, SharedDocument::default());
        let copy = snapshot.clone();
        assert!(Arc::ptr_eq(&snapshot.document, &copy.document));
    }
}
