//! Tandem Sync - paired-session synchronization.
//!
//! Two partners pair through a short-lived code and then edit one shared
//! document. The server keeps the authoritative copy per session and fans
//! every accepted mutation out to all live subscribers in order; the client
//! reconciles those snapshots with its own in-flight edits.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;
