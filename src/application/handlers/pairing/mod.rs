//! Pairing command handlers.

mod errors;
mod issue_code;
mod redeem_code;

pub use errors::PairingFlowError;
pub use issue_code::{IssueCodeCommand, IssueCodeHandler};
pub use redeem_code::{RedeemCodeCommand, RedeemCodeHandler};
