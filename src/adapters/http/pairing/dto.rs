//! Request bodies for pairing endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemCodeRequest {
    pub code: String,
}
