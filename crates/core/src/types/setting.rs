//! Store-wide settings row type.

use serde::{Deserialize, Serialize};

/// A row of the `settings` table: one string knob per key (store name,
/// support phone, and the like).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
