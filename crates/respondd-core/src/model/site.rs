// ── Site domain type ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Operator-facing name; offloader mappings are keyed by it.
    pub name: String,
    /// Controller id used in site-scoped API paths.
    pub key: String,
    /// Firmware auto-upgrade flag from the site settings, when reported.
    pub auto_upgrade: Option<bool>,
}
