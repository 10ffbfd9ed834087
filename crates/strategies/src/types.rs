// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MACrossoverSettings {
    /// Number of trailing closes in the fast average.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Number of trailing closes in the slow average.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for MACrossoverSettings {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

fn default_short_window() -> usize { 5 }
fn default_long_window() -> usize { 20 }
