//! Store lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle of a store that loads one canonical document.
///
/// `Uninitialized -> Loading -> (Ready | Failed)`. A store never goes back
/// to `Loading`; reloading canonical data means building a new store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl LoadState {
    /// Whether the store has left `Loading` (or never entered it).
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
