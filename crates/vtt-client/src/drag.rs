//! Drag state tracking for locally owned token positions.

/// Whether the client currently owns its token positions.
///
/// While a token is being dragged the local token collection is
/// authoritative and polls must not overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// Server snapshots are applied in full.
    #[default]
    Syncing,
    /// A drag is in progress; snapshots leave the tokens alone.
    LocallyOverridden {
        /// The token being dragged.
        token_id: String,
    },
}

impl DragState {
    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::LocallyOverridden { .. })
    }

    /// The token being dragged, if any.
    pub fn dragged_token(&self) -> Option<&str> {
        match self {
            Self::Syncing => None,
            Self::LocallyOverridden { token_id } => Some(token_id),
        }
    }
}
