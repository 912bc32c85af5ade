//! Per-node expansion state.

use std::sync::Arc;

use crate::error::Error;
use crate::model::TreeNode;

/// The cached children of a node.
///
/// A failed fetch still yields a (empty) child list so the tree stays
/// browsable; the failure is kept alongside it.
#[derive(Debug, Clone)]
pub struct Children {
    nodes: Arc<[TreeNode]>,
    error: Option<Arc<Error>>,
}

impl Children {
    /// Children from a successful load.
    pub fn loaded(nodes: Vec<TreeNode>) -> Self {
        Self {
            nodes: nodes.into(),
            error: None,
        }
    }

    /// An empty child list recording why loading failed.
    pub fn failed(error: Error) -> Self {
        Self {
            nodes: Vec::<TreeNode>::new().into(),
            error: Some(Arc::new(error)),
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Returns the shared child array. Repeated calls return the same `Arc`.
    pub fn shared(&self) -> Arc<[TreeNode]> {
        Arc::clone(&self.nodes)
    }

    /// Returns the load failure, if any.
    pub fn error(&self) -> Option<&Arc<Error>> {
        self.error.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// The children as a result, for callers that treat failure differently
    /// from an empty level.
    pub fn as_result(&self) -> Result<&[TreeNode], &Error> {
        match &self.error {
            Some(error) => Err(error.as_ref()),
            None => Ok(self.nodes()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Where a node is in its expand lifecycle.
///
/// ```text
/// Unloaded ─expand─▶ Loading{expanded} ─resolve─▶ Expanded | Collapsed
///                                     Collapsed ◀─expand─▶ Expanded
/// ```
///
/// `Loading` is entered at most once per node.
#[derive(Debug, Clone, Default)]
pub enum NodeState {
    /// Never expanded, nothing cached.
    #[default]
    Unloaded,
    /// First fetch in flight. `expanded` tracks toggles made meanwhile and
    /// decides the state the node lands in once the fetch resolves.
    Loading { expanded: bool },
    /// Children cached, hidden.
    Collapsed(Children),
    /// Children cached, shown.
    Expanded(Children),
}

impl NodeState {
    /// Returns `true` if the node is toggled open, loaded or not.
    pub fn is_expanded(&self) -> bool {
        match self {
            Self::Loading { expanded } => *expanded,
            Self::Expanded(_) => true,
            Self::Unloaded | Self::Collapsed(_) => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns the cached children, if loading finished.
    pub fn children(&self) -> Option<&Children> {
        match self {
            Self::Collapsed(children) | Self::Expanded(children) => Some(children),
            Self::Unloaded | Self::Loading { .. } => None,
        }
    }

    /// Applies an expand toggle. The flag is `true` when the caller must
    /// start the first fetch.
    pub(crate) fn toggle(self) -> (Self, bool) {
        match self {
            Self::Unloaded => (Self::Loading { expanded: true }, true),
            Self::Loading { expanded } => (Self::Loading { expanded: !expanded }, false),
            Self::Collapsed(children) => (Self::Expanded(children), false),
            Self::Expanded(children) => (Self::Collapsed(children), false),
        }
    }

    /// Stores the fetched children, keeping the current expansion flag.
    pub(crate) fn resolve(self, children: Children) -> Self {
        if self.is_expanded() {
            Self::Expanded(children)
        } else {
            Self::Collapsed(children)
        }
    }

    /// Hides the children without touching the cache.
    pub(crate) fn collapse(self) -> Self {
        match self {
            Self::Loading { .. } => Self::Loading { expanded: false },
            Self::Expanded(children) => Self::Collapsed(children),
            other => other,
        }
    }
}
