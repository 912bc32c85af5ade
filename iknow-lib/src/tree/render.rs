//! Presentation of the browse tree.
//!
//! Everything here is pure: it reads a [`TreeSnapshot`] and never fetches.

use std::collections::HashMap;
use std::fmt::Write as _;

use super::NodeState;
use crate::model::NodeKind;
use crate::model::TreeNode;

/// Shown when there are no root nodes.
pub const EMPTY_MESSAGE: &str = "No universities found.";

/// A copy of the controller's roots and per-node states.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    roots: Vec<TreeNode>,
    states: HashMap<String, NodeState>,
    initialized: bool,
}

impl TreeSnapshot {
    pub fn new(roots: Vec<TreeNode>, states: HashMap<String, NodeState>, initialized: bool) -> Self {
        Self {
            roots,
            states,
            initialized,
        }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn states(&self) -> &HashMap<String, NodeState> {
        &self.states
    }

    /// Returns `false` while the root list is still being fetched.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn state(&self, id: &str) -> Option<&NodeState> {
        self.states.get(id)
    }
}

/// A visible row of the flattened tree.
#[derive(Debug, Clone)]
pub struct FlatNode {
    pub node: TreeNode,
    /// Depth in tree (0 = root).
    pub depth: usize,
    /// Whether the row gets an expand/collapse affordance.
    pub expandable: bool,
    pub expanded: bool,
    pub loading: bool,
    /// Whether the children failed to load.
    pub failed: bool,
}

/// Flattens the visible part of the tree, depth first.
///
/// Children are only descended into while their parent is expanded and its
/// children are cached.
pub fn flatten(snapshot: &TreeSnapshot) -> Vec<FlatNode> {
    let mut out = Vec::new();
    collect_visible(snapshot, snapshot.roots(), 0, &mut out);
    out
}

fn collect_visible(
    snapshot: &TreeSnapshot,
    nodes: &[TreeNode],
    depth: usize,
    out: &mut Vec<FlatNode>,
) {
    for node in nodes {
        let state = snapshot.state(&node.id);
        let expanded = state.is_some_and(NodeState::is_expanded);
        let children = state.and_then(NodeState::children);

        out.push(FlatNode {
            node: node.clone(),
            depth,
            expandable: !node.is_leaf(),
            expanded,
            loading: state.is_some_and(NodeState::is_loading),
            failed: children.is_some_and(|c| c.is_failed()),
        });

        if expanded && let Some(children) = children {
            collect_visible(snapshot, children.nodes(), depth + 1, out);
        }
    }
}

/// Text rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Spaces of indentation per depth level.
    pub indent: usize,
    /// Prefix each row with its index, for interactive selection.
    pub numbered: bool,
    /// Show school/department descriptions.
    pub descriptions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            numbered: false,
            descriptions: true,
        }
    }
}

/// Returns the marker drawn for a node kind.
pub fn kind_icon(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::University => "🏛",
        NodeKind::School => "🏫",
        NodeKind::Department => "🗂",
        NodeKind::Year => "📅",
        NodeKind::Semester => "📆",
        NodeKind::Material => "📄",
    }
}

/// Renders one row without trailing newline.
pub fn render_row(row: &FlatNode, options: &RenderOptions) -> String {
    let mut line = " ".repeat(row.depth * options.indent);

    if row.expandable {
        line.push_str(if row.expanded { "▾ " } else { "▸ " });
    } else {
        line.push_str("  ");
    }
    let _ = write!(line, "{} {}", kind_icon(row.node.kind()), row.node.name);

    if options.descriptions
        && let Some(description) = row.node.description()
    {
        let _ = write!(line, " - {description}");
    }
    if row.loading {
        line.push_str("  Loading...");
    }
    if row.failed {
        line.push_str("  (failed to load)");
    }
    if row.node.is_leaf() && !row.loading {
        match row.node.url() {
            Some(url) => {
                let _ = write!(line, "  [download] [read] {url}");
            }
            None => line.push_str("  (no file)"),
        }
    }

    line
}

/// Renders the visible tree as text, one row per line.
pub fn render_tree(snapshot: &TreeSnapshot, options: &RenderOptions) -> String {
    if !snapshot.is_initialized() {
        return "Loading...\n".to_string();
    }
    if snapshot.roots().is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let rows = flatten(snapshot);
    let width = rows.len().to_string().len();
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        if options.numbered {
            let _ = write!(out, "{:>width$} ", index + 1);
        }
        out.push_str(&render_row(row, options));
        out.push('\n');
    }
    out
}
