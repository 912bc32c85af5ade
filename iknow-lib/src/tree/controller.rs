//! Tree controller: root list, per-node state and fetch dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use futures::future::join_all;

use super::ChildSource;
use super::Children;
use super::NodeState;
use super::TreeSnapshot;
use super::semester_nodes;
use super::year_nodes;
use crate::error::Error;
use crate::model::NodeData;
use crate::model::TreeNode;

/// Result of an [`TreeController::expand`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// The node is a leaf; nothing happened.
    Ignored,
    /// The node is now open.
    Expanded,
    /// The node is now closed.
    Collapsed,
}

/// Owns the browse tree's state and decides how each level is populated.
///
/// Failures never escape: a level that cannot be loaded resolves to an empty
/// child list carrying the error (see [`Children::error`]).
///
/// The controller is `Send + Sync` and meant to be shared; sibling nodes can
/// be expanded concurrently, and overlapping expansions of one node fetch at
/// most once.
///
/// # Example
///
/// ```ignore
/// let tree = TreeController::new(client);
/// tree.initialize().await;
/// let root = tree.roots()[0].clone();
/// tree.expand(&root).await;
/// println!("{}", render_tree(&tree.snapshot(), &RenderOptions::default()));
/// ```
pub struct TreeController {
    source: Arc<dyn ChildSource>,
    roots: RwLock<Vec<TreeNode>>,
    started: AtomicBool,
    ready: AtomicBool,
    states: DashMap<String, NodeState>,
}

impl TreeController {
    /// Creates a controller over the given data source.
    pub fn new(source: impl ChildSource + 'static) -> Self {
        Self::with_shared_source(Arc::new(source))
    }

    /// Creates a controller over an already shared data source.
    pub fn with_shared_source(source: Arc<dyn ChildSource>) -> Self {
        Self {
            source,
            roots: RwLock::new(Vec::new()),
            started: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            states: DashMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Loads the root universities. Runs once; later calls return the
    /// current root count without a request.
    ///
    /// On failure the root list stays empty.
    pub async fn initialize(&self) -> usize {
        if self.started.swap(true, Ordering::SeqCst) {
            return self.read_roots().len();
        }

        let roots: Vec<TreeNode> = match self.source.universities().await {
            Ok(universities) => universities.into_iter().map(TreeNode::from).collect(),
            Err(e) => {
                log::warn!("failed to load universities: {}", e);
                Vec::new()
            }
        };
        let count = roots.len();
        log::debug!("loaded {} root nodes", count);

        *self.roots.write().unwrap_or_else(PoisonError::into_inner) = roots;
        self.ready.store(true, Ordering::SeqCst);
        count
    }

    /// Toggles a node open or closed, loading its children on first open.
    ///
    /// Leaves are ignored. The first expansion of a node fetches (or
    /// synthesizes) its children exactly once; later toggles only flip
    /// visibility of the cached children.
    pub async fn expand(&self, node: &TreeNode) -> Expansion {
        if node.is_leaf() {
            return Expansion::Ignored;
        }

        let fetch = {
            let mut entry = self.states.entry(node.id.clone()).or_default();
            let (next, fetch) = std::mem::take(&mut *entry).toggle();
            *entry = next;
            fetch
        };

        if fetch {
            let children = match self.load_children(node).await {
                Ok(nodes) => Children::loaded(nodes),
                Err(e) => {
                    log::warn!("failed to load children of {} {}: {}", node.kind(), node.id, e);
                    Children::failed(e)
                }
            };
            if let Some(mut entry) = self.states.get_mut(&node.id) {
                let state = std::mem::take(&mut *entry);
                *entry = state.resolve(children);
            }
        }

        if self.is_expanded(&node.id) {
            Expansion::Expanded
        } else {
            Expansion::Collapsed
        }
    }

    /// Closes a node without fetching anything.
    pub fn collapse(&self, node: &TreeNode) {
        if let Some(mut entry) = self.states.get_mut(&node.id) {
            let state = std::mem::take(&mut *entry);
            *entry = state.collapse();
        }
    }

    /// Opens every non-leaf node down to `depth` levels below the roots.
    ///
    /// Siblings on one level load concurrently.
    pub async fn expand_to_depth(&self, depth: usize) {
        let mut level = self.roots();

        for _ in 0..depth {
            let closed: Vec<&TreeNode> = level
                .iter()
                .filter(|node| !node.is_leaf() && !self.is_expanded(&node.id))
                .collect();
            join_all(closed.into_iter().map(|node| self.expand(node))).await;

            level = level
                .iter()
                .filter_map(|node| self.children(&node.id))
                .flat_map(|children| children.iter().cloned().collect::<Vec<_>>())
                .collect();
            if level.is_empty() {
                break;
            }
        }
    }

    async fn load_children(&self, node: &TreeNode) -> Result<Vec<TreeNode>, Error> {
        match &node.data {
            NodeData::University => {
                log::debug!("fetching schools of university {}", node.id);
                let schools = self.source.schools(&node.id).await?;
                Ok(schools.into_iter().map(TreeNode::from).collect())
            }
            NodeData::School { .. } => {
                log::debug!("fetching departments of school {}", node.id);
                let departments = self.source.departments(&node.id).await?;
                Ok(departments.into_iter().map(TreeNode::from).collect())
            }
            NodeData::Department { .. } => Ok(year_nodes(node)),
            NodeData::Year { .. } => Ok(semester_nodes(node)),
            NodeData::Semester {
                department_id,
                year,
                semester,
            } => {
                let year = year.ok_or_else(|| {
                    Error::InvalidOperation(format!("semester {} has no numeric year", node.id))
                })?;
                log::debug!(
                    "fetching exams of department {} year {} semester {}",
                    department_id,
                    year,
                    semester
                );
                let exams = self.source.exams(department_id, year, *semester).await?;
                Ok(exams.into_iter().map(TreeNode::from).collect())
            }
            NodeData::Material { .. } => Ok(Vec::new()),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns `true` once [`initialize`](Self::initialize) has completed.
    pub fn is_initialized(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Returns the root nodes.
    pub fn roots(&self) -> Vec<TreeNode> {
        self.read_roots().clone()
    }

    /// Returns a copy of a node's state. Unknown ids are `Unloaded`.
    pub fn state(&self, id: &str) -> NodeState {
        self.states
            .get(id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Returns the cached children of a node, if loaded.
    pub fn children(&self, id: &str) -> Option<Arc<[TreeNode]>> {
        self.states
            .get(id)
            .and_then(|entry| entry.value().children().map(Children::shared))
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.states.get(id).is_some_and(|entry| entry.is_expanded())
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.states.get(id).is_some_and(|entry| entry.is_loading())
    }

    /// Looks a node up among the roots and every cached level.
    pub fn find(&self, id: &str) -> Option<TreeNode> {
        if let Some(root) = self.read_roots().iter().find(|n| n.id == id) {
            return Some(root.clone());
        }
        self.states.iter().find_map(|entry| {
            entry
                .value()
                .children()
                .and_then(|children| children.nodes().iter().find(|n| n.id == id).cloned())
        })
    }

    /// Takes a consistent-enough copy of the tree for rendering.
    pub fn snapshot(&self) -> TreeSnapshot {
        let states: HashMap<String, NodeState> = self
            .states
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        TreeSnapshot::new(self.roots(), states, self.is_initialized())
    }

    fn read_roots(&self) -> std::sync::RwLockReadGuard<'_, Vec<TreeNode>> {
        self.roots.read().unwrap_or_else(PoisonError::into_inner)
    }
}
