use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;

use tracing::debug;

use crate::palette::Color;

pub const SEPARATOR: char = '/';

/// Handle into the tree's arena. Stays valid until the node is pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    path: String,
    parent: Option<NodeId>,
    /// Keyed by the child's path relative to this node. That is a single
    /// segment unless pruning re-parented the child past a removed level.
    children: BTreeMap<String, NodeId>,
    pub value: f64,
    pub color: Option<Color>,
    pub is_income: bool,
    pub index: Option<usize>,
}

impl Node {
    fn new(path: String, parent: Option<NodeId>) -> Self {
        Self {
            path,
            parent,
            children: BTreeMap::new(),
            value: 0.0,
            color: None,
            is_income: false,
            index: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment, e.g. `Organic` for `Food/Groceries/Organic`.
    pub fn name(&self) -> &str {
        self.path.rsplit(SEPARATOR).next().unwrap_or(&self.path)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }
}

/// Forest of categories keyed by full path.
///
/// Nodes live in an arena; parent and child relations are handles into it.
/// Every amount added under a path is added to each node on that path's
/// ancestor chain, so an ancestor's value is always the sum of every amount
/// recorded anywhere in its subtree.
#[derive(Debug, Default)]
pub struct CategoryTree {
    slots: Vec<Option<Node>>,
    by_path: BTreeMap<String, NodeId>,
}

/// Splits a category path into trimmed, non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live node handles in lexicographic path order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.by_path.values().copied()
    }

    /// Live handles with their nodes, in lexicographic path order.
    pub fn entries(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.ids().filter_map(move |id| self.get(id).map(|node| (id, node)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.entries().map(|(_, node)| node)
    }

    /// Nodes without a parent, in lexicographic path order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Returns the node for `path`, creating it and any missing ancestors.
    /// `None` when the path has no segments.
    pub fn node(&mut self, path: &str) -> Option<NodeId> {
        let mut prefix = String::new();
        let mut parent: Option<NodeId> = None;
        for segment in segments(path) {
            if !prefix.is_empty() {
                prefix.push(SEPARATOR);
            }
            prefix.push_str(segment);
            parent = Some(self.ensure(&prefix, segment, parent));
        }
        parent
    }

    fn ensure(&mut self, path: &str, segment: &str, parent: Option<NodeId>) -> NodeId {
        if let Some(id) = self.lookup(path) {
            return id;
        }
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Node::new(path.to_string(), parent)));
        self.by_path.insert(path.to_string(), id);
        if let Some(node) = parent.and_then(|p| self.get_mut(p)) {
            node.children.insert(segment.to_string(), id);
        }
        id
    }

    /// Adds `amount` to `path` and to every one of its ancestors.
    pub fn add(&mut self, path: &str, amount: f64) -> Option<NodeId> {
        let leaf = self.node(path)?;
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = self.get_mut(id)?;
            node.value += amount;
            cursor = node.parent;
        }
        Some(leaf)
    }

    /// Divides every value by `divisor`.
    pub fn scale(&mut self, divisor: f64) {
        for node in self.slots.iter_mut().flatten() {
            node.value /= divisor;
        }
    }

    /// Removes every node whose absolute value is at or below `threshold` and
    /// returns how many were removed.
    ///
    /// Surviving descendants of a removed node move up to their nearest
    /// surviving ancestor, or become roots when none is left. Values are
    /// not touched.
    pub fn prune(&mut self, threshold: f64) -> usize {
        let doomed: BTreeSet<NodeId> = self
            .ids()
            .filter(|id| self[*id].value.abs() <= threshold)
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        let mut moves = Vec::new();
        for id in self.ids().filter(|id| !doomed.contains(id)) {
            let mut parent = self[id].parent;
            if !parent.is_some_and(|p| doomed.contains(&p)) {
                continue;
            }
            while let Some(p) = parent {
                if !doomed.contains(&p) {
                    break;
                }
                parent = self[p].parent;
            }
            moves.push((id, parent));
        }

        for &id in &doomed {
            if let Some(node) = self.slots[id.0].take() {
                self.by_path.remove(&node.path);
                if let Some(parent) = node.parent.and_then(|p| self.get_mut(p)) {
                    parent.children.retain(|_, child| *child != id);
                }
            }
        }

        let reparented = moves.len();
        for (id, new_parent) in moves {
            let child_path = self[id].path.clone();
            if let Some(node) = self.get_mut(id) {
                node.parent = new_parent;
            }
            if let Some(parent) = new_parent.and_then(|p| self.get_mut(p)) {
                let key = child_path
                    .strip_prefix(parent.path.as_str())
                    .and_then(|rest| rest.strip_prefix(SEPARATOR))
                    .unwrap_or(&child_path)
                    .to_string();
                parent.children.insert(key, id);
            }
        }

        debug!(
            removed = doomed.len(),
            reparented,
            remaining = self.len(),
            "pruned category tree"
        );
        doomed.len()
    }

    /// `id` and everything below it, visited with an explicit worklist.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children());
        }
        out
    }

    /// Gives every live node a dense zero-based index in path order.
    pub fn assign_indices(&mut self) {
        let ids: Vec<NodeId> = self.ids().collect();
        for (index, id) in ids.into_iter().enumerate() {
            if let Some(node) = self.get_mut(id) {
                node.index = Some(index);
            }
        }
    }
}

impl Index<NodeId> for CategoryTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale category handle {id:?}"),
        }
    }
}
