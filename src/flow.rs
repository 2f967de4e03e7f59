use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SankeyError};
use crate::fmt::whole;
use crate::models::{DiagramLink, DiagramNode, SankeyDiagram, Transaction};
use crate::palette::{ColorAssigner, UNASSIGNED};
use crate::tree::{CategoryTree, NodeId};

/// Opacity used for link ribbons.
pub const LINK_ALPHA: f64 = 0.35;

#[derive(Debug, Clone)]
pub struct FlowOptions {
    /// Every value is divided by this, e.g. 12 for monthly averages of a year.
    pub divisor: f64,
    /// Nodes whose scaled absolute value is at or below this are dropped.
    pub prune_threshold: f64,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            divisor: 1.0,
            prune_threshold: 0.0,
        }
    }
}

impl FlowOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.divisor.is_finite() || self.divisor <= 0.0 {
            return Err(SankeyError::InvalidOption(format!(
                "divisor must be a positive number, got {}",
                self.divisor
            )));
        }
        if !self.prune_threshold.is_finite() || self.prune_threshold < 0.0 {
            return Err(SankeyError::InvalidOption(format!(
                "threshold must be zero or positive, got {}",
                self.prune_threshold
            )));
        }
        Ok(())
    }
}

/// Directed, valued edge between two surviving categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
}

/// Picks the node with the largest value as income source and marks its
/// whole subtree as income. Ties go to the first node in path order.
pub fn classify_income(tree: &mut CategoryTree) -> Result<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for (id, node) in tree.entries() {
        if best.map_or(true, |(_, top)| node.value > top) {
            best = Some((id, node.value));
        }
    }
    let (root, value) = best.ok_or(SankeyError::NoIncomeCandidate)?;

    for id in tree.subtree(root) {
        if let Some(node) = tree.get_mut(id) {
            node.is_income = true;
        }
    }
    debug!(root = path_of(tree, root), value, "selected income source");
    Ok(root)
}

fn path_of(tree: &CategoryTree, id: NodeId) -> &str {
    tree.get(id).map_or("?", |node| node.path())
}

/// One link per node except the income root.
///
/// Income nodes flow up into their parent, expense nodes are fed by their
/// parent, and parentless expense nodes are fed straight from the income
/// root so the graph stays connected. The income root may itself sit below
/// an expense parent; that parent is then fed from the root like any other
/// expense root, so the root gets no link towards it.
pub fn build_links(tree: &CategoryTree, income_root: NodeId) -> Vec<Link> {
    let mut links = Vec::with_capacity(tree.len().saturating_sub(1));
    for (id, node) in tree.entries() {
        if id == income_root {
            continue;
        }
        let (source, target) = match (node.is_income, node.parent()) {
            (true, Some(parent)) => (id, parent),
            (true, None) => continue,
            (false, Some(parent)) => (parent, id),
            (false, None) => (income_root, id),
        };
        links.push(Link {
            source,
            target,
            value: node.value.abs(),
        });
    }
    links
}

/// Result of one run over a batch of transactions.
#[derive(Debug)]
pub struct Flow {
    pub tree: CategoryTree,
    pub income_root: Option<NodeId>,
    pub links: Vec<Link>,
}

impl Flow {
    pub fn to_diagram(&self, currency: &str) -> SankeyDiagram {
        let tree = &self.tree;
        let index_of = |id: NodeId| tree.get(id).and_then(|n| n.index).unwrap_or_default();

        let nodes = tree
            .nodes()
            .map(|node| DiagramNode {
                index: node.index.unwrap_or_default(),
                path: node.path().to_string(),
                label: format!("{}<br>{}", node.name(), whole(node.value, currency)),
                color: node.color.unwrap_or(UNASSIGNED).rgba(1.0),
                value: node.value,
                is_income: node.is_income,
            })
            .collect();

        let links = self
            .links
            .iter()
            .map(|link| DiagramLink {
                source: index_of(link.source),
                target: index_of(link.target),
                value: link.value,
                color: tree
                    .get(link.target)
                    .and_then(|n| n.color)
                    .unwrap_or(UNASSIGNED)
                    .rgba(LINK_ALPHA),
                label: whole(link.value, currency),
            })
            .collect();

        SankeyDiagram {
            nodes,
            links,
            income_root: self.income_root.map(index_of),
        }
    }

    pub fn describe_link(&self, link: &Link) -> String {
        format!(
            "{} --{:.2}-> {}",
            path_of(&self.tree, link.source),
            link.value,
            path_of(&self.tree, link.target)
        )
    }
}

/// Runs every stage in order: populate, scale, prune, color, classify,
/// index, link.
#[instrument(level = "info", skip_all, fields(transactions = transactions.len()))]
pub fn derive_flow(transactions: &[Transaction], options: &FlowOptions) -> Result<Flow> {
    options.validate()?;

    let mut tree = CategoryTree::new();
    for txn in transactions {
        tree.add(&txn.category_path, txn.amount);
    }
    if tree.is_empty() {
        warn!("no categorized transactions to aggregate");
        return Err(SankeyError::NoIncomeCandidate);
    }
    info!(categories = tree.len(), "aggregated category totals");

    tree.scale(options.divisor);
    let removed = tree.prune(options.prune_threshold);
    if removed > 0 {
        info!(removed, threshold = options.prune_threshold, "pruned small categories");
    }

    ColorAssigner::new().assign(&mut tree);

    if tree.is_empty() {
        warn!("every category fell under the threshold");
        return Ok(Flow {
            tree,
            income_root: None,
            links: Vec::new(),
        });
    }

    let income_root = classify_income(&mut tree)?;
    tree.assign_indices();
    let links = build_links(&tree, income_root);
    info!(nodes = tree.len(), links = links.len(), "derived flow graph");

    Ok(Flow {
        tree,
        income_root: Some(income_root),
        links,
    })
}
