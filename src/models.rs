use serde::Serialize;

/// One ledger row after ingestion: where the money went and how much.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub category_path: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(category_path: impl Into<String>, amount: f64) -> Self {
        Self {
            category_path: category_path.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiagramNode {
    pub index: usize,
    pub path: String,
    pub label: String,
    pub color: String,
    pub value: f64,
    pub is_income: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiagramLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub color: String,
    pub label: String,
}

/// Finalized node and link set handed to the exporters.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SankeyDiagram {
    pub nodes: Vec<DiagramNode>,
    pub links: Vec<DiagramLink>,
    /// Index of the node selected as income source, if anything survived pruning.
    pub income_root: Option<usize>,
}

impl SankeyDiagram {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn income_root_node(&self) -> Option<&DiagramNode> {
        self.income_root.and_then(|i| self.nodes.get(i))
    }
}
