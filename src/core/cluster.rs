// cluster.rs - UPGMA hierarchical clustering

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub use crate::core::distance::ClusterId;
use crate::core::distance::DistanceMatrix;
use crate::data::Sequence;
use crate::error::{Error, Result};

/// Node of a [`ClusterTree`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClusterNode {
    Leaf { label: String },
    Merge { left: ClusterId, right: ClusterId, height: f64 },
}

impl ClusterNode {
    pub fn height(&self) -> f64 {
        match self {
            ClusterNode::Leaf { .. } => 0.0,
            ClusterNode::Merge { height, .. } => *height,
        }
    }
}

/// One agglomeration: `left` and `right` joined into `merged` at `distance`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeStep {
    pub left: ClusterId,
    pub right: ClusterId,
    pub merged: ClusterId,
    pub distance: f64,
}

/// Rooted binary tree produced by UPGMA.
///
/// `Display` renders the bracketed form, e.g. `((AGT, ACT), (GCT, GTT))`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterTree {
    nodes: BTreeMap<ClusterId, ClusterNode>,
    root: ClusterId,
    merges: Vec<MergeStep>,
}

impl ClusterTree {
    pub fn root(&self) -> ClusterId {
        self.root
    }

    pub fn node(&self, id: ClusterId) -> Option<&ClusterNode> {
        self.nodes.get(&id)
    }

    /// Merges in the order they happened
    pub fn merges(&self) -> &[MergeStep] {
        &self.merges
    }

    pub fn height(&self) -> f64 {
        self.nodes.get(&self.root).map_or(0.0, ClusterNode::height)
    }

    pub fn is_leaf(&self) -> bool {
        self.merges.is_empty()
    }

    /// Leaf labels in left-to-right order
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes.get(&id) {
                Some(ClusterNode::Leaf { label }) => out.push(label.as_str()),
                Some(ClusterNode::Merge { left, right, .. }) => {
                    stack.push(*right);
                    stack.push(*left);
                }
                None => {}
            }
        }
        out
    }

    fn write_bracketed(&self, id: ClusterId, out: &mut String) {
        match self.nodes.get(&id) {
            Some(ClusterNode::Leaf { label }) => out.push_str(label),
            Some(ClusterNode::Merge { left, right, .. }) => {
                out.push('(');
                self.write_bracketed(*left, out);
                out.push_str(", ");
                self.write_bracketed(*right, out);
                out.push(')');
            }
            None => {}
        }
    }

    fn write_newick(&self, id: ClusterId, parent_height: f64, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match node {
            ClusterNode::Leaf { label } => out.push_str(&newick_label(label)),
            ClusterNode::Merge { left, right, height } => {
                out.push('(');
                self.write_newick(*left, *height, out);
                out.push(',');
                self.write_newick(*right, *height, out);
                out.push(')');
            }
        }
        if id != self.root {
            out.push_str(&format!(":{}", parent_height - node.height()));
        }
    }

    /// Newick string with branch lengths (parent height minus child height)
    pub fn to_newick(&self) -> String {
        let mut out = String::new();
        self.write_newick(self.root, self.height(), &mut out);
        out.push(';');
        out
    }

    fn node_json(&self, id: ClusterId) -> Value {
        match self.nodes.get(&id) {
            Some(ClusterNode::Leaf { label }) => json!({ "label": label }),
            Some(ClusterNode::Merge { left, right, height }) => json!({
                "height": height,
                "children": [self.node_json(*left), self.node_json(*right)],
            }),
            None => Value::Null,
        }
    }

    /// Nested JSON: leaves are `{"label"}`, merges are `{"height", "children"}`
    pub fn to_json(&self) -> Value {
        self.node_json(self.root)
    }
}

fn newick_label(label: &str) -> String {
    if label
        .chars()
        .any(|c| c.is_whitespace() || "(),:;'[]".contains(c))
    {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

impl fmt::Display for ClusterTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_bracketed(self.root, &mut out);
        f.write_str(&out)
    }
}

/// Step-by-step UPGMA over a [`DistanceMatrix`]
#[derive(Debug, Clone)]
pub struct ClusterTreeBuilder {
    matrix: DistanceMatrix,
    nodes: BTreeMap<ClusterId, ClusterNode>,
    merges: Vec<MergeStep>,
}

impl ClusterTreeBuilder {
    /// Every live cluster of `matrix` becomes a leaf
    pub fn new(matrix: DistanceMatrix) -> Result<Self> {
        if matrix.is_empty() {
            return Err(Error::invalid("cannot cluster an empty distance matrix"));
        }
        let nodes = matrix
            .ids()
            .map(|id| {
                let label = matrix.label(id).unwrap_or_default().to_string();
                (id, ClusterNode::Leaf { label })
            })
            .collect();
        Ok(Self {
            matrix,
            nodes,
            merges: Vec::new(),
        })
    }

    /// Current working matrix
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    pub fn merges(&self) -> &[MergeStep] {
        &self.merges
    }

    pub fn is_complete(&self) -> bool {
        self.matrix.len() <= 1
    }

    /// Merge the closest pair; `None` once a single cluster remains
    pub fn step(&mut self) -> Result<Option<MergeStep>> {
        let Some((a, b, distance)) = self.matrix.closest_pair()? else {
            return Ok(None);
        };

        let others: Vec<(ClusterId, f64)> = self
            .matrix
            .ids()
            .filter(|&c| c != a && c != b)
            .map(|c| {
                let da = self.matrix.get(a, c);
                let db = self.matrix.get(b, c);
                match (da, db) {
                    (Some(da), Some(db)) => Ok((c, (da + db) / 2.0)),
                    _ => Err(Error::invalid(format!("missing distance to cluster {}", c))),
                }
            })
            .collect::<Result<_>>()?;

        let label_a = self.matrix.remove(a).unwrap_or_default();
        let label_b = self.matrix.remove(b).unwrap_or_default();
        let merged = self.matrix.insert(format!("({}, {})", label_a, label_b));
        for (c, d) in others {
            self.matrix.set(merged, c, d)?;
        }

        self.nodes.insert(
            merged,
            ClusterNode::Merge {
                left: a,
                right: b,
                height: distance / 2.0,
            },
        );
        let step = MergeStep {
            left: a,
            right: b,
            merged,
            distance,
        };
        self.merges.push(step);
        debug!(left = %a, right = %b, merged = %merged, distance, "merged clusters");
        Ok(Some(step))
    }

    /// Run the remaining merges and return the tree
    pub fn finish(mut self) -> Result<ClusterTree> {
        while self.step()?.is_some() {}
        let root = self
            .matrix
            .ids()
            .next()
            .ok_or_else(|| Error::invalid("clustering left no root"))?;
        Ok(ClusterTree {
            nodes: self.nodes,
            root,
            merges: self.merges,
        })
    }
}

/// UPGMA tree over a precomputed matrix. A single label yields a leaf.
pub fn build_tree(matrix: DistanceMatrix) -> Result<ClusterTree> {
    let tree = ClusterTreeBuilder::new(matrix)?.finish()?;
    info!(merges = tree.merges().len(), height = tree.height(), "built cluster tree");
    Ok(tree)
}

/// Edit-distance matrix plus UPGMA. One sequence yields a leaf.
pub fn build_tree_from_sequences(sequences: &[Sequence]) -> Result<ClusterTree> {
    build_tree_with_progress(sequences, false)
}

pub fn build_tree_with_progress(sequences: &[Sequence], show_progress: bool) -> Result<ClusterTree> {
    match sequences {
        [] => Err(Error::invalid("cannot build a tree from zero sequences")),
        [only] => {
            let mut matrix = DistanceMatrix::new();
            matrix.insert(only.id.clone());
            build_tree(matrix)
        }
        _ => build_tree(DistanceMatrix::from_sequences_with_progress(
            sequences,
            show_progress,
        )?),
    }
}
