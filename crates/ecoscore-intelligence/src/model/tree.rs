// ABOUTME: Regression tree nodes and traversal for the gradient-boosted score model
// ABOUTME: Trees are validated at load so traversal always terminates on a leaf
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Decision tree structures for score inference.
//!
//! Node 0 is the root. Internal nodes send a sample left when
//! `features[feature_idx] <= threshold`, right otherwise.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// For internal nodes `feature_idx >= 0` and `left`/`right` index into the
/// tree's node array. Leaves carry `feature_idx == -1` and a `leaf` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Feature column to split on (-1 for leaf nodes)
    #[serde(alias = "feature")]
    pub feature_idx: i32,

    /// Split threshold
    #[serde(default)]
    pub threshold: f64,

    /// Left child index (-1 for leaf nodes)
    #[serde(default = "no_child")]
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    #[serde(default = "no_child")]
    pub right: i32,

    /// Leaf value (Some for leaf nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<f64>,
}

const fn no_child() -> i32 {
    -1
}

impl Node {
    /// Create a new internal (split) node
    #[must_use]
    pub const fn split(feature_idx: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            feature_idx,
            threshold,
            left,
            right,
            leaf: None,
        }
    }

    /// Create a new leaf node
    #[must_use]
    pub const fn leaf(value: f64) -> Self {
        Self {
            feature_idx: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            leaf: Some(value),
        }
    }

    /// Check if this node is a leaf
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.feature_idx < 0
    }
}

/// A single regression tree with a contribution weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Tree nodes (node 0 is the root)
    pub nodes: Vec<Node>,

    /// Multiplier applied to this tree's leaf value
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

const fn unit_weight() -> f64 {
    1.0
}

impl Tree {
    /// Create a new tree with the given nodes and weight
    #[must_use]
    pub const fn new(nodes: Vec<Node>, weight: f64) -> Self {
        Self { nodes, weight }
    }

    /// Evaluate this tree on a feature vector and return the weighted leaf value.
    ///
    /// Assumes the tree passed [`Tree::validate`]; a malformed path yields 0.
    #[must_use]
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        while let Some(node) = self.nodes.get(idx) {
            if node.is_leaf() {
                return node.leaf.unwrap_or(0.0) * self.weight;
            }

            let Some(value) = usize::try_from(node.feature_idx)
                .ok()
                .and_then(|feature| features.get(feature))
            else {
                return 0.0;
            };

            let next = if *value <= node.threshold {
                node.left
            } else {
                node.right
            };
            match usize::try_from(next) {
                Ok(next) => idx = next,
                Err(_) => return 0.0,
            }
        }

        0.0
    }

    /// Validate tree structure against the model's feature count.
    ///
    /// Children must point strictly forward in the node array, which rules
    /// out cycles and guarantees traversal terminates.
    ///
    /// # Errors
    ///
    /// Returns a description of the first structural problem found
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        if !self.weight.is_finite() {
            return Err(format!("tree weight is not finite: {}", self.weight));
        }

        let node_count = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                match node.leaf {
                    Some(value) if value.is_finite() => {}
                    Some(value) => return Err(format!("leaf node {i} is not finite: {value}")),
                    None => return Err(format!("leaf node {i} has no leaf value")),
                }
                continue;
            }

            let feature = usize::try_from(node.feature_idx).unwrap_or(usize::MAX);
            if feature >= feature_count {
                return Err(format!(
                    "node {i} splits on feature {} but the model has {feature_count}",
                    node.feature_idx
                ));
            }
            if !node.threshold.is_finite() {
                return Err(format!("node {i} threshold is not finite"));
            }
            for (side, child) in [("left", node.left), ("right", node.right)] {
                let child = usize::try_from(child).unwrap_or(0);
                if child <= i || child >= node_count {
                    return Err(format!("node {i} has invalid {side} child"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        // if feature[0] <= 50 then 10 else 20
        Tree::new(
            vec![Node::split(0, 50.0, 1, 2), Node::leaf(10.0), Node::leaf(20.0)],
            1.0,
        )
    }

    #[test]
    fn test_tree_evaluation() {
        let tree = stump();
        assert!((tree.evaluate(&[30.0]) - 10.0).abs() < f64::EPSILON);
        assert!((tree.evaluate(&[50.0]) - 10.0).abs() < f64::EPSILON); // Equal goes left
        assert!((tree.evaluate(&[60.0]) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weight_scales_leaf() {
        let tree = Tree::new(stump().nodes, 0.5);
        assert!((tree.evaluate(&[60.0]) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tree_validation() {
        assert!(stump().validate(1).is_ok());

        // feature index out of range for a one-column model
        let wide = Tree::new(
            vec![Node::split(3, 1.0, 1, 2), Node::leaf(1.0), Node::leaf(2.0)],
            1.0,
        );
        assert!(wide.validate(1).is_err());

        // child pointing backwards would loop forever
        let cyclic = Tree::new(
            vec![Node::split(0, 1.0, 0, 2), Node::leaf(1.0), Node::leaf(2.0)],
            1.0,
        );
        assert!(cyclic.validate(1).is_err());

        let non_finite = Tree::new(vec![Node::leaf(f64::NAN)], 1.0);
        assert!(non_finite.validate(1).is_err());
    }

    #[test]
    fn test_node_deserializes_with_defaults() {
        let node: Node = serde_json::from_str(r#"{"feature_idx": -1, "leaf": 4.5}"#).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.leaf, Some(4.5));
    }
}
