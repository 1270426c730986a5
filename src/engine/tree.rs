//! The subject tree produced by the expand engine.

use serde::{Deserialize, Serialize};

use crate::types::SubjectSet;

/// One node of an expansion: a `(namespace, object, relation)` triple, the
/// concrete subjects directly related to it, and one child per subject-set
/// tuple, recursively expanded.
///
/// A node with `cut: true` marks a cycle: its triple was already on the path
/// from the root, so it was not descended into. Cut nodes are reported rather
/// than silently omitted so consumers can tell "no further members" apart
/// from "cycle truncated here".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandNode {
    /// The triple this node expands.
    pub triple: SubjectSet,

    /// Concrete subject ids directly related to the triple, deduplicated.
    pub leaves: Vec<String>,

    /// Children, one per subject-set tuple found under the triple.
    pub children: Vec<ExpandNode>,

    /// Whether the cycle guard trimmed this node.
    pub cut: bool,
}

impl ExpandNode {
    /// Creates an expanded node.
    pub(crate) fn new(triple: SubjectSet, leaves: Vec<String>, children: Vec<ExpandNode>) -> Self {
        Self { triple, leaves, children, cut: false }
    }

    /// Creates an empty node for a triple with no matching tuples.
    pub(crate) fn empty(triple: SubjectSet) -> Self {
        Self::new(triple, Vec::new(), Vec::new())
    }

    /// Creates a cycle-cut marker node.
    pub(crate) fn cut(triple: SubjectSet) -> Self {
        Self { triple, leaves: Vec::new(), children: Vec::new(), cut: true }
    }

    /// Returns `true` if `subject_id` appears as a leaf anywhere in the tree.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// let tree = engine.expand("documents", "readme", "viewer").await?;
    /// if tree.contains("user-alice") {
    ///     println!("alice is a viewer");
    /// }
    /// ```
    pub fn contains(&self, subject_id: &str) -> bool {
        self.leaves.iter().any(|leaf| leaf == subject_id)
            || self.children.iter().any(|child| child.contains(subject_id))
    }

    /// Returns every distinct leaf subject id in the tree.
    pub fn all_leaves(&self) -> Vec<&str> {
        let mut leaves: Vec<&str> = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        for leaf in &self.leaves {
            if !out.contains(&leaf.as_str()) {
                out.push(leaf);
            }
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Returns `true` if any node in the tree was trimmed by the cycle guard.
    pub fn has_cuts(&self) -> bool {
        self.cut || self.children.iter().any(ExpandNode::has_cuts)
    }
}
