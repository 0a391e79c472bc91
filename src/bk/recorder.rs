use serde::Serialize;

use super::partition::Window;
use crate::graph::*;

pub type NodeId = usize;

/// Value written for absent IDs in exported records
pub const NONE_ID: i64 = -1;
/// `node_id` of the synthetic root that adopts all the top-level roots
pub const VIRTUAL_ROOT_ID: i64 = -1;
/// `parent_id` of the synthetic root
pub const VIRTUAL_ROOT_PARENT_ID: i64 = -2;

////////////////////////////////////////////////////////////////////////////////
//
// SearchTreeNode
//
////////////////////////////////////////////////////////////////////////////////

/// Snapshot of a single recursive call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTreeNode {
    pub node_id: NodeId,
    /// `None` for a top-level root
    pub parent_id: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Maximal cliques reported under this node. For nodes that are not
    /// pruned, children that are pruned do not contribute.
    pub cliques_in_subtree: usize,
    pub creation_order: usize,
    pub depth: usize,
    /// R at the beginning of the call
    pub current_clique: Vec<Vertex>,
    pub x_size: usize,
    pub p_size: usize,
    /// Vertex added to R by this call; `None` for a top-level root
    pub candidate_vertex: Option<Vertex>,
    /// The call would be skipped with pivoting, i.e., this node or one of
    /// its ancestors is a neighbor of the pivot of its parent.
    pub pruned_by_pivot: bool,
}

impl SearchTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// SearchTree
//
////////////////////////////////////////////////////////////////////////////////

/// Arena of the nodes of a search tree. Links between nodes are indices into
/// the arena.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchTree {
    nodes: Vec<SearchTreeNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        SearchTree::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SearchTreeNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &SearchTreeNode {
        &self.nodes[id]
    }

    /// Top-level roots in creation order
    pub fn roots(&self) -> impl Iterator<Item = &SearchTreeNode> + '_ {
        self.nodes.iter().filter(|n| n.parent_id.is_none())
    }

    /// Allocates a node for a call that is about to run with window `w`.
    pub fn open(
        &mut self,
        parent: Option<NodeId>,
        depth: usize,
        candidate: Option<Vertex>,
        pruned: bool,
        clique: &[Vertex],
        w: Window,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SearchTreeNode {
            node_id: id,
            parent_id: parent,
            children: vec![],
            cliques_in_subtree: 0,
            creation_order: id,
            depth,
            current_clique: clique.to_vec(),
            x_size: w.x_len(),
            p_size: w.p_len(),
            candidate_vertex: candidate,
            pruned_by_pivot: pruned,
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    /// Finalizes the clique count of a node when its call returns.
    pub fn close(&mut self, id: NodeId, cliques: usize) {
        self.nodes[id].cliques_in_subtree = cliques;
    }

    /// Sum of `cliques_in_subtree` over all the top-level roots
    pub fn root_clique_count(&self) -> usize {
        self.roots().map(|n| n.cliques_in_subtree).sum()
    }

    pub fn stats(&self) -> TreeStats {
        let pruned_nodes =
            self.nodes.iter().filter(|n| n.pruned_by_pivot).count();
        let leaves = self.nodes.iter().filter(|n| n.is_leaf());

        TreeStats {
            total_nodes: self.len(),
            explored_nodes: self.len() - pruned_nodes,
            pruned_nodes,
            pruning_ratio: if self.is_empty() {
                0.0
            } else {
                pruned_nodes as f64 * 100.0 / self.len() as f64
            },
            leaf_nodes: leaves.clone().count(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            leaf_cliques: leaves
                .filter(|n| !n.pruned_by_pivot)
                .map(|n| n.cliques_in_subtree)
                .sum(),
        }
    }

    /// Flattens the tree into records: the virtual root first, followed by
    /// every node in creation order.
    pub fn records(&self) -> Vec<TreeRecord> {
        let mut records = Vec::with_capacity(self.len() + 1);
        records.push(TreeRecord {
            node_id: VIRTUAL_ROOT_ID,
            parent_id: VIRTUAL_ROOT_PARENT_ID,
            children_ids: self.roots().map(|n| n.node_id as i64).collect(),
            cliques_in_subtree: self.root_clique_count(),
            creation_order: NONE_ID,
            depth: NONE_ID,
            candidate_vertex: NONE_ID,
            current_clique: vec![],
            x_size: 0,
            p_size: 0,
            pruned_by_pivot: false,
        });

        let id = |x: Option<usize>| x.map_or(NONE_ID, |x| x as i64);
        records.extend(self.nodes.iter().map(|n| TreeRecord {
            node_id: n.node_id as i64,
            parent_id: id(n.parent_id),
            children_ids: n.children.iter().map(|&c| c as i64).collect(),
            cliques_in_subtree: n.cliques_in_subtree,
            creation_order: n.creation_order as i64,
            depth: n.depth as i64,
            candidate_vertex: id(n.candidate_vertex.map(|v| v as usize)),
            current_clique: n.current_clique.clone(),
            x_size: n.x_size,
            p_size: n.p_size,
            pruned_by_pivot: n.pruned_by_pivot,
        }));
        records
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Export types
//
////////////////////////////////////////////////////////////////////////////////

/// A row of the exported search tree. Absent IDs are `-1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeRecord {
    pub node_id: i64,
    pub parent_id: i64,
    pub children_ids: Vec<i64>,
    pub cliques_in_subtree: usize,
    pub creation_order: i64,
    pub depth: i64,
    pub candidate_vertex: i64,
    pub current_clique: Vec<Vertex>,
    pub x_size: usize,
    pub p_size: usize,
    pub pruned_by_pivot: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub explored_nodes: usize,
    pub pruned_nodes: usize,
    /// Percentage of pruned nodes
    pub pruning_ratio: f64,
    pub leaf_nodes: usize,
    pub max_depth: usize,
    /// Cliques at leaves that are not pruned
    pub leaf_cliques: usize,
}
