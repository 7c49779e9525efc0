//! Undirected artist/song graph.
//!
//! Nodes live in a generational arena owned by the graph. Everything else
//! (the name indexes in particular) holds `NodeKey` copies, which stop
//! resolving once the node is removed instead of aliasing a later node.

use crate::error::GraphError;
use core::fmt;
use hashbrown::HashSet;
use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable, generational reference to a graph node.
    pub struct NodeKey;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Artist,
    Song,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Artist => "Artist",
            NodeKind::Song => "Song",
        })
    }
}

#[derive(Debug)]
pub struct GraphNode {
    name: String,
    kind: NodeKind,
    edges: HashSet<NodeKey>,
}

impl GraphNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_artist(&self) -> bool {
        self.kind == NodeKind::Artist
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.edges.iter().copied()
    }

    pub fn is_linked_to(&self, other: NodeKey) -> bool {
        self.edges.contains(&other)
    }
}

/// Connected-component summary.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ComponentStats {
    pub count: usize,
    pub largest: usize,
}

impl fmt::Display for ComponentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Number of connected components: {}\nLargest component size: {}",
            self.count, self.largest
        )
    }
}

#[derive(Debug, Default)]
pub struct Graph {
    nodes: SlotMap<NodeKey, GraphNode>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> Result<NodeKey, GraphError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GraphError::EmptyName);
        }
        trace!("adding {} node {:?}", kind, name);
        Ok(self.nodes.insert(GraphNode {
            name,
            kind,
            edges: HashSet::new(),
        }))
    }

    /// Links `a` and `b` in both directions. Returns `false` if they were
    /// already linked.
    pub fn add_edge(&mut self, a: NodeKey, b: NodeKey) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfEdge);
        }
        if !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            return Err(GraphError::UnknownNode);
        }
        let [na, nb] = self
            .nodes
            .get_disjoint_mut([a, b])
            .ok_or(GraphError::UnknownNode)?;
        let added = na.edges.insert(b);
        nb.edges.insert(a);
        Ok(added)
    }

    /// Unlinks the node from all neighbours, then drops it from the arena.
    /// Returns the detached node (with its edge set cleared).
    pub fn remove_node(&mut self, key: NodeKey) -> Option<GraphNode> {
        let mut node = self.nodes.remove(key)?;
        for neighbor in node.edges.drain() {
            if let Some(n) = self.nodes.get_mut(neighbor) {
                n.edges.remove(&key);
            }
        }
        debug!("removed {} node {:?}", node.kind, node.name);
        Some(node)
    }

    pub fn node(&self, key: NodeKey) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(GraphNode::degree).sum::<usize>() / 2
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &GraphNode)> + '_ {
        self.nodes.iter()
    }

    /// Component count and size of the largest component, by iterative DFS.
    pub fn components(&self) -> ComponentStats {
        let mut visited: HashSet<NodeKey> = HashSet::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut stats = ComponentStats::default();

        for start in self.nodes.keys() {
            if !visited.insert(start) {
                continue;
            }
            stack.push(start);
            let mut size = 0;
            while let Some(key) = stack.pop() {
                size += 1;
                if let Some(node) = self.nodes.get(key) {
                    stack.extend(node.neighbors().filter(|n| visited.insert(*n)));
                }
            }
            stats.count += 1;
            stats.largest = stats.largest.max(size);
        }
        stats
    }
}
