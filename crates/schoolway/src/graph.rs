use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

/// Name of the ground node, where every student's day starts and ends.
pub const GROUND: &str = "G";

/// Interned node identifier.
///
/// Node names are interned once at graph load; everything downstream (routes,
/// congestion keys, search state, APSP matrices) works on these indices and
/// only resolves back to names at the I/O boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Rebuild an id from a matrix index. Only meaningful for indices that
    /// came out of `index()` against the same graph.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One stored direction of an undirected corridor edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    pub to: NodeId,
    /// Corridor length.
    pub weight: u32,
    /// Edge-type tag from the input file. Preserved but not interpreted.
    pub kind: u32,
}

/// The school layout: an undirected weighted graph over named nodes.
///
/// Every undirected edge is stored as two half-edges, one per adjacency list.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<String>,
    ids: HashMap<String, NodeId>,
    adjacency: Vec<Vec<HalfEdge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a graph from an edge-list file, one `u v w t` line per edge.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to open edge list {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("in edge list {}", path.display()))
    }

    /// Parse an edge list from text. Blank lines are skipped; duplicate edges
    /// are kept in insertion order (no validation, last lookup wins).
    pub fn parse(contents: &str) -> Result<Self> {
        let mut graph = Self::new();
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let mut take = |what: &str| -> Result<String> {
                fields
                    .next()
                    .map(str::to_owned)
                    .with_context(|| format!("line {}: missing {what}", lineno + 1))
            };
            let u = take("source node")?;
            let v = take("destination node")?;
            let weight: u32 = take("weight")?
                .parse()
                .with_context(|| format!("line {}: bad weight", lineno + 1))?;
            let kind: u32 = take("edge type")?
                .parse()
                .with_context(|| format!("line {}: bad edge type", lineno + 1))?;
            graph.add_edge(&u, &v, weight, kind);
        }
        Ok(graph)
    }

    /// Intern a node name, returning its id. Idempotent.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an undirected edge, interning both endpoints.
    pub fn add_edge(&mut self, u: &str, v: &str, weight: u32, kind: u32) {
        let u = self.intern(u);
        let v = self.intern(v);
        self.adjacency[u.index()].push(HalfEdge { to: v, weight, kind });
        self.adjacency[v.index()].push(HalfEdge { to: u, weight, kind });
    }

    /// Look up the id of a node name.
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    /// Resolve an id back to its name.
    pub fn name(&self, node: NodeId) -> &str {
        &self.names[node.index()]
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// All node ids, in interning order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.names.len() as u32).map(NodeId)
    }

    /// Outgoing half-edges of a node.
    pub fn neighbors(&self, node: NodeId) -> &[HalfEdge] {
        &self.adjacency[node.index()]
    }

    /// Weight of the edge between two adjacent nodes, if one exists.
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<u32> {
        self.adjacency[from.index()]
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.weight)
    }

    /// Whether a node is room-like: a destination routes may start or end at.
    /// Room-like names begin with `A`, `B`, or `G`.
    pub fn is_room_like(&self, node: NodeId) -> bool {
        matches!(self.name(node).as_bytes().first(), Some(b'A' | b'B' | b'G'))
    }

    /// The ground node, if the graph has one.
    pub fn ground(&self) -> Option<NodeId> {
        self.id(GROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_populates_both_directions() {
        let graph = Graph::parse("G A101 5 0\nA101 A102 7 1\n").unwrap();
        let g = graph.id("G").unwrap();
        let a101 = graph.id("A101").unwrap();
        let a102 = graph.id("A102").unwrap();
        assert_eq!(graph.weight(g, a101), Some(5));
        assert_eq!(graph.weight(a101, g), Some(5));
        assert_eq!(graph.weight(a101, a102), Some(7));
        assert_eq!(graph.weight(a102, a101), Some(7));
        assert_eq!(graph.weight(g, a102), None);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let graph = Graph::parse("\nG A101 5 0\n\n").unwrap();
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert!(Graph::parse("G A101 5\n").is_err());
        assert!(Graph::parse("G A101 five 0\n").is_err());
    }

    #[test]
    fn room_like_prefixes() {
        let graph = Graph::parse("A1 B2 1 0\nB2 S3 1 0\nS3 G 1 0\n").unwrap();
        assert!(graph.is_room_like(graph.id("A1").unwrap()));
        assert!(graph.is_room_like(graph.id("B2").unwrap()));
        assert!(graph.is_room_like(graph.id("G").unwrap()));
        assert!(!graph.is_room_like(graph.id("S3").unwrap()));
    }
}
