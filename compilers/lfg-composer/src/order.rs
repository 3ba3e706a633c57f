use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;

use crate::format;
use crate::node::Node;
use crate::Rejection;

/// Head → dependant graph over the nodes of one sentence. Node weights are
/// positions in the sentence's node list.
pub struct DependencyTree {
    graph: DiGraph<usize, ()>,
    root: NodeIndex,
}

impl DependencyTree {
    pub fn build(nodes: &[Node]) -> Result<Self, Rejection> {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut index_map = HashMap::with_capacity(nodes.len());

        for (pos, node) in nodes.iter().enumerate() {
            let idx = graph.add_node(pos);
            if index_map.insert(node.id, idx).is_some() {
                return Err(Rejection::DuplicateId { id: node.id });
            }
        }

        let mut root: Option<usize> = None;
        for (pos, node) in nodes.iter().enumerate() {
            if node.head.is_root() {
                if let Some(first) = root {
                    return Err(Rejection::MultipleRoots {
                        first: nodes[first].id,
                        second: node.id,
                    });
                }
                root = Some(pos);
                continue;
            }

            let head = index_map.get(&node.head).ok_or(Rejection::DanglingHead {
                id: node.id,
                head: node.head,
            })?;
            graph.add_edge(*head, NodeIndex::new(pos), ());
        }

        let root = root.ok_or(Rejection::MissingRoot)?;
        Ok(Self {
            graph,
            root: NodeIndex::new(root),
        })
    }

    /// Position of the matrix predicate.
    pub fn root(&self) -> usize {
        self.graph[self.root]
    }

    /// Dependants of the node at `position`, in input order.
    pub fn dependants(&self, position: usize) -> Vec<usize> {
        let mut deps: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(position), Direction::Outgoing)
            .map(|idx| self.graph[idx])
            .collect();
        // petgraph walks the newest edge first
        deps.sort_unstable();
        deps
    }

    /// First node, in input order, that cannot be reached from the root.
    pub fn first_detached(&self) -> Option<usize> {
        let mut reached = vec![false; self.graph.node_count()];
        let mut bfs = Bfs::new(&self.graph, self.root);
        while let Some(idx) = bfs.next(&self.graph) {
            reached[self.graph[idx]] = true;
        }
        reached.iter().position(|r| !r)
    }
}

/// Sorts dependants on the functional hierarchy. The sort is stable, so
/// equal ranks keep the order they came in.
pub fn sibling_order(nodes: &[Node], mut dependants: Vec<usize>) -> Vec<usize> {
    dependants.sort_by_key(|&d| nodes[d].function.rank());
    dependants
}

/// Breadth-first levels of the tree below `root`.
pub fn levels(nodes: &[Node], root: usize) -> Vec<Vec<usize>> {
    let mut levels = vec![vec![root]];
    loop {
        let next: Vec<usize> = levels[levels.len() - 1]
            .iter()
            .flat_map(|&pos| nodes[pos].dependants.iter().copied())
            .collect();
        if next.is_empty() {
            break;
        }
        levels.push(next);
    }
    levels
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionOrder {
    /// Position of the matrix predicate.
    pub root: usize,
    /// Positions of every node with dependants, deepest first.
    pub heads: Vec<usize>,
}

/// Links every node to its dependants, finalizes the terminal nodes and
/// returns the bottom-up order in which heads absorb their dependants.
pub fn composition_order(nodes: &mut [Node]) -> Result<CompositionOrder, Rejection> {
    let tree = DependencyTree::build(nodes)?;
    if let Some(pos) = tree.first_detached() {
        return Err(Rejection::Detached { id: nodes[pos].id });
    }

    for pos in 0..nodes.len() {
        let deps = sibling_order(nodes, tree.dependants(pos));
        nodes[pos].dependants = deps;
    }

    for node in nodes.iter_mut().filter(|n| n.is_terminal()) {
        format::finalize(node);
    }

    let root = tree.root();
    let mut heads: Vec<usize> = levels(nodes, root)
        .into_iter()
        .flatten()
        .filter(|&pos| !nodes[pos].is_terminal())
        .collect();
    heads.reverse();

    Ok(CompositionOrder { root, heads })
}
