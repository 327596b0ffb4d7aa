//! Arena-backed adaptive prefix-code tree.
//!
//! Nodes live in a single `Vec` and refer to each other by index. A node never
//! changes its arena slot; exchanging two nodes' tree positions only rewires the
//! parent/child indices and swaps their ranks, so rank always describes a position
//! in the sibling ordering rather than a node identity.
//!
//! # Invariants
//! - every internal node has exactly two children and weighs the sum of them
//! - listed by decreasing rank, node weights never increase (sibling property)
//! - ranks are unique; the root holds [`ROOT_RANK`]
//! - exactly one not-yet-seen leaf exists; it always holds the lowest rank and its
//!   sibling the second lowest

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::error::TreeError;

pub type NodeIndex = usize;
pub type Rank = u32;

/// Number of distinct symbols the tree can introduce.
pub const ALPHABET_SIZE: usize = 256;
/// Every introduction consumes two ranks, so the root starts high enough for all of them.
pub const ROOT_RANK: Rank = 2 * ALPHABET_SIZE as Rank;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// The escape leaf: reaching it means a raw symbol follows.
    NotYetSeen,
    Symbol(u8),
    Internal { left: NodeIndex, right: NodeIndex },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    kind: NodeKind,
    weight: u64,
    rank: Rank,
    parent: Option<NodeIndex>,
}

impl Node {
    fn leaf(kind: NodeKind, weight: u64, rank: Rank, parent: Option<NodeIndex>) -> Self {
        Self { kind, weight, rank, parent }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn symbol(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, NodeKind::Internal { .. })
    }

    pub fn is_not_yet_seen(&self) -> bool {
        matches!(self.kind, NodeKind::NotYetSeen)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdaptiveTree {
    nodes: Vec<Node>,
    root: NodeIndex,
    not_yet_seen: NodeIndex,
}

impl Default for AdaptiveTree {
    fn default() -> Self {
        Self {
            nodes: vec![Node::leaf(NodeKind::NotYetSeen, 0, ROOT_RANK, None)],
            root: 0,
            not_yet_seen: 0,
        }
    }
}

impl AdaptiveTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    #[inline(always)]
    pub fn not_yet_seen(&self) -> NodeIndex {
        self.not_yet_seen
    }

    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn total_weight(&self) -> u64 {
        self.nodes[self.root].weight
    }

    pub fn node(&self, index: NodeIndex) -> Result<&Node, TreeError> {
        self.nodes.get(index).ok_or(TreeError::NodeOutOfBounds(index))
    }

    #[inline(always)]
    pub fn is_root(&self, index: NodeIndex) -> bool {
        index == self.root
    }

    /// Root-to-leaf branch decisions for `leaf`, `true` for every right turn.
    ///
    /// The root itself has an empty path, which is exactly the codeword of the
    /// not-yet-seen leaf before any symbol was introduced.
    pub fn code_path(&self, leaf: NodeIndex) -> Result<Vec<bool>, TreeError> {
        if !self.node(leaf)?.is_leaf() {
            return Err(TreeError::NotALeaf(leaf));
        }

        let mut code = Vec::new();
        let mut current = leaf;

        while let Some(parent) = self.nodes[current].parent {
            code.push(matches!(self.nodes[parent].kind, NodeKind::Internal { right, .. } if right == current));
            current = parent;
        }

        code.reverse();
        Ok(code)
    }

    /// Turns the not-yet-seen leaf into an internal node whose left child is the new
    /// not-yet-seen leaf and whose right child is a leaf for `symbol` with weight 1.
    ///
    /// Returns `(internal, symbol_leaf)`. The internal node keeps the old weight of
    /// zero: the caller is expected to [`rebalance`](Self::rebalance) from it.
    pub fn split_not_yet_seen(&mut self, symbol: u8) -> Result<(NodeIndex, NodeIndex), TreeError> {
        let internal = self.not_yet_seen;
        let rank = self.nodes[internal].rank;

        if rank < 2 {
            return Err(TreeError::AlphabetExhausted(rank));
        }

        let not_yet_seen = self.nodes.len();
        self.nodes.push(Node::leaf(NodeKind::NotYetSeen, 0, rank - 2, Some(internal)));
        let leaf = self.nodes.len();
        self.nodes.push(Node::leaf(NodeKind::Symbol(symbol), 1, rank - 1, Some(internal)));

        self.nodes[internal].kind = NodeKind::Internal { left: not_yet_seen, right: leaf };
        self.not_yet_seen = not_yet_seen;

        trace!(symbol, internal, leaf, rank, "introduced symbol");
        Ok((internal, leaf))
    }

    pub fn is_ancestor(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        let mut current = self.nodes[index].parent;
        for _ in 0..self.nodes.len() {
            match current {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = self.nodes[parent].parent,
                None => return false,
            }
        }
        false
    }

    /// Exchanges the tree positions of `a` and `b`, subtrees included, together with
    /// their ranks.
    ///
    /// Siblings trade the left and right slot of their shared parent. Exchanging the
    /// root, or a node with one of its ancestors, is refused: it would make a node
    /// its own ancestor.
    pub fn exchange(&mut self, a: NodeIndex, b: NodeIndex) -> Result<(), TreeError> {
        self.node(a)?;
        self.node(b)?;

        if a == b {
            return Ok(());
        }

        let (Some(parent_a), Some(parent_b)) = (self.nodes[a].parent, self.nodes[b].parent) else {
            return Err(TreeError::RootExchange);
        };

        if self.is_ancestor(a, b) {
            return Err(TreeError::AncestorExchange { ancestor: a, descendant: b });
        }
        if self.is_ancestor(b, a) {
            return Err(TreeError::AncestorExchange { ancestor: b, descendant: a });
        }

        if parent_a == parent_b {
            if let NodeKind::Internal { left, right } = &mut self.nodes[parent_a].kind {
                std::mem::swap(left, right);
            }
        } else {
            self.replace_child(parent_a, a, b);
            self.replace_child(parent_b, b, a);
            self.nodes[a].parent = Some(parent_b);
            self.nodes[b].parent = Some(parent_a);
        }

        let rank_a = self.nodes[a].rank;
        self.nodes[a].rank = self.nodes[b].rank;
        self.nodes[b].rank = rank_a;

        trace!(a, b, "exchanged positions");
        Ok(())
    }

    fn replace_child(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) {
        if let NodeKind::Internal { left, right } = &mut self.nodes[parent].kind {
            if *left == old {
                *left = new;
            } else if *right == old {
                *right = new;
            }
        }
    }

    /// Highest-ranked node weighing as much as `index`, `index` itself if none ranks
    /// higher.
    ///
    /// The walk is pre-order, left subtree first, and only enters nodes strictly
    /// heavier than `index`: the descendants of `index` are never candidates.
    pub fn block_leader(&self, index: NodeIndex) -> NodeIndex {
        let weight = self.nodes[index].weight;
        let mut leader = index;
        let mut stack = vec![self.root];

        while let Some(candidate) = stack.pop() {
            let node = &self.nodes[candidate];

            if node.weight > weight {
                if let NodeKind::Internal { left, right } = node.kind {
                    stack.push(right);
                    stack.push(left);
                }
            } else if node.weight == weight && node.rank > self.nodes[leader].rank {
                leader = candidate;
            }
        }

        leader
    }

    /// Adds one occurrence to `index` and to all of its ancestors, moving each of
    /// them to the top of its weight block first so that the sibling property still
    /// holds once the whole path has been incremented.
    pub fn rebalance(&mut self, index: NodeIndex) -> Result<(), TreeError> {
        self.node(index)?;

        let mut current = index;

        while let Some(parent) = self.nodes[current].parent {
            let leader = self.block_leader(current);

            // Only the sibling of the not-yet-seen leaf can tie with its parent. If the
            // parent leads, the two of them are the whole block and nothing moves.
            if leader != current && leader != parent {
                self.exchange(current, leader)?;
            }

            self.nodes[current].weight += 1;
            current = self.nodes[current].parent.unwrap_or(self.root);
        }

        self.nodes[current].weight += 1;
        Ok(())
    }

    /// Verifies every structural invariant of the tree.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let violation = |msg: String| Err(TreeError::InvariantViolated(msg));

        if self.nodes[self.root].parent.is_some() {
            return violation(format!("root {} has a parent", self.root));
        }

        // Reachability doubles as the acyclicity check: a cycle or a shared child
        // would visit some slot twice.
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        let mut not_yet_seen = Vec::new();

        while let Some(index) = stack.pop() {
            let node = self.node(index)?;

            if visited[index] {
                return violation(format!("node {} is reachable twice", index));
            }
            visited[index] = true;

            match node.kind {
                NodeKind::Internal { left, right } => {
                    for child in [left, right] {
                        if self.node(child)?.parent != Some(index) {
                            return violation(format!("child {} does not point back to {}", child, index));
                        }
                    }
                    let sum = self.nodes[left].weight + self.nodes[right].weight;
                    if node.weight != sum {
                        return violation(format!("node {} weighs {} instead of {}", index, node.weight, sum));
                    }
                    stack.push(right);
                    stack.push(left);
                }
                NodeKind::NotYetSeen => not_yet_seen.push(index),
                NodeKind::Symbol(_) => {}
            }
        }

        if let Some(index) = visited.iter().position(|&seen| !seen) {
            return violation(format!("node {} is detached from the root", index));
        }

        if not_yet_seen != [self.not_yet_seen] {
            return violation(format!("expected the single not-yet-seen leaf {}, found {:?}", self.not_yet_seen, not_yet_seen));
        }

        let mut by_rank: Vec<&Node> = self.nodes.iter().collect();
        by_rank.sort_by(|first, second| second.rank.cmp(&first.rank));

        if by_rank[0].rank != ROOT_RANK || self.nodes[self.root].rank != ROOT_RANK {
            return violation(format!("root does not hold rank {}", ROOT_RANK));
        }

        for pair in by_rank.windows(2) {
            if pair[0].rank == pair[1].rank {
                return violation(format!("rank {} is shared", pair[0].rank));
            }
            if pair[0].weight < pair[1].weight {
                return violation(format!(
                    "rank {} weighs {} but lower rank {} weighs {}",
                    pair[0].rank, pair[0].weight, pair[1].rank, pair[1].weight
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for AdaptiveTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.root, String::new())];

        while let Some((index, code)) = stack.pop() {
            let node = &self.nodes[index];
            match node.kind {
                NodeKind::Internal { left, right } => {
                    stack.push((right, format!("{}1", code)));
                    stack.push((left, format!("{}0", code)));
                }
                NodeKind::NotYetSeen => writeln!(f, "NYT  ({}) : {}", node.weight, code)?,
                NodeKind::Symbol(symbol) => writeln!(f, "{:#04x} ({}) : {}", symbol, node.weight, code)?,
            }
        }

        Ok(())
    }
}
