//! Owned snapshot of a parse tree
//!
//! Only what scope indexing needs is kept: row span, grammar kind and named
//! children. Nodes live in a flat arena and refer to each other by index, so
//! the snapshot outlives the tree-sitter tree it was taken from.

/// Index of a node inside a [`SyntaxArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A single syntax node
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Grammar kind, e.g. `function_item`
    pub kind: &'static str,

    /// First row covered by the node (0-indexed)
    pub start_row: usize,

    /// Last row covered by the node (0-indexed, inclusive)
    pub end_row: usize,

    children: Vec<NodeId>,
}

impl SyntaxNode {
    /// Number of rows spanned beyond the first
    pub fn span(&self) -> usize {
        self.end_row - self.start_row
    }

    /// Named children in source order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Flat, append-only tree of syntax nodes. The first node is the root.
#[derive(Debug, Clone)]
pub struct SyntaxArena {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxArena {
    /// Create an arena holding only a root node
    pub fn new(kind: &'static str, start_row: usize, end_row: usize) -> Self {
        Self {
            nodes: vec![Self::make_node(kind, start_row, end_row)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a named child to `parent`. Children keep insertion order.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: &'static str,
        start_row: usize,
        end_row: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Self::make_node(kind, start_row, end_row));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` and all of its descendants, in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            out.push(current);
            // Reversed so the leftmost child is popped first
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }

        out
    }

    fn make_node(kind: &'static str, start_row: usize, end_row: usize) -> SyntaxNode {
        SyntaxNode {
            kind,
            start_row,
            end_row: end_row.max(start_row),
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descendants_pre_order() {
        let mut arena = SyntaxArena::new("root", 0, 10);
        let a = arena.add_child(arena.root(), "a", 0, 4);
        let a1 = arena.add_child(a, "a1", 1, 2);
        let b = arena.add_child(arena.root(), "b", 5, 9);
        let a2 = arena.add_child(a, "a2", 3, 4);

        let order = arena.descendants(arena.root());
        assert_eq!(order, vec![arena.root(), a, a1, a2, b]);
        assert_eq!(arena.descendants(a1), vec![a1]);
    }

    #[test]
    fn test_inverted_span_is_clamped() {
        let arena = SyntaxArena::new("root", 4, 2);
        assert_eq!(arena.node(arena.root()).end_row, 4);
        assert_eq!(arena.node(arena.root()).span(), 0);
    }
}
