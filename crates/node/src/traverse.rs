//! Depth-first traversal over a node subtree
//!
//! Iterative, no recursion, so walking and query evaluation do not grow the
//! call stack with tree depth. (`Serialize`, `Debug` and snapshots still
//! recurse per level.) Children are visited in insertion order.

use crate::node::Node;

/// Visit `start` and every node below it, depth-first
pub fn traverse_df<F>(start: &Node, mut visit: F)
where
    F: FnMut(&Node),
{
    let mut stack = vec![start.clone()];

    while let Some(node) = stack.pop() {
        visit(&node);

        // Push children in reverse order (so they're visited left-to-right)
        stack.extend(node.children().into_iter().rev());
    }
}

/// Find nodes in the subtree (including `start`) matching predicate
pub fn find<F>(start: &Node, predicate: F) -> Vec<Node>
where
    F: Fn(&Node) -> bool,
{
    let mut found = Vec::new();
    traverse_df(start, |node| {
        if predicate(node) {
            found.push(node.clone());
        }
    });
    found
}

/// Iterator over the nodes strictly below a node, depth-first
///
/// Each step reads the current child list, so nodes added or removed
/// under a not-yet-visited node are seen as they are at that point.
pub struct Descendants {
    stack: Vec<Node>,
}

impl Descendants {
    pub(crate) fn new(start: &Node) -> Self {
        let mut stack = start.children();
        stack.reverse();
        Self { stack }
    }
}

impl Iterator for Descendants {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
