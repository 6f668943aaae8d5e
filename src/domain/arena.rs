//! Rooted view of a decoded tree, for display and traversal

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::LabeledTree;

/// Tree node in the arena-based rooted structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Vertex label
    pub label: usize,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, ascending by label
    pub children: Vec<Index>,
}

/// Arena-based rooted copy of a [`LabeledTree`].
///
/// A decoded tree is unrooted; picking a root orients every edge away from
/// it, which is what the tree renderer and the traversals need.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Builds the rooted view of `tree` hanging from vertex `root`.
    ///
    /// Vertices not reachable from `root` and edges with an endpoint outside
    /// `1..=n` are left out, so a disconnected input yields only the root's
    /// component.
    #[instrument(level = "debug", skip(tree))]
    pub fn from_tree(tree: &LabeledTree, root: usize) -> DomainResult<Self> {
        let n = tree.vertex_count();
        if root == 0 || root > n {
            return Err(DomainError::InvalidRoot {
                root,
                vertex_count: n,
            });
        }

        let adjacency = tree.adjacency();
        let mut visited = vec![false; adjacency.len()];
        let mut result = Self::new();

        let root_idx = result.insert_node(root, None);
        visited[root] = true;
        let mut stack = vec![(root_idx, root)];
        while let Some((node_idx, label)) = stack.pop() {
            for &child in &adjacency[label] {
                if !visited[child] {
                    visited[child] = true;
                    let child_idx = result.insert_node(child, Some(node_idx));
                    stack.push((child_idx, child));
                }
            }
        }

        Ok(result)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, label: usize, parent: Option<Index>) -> Index {
        let node = TreeNode {
            label,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal, children visited in ascending label order.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels; a lone root has depth 1, an empty arena depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.into_iter().map(|r| (r, 1)).collect();
        while let Some((idx, level)) = stack.pop() {
            depth = depth.max(level);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&c| (c, level + 1)));
            }
        }
        depth
    }

    /// Labels of nodes without children, in pre-order.
    pub fn leaf_labels(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.label)
            .collect()
    }

    /// Renders the rooted tree with box-drawing characters.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.label.to_string());
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root.and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(root.label.to_string());
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.root().into_iter().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
