mod node;
mod notation;
mod order;

use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
};

use itertools::Itertools;
use proptest::prelude::*;

use crate::error::Result;

pub(crate) use node::Link;
pub use {node::Node, notation::Notation, order::Order};

pub(crate) use node::{build_balanced, dismantle, insert, into_entries};

/// Structural algorithms shared by every binary tree in this crate.
///
/// Implementors only expose their root; everything else is derived from it
/// and treats a missing root as the empty tree. Traversals and metrics use
/// an explicit stack, so their cost in call depth does not grow with the
/// height of the tree.
pub trait BinaryTree<K, V> {
    fn root(&self) -> Option<&Node<K, V>>;

    fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Collects every node in the given order.
    fn traverse(&self, order: Order) -> Vec<&Node<K, V>> {
        order::traverse(self.root(), order)
    }

    /// All keys, in in-order sequence.
    fn keys<'a>(&'a self) -> Vec<&'a K>
    where
        V: 'a,
    {
        self.traverse(Order::InOrder)
            .into_iter()
            .map(Node::key)
            .collect()
    }

    /// Number of nodes on the longest root-to-leaf path.
    fn height(&self) -> usize {
        order::fold_up(self.root(), 0usize, |_, left, right| Some(1 + left.max(right)))
            .unwrap_or_default()
    }

    /// Number of nodes on the shortest root-to-leaf path.
    ///
    /// A missing child is not a leaf, so a node with a single child takes
    /// its minimum height from that child alone.
    fn min_height(&self) -> usize {
        order::fold_up(self.root(), 0usize, |_, left, right| match (left, right) {
            (0, _) | (_, 0) => Some(1 + left + right),
            _ => Some(1 + left.min(right)),
        })
        .unwrap_or_default()
    }

    fn size(&self) -> usize {
        order::fold_up(self.root(), 0usize, |_, left, right| Some(1 + left + right))
            .unwrap_or_default()
    }

    /// Greatest key anywhere in the tree, without relying on the ordering
    /// of a search tree.
    fn max<'a>(&'a self) -> Option<&'a K>
    where
        K: Ord,
        V: 'a,
    {
        self.traverse(Order::PreOrder)
            .into_iter()
            .map(Node::key)
            .max()
    }

    /// Least key anywhere in the tree, without relying on the ordering of a
    /// search tree.
    fn min<'a>(&'a self) -> Option<&'a K>
    where
        K: Ord,
        V: 'a,
    {
        self.traverse(Order::PreOrder)
            .into_iter()
            .map(Node::key)
            .min()
    }

    /// Whether the in-order keys never decrease.
    ///
    /// Equal neighbours are accepted: only a strict decrease between two
    /// adjacent in-order keys makes the tree invalid.
    fn is_valid_search_tree(&self) -> bool
    where
        K: Ord,
    {
        self.traverse(Order::InOrder)
            .into_iter()
            .tuple_windows()
            .all(|(previous, next)| previous.key() <= next.key())
    }

    /// Whether the subtree heights of every node differ by at most one.
    ///
    /// Heights are computed once, bottom-up; the first unbalanced node stops
    /// the pass.
    fn is_height_balanced(&self) -> bool {
        order::fold_up(self.root(), 0usize, |_, left, right| {
            (left.abs_diff(right) <= 1).then(|| 1 + left.max(right))
        })
        .is_some()
    }

    fn to_notation(&self) -> Notation<K>
    where
        K: Clone,
    {
        Notation::from_node(self.root())
    }

    /// Indented diagnostic view: right subtree on top, then the node, then
    /// the left subtree, two spaces per level of depth.
    fn render(&self) -> String
    where
        K: Display,
    {
        let mut out = String::new();
        let mut stack = Vec::new();
        let mut current = self.root().map(|node| (node, 0));

        loop {
            while let Some((node, depth)) = current {
                stack.push((node, depth));
                current = node.right().map(|right| (right, depth + 1));
            }

            let Some((node, depth)) = stack.pop() else {
                break;
            };

            out.push_str(&format!("{}{}\n", "  ".repeat(depth), node.key()));
            current = node.left().map(|left| (left, depth + 1));
        }

        out
    }
}

impl<K, V> BinaryTree<K, V> for Node<K, V> {
    fn root(&self) -> Option<&Node<K, V>> {
        Some(self)
    }
}

/// A binary tree with no ordering requirement on its keys.
#[derive(Clone, PartialEq, Eq)]
pub struct Tree<K, V> {
    pub(crate) root: Link<K, V>,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K, V> Drop for Tree<K, V> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_link(root: Link<K, V>) -> Self {
        Self { root }
    }

    pub fn from_node(root: Node<K, V>) -> Self {
        Self::from_link(Some(Box::new(root)))
    }

    /// Builds a tree shaped exactly like `notation`. Every node starts
    /// without a value.
    pub fn from_notation(notation: Notation<K>) -> Self {
        Self::from_link(notation.into_node().map(Box::new))
    }

    /// Reads a tree from its text notation, e.g. `(5, 3, (None, 2, 6))`.
    pub fn parse(input: &str) -> Result<Self>
    where
        K: FromStr,
        K::Err: Display,
    {
        Ok(Self::from_notation(input.parse()?))
    }

    pub fn root_mut(&mut self) -> Option<&mut Node<K, V>> {
        self.root.as_deref_mut()
    }

    pub(crate) fn take_root(&mut self) -> Link<K, V> {
        self.root.take()
    }
}

impl<K, V> BinaryTree<K, V> for Tree<K, V> {
    fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }
}

impl<K: Display, V> Display for Tree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Lists the nodes in pre-order; each names its children by key.
impl<K: Debug, V: Debug> Debug for Tree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tree")
            .field(&self.traverse(Order::PreOrder))
            .finish()
    }
}

impl<K, V> Arbitrary for Tree<K, V>
where
    K: Arbitrary + Clone + 'static,
    V: Debug + 'static,
{
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        any::<Notation<K>>().prop_map(Self::from_notation).boxed()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use crate::prelude::*;

    fn sample() -> Tree<u32, ()> {
        Tree::parse("((5, 12, None), 3, (2, 7, (None, 8, 1)))").unwrap()
    }

    #[test]
    fn test_metrics_of_sample_tree() {
        let tree = sample();

        assert_eq!(tree.height(), 4);
        assert_eq!(tree.min_height(), 3);
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.max(), Some(&12));
        assert_eq!(tree.min(), Some(&1));
        assert!(!tree.is_valid_search_tree());
    }

    #[test]
    fn test_empty_tree_uses_identity_values() {
        let tree = Tree::<u32, ()>::new();

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.min_height(), 0);
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.max(), None);
        assert_eq!(tree.min(), None);
        assert!(tree.is_valid_search_tree());
        assert!(tree.is_height_balanced());
        assert!(tree.traverse(Order::InOrder).is_empty());
        assert_eq!(tree.to_notation(), Notation::Empty);
        assert_eq!(tree.render(), "");
    }

    #[test]
    fn test_min_height_skips_missing_children() {
        // 1 has only a right child; the shortest path runs through it.
        let tree = Tree::<u32, ()>::parse("(None, 1, (None, 2, 3))").unwrap();

        assert_eq!(tree.min_height(), 3);
        assert_eq!(tree.height(), 3);

        let tree = Tree::<u32, ()>::parse("((4, 2, 5), 1, 3)").unwrap();
        assert_eq!(tree.min_height(), 2);
    }

    #[test]
    fn test_validity_accepts_equal_neighbours() {
        let tree = Tree::<u32, ()>::parse("(2, 2, 3)").unwrap();
        assert!(tree.is_valid_search_tree());

        let tree = Tree::<u32, ()>::parse("(3, 2, 4)").unwrap();
        assert!(!tree.is_valid_search_tree());
    }

    #[test]
    fn test_notation_keeps_explicit_empty_positions() {
        let tree = Tree::<u32, ()>::parse("(5, 3, (None, 2, 6))").unwrap();

        assert_eq!(tree.to_notation().to_string(), "(5, 3, (None, 2, 6))");
    }

    #[test]
    fn test_notation_collapses_childless_nodes() {
        let tree = Tree::<u32, ()>::parse("((None, 5, None), 3, (None, 2, (None, 6, None)))").unwrap();

        assert_eq!(tree.to_notation().to_string(), "(5, 3, (None, 2, 6))");
    }

    #[test]
    fn test_render_puts_right_subtree_on_top() {
        let tree = Tree::<u32, ()>::parse("((1, 2, None), 4, 6)").unwrap();

        assert_eq!(tree.render(), "  6\n4\n  2\n    1\n");
        assert_eq!(tree.to_string(), tree.render());
    }

    #[test]
    fn test_malformed_notation_is_an_error() {
        let error = Tree::<u32, ()>::parse("(1, 2)").unwrap_err();

        assert_eq!(
            error,
            Error::Notation(NotationError::WrongArity {
                position: 0,
                found: 2
            })
        );
    }

    #[test]
    fn test_nodes_are_trees_too() {
        let tree = sample();
        let right = tree.root().and_then(Node::right).unwrap();

        assert_eq!(right.size(), 4);
        assert_eq!(right.height(), 3);
        assert_eq!(right.keys(), [&2, &7, &8, &1]);
    }

    #[proptest(fork = false)]
    fn test_notation_round_trip_is_canonical(notation: Notation<i32>) {
        let tree = Tree::<i32, ()>::from_notation(notation.clone());
        let canonical = notation.canonical();

        prop_assert_eq!(tree.to_notation(), canonical.clone());
        prop_assert_eq!(Tree::<i32, ()>::from_notation(canonical), tree);
    }

    #[proptest(fork = false)]
    fn test_traversals_visit_every_node_once(tree: Tree<u16, ()>) {
        let size = tree.size();

        for order in [Order::PreOrder, Order::InOrder, Order::PostOrder] {
            prop_assert_eq!(tree.traverse(order).len(), size);
        }
    }

    #[proptest(fork = false)]
    fn test_min_height_never_exceeds_height(tree: Tree<u16, ()>) {
        prop_assert!(tree.min_height() <= tree.height());
        prop_assert!(tree.height() <= tree.size());
    }

    #[proptest(fork = false)]
    fn test_extremes_match_all_keys(tree: Tree<i64, ()>) {
        let keys = tree.keys();

        prop_assert_eq!(tree.max(), keys.iter().copied().max());
        prop_assert_eq!(tree.min(), keys.iter().copied().min());
    }

    #[test]
    fn test_degenerate_tree_metrics_do_not_recurse() {
        let mut root = None;
        for key in (0..200_000u32).rev() {
            let mut node = Node::new(key, None::<()>);
            node.right = root;
            root = Some(Box::new(node));
        }
        let tree = Tree::from_link(root);

        assert_eq!(tree.height(), 200_000);
        assert_eq!(tree.min_height(), 200_000);
        assert!(tree.is_valid_search_tree());
        assert!(!tree.is_height_balanced());
    }

    #[test]
    fn test_degenerate_tree_clones_and_compares_without_recursing() {
        let mut root = None;
        for key in (0..200_000u32).rev() {
            let mut node = Node::new(key, Some(key));
            node.right = root;
            root = Some(Box::new(node));
        }
        let tree = Tree::from_link(root);

        let mut copy = tree.clone();
        assert!(copy == tree);
        assert_eq!(copy.size(), 200_000);

        copy.root_mut().unwrap().update(7);
        assert!(copy != tree);

        let debug = format!("{tree:?}");
        assert!(debug.starts_with("Tree([Node { key: 0, value: Some(0), left: None, right: Some(1) }"));
    }

    #[test]
    fn test_debug_lists_nodes_in_pre_order() {
        let tree = Tree::<u32, ()>::parse("(1, 2, None)").unwrap();

        assert_eq!(
            format!("{tree:?}"),
            "Tree([Node { key: 2, value: None, left: Some(1), right: None }, \
             Node { key: 1, value: None, left: None, right: None }])"
        );
    }
}
