use std::{borrow::Borrow, cmp::Ordering};

use proptest::prelude::*;
use tracing::trace;

use crate::{
    prelude::*,
    testing::entries,
    tree::{self, Link},
};

/// A binary search tree: every key in a left subtree is less than its
/// node's key, every key in a right subtree is greater.
///
/// Mutating the shape is limited to [`SearchTree::insert`], which never
/// rotates, and [`SearchTree::rebalance`], which rebuilds the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTree<K, V> {
    tree: Tree<K, V>,
}

impl<K, V> Default for SearchTree<K, V> {
    fn default() -> Self {
        Self {
            tree: Tree::default(),
        }
    }
}

impl<K, V> BinaryTree<K, V> for SearchTree<K, V> {
    fn root(&self) -> Option<&Node<K, V>> {
        self.tree.root()
    }
}

impl<K, V> SearchTree<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_link(root: Link<K, V>) -> Self {
        Self {
            tree: Tree::from_link(root),
        }
    }

    /// Builds a height-balanced tree from entries already sorted by key.
    ///
    /// Each subtree is rooted at the middle entry of its range, so `n`
    /// entries give a height of `ceil(log2(n + 1))`.
    pub fn from_sorted_entries(entries: impl IntoIterator<Item = (K, Option<V>)>) -> Self {
        Self::from_link(tree::build_balanced(entries.into_iter().collect()))
    }

    /// Same as [`SearchTree::from_sorted_entries`], with every value absent.
    pub fn from_sorted_keys(keys: impl IntoIterator<Item = K>) -> Self {
        Self::from_sorted_entries(keys.into_iter().map(|key| (key, None)))
    }

    /// Same as [`SearchTree::from_sorted_entries`], copying key and value
    /// out of existing nodes.
    pub fn from_sorted_nodes(nodes: &[&Node<K, V>]) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self::from_sorted_entries(
            nodes
                .iter()
                .map(|node| (node.key().clone(), node.value().cloned())),
        )
    }

    pub fn as_tree(&self) -> &Tree<K, V> {
        &self.tree
    }

    pub fn into_tree(self) -> Tree<K, V> {
        self.tree
    }

    /// Rebuilds the tree into its height-balanced form, keeping every key
    /// and value.
    pub fn rebalance(&mut self) {
        let entries = tree::into_entries(self.tree.take_root());
        trace!(size = entries.len(), "rebuilding search tree");

        self.tree = Tree::from_link(tree::build_balanced(entries));
    }
}

impl<K: Ord, V> SearchTree<K, V> {
    /// Walks down from the root by key comparison. The cost is the depth of
    /// the match, which is only logarithmic for a balanced tree.
    pub fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root();

        while let Some(node) = current {
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(node),
            };
        }

        None
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.tree.root_mut();

        while let Some(node) = current {
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(node),
            };
        }

        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Places a new node at the empty position where a search for `key`
    /// ends, returning whether anything was inserted.
    ///
    /// A key that is already present is left alone together with its
    /// value; use [`Node::update`] through [`SearchTree::find_mut`] to
    /// replace a value.
    pub fn insert(&mut self, key: K, value: Option<V>) -> bool {
        tree::insert(&mut self.tree.root, key, value)
    }
}

impl<K: Ord, V> TryFrom<Tree<K, V>> for SearchTree<K, V> {
    type Error = Error;

    fn try_from(tree: Tree<K, V>) -> Result<Self> {
        if !tree.is_valid_search_tree() {
            return Err(Error::NotASearchTree);
        }

        Ok(Self { tree })
    }
}

impl<K, V> Arbitrary for SearchTree<K, V>
where
    K: Arbitrary + Ord + 'static,
    V: Arbitrary + 'static,
{
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        entries::<K, V>(0..64)
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .fold(Self::new(), |mut tree, (key, value)| {
                        tree.insert(key, Some(value));
                        tree
                    })
            })
            .boxed()
    }
}
