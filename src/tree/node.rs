use std::{
    cmp::Ordering,
    fmt::{self, Debug},
};

/// An owned subtree, or the empty tree.
pub type Link<K, V> = Option<Box<Node<K, V>>>;

/// A single vertex of a binary tree.
///
/// Every node exclusively owns its children, so a tree can never share
/// subtrees or contain cycles. The value is an opaque, optional payload.
///
/// Cloning, comparing and debug-printing walk the subtree with an explicit
/// stack, so a degenerate chain of any length is handled.
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: Option<V>) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }

    pub fn with_children(left: Option<Self>, key: K, value: Option<V>, right: Option<Self>) -> Self {
        Self {
            key,
            value,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    /// Replaces the payload in place, returning the previous one.
    pub fn update(&mut self, value: V) -> Option<V> {
        self.value.replace(value)
    }

    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn into_entry(self) -> (K, Option<V>) {
        (self.key, self.value)
    }
}

impl<K: Clone, V: Clone> Clone for Node<K, V> {
    fn clone(&self) -> Self {
        let mut copy = Node::new(self.key.clone(), self.value.clone());

        {
            let mut pending = Vec::new();
            push_children(&mut pending, self, &mut copy);

            while let Some((source, slot)) = pending.pop() {
                let target = slot.insert(Box::new(Node::new(
                    source.key.clone(),
                    source.value.clone(),
                )));
                push_children(&mut pending, source, target);
            }
        }

        copy
    }
}

fn push_children<'s, 't, K, V>(
    pending: &mut Vec<(&'s Node<K, V>, &'t mut Link<K, V>)>,
    source: &'s Node<K, V>,
    target: &'t mut Node<K, V>,
) {
    let Node { left, right, .. } = target;

    if let Some(child) = source.left() {
        pending.push((child, left));
    }
    if let Some(child) = source.right() {
        pending.push((child, right));
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((this, that)) = pending.pop() {
            if this.key != that.key || this.value != that.value {
                return false;
            }

            for children in [(this.left(), that.left()), (this.right(), that.right())] {
                match children {
                    (Some(this), Some(that)) => pending.push((this, that)),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }

        true
    }
}

impl<K: Eq, V: Eq> Eq for Node<K, V> {}

/// Shows a single node, naming its children by key only.
impl<K: Debug, V: Debug> Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("left", &self.left().map(Node::key))
            .field("right", &self.right().map(Node::key))
            .finish()
    }
}

/// Descends from `link` by key comparison and installs a new node at the
/// first empty position. An exact key match leaves the tree untouched.
pub(crate) fn insert<K: Ord, V>(link: &mut Link<K, V>, key: K, value: Option<V>) -> bool {
    let mut cursor = link;

    while let Some(node) = cursor {
        cursor = match key.cmp(&node.key) {
            Ordering::Less => &mut node.left,
            Ordering::Greater => &mut node.right,
            Ordering::Equal => return false,
        };
    }

    *cursor = Some(Box::new(Node::new(key, value)));
    true
}

/// Consumes a subtree, yielding its entries in in-order sequence.
pub(crate) fn into_entries<K, V>(link: Link<K, V>) -> Vec<(K, Option<V>)> {
    let mut entries = Vec::new();
    let mut stack: Vec<Box<Node<K, V>>> = Vec::new();
    let mut current = link;

    loop {
        while let Some(mut node) = current {
            current = node.left.take();
            stack.push(node);
        }

        let Some(mut node) = stack.pop() else {
            break;
        };

        current = node.right.take();
        entries.push(node.into_entry());
    }

    entries
}

/// Builds a height-balanced subtree out of entries sorted by key, rooting
/// every subtree at the lower middle element.
pub(crate) fn build_balanced<K, V>(mut entries: Vec<(K, Option<V>)>) -> Link<K, V> {
    let mid = entries.len().checked_sub(1)? / 2;
    let right = entries.split_off(mid + 1);
    let (key, value) = entries.pop()?;

    Some(Box::new(Node {
        key,
        value,
        left: build_balanced(entries),
        right: build_balanced(right),
    }))
}

/// Drops a subtree without recursing, so a degenerate (list shaped) tree
/// cannot exhaust the stack.
pub(crate) fn dismantle<K, V>(link: Link<K, V>) {
    let mut stack: Vec<Box<Node<K, V>>> = link.into_iter().collect();

    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;
    use crate::testing::{ceil_log2, sorted_keys};

    fn keys<K: Clone, V>(link: &Link<K, V>) -> Vec<K> {
        match link {
            None => Vec::new(),
            Some(node) => [keys(&node.left), vec![node.key.clone()], keys(&node.right)].concat(),
        }
    }

    fn depth<K, V>(link: &Link<K, V>) -> usize {
        link.as_ref()
            .map_or(0, |node| 1 + depth(&node.left).max(depth(&node.right)))
    }

    #[test]
    fn test_update_replaces_value_in_place() {
        let mut node = Node::new(1, Some("a"));

        assert_eq!(node.update("b"), Some("a"));
        assert_eq!(node.value(), Some(&"b"));

        let mut empty = Node::<u8, &str>::new(2, None);
        assert_eq!(empty.update("c"), None);
        assert_eq!(empty.value(), Some(&"c"));
    }

    #[test]
    fn test_insert_is_a_noop_on_duplicate_keys() {
        let mut root = None;

        assert!(insert(&mut root, 5, Some("five")));
        assert!(insert(&mut root, 3, Some("three")));
        assert!(!insert(&mut root, 5, Some("other")));

        let root = root.unwrap();
        assert_eq!(root.value(), Some(&"five"));
        assert_eq!(root.left().map(Node::key), Some(&3));
        assert!(root.right().is_none());
    }

    #[test]
    fn test_build_balanced_of_nothing_is_empty() {
        assert!(build_balanced::<u8, ()>(Vec::new()).is_none());
    }

    #[test]
    fn test_build_balanced_roots_at_lower_middle() {
        let root = build_balanced(vec![(1, None::<()>), (2, None), (3, None), (4, None)]).unwrap();

        assert_eq!(root.key, 2);
        assert_eq!(root.left().map(Node::key), Some(&1));
        assert_eq!(root.right().map(Node::key), Some(&3));
        assert_eq!(root.right().and_then(Node::right).map(Node::key), Some(&4));
    }

    #[proptest(fork = false)]
    fn test_build_balanced_keeps_order_and_bounds_height(
        #[strategy(sorted_keys::<u32>(0..200))] sorted: Vec<u32>,
    ) {
        let link = build_balanced(sorted.iter().map(|k| (*k, None::<()>)).collect());

        prop_assert_eq!(keys(&link), sorted.clone());
        prop_assert!(depth(&link) <= ceil_log2(sorted.len()));
    }

    #[proptest(fork = false)]
    fn test_into_entries_is_sorted_for_inserted_keys(keys_in: Vec<u16>) {
        let mut root = None;
        for key in keys_in.iter() {
            insert(&mut root, *key, Some(*key));
        }

        let mut expected = keys_in.clone();
        expected.sort_unstable();
        expected.dedup();

        let entries = into_entries(root);
        prop_assert_eq!(
            entries.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            expected
        );
        prop_assert!(entries.iter().all(|(k, v)| Some(*k) == *v));
    }

    #[test]
    fn test_dismantle_handles_degenerate_trees() {
        let mut root: Link<u32, ()> = None;
        for key in (0..200_000).rev() {
            root = Some(Box::new(Node {
                key,
                value: None,
                left: None,
                right: root,
            }));
        }

        dismantle(root);
    }

    #[test]
    fn test_clone_and_eq_compare_whole_subtrees() {
        let node = Node::with_children(
            Some(Node::new(1, Some('a'))),
            2,
            Some('b'),
            Some(Node::with_children(None, 4, None, Some(Node::new(5, Some('e'))))),
        );
        let mut copy = node.clone();

        assert!(copy == node);
        assert_eq!(format!("{copy:?}"), format!("{node:?}"));

        let deepest = copy
            .right
            .as_deref_mut()
            .and_then(|right| right.right.as_deref_mut())
            .unwrap();
        deepest.update('x');
        assert!(copy != node);

        let mut pruned = node.clone();
        pruned.left = None;
        assert!(pruned != node);
    }

    #[test]
    fn test_debug_names_children_by_key() {
        let node = Node::with_children(Some(Node::new(1, None::<()>)), 2, None, None);

        assert_eq!(
            format!("{node:?}"),
            "Node { key: 2, value: None, left: Some(1), right: None }"
        );
    }
}
