//! A key-ordered map backed by a plain binary search tree.
//!
//! The tree never rotates. It grows by plain insertion and is brought back
//! into shape by rebuilding it wholesale from its sorted entries, either
//! after each new key or after each batch of a bulk load.

mod error;

pub mod map;
pub mod prelude;
pub mod search;
pub mod testing;
pub mod tree;

#[doc(hidden)]
/// This is a hidden module to make the macros defined on this crate available for the users.
pub mod __dependencies {
    pub use paste;
    pub use proptest;
    pub use test_strategy;
}

/// Generates the property suite every [`SearchTree`](crate::search::SearchTree)
/// must satisfy, for the given key type.
#[macro_export]
macro_rules! test_search_tree_properties {
    ($key:ty) => {
        $crate::__dependencies::paste::paste! {
            mod [<test_search_tree_$key:snake>] {
                use $crate::__dependencies::{
                    proptest::prelude::*,
                    test_strategy,
                };
                use $crate::{
                    prelude::*,
                    testing::{ceil_log2, distinct_keys, sorted_keys},
                };

                type Key = $key;

                #[test_strategy::proptest(fork = false)]
                fn test_insertion_keeps_keys_increasing(
                    #[strategy(distinct_keys::<Key>(0..64))] keys: Vec<Key>,
                ) {
                    let mut tree = SearchTree::<Key, ()>::new();

                    for key in keys.iter().cloned() {
                        prop_assert!(tree.insert(key, None));
                    }

                    prop_assert!(tree.is_valid_search_tree());
                    prop_assert_eq!(tree.size(), keys.len());
                    prop_assert!(tree.keys().windows(2).all(|pair| pair[0] < pair[1]));
                }

                #[test_strategy::proptest(fork = false)]
                fn test_find_returns_inserted_keys_only(
                    #[strategy(distinct_keys::<Key>(1..64))] keys: Vec<Key>,
                    missing: Key,
                ) {
                    prop_assume!(!keys.contains(&missing));

                    let mut tree = SearchTree::<Key, usize>::new();
                    for (index, key) in keys.iter().cloned().enumerate() {
                        tree.insert(key, Some(index));
                    }

                    for (index, key) in keys.iter().enumerate() {
                        let node = tree.find(key);
                        prop_assert_eq!(node.map(Node::key), Some(key));
                        prop_assert_eq!(node.and_then(Node::value), Some(&index));
                    }

                    prop_assert!(tree.find(&missing).is_none());
                }

                #[test_strategy::proptest(fork = false)]
                fn test_sorted_build_is_balanced(
                    #[strategy(sorted_keys::<Key>(0..128))] keys: Vec<Key>,
                ) {
                    let count = keys.len();
                    let tree = SearchTree::<Key, ()>::from_sorted_keys(keys);

                    prop_assert_eq!(tree.size(), count);
                    prop_assert!(tree.height() <= ceil_log2(count));
                    prop_assert!(tree.is_height_balanced());
                    prop_assert!(tree.is_valid_search_tree());
                }

                #[test_strategy::proptest(fork = false)]
                fn test_rebalance_keeps_entries(mut tree: SearchTree<Key, u8>) {
                    let before = tree
                        .traverse(Order::InOrder)
                        .into_iter()
                        .map(|node| (node.key().clone(), node.value().copied()))
                        .collect::<Vec<_>>();

                    tree.rebalance();

                    let after = tree
                        .traverse(Order::InOrder)
                        .into_iter()
                        .map(|node| (node.key().clone(), node.value().copied()))
                        .collect::<Vec<_>>();

                    prop_assert_eq!(tree.size(), before.len());
                    prop_assert_eq!(after, before);
                    prop_assert!(tree.is_height_balanced());
                    prop_assert!(tree.height() <= ceil_log2(tree.size()));
                }
            }
        }
    };
}

#[macro_export]
macro_rules! prop_assert_changes {
    ($action: expr, $value: expr) => {
        let old_value = $value.clone();

        prop_assert_eq!($value, old_value);

        $action;

        prop_assert_ne!($value, old_value);
    };
}

#[macro_export]
macro_rules! prop_assert_does_not_change {
    ($action: expr, $value: expr) => {
        let old_value = $value.clone();

        $action;

        prop_assert_eq!($value, old_value);
    };
}
