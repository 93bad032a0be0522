use proptest::{
    collection::{btree_map, btree_set},
    prelude::*,
    sample::SizeRange,
};

/// Distinct keys in ascending order.
pub fn sorted_keys<K>(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<K>>
where
    K: Arbitrary + Ord,
{
    btree_set(any::<K>(), size).prop_map(|keys| keys.into_iter().collect())
}

/// Distinct keys in arbitrary order, the way they would arrive from users.
pub fn distinct_keys<K>(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<K>>
where
    K: Arbitrary + Ord,
{
    sorted_keys(size).prop_shuffle()
}

/// Key/value pairs with distinct keys, in arbitrary order.
pub fn entries<K, V>(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<(K, V)>>
where
    K: Arbitrary + Ord,
    V: Arbitrary,
{
    btree_map(any::<K>(), any::<V>(), size)
        .prop_map(|entries| entries.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// `ceil(log2(n + 1))`, the height of a perfectly balanced tree of `n`
/// nodes.
pub fn ceil_log2(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}
