use std::{borrow::Borrow, convert::Infallible, fmt::Display};

use tracing::{debug, info, warn};

use crate::prelude::*;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    /// Number of records a bulk load takes in before rebuilding the tree.
    pub batch_size: usize,

    /// Rebuild the tree after every insertion of a new key.
    pub rebalance_on_insert: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            rebalance_on_insert: true,
        }
    }
}

impl MapConfig {
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    pub fn with_rebalance_on_insert(self, rebalance_on_insert: bool) -> Self {
        Self {
            rebalance_on_insert,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchSize(self.batch_size));
        }

        Ok(())
    }
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records consumed from the input, new keys and updates alike.
    pub loaded: usize,

    /// Full rebuilds done by the load itself, one per batch plus the final
    /// one once the input runs out.
    pub rebalances: usize,
}

/// A key-ordered map on top of a [`SearchTree`].
///
/// Unlike [`SearchTree::insert`], writing an existing key replaces its
/// value. The tree is kept in shape by full rebuilds instead of rotations:
/// after each new key (see [`MapConfig::rebalance_on_insert`]) and after
/// every batch of a bulk load.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    tree: SearchTree<K, V>,
    len: usize,
    config: MapConfig,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            tree: SearchTree::default(),
            len: 0,
            config: MapConfig::default(),
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Updates the value of a known key in place, or inserts the key and
    /// rebuilds the tree. Returns the previous value, if any.
    pub fn insert_or_update(&mut self, key: K, value: V) -> Option<V> {
        if let Some(node) = self.tree.find_mut(&key) {
            return node.update(value);
        }

        self.tree.insert(key, Some(value));
        self.len += 1;

        if self.config.rebalance_on_insert {
            self.tree.rebalance();
        }

        None
    }

    pub fn lookup<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)?.value()
    }

    pub fn lookup_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find_mut(key)?.value_mut()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Loads every record, keyed by its id, rebuilding the tree after each
    /// `batch_size` records and once more at the end of the input.
    pub fn bulk_load<I>(&mut self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = V>,
        V: Record<Id = K>,
    {
        match self.try_bulk_load(records.into_iter().map(Ok::<_, Infallible>)) {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }

    /// Like [`OrderedMap::bulk_load`], for inputs that can fail midway.
    ///
    /// The first error is returned as is. Records stored before it stay in
    /// the map, but the tree is not rebuilt for the interrupted batch.
    pub fn try_bulk_load<I, E>(&mut self, records: I) -> Result<LoadReport, E>
    where
        I: IntoIterator<Item = Result<V, E>>,
        V: Record<Id = K>,
    {
        let batch_size = self.config.batch_size;
        let mut records = records.into_iter();
        let mut report = LoadReport::default();

        loop {
            let mut taken = 0;

            for record in records.by_ref().take(batch_size) {
                let record = record.inspect_err(|_| {
                    warn!(loaded = report.loaded, "bulk load interrupted by input error");
                })?;

                self.insert_or_update(record.id(), record);
                taken += 1;
                report.loaded += 1;
            }

            self.tree.rebalance();
            report.rebalances += 1;
            debug!(batch = report.rebalances, taken, len = self.len, "rebalanced after batch");

            if taken < batch_size {
                break;
            }
        }

        info!(
            loaded = report.loaded,
            rebalances = report.rebalances,
            len = self.len,
            "bulk load finished"
        );

        Ok(report)
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Number of distinct keys, counted as they are inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.tree
            .traverse(Order::InOrder)
            .into_iter()
            .filter_map(|node| Some((node.key(), node.value()?)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    pub fn rebalance(&mut self) {
        self.tree.rebalance();
    }

    pub fn tree(&self) -> &SearchTree<K, V> {
        &self.tree
    }

    pub fn render(&self) -> String
    where
        K: Display,
    {
        self.tree.render()
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.insert_or_update(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut map = Self::new();
        map.extend(entries);
        map
    }
}
