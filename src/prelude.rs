pub use crate::{
    error::*,
    map::{LoadReport, MapConfig, OrderedMap, DEFAULT_BATCH_SIZE},
    search::SearchTree,
    tree::{BinaryTree, Node, Notation, Order, Tree},
};

/// A value that carries its own key, such as a user record keyed by its id.
///
/// Bulk loads into an [`OrderedMap`] store each record under its id.
pub trait Record {
    type Id;

    fn id(&self) -> Self::Id;
}
