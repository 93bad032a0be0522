use super::Node;

/// The visiting order of a depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. Sorted for a search tree.
    #[default]
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
}

pub(crate) fn traverse<K, V>(root: Option<&Node<K, V>>, order: Order) -> Vec<&Node<K, V>> {
    match order {
        Order::PreOrder => pre_order(root),
        Order::InOrder => in_order(root),
        Order::PostOrder => post_order(root),
    }
}

fn pre_order<K, V>(root: Option<&Node<K, V>>) -> Vec<&Node<K, V>> {
    let mut nodes = Vec::new();
    let mut stack: Vec<&Node<K, V>> = root.into_iter().collect();

    while let Some(node) = stack.pop() {
        nodes.push(node);
        stack.extend(node.right());
        stack.extend(node.left());
    }

    nodes
}

fn in_order<K, V>(root: Option<&Node<K, V>>) -> Vec<&Node<K, V>> {
    let mut nodes = Vec::new();
    let mut stack = Vec::new();
    let mut current = root;

    loop {
        while let Some(node) = current {
            stack.push(node);
            current = node.left();
        }

        let Some(node) = stack.pop() else {
            break;
        };

        nodes.push(node);
        current = node.right();
    }

    nodes
}

fn post_order<K, V>(root: Option<&Node<K, V>>) -> Vec<&Node<K, V>> {
    // Mirrored pre-order (node, right, left), reversed.
    let mut nodes = Vec::new();
    let mut stack: Vec<&Node<K, V>> = root.into_iter().collect();

    while let Some(node) = stack.pop() {
        nodes.push(node);
        stack.extend(node.left());
        stack.extend(node.right());
    }

    nodes.reverse();
    nodes
}

/// Folds a tree from the leaves up in a single post-order pass.
///
/// `f` receives a node together with the folded results of its left and
/// right subtrees, `empty` standing in for a missing subtree. Returning
/// `None` from `f` aborts the whole fold.
pub(crate) fn fold_up<K, V, T, F>(root: Option<&Node<K, V>>, empty: T, mut f: F) -> Option<T>
where
    T: Copy,
    F: FnMut(&Node<K, V>, T, T) -> Option<T>,
{
    let mut results: Vec<T> = Vec::new();

    for node in post_order(root) {
        // The right subtree finished last, so its result sits on top.
        let right = match node.right {
            Some(_) => results.pop()?,
            None => empty,
        };
        let left = match node.left {
            Some(_) => results.pop()?,
            None => empty,
        };

        results.push(f(node, left, right)?);
    }

    Some(results.pop().unwrap_or(empty))
}
