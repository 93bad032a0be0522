use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use proptest::prelude::*;

use super::Node;
use crate::error::NotationError;

/// A binary tree written as nested `(left, key, right)` triples.
///
/// A position holds either a triple, a bare key (a leaf), or `None` (no
/// subtree). In text form: `((5, 12, None), 3, (2, 7, (None, 8, 1)))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Notation<K> {
    Empty,
    Leaf(K),
    Branch(Box<Notation<K>>, K, Box<Notation<K>>),
}

impl<K> Notation<K> {
    pub fn branch(left: Self, key: K, right: Self) -> Self {
        Self::Branch(Box::new(left), key, Box::new(right))
    }

    /// Rewrites every `(None, key, None)` triple as a bare key, which is the
    /// form a tree converts back into.
    pub fn canonical(self) -> Self {
        match self {
            Self::Branch(left, key, right) => match (left.canonical(), right.canonical()) {
                (Self::Empty, Self::Empty) => Self::Leaf(key),
                (left, right) => Self::branch(left, key, right),
            },
            other => other,
        }
    }

    pub(crate) fn into_node<V>(self) -> Option<Node<K, V>> {
        match self {
            Self::Empty => None,
            Self::Leaf(key) => Some(Node::new(key, None)),
            Self::Branch(left, key, right) => Some(Node::with_children(
                left.into_node(),
                key,
                None,
                right.into_node(),
            )),
        }
    }

    pub(crate) fn from_node<V>(node: Option<&Node<K, V>>) -> Self
    where
        K: Clone,
    {
        match node {
            None => Self::Empty,
            Some(node) if node.is_leaf() => Self::Leaf(node.key().clone()),
            Some(node) => Self::branch(
                Self::from_node(node.left()),
                node.key().clone(),
                Self::from_node(node.right()),
            ),
        }
    }
}

impl<K: Display> Display for Notation<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "None"),
            Self::Leaf(key) => write!(f, "{key}"),
            Self::Branch(left, key, right) => write!(f, "({left}, {key}, {right})"),
        }
    }
}

impl<K> FromStr for Notation<K>
where
    K: FromStr,
    K::Err: Display,
{
    type Err = NotationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input, position: 0 };

        let notation = parser.notation()?;
        parser.skip_whitespace();

        if parser.position < input.len() {
            return Err(NotationError::TrailingInput {
                position: parser.position,
            });
        }

        Ok(notation)
    }
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        self.position += rest.len() - rest.trim_start().len();
    }

    fn notation<K>(&mut self) -> Result<Notation<K>, NotationError>
    where
        K: FromStr,
        K::Err: Display,
    {
        self.skip_whitespace();

        match self.peek() {
            None => Err(NotationError::UnexpectedEnd),
            Some('(') => self.triple(),
            Some(found @ (')' | ',')) => Err(NotationError::UnexpectedChar {
                position: self.position,
                found,
            }),
            Some(_) => self.terminal(),
        }
    }

    fn triple<K>(&mut self) -> Result<Notation<K>, NotationError>
    where
        K: FromStr,
        K::Err: Display,
    {
        let start = self.position;
        self.position += 1;
        self.skip_whitespace();

        let mut items = Vec::with_capacity(3);

        if self.peek() != Some(')') {
            items.push(self.notation()?);

            loop {
                self.skip_whitespace();

                match self.peek() {
                    Some(',') => {
                        self.position += 1;
                        items.push(self.notation()?);
                    }
                    Some(')') => break,
                    Some(found) => {
                        return Err(NotationError::UnexpectedChar {
                            position: self.position,
                            found,
                        })
                    }
                    None => return Err(NotationError::UnexpectedEnd),
                }
            }
        }

        // Consume the closing parenthesis.
        self.position += 1;

        let [left, key, right]: [Notation<K>; 3] = items.try_into().map_err(|items: Vec<_>| {
            NotationError::WrongArity {
                position: start,
                found: items.len(),
            }
        })?;

        match key {
            Notation::Leaf(key) => Ok(Notation::branch(left, key, right)),
            _ => Err(NotationError::NonTerminalKey { position: start }),
        }
    }

    fn terminal<K>(&mut self) -> Result<Notation<K>, NotationError>
    where
        K: FromStr,
        K::Err: Display,
    {
        let start = self.position;
        let rest = &self.input[start..];
        let end = rest.find(['(', ')', ',']).unwrap_or(rest.len());

        self.position += end;

        match rest[..end].trim_end() {
            "None" => Ok(Notation::Empty),
            token => token
                .parse()
                .map(Notation::Leaf)
                .map_err(|error: K::Err| NotationError::InvalidKey {
                    position: start,
                    token: token.to_string(),
                    reason: error.to_string(),
                }),
        }
    }
}

impl<K> Arbitrary for Notation<K>
where
    K: Arbitrary + Clone + 'static,
{
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let terminal = prop_oneof![
            1 => Just(Self::Empty),
            3 => any::<K>().prop_map(Self::Leaf),
        ];

        terminal
            .prop_recursive(6, 64, 3, |inner| {
                (inner.clone(), any::<K>(), inner)
                    .prop_map(|(left, key, right)| Self::branch(left, key, right))
            })
            .boxed()
    }
}
