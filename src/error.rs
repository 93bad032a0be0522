use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures while reading a tree written in triple notation, such as
/// `((5, 12, None), 3, (2, 7, (None, 8, 1)))`.
///
/// Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum NotationError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected `{found}` at {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("triple at {position} has {found} elements, expected 3")]
    WrongArity { position: usize, found: usize },

    #[error("triple at {position} must have a bare key in the middle")]
    NonTerminalKey { position: usize },

    #[error("invalid key `{token}` at {position}: {reason}")]
    InvalidKey {
        position: usize,
        token: String,
        reason: String,
    },

    #[error("trailing input at {position}")]
    TrailingInput { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("malformed notation: {0}")]
    Notation(#[from] NotationError),

    #[error("invalid batch size {0}, must be at least 1")]
    InvalidBatchSize(usize),

    #[error("tree does not satisfy the search tree ordering")]
    NotASearchTree,
}
