//! Error types for the postman core library.
//!
//! Every failure carries a stable machine-readable code and belongs to one of
//! three broad kinds: malformed input, a disconnected graph, or a graph too
//! small to eulerize.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Broad classification of [`PostmanError`] variants.
///
/// Callers that only care about the recovery policy branch on the kind: an
/// [`PostmanErrorKind::InvalidArgument`] is never worth retrying, while a
/// [`PostmanErrorKind::Disconnected`] sample may be discarded and redrawn.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PostmanErrorKind {
    /// Malformed input supplied to a pipeline stage.
    InvalidArgument,
    /// Eulerization was requested on a graph whose edges are not connected.
    Disconnected,
    /// The graph is too small or empty to eulerize.
    DegenerateInput,
}

/// Error type produced by the pipeline stages.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PostmanError {
    /// A degree sequence must describe at least one vertex.
    #[error("vertex count must be at least 1 (got 0)")]
    ZeroVertexCount,
    /// Stubs cannot be paired when the degree sum is odd.
    #[error("degree sequence sums to {sum}, which is odd; every stub needs a partner")]
    OddDegreeSum {
        /// Sum of the rejected degree sequence.
        sum: usize,
    },
    /// Text supplied as a vertex count was not a positive integer.
    #[error("`{input}` is not a positive vertex count")]
    InvalidVertexCount {
        /// Raw text that failed to parse.
        input: Arc<str>,
    },
    /// Text supplied as a degree sequence could not be parsed.
    #[error("`{input}` is not a comma-separated list of degrees")]
    InvalidDegreeSequence {
        /// Raw text that failed to parse.
        input: Arc<str>,
    },
    /// An edge referenced a vertex outside the graph.
    #[error("edge references vertex {vertex}, but vertex_count is {vertex_count}")]
    VertexOutOfRange {
        /// The offending vertex index.
        vertex: usize,
        /// Number of vertices in the graph under construction.
        vertex_count: usize,
    },
    /// The pipeline must be allowed at least one attempt.
    #[error("max_attempts must be at least 1 (got 0)")]
    InvalidAttemptCount,
    /// Two vertices carrying edges have no connecting walk.
    #[error("graph is disconnected: no walk connects vertex {left} to vertex {right}")]
    Disconnected {
        /// A vertex in the component containing the first edge.
        left: usize,
        /// A vertex with edges outside that component.
        right: usize,
    },
    /// The graph has fewer than two vertices or no edges.
    #[error("cannot eulerize a graph with {vertex_count} vertices and {edge_count} edges")]
    DegenerateInput {
        /// Number of vertices in the rejected graph.
        vertex_count: usize,
        /// Number of edges in the rejected graph.
        edge_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`PostmanError`] variants.
    enum PostmanErrorCode for PostmanError {
        /// A degree sequence must describe at least one vertex.
        ZeroVertexCount => ZeroVertexCount => "POSTMAN_ZERO_VERTEX_COUNT",
        /// Stubs cannot be paired when the degree sum is odd.
        OddDegreeSum => OddDegreeSum { .. } => "POSTMAN_ODD_DEGREE_SUM",
        /// Text supplied as a vertex count was not a positive integer.
        InvalidVertexCount => InvalidVertexCount { .. } => "POSTMAN_INVALID_VERTEX_COUNT",
        /// Text supplied as a degree sequence could not be parsed.
        InvalidDegreeSequence => InvalidDegreeSequence { .. } => "POSTMAN_INVALID_DEGREE_SEQUENCE",
        /// An edge referenced a vertex outside the graph.
        VertexOutOfRange => VertexOutOfRange { .. } => "POSTMAN_VERTEX_OUT_OF_RANGE",
        /// The pipeline must be allowed at least one attempt.
        InvalidAttemptCount => InvalidAttemptCount => "POSTMAN_INVALID_ATTEMPT_COUNT",
        /// Two vertices carrying edges have no connecting walk.
        Disconnected => Disconnected { .. } => "POSTMAN_DISCONNECTED",
        /// The graph has fewer than two vertices or no edges.
        DegenerateInput => DegenerateInput { .. } => "POSTMAN_DEGENERATE_INPUT",
    }
}

impl PostmanError {
    /// Classifies the error into its [`PostmanErrorKind`].
    ///
    /// # Examples
    /// ```
    /// use postman_core::{PostmanError, PostmanErrorKind};
    ///
    /// let err = PostmanError::OddDegreeSum { sum: 5 };
    /// assert_eq!(err.kind(), PostmanErrorKind::InvalidArgument);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> PostmanErrorKind {
        match self {
            Self::Disconnected { .. } => PostmanErrorKind::Disconnected,
            Self::DegenerateInput { .. } => PostmanErrorKind::DegenerateInput,
            Self::ZeroVertexCount
            | Self::OddDegreeSum { .. }
            | Self::InvalidVertexCount { .. }
            | Self::InvalidDegreeSequence { .. }
            | Self::VertexOutOfRange { .. }
            | Self::InvalidAttemptCount => PostmanErrorKind::InvalidArgument,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, PostmanError>;
