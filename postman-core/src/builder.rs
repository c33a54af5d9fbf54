//! Builder utilities for configuring pipeline runs.
//!
//! Exposes the graph source selection surface and the validation applied
//! before constructing [`Pipeline`] instances.

use std::num::NonZeroUsize;

use crate::{
    Result, degree::DegreeSequence, error::PostmanError, layout::DEFAULT_LAYOUT_ITERATIONS,
    pipeline::Pipeline,
};

/// Vertex count sampled when no source is configured.
pub const DEFAULT_VERTEX_COUNT: usize = 10;

/// Where a pipeline run obtains its degree sequence.
///
/// # Examples
/// ```
/// use postman_core::{DegreeSequence, GraphSource};
///
/// let fixed = GraphSource::Degrees(DegreeSequence::new(vec![2, 2, 2]));
/// assert_eq!(fixed.vertex_count(), 3);
/// assert_eq!(GraphSource::Sampled { vertex_count: 8 }.vertex_count(), 8);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GraphSource {
    /// Draw a fresh degree sequence of the given length on every attempt.
    Sampled {
        /// Number of vertices to sample degrees for.
        vertex_count: usize,
    },
    /// Reuse a caller-supplied degree sequence on every attempt.
    Degrees(DegreeSequence),
}

impl GraphSource {
    /// Returns the number of vertices the source describes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Sampled { vertex_count } => *vertex_count,
            Self::Degrees(sequence) => sequence.len(),
        }
    }
}

/// Configures and constructs [`Pipeline`] instances.
///
/// # Examples
/// ```
/// use postman_core::PipelineBuilder;
///
/// let pipeline = PipelineBuilder::new()
///     .with_vertex_count(12)
///     .with_seed(6969)
///     .with_max_attempts(3)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(pipeline.max_attempts().get(), 3);
/// assert_eq!(pipeline.seed(), Some(6969));
/// ```
#[derive(Clone, Debug)]
pub struct PipelineBuilder {
    source: GraphSource,
    seed: Option<u64>,
    max_attempts: usize,
    eulerize: bool,
    layout_iterations: usize,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            source: GraphSource::Sampled {
                vertex_count: DEFAULT_VERTEX_COUNT,
            },
            seed: None,
            max_attempts: 1,
            eulerize: true,
            layout_iterations: DEFAULT_LAYOUT_ITERATIONS,
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use postman_core::{GraphSource, PipelineBuilder};
    ///
    /// let builder = PipelineBuilder::new();
    /// assert_eq!(builder.source(), &GraphSource::Sampled { vertex_count: 10 });
    /// assert_eq!(builder.max_attempts(), 1);
    /// assert!(builder.eulerizes());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples a degree sequence of `vertex_count` entries on each attempt.
    #[must_use]
    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.source = GraphSource::Sampled { vertex_count };
        self
    }

    /// Uses `sequence` instead of sampling degrees.
    ///
    /// # Examples
    /// ```
    /// use postman_core::{DegreeSequence, PipelineBuilder};
    ///
    /// let builder = PipelineBuilder::new().with_degrees(DegreeSequence::new(vec![2, 2, 2, 2]));
    /// assert_eq!(builder.source().vertex_count(), 4);
    /// ```
    #[must_use]
    pub fn with_degrees(mut self, sequence: DegreeSequence) -> Self {
        self.source = GraphSource::Degrees(sequence);
        self
    }

    /// Returns the configured graph source.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> &GraphSource { &self.source }

    /// Fixes the base seed so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured base seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> Option<u64> { self.seed }

    /// Sets how many samples may be drawn before a disconnected graph is
    /// reported as an error.
    ///
    /// # Examples
    /// ```
    /// use postman_core::PipelineBuilder;
    ///
    /// let builder = PipelineBuilder::new().with_max_attempts(5);
    /// assert_eq!(builder.max_attempts(), 5);
    /// ```
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Returns the configured attempt budget.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_attempts(&self) -> usize { self.max_attempts }

    /// Enables or disables eulerization before the walk search.
    #[must_use]
    pub fn with_eulerize(mut self, eulerize: bool) -> Self {
        self.eulerize = eulerize;
        self
    }

    /// Returns whether eulerization is enabled.
    #[must_use]
    #[rustfmt::skip]
    pub fn eulerizes(&self) -> bool { self.eulerize }

    /// Sets the spring layout iteration count.
    #[must_use]
    pub fn with_layout_iterations(mut self, iterations: usize) -> Self {
        self.layout_iterations = iterations;
        self
    }

    /// Returns the spring layout iteration count.
    #[must_use]
    #[rustfmt::skip]
    pub fn layout_iterations(&self) -> usize { self.layout_iterations }

    /// Validates the configuration and constructs a [`Pipeline`].
    ///
    /// # Errors
    /// Returns [`PostmanError::ZeroVertexCount`] for an empty source,
    /// [`PostmanError::OddDegreeSum`] for a fixed sequence with an odd sum,
    /// and [`PostmanError::InvalidAttemptCount`] when `max_attempts` is zero.
    ///
    /// # Examples
    /// ```
    /// use postman_core::{PipelineBuilder, PostmanError};
    ///
    /// let err = PipelineBuilder::new()
    ///     .with_vertex_count(0)
    ///     .build()
    ///     .expect_err("zero vertices are rejected");
    /// assert_eq!(err, PostmanError::ZeroVertexCount);
    /// ```
    pub fn build(self) -> Result<Pipeline> {
        if self.source.vertex_count() == 0 {
            return Err(PostmanError::ZeroVertexCount);
        }
        if let GraphSource::Degrees(sequence) = &self.source
            && !sequence.has_even_sum()
        {
            return Err(PostmanError::OddDegreeSum {
                sum: sequence.sum(),
            });
        }
        let max_attempts =
            NonZeroUsize::new(self.max_attempts).ok_or(PostmanError::InvalidAttemptCount)?;

        Ok(Pipeline::new(
            self.source,
            self.seed,
            max_attempts,
            self.eulerize,
            self.layout_iterations,
        ))
    }
}
