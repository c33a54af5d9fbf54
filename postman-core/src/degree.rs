//! Degree sequences and the seeded sampler that produces them.
//!
//! Sampled degrees are drawn uniformly from `{2, 4, 6}`, which keeps every
//! sequence even-summed and small enough for instructional graphs. Explicit
//! sequences may hold any non-negative degrees; their parity is checked by
//! the configuration-model builder rather than corrected here.

use std::{ops::Deref, str::FromStr, sync::Arc};

use rand::Rng;
use tracing::{debug, instrument};

use crate::{Result, error::PostmanError, rng::seeded_rng};

/// Smallest multiplier drawn by the sampler; degrees are `2 * multiplier`.
const MIN_HALF_DEGREE: usize = 1;
/// Largest multiplier drawn by the sampler.
const MAX_HALF_DEGREE: usize = 3;

/// An ordered sequence of vertex degrees, one per vertex index.
///
/// # Examples
/// ```
/// use postman_core::DegreeSequence;
///
/// let sequence: DegreeSequence = "2, 4, 2".parse()?;
/// assert_eq!(sequence.as_slice(), &[2, 4, 2]);
/// assert_eq!(sequence.sum(), 8);
/// assert!(sequence.has_even_sum());
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DegreeSequence(Vec<usize>);

impl DegreeSequence {
    /// Wraps explicit degrees without validation.
    #[must_use]
    pub fn new(degrees: Vec<usize>) -> Self {
        Self(degrees)
    }

    /// Returns the degrees as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns the sum of all degrees (twice the edge count of an exact
    /// realization).
    #[must_use]
    pub fn sum(&self) -> usize {
        self.0.iter().sum()
    }

    /// Returns `true` when the sum is even, the necessary parity condition
    /// for pairing every stub.
    #[must_use]
    pub fn has_even_sum(&self) -> bool {
        self.sum() % 2 == 0
    }

    /// Consumes the sequence and returns the inner degrees.
    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl Deref for DegreeSequence {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<usize>> for DegreeSequence {
    fn from(degrees: Vec<usize>) -> Self {
        Self(degrees)
    }
}

impl FromStr for DegreeSequence {
    type Err = PostmanError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || PostmanError::InvalidDegreeSequence {
            input: Arc::from(raw),
        };
        if raw.trim().is_empty() {
            return Err(invalid());
        }
        raw.split(',')
            .map(|part| part.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

/// Samples `vertex_count` degrees uniformly from `{2, 4, 6}`.
///
/// A `Some(seed)` makes the draw reproducible; `None` seeds from entropy.
///
/// # Errors
/// Returns [`PostmanError::ZeroVertexCount`] when `vertex_count == 0`.
///
/// # Examples
/// ```
/// use postman_core::sample_degrees;
///
/// let first = sample_degrees(5, Some(6969))?;
/// let second = sample_degrees(5, Some(6969))?;
/// assert_eq!(first, second);
/// assert!(first.iter().all(|degree| [2, 4, 6].contains(degree)));
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
pub fn sample_degrees(vertex_count: usize, seed: Option<u64>) -> Result<DegreeSequence> {
    let mut rng = seeded_rng(seed);
    sample_degrees_with_rng(vertex_count, &mut rng)
}

/// Samples degrees from a caller-owned random source.
///
/// # Errors
/// Returns [`PostmanError::ZeroVertexCount`] when `vertex_count == 0`.
#[instrument(name = "core.sample_degrees", err, skip(rng))]
pub fn sample_degrees_with_rng<R: Rng + ?Sized>(
    vertex_count: usize,
    rng: &mut R,
) -> Result<DegreeSequence> {
    if vertex_count == 0 {
        return Err(PostmanError::ZeroVertexCount);
    }
    let degrees: Vec<usize> = (0..vertex_count)
        .map(|_| rng.gen_range(MIN_HALF_DEGREE..=MAX_HALF_DEGREE) * 2)
        .collect();
    debug!(sum = degrees.iter().sum::<usize>(), "sampled degree sequence");
    Ok(DegreeSequence(degrees))
}

/// Parses the answer to the vertex-count prompt.
///
/// Surrounding whitespace is ignored; anything other than a positive integer
/// is rejected.
///
/// # Errors
/// Returns [`PostmanError::InvalidVertexCount`] for non-numeric, negative, or
/// zero input.
///
/// # Examples
/// ```
/// use postman_core::parse_vertex_count;
///
/// assert_eq!(parse_vertex_count(" 12\n")?.get(), 12);
/// assert!(parse_vertex_count("zero").is_err());
/// # Ok::<(), postman_core::PostmanError>(())
/// ```
pub fn parse_vertex_count(raw: &str) -> Result<std::num::NonZeroUsize> {
    raw.trim()
        .parse::<std::num::NonZeroUsize>()
        .map_err(|_| PostmanError::InvalidVertexCount {
            input: Arc::from(raw.trim()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(128)]
    fn samples_requested_length_from_even_range(#[case] vertex_count: usize) {
        let sequence = sample_degrees(vertex_count, Some(42)).expect("vertex count is positive");
        assert_eq!(sequence.len(), vertex_count);
        assert!(sequence.iter().all(|degree| matches!(degree, 2 | 4 | 6)));
        assert!(sequence.has_even_sum());
    }

    #[test]
    fn rejects_zero_vertices() {
        let err = sample_degrees(0, Some(1)).expect_err("zero vertices must fail");
        assert_eq!(err, PostmanError::ZeroVertexCount);
    }

    #[test]
    fn same_seed_reproduces_sequence() {
        let first = sample_degrees(64, Some(6969)).expect("vertex count is positive");
        let second = sample_degrees(64, Some(6969)).expect("vertex count is positive");
        assert_eq!(first, second);
    }

    #[test]
    fn large_samples_cover_every_degree() {
        let sequence = sample_degrees(256, Some(3)).expect("vertex count is positive");
        for degree in [2, 4, 6] {
            assert!(sequence.contains(&degree), "degree {degree} never drawn");
        }
    }

    #[rstest]
    #[case("2,4,6", vec![2, 4, 6])]
    #[case(" 1 , 1 ", vec![1, 1])]
    #[case("0", vec![0])]
    fn parses_degree_lists(#[case] raw: &str, #[case] expected: Vec<usize>) {
        let sequence: DegreeSequence = raw.parse().expect("list must parse");
        assert_eq!(sequence.into_inner(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("2,,4")]
    #[case("2,-4")]
    #[case("two")]
    fn rejects_malformed_degree_lists(#[case] raw: &str) {
        let err = raw.parse::<DegreeSequence>().expect_err("list must be rejected");
        assert!(matches!(err, PostmanError::InvalidDegreeSequence { .. }));
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("4.5")]
    #[case("many")]
    #[case("")]
    fn rejects_invalid_vertex_counts(#[case] raw: &str) {
        let err = parse_vertex_count(raw).expect_err("input must be rejected");
        assert!(matches!(err, PostmanError::InvalidVertexCount { .. }));
    }

    #[test]
    fn odd_sums_are_reported_not_fixed() {
        let sequence = DegreeSequence::new(vec![1, 2, 2]);
        assert_eq!(sequence.sum(), 5);
        assert!(!sequence.has_even_sum());
        assert_eq!(sequence.as_slice(), &[1, 2, 2]);
    }
}
