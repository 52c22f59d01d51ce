//! Envelope normalization module
//!
//! Upstream list endpoints wrap their records in several different
//! envelopes. This module first decodes a body into a closed set of
//! [`EnvelopeShape`] variants, then flattens the chosen variant into an
//! ordered record list.
//!
//! # Precedence
//!
//! First match wins:
//!
//! 1. top-level array (or an array whose first object carries the hint key)
//! 2. object with `data`
//! 3. object with the hint key
//! 4. object with `results`
//! 5. object with `error` (a failure, never an empty list)
//! 6. any other object (single opaque record, or an error in strict mode)
//! 7. null and scalars (empty list)

mod normalizer;
mod shape;

pub use normalizer::{normalize, EnvelopeNormalizer, Normalized};
pub use shape::{is_falsy, EnvelopeShape, DATA_KEY, ERROR_KEY, RESULTS_KEY};

#[cfg(test)]
mod tests;
