//! Event normalizer: raw lines to the closed domain-event set.

#[allow(clippy::module_inception)]
pub mod normalizer;

pub use normalizer::Normalizer;
