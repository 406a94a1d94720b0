//! Data module - archive loading, normalization, caching

pub mod cache;
pub mod fetch;
pub mod loader;
pub mod normalizer;
pub mod regions;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use loader::{load_archive, LoaderError};
pub use normalizer::{Normalizer, NormalizerError};
pub use regions::Region;
