//! Server-side country boundary service.
//!
//! [`CountryBoundaryCache`] owns a [`CountrySource`] and assembles its
//! `admin_level=2` boundary relations exactly once, serving the memoised
//! result to every later caller.

mod cache;
mod source;

#[cfg(any(test, feature = "test-support"))]
mod test_support;

pub use cache::{CountryBoundaryCache, CountryCacheError};
pub use source::{CountrySource, DatasetError, DatasetFile};

#[cfg(any(test, feature = "test-support"))]
pub use test_support::StaticCountrySource;
