//! Common test utilities shared across integration tests

pub mod fixture;

pub use fixture::TestFixture;
pub use helpers::skip_if_no_git;
