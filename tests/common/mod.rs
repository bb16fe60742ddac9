//! Shared helpers for integration tests

pub mod test_repo;

#[allow(unused_imports)]
pub use test_repo::TestRepo;
