//! Fakes of external services for tests.

pub mod relay;
