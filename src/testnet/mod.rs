//! Test helpers
//!
//! Builders for miners and sample transfers shared by the unit tests.

pub mod test_utils;
