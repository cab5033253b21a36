//! Test harness


pub use test_app::{TestApp, TestResponse};
