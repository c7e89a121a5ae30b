//! Shared tracing/logging setup for suite processes.

pub mod tracing;

pub use self::tracing::init;
