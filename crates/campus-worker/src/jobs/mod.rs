//! Maintenance job implementations.

pub mod retention;
