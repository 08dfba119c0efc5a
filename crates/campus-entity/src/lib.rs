//! # campus-entity
//!
//! Domain entity models for Campus Notify. Every struct in this crate is
//! either the typed view of a stored document or a domain value object.

pub mod notification;
