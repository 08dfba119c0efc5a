//! Current-user identity resolution.

pub mod resolver;

pub use resolver::IdentityResolver;
