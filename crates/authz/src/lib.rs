//! `postern-authz`: pure role-based authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. The host
//! resolves a caller's roles through [`RoleProvider`]; every decision is a
//! pure function of those roles and the role policy the protected
//! operation declares.

pub mod decision;
pub mod metadata;
pub mod provider;
pub mod role;

pub use decision::{AccessDecision, decide, has_any_role};
pub use metadata::AuthorizationMetadata;
pub use provider::{RoleProvider, RoleResolutionError, authorize};
pub use role::Role;
