use serde::{Deserialize, Serialize};

use crate::Role;

/// Role policy declared on a protected operation.
///
/// Attached where the operation is defined and read-only at decision time.
/// An absent list and an empty list mean the same thing: that side of the
/// policy is not declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationMetadata {
    /// Roles that grant access. Declaring this list makes the operation
    /// closed: callers matching none of these roles are denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<Vec<Role>>,

    /// Roles that revoke access. On its own this list makes the operation
    /// open to everyone not holding one of these roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_roles: Option<Vec<Role>>,
}

impl AuthorizationMetadata {
    /// Policy granting access to the given roles only.
    pub fn allowing<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            allowed_roles: Some(roles.into_iter().map(Into::into).collect()),
            denied_roles: None,
        }
    }

    /// Policy revoking access from the given roles only.
    pub fn denying<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self {
            allowed_roles: None,
            denied_roles: Some(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Roles that revoke access, layered onto an allow policy.
    pub fn and_denying<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.denied_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }
}
