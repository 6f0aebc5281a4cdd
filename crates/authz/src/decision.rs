use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{AuthorizationMetadata, Role};

/// Outcome of a role-based access check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny,
    /// The operation declared no role policy, so this engine has no
    /// opinion. Hosts collapse this via [`AccessDecision::or_default`].
    Abstain,
}

impl AccessDecision {
    pub fn is_allow(self) -> bool {
        self == AccessDecision::Allow
    }

    /// Collapse [`AccessDecision::Abstain`] into the host's configured
    /// outer default. `Allow` and `Deny` pass through untouched.
    pub fn or_default(self, default: AccessDecision) -> AccessDecision {
        match self {
            AccessDecision::Abstain => default,
            decided => decided,
        }
    }
}

/// True when `caller` holds at least one of `target`'s roles.
///
/// Either side being empty means no match. Role comparison is exact string
/// equality; no hierarchy or wildcard semantics at this layer.
pub fn has_any_role(caller: &[Role], target: &[Role]) -> bool {
    if caller.is_empty() || target.is_empty() {
        return false;
    }

    let target: HashSet<&str> = target.iter().map(Role::as_str).collect();
    caller.iter().any(|role| target.contains(role.as_str()))
}

/// Decide access for `caller_roles` against an operation's role policy.
///
/// An allow-list match wins outright, even when the deny list also
/// matches. A declared allow list the caller fails to match denies. With
/// only a deny list declared, failing to match it allows. With nothing
/// declared the engine abstains.
pub fn decide(caller_roles: &[Role], metadata: &AuthorizationMetadata) -> AccessDecision {
    let allowed = metadata.allowed_roles.as_deref().unwrap_or_default();
    let denied = metadata.denied_roles.as_deref().unwrap_or_default();

    if has_any_role(caller_roles, allowed) {
        return AccessDecision::Allow;
    }
    if has_any_role(caller_roles, denied) {
        return AccessDecision::Deny;
    }
    if !allowed.is_empty() {
        return AccessDecision::Deny;
    }
    if !denied.is_empty() {
        return AccessDecision::Allow;
    }
    AccessDecision::Abstain
}
