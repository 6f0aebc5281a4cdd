use thiserror::Error;

use crate::{AccessDecision, AuthorizationMetadata, Role, decide};

/// Role lookup failed in the host's role store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("role resolution failed: {0}")]
pub struct RoleResolutionError(pub String);

/// Resolves the roles a subject currently holds.
///
/// Implemented by the host against whatever backs its role assignments.
/// Implementations are called once per decision, so anything expensive
/// should memoize internally.
#[async_trait::async_trait]
pub trait RoleProvider: Send + Sync {
    async fn resolve_roles(&self, subject: &str) -> Result<Vec<Role>, RoleResolutionError>;
}

/// Resolve `subject`'s roles through `provider`, then decide access
/// against `metadata`.
///
/// Resolution failures never propagate. A caller whose roles cannot be
/// resolved is denied outright, with the underlying error kept in the
/// logs rather than the decision.
pub async fn authorize<P>(
    provider: &P,
    subject: &str,
    metadata: &AuthorizationMetadata,
) -> AccessDecision
where
    P: RoleProvider + ?Sized,
{
    match provider.resolve_roles(subject).await {
        Ok(roles) => {
            let decision = decide(&roles, metadata);
            tracing::debug!("access decision for subject {subject}: {decision:?}");
            decision
        }
        Err(e) => {
            tracing::warn!("role resolution failed for subject {subject}: {e}; denying");
            AccessDecision::Deny
        }
    }
}
