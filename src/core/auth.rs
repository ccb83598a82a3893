//! Authorization system for the catalog API
//!
//! Every endpoint declares an [`AuthPolicy`]. A policy is a plain value built
//! from a handful of predicates and the [`any_of`] / [`all_of`] combinators,
//! and it is evaluated against an immutable [`RequestContext`]:
//!
//! - the HTTP method of the request
//! - the [`Identity`] resolved by the [`AuthProvider`]
//! - for object-level checks, the owner of the targeted entity
//!
//! Evaluation is a pure function. A denied anonymous caller gets
//! [`AccessDenied::AuthenticationRequired`], a denied authenticated caller
//! gets [`AccessDenied::Forbidden`].

use crate::core::entity::EntityId;
use anyhow::Result;
use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde::Serialize;

/// Identity resolved from a request credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No credential, or a credential that could not be validated
    Anonymous,

    /// Authenticated user account
    User {
        id: EntityId,
        username: String,
        is_privileged: bool,
    },
}

impl Identity {
    /// Get the user id if authenticated
    pub fn user_id(&self) -> Option<EntityId> {
        match self {
            Identity::User { id, .. } => Some(*id),
            Identity::Anonymous => None,
        }
    }

    /// Get the username if authenticated
    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::User { username, .. } => Some(username),
            Identity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User { .. })
    }

    /// Check if identity carries administrative rights
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Identity::User {
                is_privileged: true,
                ..
            }
        )
    }
}

/// Returns true for read-only verbs (GET, HEAD, OPTIONS)
pub fn is_safe_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
}

/// Immutable input of a policy evaluation
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    identity: Identity,
    owner: Option<EntityId>,
}

impl RequestContext {
    /// Collection-level context (no target entity yet)
    pub fn new(method: Method, identity: Identity) -> Self {
        Self {
            method,
            identity,
            owner: None,
        }
    }

    /// Object-level context for an entity owned by `owner`
    pub fn with_owner(&self, owner: EntityId) -> Self {
        Self {
            method: self.method.clone(),
            identity: self.identity.clone(),
            owner: Some(owner),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn is_safe(&self) -> bool {
        is_safe_method(&self.method)
    }
}

/// Reason a request was rejected by a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("Authentication credentials were not provided or are invalid")]
    AuthenticationRequired,

    #[error("You do not have permission to perform this action")]
    Forbidden,
}

impl AccessDenied {
    /// Pick the failure kind for a denied caller
    pub fn for_identity(identity: &Identity) -> Self {
        if identity.is_authenticated() {
            AccessDenied::Forbidden
        } else {
            AccessDenied::AuthenticationRequired
        }
    }
}

/// Outcome of a policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(AccessDenied),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Authorization policy for an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Request uses a safe method
    ReadOnly,

    /// Any authenticated identity
    Authenticated,

    /// Authenticated identity flagged as privileged
    Privileged,

    /// Safe method, or the caller owns the target entity.
    ///
    /// Passes at collection level where there is no owner to compare against.
    OwnerOrReadOnly,

    /// At least one policy passes (empty list never passes)
    AnyOf(Vec<AuthPolicy>),

    /// Every policy passes (empty list always passes)
    AllOf(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if the request context satisfies this policy
    pub fn check(&self, ctx: &RequestContext) -> bool {
        match self {
            AuthPolicy::ReadOnly => ctx.is_safe(),

            AuthPolicy::Authenticated => ctx.identity().is_authenticated(),

            AuthPolicy::Privileged => ctx.identity().is_privileged(),

            AuthPolicy::OwnerOrReadOnly => {
                if ctx.is_safe() {
                    return true;
                }
                match ctx.owner() {
                    None => true,
                    Some(owner) => ctx.identity().user_id() == Some(owner),
                }
            }

            AuthPolicy::AnyOf(policies) => policies.iter().any(|p| p.check(ctx)),

            AuthPolicy::AllOf(policies) => policies.iter().all(|p| p.check(ctx)),
        }
    }

    /// Evaluate the policy into a decision carrying the denial reason
    pub fn evaluate(&self, ctx: &RequestContext) -> Decision {
        if self.check(ctx) {
            Decision::Allow
        } else {
            Decision::Deny(AccessDenied::for_identity(ctx.identity()))
        }
    }

    /// Evaluate the policy, turning a denial into an error
    pub fn authorize(&self, ctx: &RequestContext) -> Result<(), AccessDenied> {
        match self.evaluate(ctx) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                tracing::debug!(
                    method = %ctx.method(),
                    user_id = ?ctx.identity().user_id(),
                    owner = ?ctx.owner(),
                    "request denied: {}",
                    reason
                );
                Err(reason)
            }
        }
    }
}

/// Policy that passes when any of `policies` passes
pub fn any_of(policies: impl IntoIterator<Item = AuthPolicy>) -> AuthPolicy {
    AuthPolicy::AnyOf(policies.into_iter().collect())
}

/// Policy that passes when all of `policies` pass
pub fn all_of(policies: impl IntoIterator<Item = AuthPolicy>) -> AuthPolicy {
    AuthPolicy::AllOf(policies.into_iter().collect())
}

/// Access and refresh tokens issued on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Access token issued from a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access: String,
}

/// Errors returned by an [`AuthProvider`] when issuing tokens
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("Token is invalid or expired")]
    InvalidToken,

    #[error("Token has wrong type")]
    InvalidTokenType,

    #[error("Token creation failed")]
    TokenCreation,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::InvalidTokenType => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidToken => "TOKEN_NOT_VALID",
            AuthError::InvalidTokenType => "INVALID_TOKEN_TYPE",
            AuthError::TokenCreation => "TOKEN_CREATION_FAILED",
            AuthError::PasswordHash(_) => "PASSWORD_HASH_FAILED",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Trait for authentication providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve a bearer credential to an identity.
    ///
    /// Missing or invalid credentials resolve to [`Identity::Anonymous`];
    /// only infrastructure failures are returned as errors.
    async fn resolve(&self, credential: Option<&str>) -> Result<Identity>;

    /// Exchange username and password for a token pair
    async fn issue(&self, username: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METHODS: [Method; 7] = [
        Method::GET,
        Method::HEAD,
        Method::OPTIONS,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ];

    const MUTATING_METHODS: [Method; 4] = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    fn user(id: EntityId) -> Identity {
        Identity::User {
            id,
            username: format!("user{}", id),
            is_privileged: false,
        }
    }

    fn admin(id: EntityId) -> Identity {
        Identity::User {
            id,
            username: format!("admin{}", id),
            is_privileged: true,
        }
    }

    fn identities() -> Vec<Identity> {
        vec![Identity::Anonymous, user(1), user(2), admin(3)]
    }

    fn product_policy() -> AuthPolicy {
        all_of([
            any_of([AuthPolicy::ReadOnly, AuthPolicy::Authenticated]),
            AuthPolicy::OwnerOrReadOnly,
        ])
    }

    // --- safe methods ---

    #[test]
    fn test_safe_methods() {
        assert!(is_safe_method(&Method::GET));
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        for method in &MUTATING_METHODS {
            assert!(!is_safe_method(method), "{} must not be safe", method);
        }
    }

    #[test]
    fn test_owner_or_read_only_allows_safe_methods_for_everyone() {
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            for identity in identities() {
                for owner in [None, Some(1), Some(2), Some(99)] {
                    let mut ctx = RequestContext::new(method.clone(), identity.clone());
                    if let Some(owner) = owner {
                        ctx = ctx.with_owner(owner);
                    }
                    assert_eq!(AuthPolicy::OwnerOrReadOnly.evaluate(&ctx), Decision::Allow);
                    assert_eq!(product_policy().evaluate(&ctx), Decision::Allow);
                }
            }
        }
    }

    // --- ownership ---

    #[test]
    fn test_owner_or_read_only_passes_at_collection_level() {
        for method in &MUTATING_METHODS {
            let ctx = RequestContext::new(method.clone(), user(1));
            assert!(AuthPolicy::OwnerOrReadOnly.check(&ctx));
        }
    }

    #[test]
    fn test_mutation_by_anonymous_requires_authentication() {
        for method in &MUTATING_METHODS {
            let collection = RequestContext::new(method.clone(), Identity::Anonymous);
            let object = collection.with_owner(1);

            assert_eq!(
                product_policy().evaluate(&collection),
                Decision::Deny(AccessDenied::AuthenticationRequired)
            );
            assert_eq!(
                product_policy().evaluate(&object),
                Decision::Deny(AccessDenied::AuthenticationRequired)
            );
        }
    }

    #[test]
    fn test_mutation_by_non_owner_is_forbidden() {
        for method in &MUTATING_METHODS {
            for (caller, owner) in [(user(1), 2), (user(2), 1), (admin(3), 1)] {
                let ctx = RequestContext::new(method.clone(), caller).with_owner(owner);
                assert_eq!(
                    product_policy().evaluate(&ctx),
                    Decision::Deny(AccessDenied::Forbidden)
                );
            }
        }
    }

    #[test]
    fn test_mutation_by_owner_is_allowed() {
        for method in &MUTATING_METHODS {
            for caller in [user(1), user(2), admin(3)] {
                let owner = caller.user_id().expect("test identities are authenticated");
                let ctx = RequestContext::new(method.clone(), caller).with_owner(owner);
                assert!(product_policy().evaluate(&ctx).is_allowed());
            }
        }
    }

    #[test]
    fn test_authenticated_product_creation_passes_collection_gate() {
        let ctx = RequestContext::new(Method::POST, user(1));
        assert!(product_policy().authorize(&ctx).is_ok());
    }

    // --- category policy ---

    #[test]
    fn test_category_mutation_requires_only_authentication() {
        let policy = any_of([AuthPolicy::ReadOnly, AuthPolicy::Authenticated]);
        for method in &MUTATING_METHODS {
            assert!(policy.check(&RequestContext::new(method.clone(), user(1))));
            assert!(policy.check(&RequestContext::new(method.clone(), user(2))));
            assert_eq!(
                policy.evaluate(&RequestContext::new(method.clone(), Identity::Anonymous)),
                Decision::Deny(AccessDenied::AuthenticationRequired)
            );
        }
    }

    // --- user policies ---

    #[test]
    fn test_user_list_policy() {
        let policy = any_of([AuthPolicy::Privileged, AuthPolicy::ReadOnly]);

        for identity in identities() {
            assert!(policy.check(&RequestContext::new(Method::GET, identity)));
        }

        assert_eq!(
            policy.evaluate(&RequestContext::new(Method::POST, Identity::Anonymous)),
            Decision::Deny(AccessDenied::AuthenticationRequired)
        );
        assert_eq!(
            policy.evaluate(&RequestContext::new(Method::POST, user(1))),
            Decision::Deny(AccessDenied::Forbidden)
        );
        assert!(policy.check(&RequestContext::new(Method::POST, admin(3))));
    }

    #[test]
    fn test_privileged_policy_applies_to_every_method() {
        for method in &ALL_METHODS {
            assert_eq!(
                AuthPolicy::Privileged.evaluate(&RequestContext::new(
                    method.clone(),
                    Identity::Anonymous
                )),
                Decision::Deny(AccessDenied::AuthenticationRequired)
            );
            assert_eq!(
                AuthPolicy::Privileged.evaluate(&RequestContext::new(method.clone(), user(1))),
                Decision::Deny(AccessDenied::Forbidden)
            );
            assert!(AuthPolicy::Privileged.check(&RequestContext::new(method.clone(), admin(3))));
        }
    }

    // --- combinators ---

    #[test]
    fn test_empty_combinators() {
        let ctx = RequestContext::new(Method::GET, Identity::Anonymous);
        assert!(!any_of([]).check(&ctx));
        assert!(all_of([]).check(&ctx));
    }

    #[test]
    fn test_combinators_build_variants() {
        assert_eq!(
            any_of([AuthPolicy::ReadOnly]),
            AuthPolicy::AnyOf(vec![AuthPolicy::ReadOnly])
        );
        assert_eq!(
            all_of(vec![AuthPolicy::Authenticated, AuthPolicy::Privileged]),
            AuthPolicy::AllOf(vec![AuthPolicy::Authenticated, AuthPolicy::Privileged])
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let ctx = RequestContext::new(Method::PUT, user(1)).with_owner(2);
        let policy = product_policy();
        assert_eq!(policy.evaluate(&ctx), policy.evaluate(&ctx));
    }

    // --- Identity accessors ---

    #[test]
    fn test_identity_accessors() {
        let anon = Identity::Anonymous;
        assert_eq!(anon.user_id(), None);
        assert_eq!(anon.username(), None);
        assert!(!anon.is_authenticated());
        assert!(!anon.is_privileged());

        let jacob = user(5);
        assert_eq!(jacob.user_id(), Some(5));
        assert_eq!(jacob.username(), Some("user5"));
        assert!(jacob.is_authenticated());
        assert!(!jacob.is_privileged());

        assert!(admin(1).is_privileged());
    }

    #[test]
    fn test_with_owner_keeps_method_and_identity() {
        let ctx = RequestContext::new(Method::DELETE, user(4));
        let object = ctx.with_owner(9);

        assert_eq!(ctx.owner(), None);
        assert_eq!(object.owner(), Some(9));
        assert_eq!(object.method(), &Method::DELETE);
        assert_eq!(object.identity(), &user(4));
    }

    // --- AuthError ---

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::TokenCreation.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AuthError::InvalidTokenType.error_code(), "INVALID_TOKEN_TYPE");
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair {
            access: "a".to_string(),
            refresh: "r".to_string(),
        };
        let value = serde_json::to_value(&pair).expect("token pair serializes");
        assert_eq!(value, serde_json::json!({ "access": "a", "refresh": "r" }));
    }
}
