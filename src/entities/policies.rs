//! Authorization policies of the catalog endpoints

use crate::config::AccessConfig;
use crate::core::auth::{AuthPolicy, all_of, any_of};

/// Policy attached to each group of endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPolicies {
    /// `/categories/` and `/category/{id}/`
    pub categories: AuthPolicy,
    /// `/products/` and `/product/{id}/`
    pub products: AuthPolicy,
    /// `/users/`
    pub user_list: AuthPolicy,
    /// `/users/{id}/`
    pub user_detail: AuthPolicy,
}

impl EndpointPolicies {
    pub fn from_config(access: &AccessConfig) -> Self {
        let read_or_authenticated = any_of([AuthPolicy::ReadOnly, AuthPolicy::Authenticated]);

        let user_list = if access.restrict_user_listing {
            AuthPolicy::Privileged
        } else {
            any_of([AuthPolicy::Privileged, AuthPolicy::ReadOnly])
        };

        Self {
            categories: read_or_authenticated.clone(),
            products: all_of([read_or_authenticated, AuthPolicy::OwnerOrReadOnly]),
            user_list,
            user_detail: AuthPolicy::Privileged,
        }
    }
}

impl Default for EndpointPolicies {
    fn default() -> Self {
        Self::from_config(&AccessConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{AccessDenied, Identity, RequestContext};
    use axum::http::Method;

    fn user(id: u64, is_privileged: bool) -> Identity {
        Identity::User {
            id,
            username: format!("user{}", id),
            is_privileged,
        }
    }

    #[test]
    fn test_any_user_may_write_categories() {
        let policies = EndpointPolicies::default();
        for id in [1, 2] {
            let ctx = RequestContext::new(Method::PUT, user(id, false));
            assert!(policies.categories.authorize(&ctx).is_ok());
        }

        let anonymous = RequestContext::new(Method::DELETE, Identity::Anonymous);
        assert_eq!(
            policies.categories.authorize(&anonymous),
            Err(AccessDenied::AuthenticationRequired)
        );
    }

    #[test]
    fn test_products_require_owner_for_writes() {
        let policies = EndpointPolicies::default();

        let collection = RequestContext::new(Method::POST, user(2, false));
        assert!(policies.products.authorize(&collection).is_ok());

        let stranger = RequestContext::new(Method::PUT, user(2, false)).with_owner(1);
        assert_eq!(
            policies.products.authorize(&stranger),
            Err(AccessDenied::Forbidden)
        );

        let staff = RequestContext::new(Method::DELETE, user(3, true)).with_owner(1);
        assert_eq!(
            policies.products.authorize(&staff),
            Err(AccessDenied::Forbidden)
        );

        let owner = RequestContext::new(Method::DELETE, user(1, false)).with_owner(1);
        assert!(policies.products.authorize(&owner).is_ok());

        let reader = RequestContext::new(Method::GET, Identity::Anonymous).with_owner(1);
        assert!(policies.products.authorize(&reader).is_ok());
    }

    #[test]
    fn test_user_policies() {
        let open = EndpointPolicies::default();
        let listing = RequestContext::new(Method::GET, Identity::Anonymous);
        assert!(open.user_list.authorize(&listing).is_ok());

        let create = RequestContext::new(Method::POST, user(1, false));
        assert_eq!(open.user_list.authorize(&create), Err(AccessDenied::Forbidden));

        let admin_create = RequestContext::new(Method::POST, user(1, true));
        assert!(open.user_list.authorize(&admin_create).is_ok());

        let detail = RequestContext::new(Method::GET, user(1, false));
        assert_eq!(open.user_detail.authorize(&detail), Err(AccessDenied::Forbidden));
    }

    #[test]
    fn test_restricted_user_listing() {
        let policies = EndpointPolicies::from_config(&AccessConfig {
            restrict_user_listing: true,
        });
        let listing = RequestContext::new(Method::GET, Identity::Anonymous);
        assert_eq!(
            policies.user_list.authorize(&listing),
            Err(AccessDenied::AuthenticationRequired)
        );
    }
}
