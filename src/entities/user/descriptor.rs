//! Entity descriptor for User

use super::handlers::{UserAppState, create_user, get_user, list_users};
use super::model::User;
use crate::core::entity::Entity;
use crate::server::{EntityDescriptor, ServerHost};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Descriptor for the User entity
pub struct UserDescriptor;

impl EntityDescriptor for UserDescriptor {
    fn entity_type(&self) -> &str {
        User::resource_name_singular()
    }

    fn plural(&self) -> &str {
        User::resource_name()
    }

    fn build_routes(&self, host: &ServerHost) -> Router {
        let state = UserAppState {
            store: host.store.clone(),
            auth: host.auth.clone(),
            passwords: host.passwords.clone(),
            list_policy: Arc::new(host.policies.user_list.clone()),
            detail_policy: Arc::new(host.policies.user_detail.clone()),
        };

        Router::new()
            .route("/users/", get(list_users).post(create_user))
            .route("/users/{id}/", get(get_user))
            .with_state(state)
    }
}
