//! Entity descriptor for Category

use super::handlers::{
    CategoryAppState, create_category, delete_category, get_category, list_categories,
    update_category,
};
use super::model::Category;
use crate::core::entity::Entity;
use crate::server::{EntityDescriptor, ServerHost};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Descriptor for the Category entity
pub struct CategoryDescriptor;

impl EntityDescriptor for CategoryDescriptor {
    fn entity_type(&self) -> &str {
        Category::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Category::resource_name()
    }

    fn build_routes(&self, host: &ServerHost) -> Router {
        let state = CategoryAppState {
            store: host.store.clone(),
            auth: host.auth.clone(),
            policy: Arc::new(host.policies.categories.clone()),
        };

        Router::new()
            .route("/categories/", get(list_categories).post(create_category))
            .route(
                "/category/{id}/",
                get(get_category)
                    .put(update_category)
                    .delete(delete_category),
            )
            .with_state(state)
    }
}
