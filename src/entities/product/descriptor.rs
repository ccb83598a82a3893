//! Entity descriptor for Product

use super::handlers::{
    ProductAppState, create_product, delete_product, get_product, list_products, update_product,
};
use super::model::Product;
use crate::core::entity::Entity;
use crate::server::{EntityDescriptor, ServerHost};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Descriptor for the Product entity
pub struct ProductDescriptor;

impl EntityDescriptor for ProductDescriptor {
    fn entity_type(&self) -> &str {
        Product::resource_name_singular()
    }

    fn plural(&self) -> &str {
        Product::resource_name()
    }

    fn build_routes(&self, host: &ServerHost) -> Router {
        let state = ProductAppState {
            store: host.store.clone(),
            auth: host.auth.clone(),
            policy: Arc::new(host.policies.products.clone()),
        };

        Router::new()
            .route("/products/", get(list_products).post(create_product))
            .route(
                "/product/{id}/",
                get(get_product).put(update_product).delete(delete_product),
            )
            .with_state(state)
    }
}
