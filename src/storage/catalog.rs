//! Catalog store aggregating the per-entity data services
//!
//! Holds the rules that span more than one table:
//!
//! - a product always references an existing category and owner
//! - deleting a category deletes its products
//! - usernames are unique
//!
//! Writes touching more than one table are serialized through a single
//! async mutex so readers never observe a half-applied change.

use crate::core::entity::{Entity, EntityId};
use crate::core::error::CatalogError;
use crate::core::service::DataService;
use crate::entities::category::Category;
use crate::entities::product::{Product, ProductFilter, ProductResponse};
use crate::entities::user::{User, UserResponse};
use crate::storage::in_memory::InMemoryDataService;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct CatalogStore {
    categories: Arc<dyn DataService<Category>>,
    products: Arc<dyn DataService<Product>>,
    users: Arc<dyn DataService<User>>,
    writes: Arc<Mutex<()>>,
}

impl CatalogStore {
    /// Create a store over the given services
    pub fn new(
        categories: Arc<dyn DataService<Category>>,
        products: Arc<dyn DataService<Product>>,
        users: Arc<dyn DataService<User>>,
    ) -> Self {
        Self {
            categories,
            products,
            users,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Create a store backed by in-memory services
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDataService::<Category>::new()),
            Arc::new(InMemoryDataService::<Product>::new()),
            Arc::new(InMemoryDataService::<User>::new()),
        )
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.list().await?)
    }

    pub async fn get_category(&self, id: EntityId) -> Result<Category, CatalogError> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(Category::resource_name_singular(), id))
    }

    pub async fn create_category(&self, name: String) -> Result<Category, CatalogError> {
        let category = self.categories.create(Category::new(name)).await?;
        tracing::info!(category_id = category.id, "category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: EntityId, name: String) -> Result<Category, CatalogError> {
        let _guard = self.writes.lock().await;
        self.get_category(id).await?;
        Ok(self.categories.update(id, Category::new(name)).await?)
    }

    /// Delete a category and its products, returning how many products went with it
    pub async fn delete_category(&self, id: EntityId) -> Result<usize, CatalogError> {
        let _guard = self.writes.lock().await;
        if !self.categories.delete(id).await? {
            return Err(CatalogError::not_found(
                Category::resource_name_singular(),
                id,
            ));
        }
        let removed = self
            .products
            .delete_where("category", &id.to_string())
            .await?;
        tracing::info!(category_id = id, products_removed = removed, "category deleted");
        Ok(removed)
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn get_product(&self, id: EntityId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(Product::resource_name_singular(), id))
    }

    /// List products matching `filter`, ordered by id
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductResponse>, CatalogError> {
        let mut products = self.products.list().await?;

        if let Some(name) = &filter.category {
            let ids: HashSet<EntityId> = self
                .categories
                .search("name", name)
                .await?
                .iter()
                .map(|c| c.id)
                .collect();
            products.retain(|p| ids.contains(&p.category));
        }

        if let Some(username) = &filter.username {
            let ids: HashSet<EntityId> = self
                .users
                .search("username", username)
                .await?
                .iter()
                .map(|u| u.id)
                .collect();
            products.retain(|p| ids.contains(&p.owner));
        }

        let usernames: HashMap<EntityId, String> = self
            .users
            .list()
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        products
            .into_iter()
            .map(|p| {
                let owner = usernames.get(&p.owner).cloned().ok_or_else(|| {
                    CatalogError::Internal(format!("product {} has no owner", p.id))
                })?;
                Ok(ProductResponse::new(p, owner))
            })
            .collect()
    }

    pub async fn create_product(&self, product: Product) -> Result<Product, CatalogError> {
        let _guard = self.writes.lock().await;
        self.check_references(&product).await?;
        let product = self.products.create(product).await?;
        tracing::info!(
            product_id = product.id,
            owner_id = product.owner,
            "product created"
        );
        Ok(product)
    }

    pub async fn update_product(&self, id: EntityId, product: Product) -> Result<Product, CatalogError> {
        let _guard = self.writes.lock().await;
        self.get_product(id).await?;
        self.check_references(&product).await?;
        Ok(self.products.update(id, product).await?)
    }

    pub async fn delete_product(&self, id: EntityId) -> Result<(), CatalogError> {
        let _guard = self.writes.lock().await;
        if !self.products.delete(id).await? {
            return Err(CatalogError::not_found(Product::resource_name_singular(), id));
        }
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    /// Render a product with its owner's username
    pub async fn product_response(&self, product: Product) -> Result<ProductResponse, CatalogError> {
        let owner = self
            .users
            .get(product.owner)
            .await?
            .ok_or_else(|| CatalogError::Internal(format!("product {} has no owner", product.id)))?;
        Ok(ProductResponse::new(product, owner.username))
    }

    async fn check_references(&self, product: &Product) -> Result<(), CatalogError> {
        if self.categories.get(product.category).await?.is_none() {
            return Err(CatalogError::field(
                "category",
                format!("Invalid pk \"{}\" - object does not exist.", product.category),
            ));
        }
        if self.users.get(product.owner).await?.is_none() {
            return Err(CatalogError::field(
                "owner",
                format!("Invalid pk \"{}\" - object does not exist.", product.owner),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn get_user(&self, id: EntityId) -> Result<User, CatalogError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(User::resource_name_singular(), id))
    }

    pub async fn find_user(&self, id: EntityId) -> Result<Option<User>, CatalogError> {
        Ok(self.users.get(id).await?)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CatalogError> {
        Ok(self.users.search("username", username).await?.into_iter().next())
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, CatalogError> {
        let mut owned: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
        for product in self.products.list().await? {
            owned.entry(product.owner).or_default().push(product.id);
        }

        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .map(|u| {
                let products = owned.remove(&u.id).unwrap_or_default();
                UserResponse::new(u, products)
            })
            .collect())
    }

    /// Create a user, enforcing unique usernames
    pub async fn create_user(&self, user: User) -> Result<User, CatalogError> {
        let _guard = self.writes.lock().await;
        if self.find_user_by_username(&user.username).await?.is_some() {
            return Err(CatalogError::field(
                "username",
                "A user with that username already exists.",
            ));
        }
        let user = self.users.create(user).await?;
        tracing::info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Render a user with the ids of the products they own
    pub async fn user_response(&self, user: User) -> Result<UserResponse, CatalogError> {
        let products = self
            .products
            .search("owner", &user.id.to_string())
            .await?
            .iter()
            .map(|p| p.id)
            .collect();
        Ok(UserResponse::new(user, products))
    }
}
