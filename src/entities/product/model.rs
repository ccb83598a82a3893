//! Product entity model

use crate::core::entity::{Entity, EntityId, Owned};
use crate::core::error::CatalogError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Description stored when a product is created without one
pub const DEFAULT_DESCRIPTION: &str = "No description yet.";

/// Largest stock or price value accepted
pub const MAX_QUANTITY: i64 = 2_147_483_647;

/// Product listed in a category and owned by the user who created it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: EntityId,
    pub category: EntityId,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub stock: u32,
    pub price: u32,
    pub owner: EntityId,
}

impl Entity for Product {
    fn resource_name() -> &'static str {
        "products"
    }

    fn resource_name_singular() -> &'static str {
        "product"
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn indexed_fields() -> &'static [&'static str] {
        &["category", "owner", "name"]
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "category" => Some(self.category.to_string()),
            "owner" => Some(self.owner.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

impl Owned for Product {
    fn owner_id(&self) -> EntityId {
        self.owner
    }
}

/// JSON representation of a product; the owner is shown by username
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductResponse {
    pub id: EntityId,
    pub category: EntityId,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub stock: u32,
    pub price: u32,
    pub owner: String,
}

impl ProductResponse {
    pub fn new(product: Product, owner: String) -> Self {
        Self {
            id: product.id,
            category: product.category,
            name: product.name,
            description: product.description,
            image: product.image,
            stock: product.stock,
            price: product.price,
            owner,
        }
    }
}

/// Body of `POST /products/` and `PUT /product/{id}/`
///
/// Any `owner` sent by the client is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(required(message = "This field is required."))]
    pub category: Option<EntityId>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 50, message = "Ensure this field has between 1 and 50 characters.")
    )]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub image: Option<String>,

    #[validate(range(min = 0, max = 2_147_483_647, message = "Ensure this value is between 0 and 2147483647."))]
    pub stock: Option<i64>,

    #[validate(range(min = 0, max = 2_147_483_647, message = "Ensure this value is between 0 and 2147483647."))]
    pub price: Option<i64>,
}

fn quantity(field: &str, value: i64) -> Result<u32, CatalogError> {
    u32::try_from(value)
        .ok()
        .filter(|v| i64::from(*v) <= MAX_QUANTITY)
        .ok_or_else(|| CatalogError::field(field, "Ensure this value is between 0 and 2147483647."))
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, CatalogError> {
    value.ok_or_else(|| CatalogError::field(field, "This field is required."))
}

// An empty image string clears the stored image
fn image_value(image: String) -> Option<String> {
    (!image.is_empty()).then_some(image)
}

impl ProductPayload {
    /// Build a new product stamped with `owner`
    pub fn into_product(self, owner: EntityId) -> Result<Product, CatalogError> {
        Ok(Product {
            id: 0,
            category: required("category", self.category)?,
            name: required("name", self.name)?,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            image: self.image.and_then(image_value),
            stock: self.stock.map(|v| quantity("stock", v)).transpose()?.unwrap_or(0),
            price: self.price.map(|v| quantity("price", v)).transpose()?.unwrap_or(0),
            owner,
        })
    }

    /// Apply a full update to `product`.
    ///
    /// Required fields are replaced; optional fields that are absent keep
    /// their stored value. The owner never changes.
    pub fn apply_to(self, product: &Product) -> Result<Product, CatalogError> {
        Ok(Product {
            id: product.id,
            category: required("category", self.category)?,
            name: required("name", self.name)?,
            description: self
                .description
                .unwrap_or_else(|| product.description.clone()),
            image: match self.image {
                Some(image) => image_value(image),
                None => product.image.clone(),
            },
            stock: match self.stock {
                Some(v) => quantity("stock", v)?,
                None => product.stock,
            },
            price: match self.price {
                Some(v) => quantity("price", v)?,
                None => product.price,
            },
            owner: product.owner,
        })
    }
}

/// Query parameters of `GET /products/`
///
/// Both filters are exact matches and are combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Name of the product's category
    pub category: Option<String>,
    /// Username of the product's owner
    pub username: Option<String>,
}

impl ProductFilter {
    /// Build from raw query pairs; a repeated parameter keeps its last value
    /// and unknown parameters are ignored
    pub fn from_query_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut filter, (key, value)| {
                match key.as_str() {
                    "category" => filter.category = Some(value),
                    "username" => filter.username = Some(value),
                    _ => {}
                }
                filter
            })
    }
}
