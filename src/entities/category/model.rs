//! Category entity model

use crate::core::entity::{Entity, EntityId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product category (e.g., "book")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
}

impl Category {
    /// Create an unsaved category; the store assigns the id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl Entity for Category {
    fn resource_name() -> &'static str {
        "categories"
    }

    fn resource_name_singular() -> &'static str {
        "category"
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn indexed_fields() -> &'static [&'static str] {
        &["name"]
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

/// Body of `POST /categories/` and `PUT /category/{id}/`
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 50, message = "Ensure this field has between 1 and 50 characters.")
    )]
    pub name: Option<String>,
}
