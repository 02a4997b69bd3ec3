//! Product Entity Implementation
//!
//! 상품 카탈로그의 핵심 엔티티입니다.
//! `products` 컬렉션의 문서와 1:1로 매핑됩니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::entity::Entity;
use crate::errors::{RepositoryError, RepositoryResult};

/// 상품 엔티티
///
/// 식별자가 없는 상태로 저장하면 ObjectId 기반의 식별자가 자동으로 할당됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::utils::serde_helpers::optional_object_id_string"
    )]
    pub id: Option<String>,
    /// 상품명
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// 상품 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// 판매 가격
    #[validate(range(min = 0.0))]
    pub price: f64,
}

impl Product {
    /// 식별자 없는 새 상품을 생성합니다.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            price,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Entity for Product {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn validate_entity(&self) -> RepositoryResult<()> {
        self.validate()
            .map_err(|e| RepositoryError::ValidationError(e.to_string()))
    }
}
