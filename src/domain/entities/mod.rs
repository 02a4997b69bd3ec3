//! # Domain Entities Module
//!
//! MongoDB 문서와 직접 매핑되는 엔티티들을 정의합니다.
//!
//! ## 엔티티 규칙
//!
//! - **식별자**: `_id` 필드로 직렬화되며, 한 번 할당되면 변경되지 않습니다.
//! - **유일성**: 식별자는 컬렉션 내에서 유일합니다.
//! - **생략 가능**: 식별자가 없는 문서를 저장하면 리포지토리가 식별자를 생성합니다.
//!
//! ```rust,ignore
//! use crate::domain::entities::products::Product;
//!
//! let saved = repo.save(Product::new("Widget", 9.99)).await?;
//! assert!(saved.id.is_some());
//! ```
//!
//! ## 모듈 구조
//!
//! ```text
//! entities/
//! ├── mod.rs
//! ├── entity.rs       ← Entity / EntityId trait
//! └── products/
//!     ├── mod.rs
//!     └── product.rs  ← Product 엔티티
//! ```

pub mod entity;
pub mod products;

pub use entity::{Entity, EntityId};
