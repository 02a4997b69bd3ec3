//! 상품 문서 저장소
//!
//! MongoDB 컬렉션 위에 제네릭 문서 리포지토리를 제공하는 라이브러리입니다.
//! 식별자 기반 CRUD, 정렬/페이지 조회, 쿼리 바이 예제를 지원하며
//! 동일한 계약을 따르는 인메모리 구현을 함께 제공합니다.
//!
//! # Features
//!
//! - **제네릭 계약**: `DocumentRepository<T, ID>` 하나로 모든 문서 타입 지원
//! - **MongoDB**: 공식 드라이버 기반 어댑터, 호출별 타임아웃과 취소 지원
//! - **인메모리**: 테스트와 로컬 개발을 위한 동일 의미의 구현
//! - **명시적 구성**: 전역 상태 없이 생성자로 연결과 설정 전달
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  DocumentRepository  │ ← 계약 (save, find_by_id, find_page, ...)
//! └──────────────────────┘
//!        │          │
//!        ▼          ▼
//! ┌────────────┐ ┌──────────────────┐
//! │  MongoDB   │ │    InMemory      │
//! │ Repository │ │   Repository     │
//! └────────────┘ └──────────────────┘
//!        │
//!        ▼
//! ┌────────────┐
//! │  Database  │ ← 연결 풀 (RepositoryConfig)
//! └────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use product_store::config::RepositoryConfig;
//! use product_store::db::Database;
//! use product_store::domain::entities::products::Product;
//! use product_store::repositories::{DocumentRepository, ProductRepository};
//!
//! let config = RepositoryConfig::from_env();
//! let database = Database::connect(&config).await?;
//! let products = ProductRepository::new(&database, &config);
//!
//! let widget = products.save(Product::new("Widget", 9.99)).await?;
//! assert!(widget.id.is_some());
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod utils;
