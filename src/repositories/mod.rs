//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 제네릭 [`DocumentRepository`] 계약과 두 가지 구현을 제공합니다.
//!
//! | 구현 | 저장소 | 용도 |
//! |------|--------|------|
//! | [`MongoRepository`] | MongoDB 컬렉션 | 운영 |
//! | [`InMemoryRepository`] | 프로세스 메모리 | 테스트, 로컬 개발 |
//!
//! 리포지토리는 생성자로 연결과 설정을 전달받으며 전역 레지스트리를 사용하지 않습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use product_store::repositories::{DocumentRepository, ProductRepository};
//!
//! let products = ProductRepository::new(&database, &config);
//! let count = products.count().await?;
//! ```

pub mod document_repository;
pub mod memory;
pub mod mongo;
pub mod products;

pub use document_repository::{DocumentRepository, DocumentStream};
pub use memory::InMemoryRepository;
pub use mongo::MongoRepository;
pub use products::ProductRepository;
