//! # Domain Layer Module
//!
//! 리포지토리 계약이 다루는 도메인 타입들입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - 저장 가능한 문서 (Entity trait, Product)
//! └── Models    - 조회 조건 값 객체 (Sort, PageRequest, Page, Example)
//!      │
//!      ▼
//! Repositories (DocumentRepository)
//! ```

pub mod entities;
pub mod models;
