//! Products Entity Module
//!
//! 상품 카탈로그의 [`Product`](product::Product) 엔티티를 정의합니다.

pub mod product;

pub use product::Product;
