//! 에러 처리 모듈
//!
//! [`RepositoryError`](errors::RepositoryError)와 [`RepositoryResult`](errors::RepositoryResult)를 제공합니다.

pub mod errors;

pub use errors::*;
