//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`bson_utils`] - BSON 값 비교, 경로 조회, 예제 필터 평탄화
//! - [`serde_helpers`] - 문서 식별자 직렬화 헬퍼

pub mod bson_utils;
pub mod serde_helpers;
