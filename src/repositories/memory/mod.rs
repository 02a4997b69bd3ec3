//! 인메모리 어댑터
//!
//! 저장소 없이 리포지토리 계약을 검증하거나 로컬 개발에 사용합니다.

pub mod memory_repository;

pub use memory_repository::InMemoryRepository;
