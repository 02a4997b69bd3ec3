//! # Configuration Module
//!
//! 리포지토리의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 구조체로 모으며, 어댑터는 이 구조체를
//! 생성자 인자로 명시적으로 전달받습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 저장소 연결 설정, 인증 정보
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 저장소 연결
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="product_service"
//! export COLLECTION_NAME="products"
//!
//! # 인증 (선택)
//! export MONGODB_USERNAME="svc"
//! export MONGODB_PASSWORD="secret"
//!
//! # 호출별 타임아웃 (선택, 밀리초)
//! export REPOSITORY_TIMEOUT_MS="2000"
//!
//! # 실행 환경
//! export ENVIRONMENT="development"  # development, test, staging, production
//! ```

pub mod data_config;

pub use data_config::*;
