//! 상품 저장소 초기화 도구
//!
//! 환경 설정을 로드하고 MongoDB에 연결한 뒤 상품 컬렉션 인덱스를 생성하고
//! 현재 문서 수를 출력합니다.

use std::error::Error;

use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use product_store::config::{Environment, RepositoryConfig};
use product_store::db::Database;
use product_store::repositories::{DocumentRepository, ProductRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 환경 설정 및 로깅 초기화
    let profile = load_env_file();
    init_logging();

    info!("🚀 상품 저장소 초기화 시작 (profile: {})", profile);

    let config = RepositoryConfig::from_env();
    info!(
        "📡 데이터베이스 연결 중... ({} / {})",
        config.database_name, config.collection_name
    );

    let database = Database::connect(&config).await.inspect_err(|e| {
        error!("❌ 데이터베이스 연결 실패: {}", e);
    })?;

    let products = ProductRepository::new(&database, &config);
    products.create_product_indexes().await?;

    let count = products.count().await?;
    info!("📦 {} 컬렉션 문서 수: {}", products.collection_name(), count);

    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 로깅 초기화 전에 호출되므로 결과는 표준 에러로 출력합니다.
fn load_env_file() -> String {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ()),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ()),
        _ => dotenv().map(|_| ()),
    };

    if let Err(e) = loaded {
        eprintln!("환경 파일 로드 실패 (profile: {}): {}", profile, e);
    }

    profile
}

/// 로깅 시스템을 초기화합니다
///
/// `RUST_LOG`가 없으면 `ENVIRONMENT`에 따른 기본 필터를 사용합니다.
///
/// ```bash
/// RUST_LOG=product_store=debug cargo run
/// ```
fn init_logging() {
    let default_filter = Environment::current().default_log_filter();
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));
}
