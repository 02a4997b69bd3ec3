//! Database Connection Management Module
//!
//! MongoDB 데이터베이스 연결 관리를 담당하는 모듈입니다.
//! 연결 정보는 [`RepositoryConfig`]로 명시적으로 전달되며, 전역 상태를 사용하지 않습니다.
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use product_store::config::RepositoryConfig;
//! use product_store::db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RepositoryConfig::from_env();
//!     let database = Database::connect(&config).await?;
//!     Ok(())
//! }
//! ```

use log::info;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection};

use crate::config::RepositoryConfig;
use crate::errors::{ErrorContext, RepositoryResult};

/// MongoDB 모니터링/로그에 표시되는 애플리케이션 이름
const APP_NAME: &str = "product_store";

/// MongoDB 데이터베이스 연결 래퍼
///
/// 내부 `Client`는 연결 풀을 공유하므로 복제 비용이 낮으며,
/// 여러 리포지토리가 같은 핸들을 공유할 수 있습니다.
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 데이터베이스 연결을 생성합니다.
    ///
    /// 엔드포인트를 파싱하고 인증 정보, 애플리케이션 이름, 타임아웃을 적용한 뒤
    /// `ping` 명령으로 연결 상태를 검증합니다.
    ///
    /// ## 타임아웃
    ///
    /// `timeout_ms`가 설정된 경우 드라이버의 연결 타임아웃과
    /// 서버 선택 타임아웃에도 같은 값이 적용됩니다.
    pub async fn connect(config: &RepositoryConfig) -> RepositoryResult<Self> {
        config.validate()?;

        let mut client_options = ClientOptions::parse(&config.endpoint).await?;
        client_options.app_name = Some(APP_NAME.to_string());

        if let Some(credentials) = &config.credentials {
            client_options.credential = Some(
                Credential::builder()
                    .username(credentials.username.clone())
                    .password(credentials.password.clone())
                    .source(credentials.auth_source.clone())
                    .build(),
            );
        }

        if let Some(timeout) = config.timeout() {
            client_options.connect_timeout = Some(timeout);
            client_options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(client_options)?;
        let database = Self {
            client,
            database_name: config.database_name.clone(),
        };

        database.ping().await?;

        info!("✅ MongoDB 연결 성공: {}", database.database_name);

        Ok(database)
    }

    /// 이미 구성된 클라이언트로 핸들을 생성합니다.
    ///
    /// 서버 연결이나 `ping` 검증을 하지 않습니다.
    pub fn from_client(client: Client, database_name: impl Into<String>) -> Self {
        Self {
            client,
            database_name: database_name.into(),
        }
    }

    /// 서버 연결 상태를 확인합니다.
    pub async fn ping(&self) -> RepositoryResult<()> {
        self.get_database()
            .run_command(doc! { "ping": 1 })
            .await
            .with_context(|| format!("MongoDB ping 실패 ({})", self.database_name))?;
        Ok(())
    }

    /// MongoDB 데이터베이스 인스턴스를 반환합니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 타입이 지정된 컬렉션 핸들을 반환합니다.
    ///
    /// 컬렉션은 첫 쓰기 시점에 서버에서 암묵적으로 생성됩니다.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.get_database().collection::<T>(name)
    }

    /// MongoDB 클라이언트 인스턴스를 반환합니다.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 데이터베이스 이름을 반환합니다.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
