//! 데이터 저장소 설정 관리 모듈
//!
//! 실행 환경과 리포지토리 연결 설정(엔드포인트, 인증 정보, 데이터베이스,
//! 컬렉션, 호출별 타임아웃)을 관리합니다.

use std::env;
use std::fmt;
use std::time::Duration;

use log::warn;

use crate::errors::{RepositoryError, RepositoryResult};

/// 기본 MongoDB 엔드포인트
pub const DEFAULT_ENDPOINT: &str = "mongodb://localhost:27017";
/// 기본 데이터베이스 이름
pub const DEFAULT_DATABASE_NAME: &str = "product_service";
/// 기본 컬렉션 이름
pub const DEFAULT_COLLECTION_NAME: &str = "products";

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// `RUST_LOG`가 없을 때 사용할 기본 로그 필터
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development | Environment::Test => "debug,mongodb=info",
            Environment::Staging | Environment::Production => "info",
        }
    }
}

/// 저장소 인증 정보
///
/// `Debug` 출력에서 비밀번호는 가려집니다.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// 인증 데이터베이스 (기본값: 드라이버 기본값 `admin`)
    pub auth_source: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            auth_source: None,
        }
    }

    pub fn with_auth_source(mut self, auth_source: impl Into<String>) -> Self {
        self.auth_source = Some(auth_source.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("auth_source", &self.auth_source)
            .finish()
    }
}

/// 리포지토리 연결 설정
///
/// 어댑터는 이 설정을 생성자 인자로 받으며, 전역 상태에 의존하지 않습니다.
///
/// ## 환경 변수
///
/// | 변수 | 필드 | 기본값 |
/// |------|------|--------|
/// | `MONGODB_URI` | `endpoint` | `mongodb://localhost:27017` |
/// | `MONGODB_USERNAME` / `MONGODB_PASSWORD` | `credentials` | 없음 |
/// | `MONGODB_AUTH_SOURCE` | `credentials.auth_source` | 없음 |
/// | `DATABASE_NAME` | `database_name` | `product_service` |
/// | `COLLECTION_NAME` | `collection_name` | `products` |
/// | `REPOSITORY_TIMEOUT_MS` | `timeout_ms` | 없음 (무제한) |
///
/// ```rust,ignore
/// let config = RepositoryConfig::new("mongodb://db:27017", "shop", "products")
///     .with_credentials(Credentials::new("svc", "secret"))
///     .with_timeout_ms(2_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryConfig {
    pub endpoint: String,
    pub credentials: Option<Credentials>,
    pub database_name: String,
    pub collection_name: String,
    /// 호출별 제한 시간 (밀리초)
    pub timeout_ms: Option<u64>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_DATABASE_NAME, DEFAULT_COLLECTION_NAME)
    }
}

impl RepositoryConfig {
    pub fn new(
        endpoint: impl Into<String>,
        database_name: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: None,
            database_name: database_name.into(),
            collection_name: collection_name.into(),
            timeout_ms: None,
        }
    }

    /// 환경 변수에서 설정을 읽어옵니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수로 설정을 구성합니다.
    ///
    /// 빈 문자열은 설정되지 않은 것으로 취급합니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (get("MONGODB_USERNAME"), get("MONGODB_PASSWORD")) {
            (Some(username), Some(password)) => {
                let mut credentials = Credentials::new(username, password);
                credentials.auth_source = get("MONGODB_AUTH_SOURCE");
                Some(credentials)
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("MONGODB_USERNAME/MONGODB_PASSWORD 중 하나만 설정되어 인증 정보를 무시합니다");
                None
            }
            (None, None) => None,
        };

        let timeout_ms = get("REPOSITORY_TIMEOUT_MS").and_then(|raw| match raw.parse::<u64>() {
            Ok(0) => {
                warn!("REPOSITORY_TIMEOUT_MS=0 은 허용되지 않아 타임아웃 없이 동작합니다");
                None
            }
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("REPOSITORY_TIMEOUT_MS 파싱 실패 ({}): {}. 타임아웃 없이 동작합니다", raw, e);
                None
            }
        });

        Self {
            endpoint: get("MONGODB_URI").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            credentials,
            database_name: get("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            collection_name: get("COLLECTION_NAME")
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
            timeout_ms,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = collection_name.into();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// 필수 값이 비어 있지 않은지 검증합니다.
    pub fn validate(&self) -> RepositoryResult<()> {
        let required = [
            ("endpoint", &self.endpoint),
            ("database_name", &self.database_name),
            ("collection_name", &self.collection_name),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(RepositoryError::ValidationError(format!(
                    "{} 설정이 비어 있습니다",
                    name
                )));
            }
        }

        if self.timeout_ms == Some(0) {
            return Err(RepositoryError::ValidationError(
                "timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_log_filter_for_each_environment() {
        assert_eq!(Environment::Development.default_log_filter(), "debug,mongodb=info");
        assert_eq!(Environment::Production.default_log_filter(), "info");
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = RepositoryConfig::from_lookup(|_| None);

        assert_eq!(config, RepositoryConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.collection_name, "products");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_all_options_are_read() {
        let config = RepositoryConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_USERNAME", "svc"),
            ("MONGODB_PASSWORD", "secret"),
            ("MONGODB_AUTH_SOURCE", "admin"),
            ("DATABASE_NAME", "shop"),
            ("COLLECTION_NAME", "catalog"),
            ("REPOSITORY_TIMEOUT_MS", "1500"),
        ]));

        assert_eq!(config.endpoint, "mongodb://db:27017");
        assert_eq!(
            config.credentials,
            Some(Credentials::new("svc", "secret").with_auth_source("admin"))
        );
        assert_eq!(config.database_name, "shop");
        assert_eq!(config.collection_name, "catalog");
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config = RepositoryConfig::from_lookup(lookup_from(&[("MONGODB_USERNAME", "svc")]));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let config = RepositoryConfig::from_lookup(lookup_from(&[("REPOSITORY_TIMEOUT_MS", "soon")]));
        assert!(config.timeout_ms.is_none());

        let config = RepositoryConfig::from_lookup(lookup_from(&[("REPOSITORY_TIMEOUT_MS", "0")]));
        assert!(config.timeout_ms.is_none());
    }

    #[test]
    fn test_debug_output_hides_password() {
        let debug = format!("{:?}", Credentials::new("svc", "hunter2"));

        assert!(debug.contains("svc"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_validate_rejects_empty_collection() {
        let config = RepositoryConfig::default().with_collection(" ");
        assert!(matches!(config.validate(), Err(RepositoryError::ValidationError(_))));

        let config = RepositoryConfig::default().with_timeout_ms(0);
        assert!(config.validate().is_err());

        assert!(RepositoryConfig::default().validate().is_ok());
    }
}
