//! 리포지토리 계층 전역에서 사용하는 에러 시스템
//!
//! `thiserror`를 사용하여 저장소 작업에서 발생하는 모든 실패를
//! 하나의 열거형으로 분류합니다. 리포지토리는 재시도나 에러 은닉을 하지 않으며,
//! 모든 에러는 호출자에게 그대로 전달됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use product_store::errors::{RepositoryError, RepositoryResult};
//!
//! async fn load(repo: &ProductRepository, id: &String) -> RepositoryResult<Product> {
//!     repo.find_by_id(id)
//!         .await?
//!         .ok_or_else(|| RepositoryError::NotFound(format!("product {}", id)))
//! }
//! ```

use std::fmt;

use mongodb::bson;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// MongoDB 중복 키 에러 코드
const DUPLICATE_KEY_CODE: i32 = 11000;

/// 리포지토리 에러 타입
///
/// 저장소 작업에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
///
/// ## 에러 카테고리
///
/// - `NotFound`: 계약상 에러가 필요한 경우에만 사용 (`find_by_id`, `delete_by_id`는 제외)
/// - `DuplicateKey`: 삽입 경로에서 유니크 제약 위반
/// - `SerializationError`: 도메인 객체 ↔ BSON 변환 실패
/// - `PersistenceError`: 연결 실패, 타임아웃, 저장소가 보고한 실패
/// - `Cancelled`: 호출자가 진행 중인 작업을 취소함
/// - `ValidationError`: 엔티티 검증 실패, 식별자가 필요한 경로의 식별자 누락
/// - `BatchDelete`: 일괄 삭제 중 일부 실패 (모든 시도가 끝난 뒤 한 번에 보고)
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 일괄 삭제 실패
    ///
    /// 성공한 삭제는 되돌리지 않습니다. `failures`에는 실패한 식별자와
    /// 원인이 시도 순서대로 들어 있습니다.
    #[error("Batch delete failed for {} document(s): {}", .failures.len(), format_failures(.failures))]
    BatchDelete { failures: Vec<BatchFailure> },
}

/// 일괄 작업에서 실패한 단일 문서
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// 실패한 문서의 식별자 (식별자가 없으면 `<unset>`)
    pub id: String,
    /// 실패 원인
    pub reason: String,
}

impl BatchFailure {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.reason)
    }
}

fn format_failures(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RepositoryError {
    /// 일괄 삭제 에러에서 실패한 식별자 목록을 반환합니다.
    pub fn failed_ids(&self) -> Vec<&str> {
        match self {
            RepositoryError::BatchDelete { failures } => {
                failures.iter().map(|f| f.id.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<mongodb::error::Error> for RepositoryError {
    /// 드라이버 에러를 리포지토리 에러로 분류합니다.
    ///
    /// - 쓰기/명령 에러 코드 11000 → `DuplicateKey`
    /// - BSON 직렬화/역직렬화 실패 → `SerializationError`
    /// - 그 외 (네트워크, 인증, 서버 선택 실패 등) → `PersistenceError`
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                RepositoryError::DuplicateKey(write_error.message.clone())
            }
            ErrorKind::Command(command_error) if command_error.code == DUPLICATE_KEY_CODE => {
                RepositoryError::DuplicateKey(command_error.message.clone())
            }
            ErrorKind::BsonSerialization(e) => RepositoryError::SerializationError(e.to_string()),
            ErrorKind::BsonDeserialization(e) => {
                RepositoryError::SerializationError(e.to_string())
            }
            _ => RepositoryError::PersistenceError(err.to_string()),
        }
    }
}

impl From<bson::ser::Error> for RepositoryError {
    fn from(err: bson::ser::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

impl From<bson::de::Error> for RepositoryError {
    fn from(err: bson::de::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// 외부 라이브러리 에러를 RepositoryError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 `PersistenceError`로 변환합니다.
    fn context(self, msg: &str) -> RepositoryResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> RepositoryResult<T> {
        self.map_err(|e| RepositoryError::PersistenceError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| RepositoryError::PersistenceError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_bson_decode_failure_is_serialization_error() {
        let result = bson::from_document::<Sample>(doc! { "name": 5 });
        let error = RepositoryError::from(result.unwrap_err());

        assert!(matches!(error, RepositoryError::SerializationError(_)));
    }

    #[test]
    fn test_batch_delete_message_lists_every_failure() {
        let error = RepositoryError::BatchDelete {
            failures: vec![
                BatchFailure::new("p1", "timed out"),
                BatchFailure::new("<unset>", "document has no identifier"),
            ],
        };

        let message = error.to_string();
        assert!(message.starts_with("Batch delete failed for 2 document(s)"));
        assert!(message.contains("p1 (timed out)"));
        assert!(message.contains("<unset> (document has no identifier)"));
        assert_eq!(error.failed_ids(), vec!["p1", "<unset>"]);
    }

    #[test]
    fn test_failed_ids_empty_for_other_variants() {
        let error = RepositoryError::NotFound("p9".to_string());
        assert!(error.failed_ids().is_empty());
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("connection reset");
        let repo_result = result.context("Failed to ping server");

        if let Err(RepositoryError::PersistenceError(msg)) = repo_result {
            assert!(msg.contains("Failed to ping server"));
            assert!(msg.contains("connection reset"));
        } else {
            panic!("Expected PersistenceError");
        }
    }

    #[test]
    fn test_error_with_context_is_lazy() {
        let result: Result<u8, &str> = Ok(1);
        let value = result
            .with_context(|| panic!("context must not be evaluated on success"))
            .unwrap();

        assert_eq!(value, 1);
    }
}
