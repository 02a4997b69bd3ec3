//! 문서 엔티티와 식별자 trait
//!
//! 리포지토리가 저장할 수 있는 모든 문서는 [`Entity`]를 구현합니다.
//! 식별자 타입은 [`EntityId`]를 통해 `_id` 필드의 BSON 표현과 신규 식별자 생성 규칙을 정의합니다.

use std::fmt;

use mongodb::bson::Bson;
use mongodb::bson::oid::ObjectId;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::errors::{RepositoryError, RepositoryResult};
use crate::utils::serde_helpers::string_id_to_bson;

/// 문서 식별자 타입
///
/// | 타입 | 저장 형태 | 자동 생성 |
/// |------|-----------|-----------|
/// | `String` | 정규형 ObjectId hex이면 ObjectId, 아니면 문자열 | ObjectId hex |
/// | `ObjectId` | ObjectId | `ObjectId::new()` |
/// | `Uuid` | 하이픈 포함 소문자 문자열 | `Uuid::new_v4()` |
/// | `i32` / `i64` | Int32 / Int64 | 지원하지 않음 |
pub trait EntityId: Clone + PartialEq + fmt::Display + Send + Sync + 'static {
    /// `_id` 필터에 사용할 BSON 값을 반환합니다.
    ///
    /// 엔티티의 serde 표현이 저장하는 값과 같아야 합니다.
    fn to_bson(&self) -> Bson;

    /// 식별자가 없는 문서를 저장할 때 사용할 새 식별자를 생성합니다.
    ///
    /// 자동 생성을 지원하지 않는 타입은 `None`을 반환합니다.
    fn generate() -> Option<Self>;
}

impl EntityId for String {
    fn to_bson(&self) -> Bson {
        string_id_to_bson(self)
    }

    fn generate() -> Option<Self> {
        Some(ObjectId::new().to_hex())
    }
}

impl EntityId for ObjectId {
    fn to_bson(&self) -> Bson {
        Bson::ObjectId(*self)
    }

    fn generate() -> Option<Self> {
        Some(ObjectId::new())
    }
}

impl EntityId for Uuid {
    fn to_bson(&self) -> Bson {
        Bson::String(self.hyphenated().to_string())
    }

    fn generate() -> Option<Self> {
        Some(Uuid::new_v4())
    }
}

impl EntityId for i32 {
    fn to_bson(&self) -> Bson {
        Bson::Int32(*self)
    }

    fn generate() -> Option<Self> {
        None
    }
}

impl EntityId for i64 {
    fn to_bson(&self) -> Bson {
        Bson::Int64(*self)
    }

    fn generate() -> Option<Self> {
        None
    }
}

/// 리포지토리가 저장하는 문서 엔티티
///
/// 식별자 필드는 `_id`로 직렬화되어야 하며, 식별자가 없을 때는 필드를 생략해야 합니다.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Category {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub title: String,
/// }
///
/// impl Entity for Category {
///     type Id = ObjectId;
///
///     fn id(&self) -> Option<&ObjectId> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: ObjectId) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    type Id: EntityId;

    fn id(&self) -> Option<&Self::Id>;

    /// 신규 삽입 시 생성된 식별자를 할당합니다.
    fn set_id(&mut self, id: Self::Id);

    /// 저장 전 검증 훅
    ///
    /// 모든 쓰기 작업(`save`, `insert`) 전에 호출되며, 실패 시 저장소에 접근하지 않습니다.
    fn validate_entity(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// 신규 식별자를 생성합니다. 자동 생성을 지원하지 않는 타입이면 `ValidationError`입니다.
pub(crate) fn generate_id<I: EntityId>() -> RepositoryResult<I> {
    I::generate().ok_or_else(|| {
        RepositoryError::ValidationError(
            "식별자를 자동 생성할 수 없는 타입입니다. 식별자를 지정해 주세요".to_string(),
        )
    })
}

/// 로그 및 에러 메시지용 식별자 표시
pub(crate) fn display_id<I: EntityId>(id: Option<&I>) -> String {
    id.map(ToString::to_string)
        .unwrap_or_else(|| "<unset>".to_string())
}
