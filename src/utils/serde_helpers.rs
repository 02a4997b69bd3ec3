//! 문서 식별자 직렬화 헬퍼
//!
//! 문자열 식별자를 저장할 때, 정규형(소문자 24자리 16진수) ObjectId이면 BSON ObjectId로,
//! 그 외에는 BSON 문자열로 저장합니다. 읽을 때는 두 형태 모두 문자열로 복원합니다.
//! 대문자 16진수처럼 정규형이 아닌 문자열은 문자열로 저장되어 철자 그대로 복원됩니다.
//! [`EntityId`](crate::domain::entities::EntityId)의 `String` 구현과 같은 규칙을 따르므로
//! `_id` 필터와 저장된 값이 항상 일치합니다.
//!
//! ```rust,ignore
//! #[derive(Serialize, Deserialize)]
//! pub struct Product {
//!     #[serde(
//!         rename = "_id",
//!         default,
//!         skip_serializing_if = "Option::is_none",
//!         with = "crate::utils::serde_helpers::optional_object_id_string"
//!     )]
//!     pub id: Option<String>,
//! }
//! ```

use mongodb::bson::Bson;
use mongodb::bson::oid::ObjectId;

/// 문자열 식별자를 저장 형태의 BSON 값으로 변환합니다.
///
/// `to_hex()`로 같은 문자열이 복원되는 경우에만 ObjectId로 저장합니다.
pub fn string_id_to_bson(id: &str) -> Bson {
    match ObjectId::parse_str(id) {
        Ok(object_id) if object_id.to_hex() == id => Bson::ObjectId(object_id),
        _ => Bson::String(id.to_string()),
    }
}

/// `Option<String>` 식별자 필드용 serde 모듈
pub mod optional_object_id_string {
    use mongodb::bson::Bson;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::string_id_to_bson;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => match string_id_to_bson(id) {
                Bson::ObjectId(object_id) => object_id.serialize(serializer),
                _ => serializer.serialize_str(id),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Bson>::deserialize(deserializer)? {
            None | Some(Bson::Null) => Ok(None),
            Some(Bson::ObjectId(object_id)) => Ok(Some(object_id.to_hex())),
            Some(Bson::String(id)) => Ok(Some(id)),
            Some(other) => Err(D::Error::custom(format!(
                "unsupported identifier type: {:?}",
                other.element_type()
            ))),
        }
    }
}

/// `Option<Uuid>` 식별자 필드용 serde 모듈
///
/// BSON 바이너리 대신 하이픈 포함 문자열로 저장하여
/// [`EntityId`](crate::domain::entities::EntityId)의 `Uuid` 구현과 일치시킵니다.
pub mod optional_uuid_string {
    use mongodb::bson::Bson;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S>(value: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(id) => serializer.serialize_str(&id.hyphenated().to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Bson>::deserialize(deserializer)? {
            None | Some(Bson::Null) => Ok(None),
            Some(Bson::String(id)) => Uuid::parse_str(&id).map(Some).map_err(D::Error::custom),
            Some(other) => Err(D::Error::custom(format!(
                "unsupported identifier type: {:?}",
                other.element_type()
            ))),
        }
    }
}
