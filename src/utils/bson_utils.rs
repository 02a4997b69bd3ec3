//! BSON 문서 비교 및 경로 조회 유틸리티
//!
//! 인메모리 리포지토리가 MongoDB와 같은 방식으로 정렬/필터링할 수 있도록
//! BSON 값 비교 규칙과 점(`.`) 경로 조회를 제공합니다.
//! 쿼리 바이 예제(Query by Example) 필터 생성에도 사용됩니다.

use std::cmp::Ordering;

use mongodb::bson::{Bson, Document};

/// MongoDB의 BSON 타입 비교 순서
///
/// 서로 다른 타입의 값은 이 순서로 먼저 비교됩니다.
/// (MinKey < Null < Numbers < Symbol/String < Object < Array < BinData
///  < ObjectId < Boolean < Date < Timestamp < RegEx < MaxKey)
fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::MaxKey => 13,
        _ => 12,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// 두 BSON 값을 MongoDB 정렬 규칙에 따라 비교합니다.
///
/// 필드가 없는 경우(`None`)는 `null`과 같이 취급합니다.
pub fn compare_bson(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    let left = left.unwrap_or(&Bson::Null);
    let right = right.unwrap_or(&Bson::Null);

    let rank = type_rank(left).cmp(&type_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    match (left, right) {
        (Bson::String(a), Bson::String(b)) => a.cmp(b),
        (Bson::Symbol(a), Bson::Symbol(b)) => a.cmp(b),
        (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => a.bytes().cmp(&b.bytes()),
        (Bson::DateTime(a), Bson::DateTime(b)) => a.cmp(b),
        (Bson::Timestamp(a), Bson::Timestamp(b)) => (a.time, a.increment).cmp(&(b.time, b.increment)),
        (Bson::Binary(a), Bson::Binary(b)) => a.bytes.cmp(&b.bytes),
        (Bson::Array(a), Bson::Array(b)) => compare_arrays(a, b),
        (Bson::Document(a), Bson::Document(b)) => compare_documents(a, b),
        _ => match (as_f64(left), as_f64(right)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

fn compare_arrays(left: &[Bson], right: &[Bson]) -> Ordering {
    for (a, b) in left.iter().zip(right.iter()) {
        let ordering = compare_bson(Some(a), Some(b));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_documents(left: &Document, right: &Document) -> Ordering {
    for ((ka, va), (kb, vb)) in left.iter().zip(right.iter()) {
        let ordering = ka
            .cmp(kb)
            .then_with(|| compare_bson(Some(va), Some(vb)));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

/// 두 값이 쿼리 동등 조건에서 같은지 판단합니다.
///
/// 숫자는 타입과 무관하게 값으로 비교합니다 (`Int32(1) == Double(1.0)`).
pub fn values_equal(left: &Bson, right: &Bson) -> bool {
    match (as_f64(left), as_f64(right)) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// 점(`.`)으로 구분된 경로를 따라 중첩 문서의 값을 조회합니다.
///
/// ```rust,ignore
/// let doc = doc! { "dimensions": { "width": 3 } };
/// assert_eq!(get_path(&doc, "dimensions.width"), Some(&Bson::Int32(3)));
/// ```
pub fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        match current {
            Bson::Document(inner) => current = inner.get(segment)?,
            _ => return None,
        }
    }

    Some(current)
}

/// 중첩 문서를 점 경로 기반의 동등 조건 필터로 평탄화합니다.
///
/// `null` 값과 `ignored`에 포함된 경로(및 그 하위 경로)는 제외됩니다.
/// 배열은 평탄화하지 않고 값 전체를 비교 대상으로 사용합니다.
pub fn flatten_filter(document: Document, ignored: &[String]) -> Document {
    let mut filter = Document::new();
    flatten_into(&mut filter, None, document, ignored);
    filter
}

fn flatten_into(filter: &mut Document, prefix: Option<&str>, document: Document, ignored: &[String]) {
    for (key, value) in document {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };

        if ignored.iter().any(|p| p == &path) {
            continue;
        }

        match value {
            Bson::Null | Bson::Undefined => {}
            Bson::Document(inner) => flatten_into(filter, Some(path.as_str()), inner, ignored),
            other => {
                filter.insert(path, other);
            }
        }
    }
}

/// 문서가 평탄화된 동등 조건 필터를 모두 만족하는지 확인합니다.
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(path, expected)| {
        get_path(document, path).is_some_and(|actual| values_equal(actual, expected))
    })
}
