//! 쿼리 바이 예제 (Query by Example)
//!
//! 프로브(probe) 문서의 설정된 필드들을 동등 조건으로 하는 조회입니다.
//! 호출자는 저장소 전용 쿼리 문법을 알 필요가 없습니다.
//!
//! ```rust,ignore
//! let probe = Product::new("Widget", 0.0);
//! let example = Example::of(probe).ignoring(["price"]);
//! let widgets = repo.find_by_example(&example, None).await?;
//! ```

use mongodb::bson::{self, Document};
use serde::Serialize;

use crate::errors::RepositoryResult;
use crate::utils::bson_utils::flatten_filter;

/// 프로브 문서와 무시할 필드 경로
#[derive(Debug, Clone)]
pub struct Example<T> {
    probe: T,
    ignored_paths: Vec<String>,
}

impl<T: Serialize> Example<T> {
    pub fn of(probe: T) -> Self {
        Self {
            probe,
            ignored_paths: Vec::new(),
        }
    }

    /// 조건에서 제외할 필드 경로를 추가합니다. 중첩 필드는 `a.b` 형식입니다.
    pub fn ignoring<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_paths.extend(paths.into_iter().map(|p| {
            let path = p.into();
            if path == "id" { "_id".to_string() } else { path }
        }));
        self
    }

    pub fn probe(&self) -> &T {
        &self.probe
    }

    pub fn ignored_paths(&self) -> &[String] {
        &self.ignored_paths
    }

    /// 동등 조건 필터로 변환합니다.
    ///
    /// 식별자는 설정된 경우에만, `null` 필드와 무시된 경로는 제외됩니다.
    pub fn to_filter(&self) -> RepositoryResult<Document> {
        let document = bson::to_document(&self.probe)?;
        Ok(flatten_filter(document, &self.ignored_paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::products::product::Product;
    use mongodb::bson::doc;

    #[test]
    fn test_unset_fields_are_not_part_of_filter() {
        let filter = Example::of(Product::new("Widget", 9.99)).to_filter().unwrap();

        assert_eq!(filter, doc! { "name": "Widget", "price": 9.99 });
    }

    #[test]
    fn test_ignored_paths_are_dropped() {
        let example = Example::of(Product::new("Widget", 0.0).with_id("p1")).ignoring(["price", "id"]);

        assert_eq!(example.to_filter().unwrap(), doc! { "name": "Widget" });
        assert_eq!(example.ignored_paths(), ["price".to_string(), "_id".to_string()]);
    }

    #[test]
    fn test_set_id_is_part_of_filter() {
        let filter = Example::of(Product::new("Widget", 1.0).with_id("p1"))
            .ignoring(["name", "price"])
            .to_filter()
            .unwrap();

        assert_eq!(filter, doc! { "_id": "p1" });
    }
}
