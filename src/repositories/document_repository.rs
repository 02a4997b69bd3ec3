//! # 문서 리포지토리 계약
//!
//! 단일 컬렉션의 문서에 대한 식별자 기반 CRUD, 정렬/페이지 조회,
//! 쿼리 바이 예제를 제공하는 제네릭 trait입니다.
//!
//! ## 계약 요약
//!
//! | 연산 | 부재 시 동작 |
//! |------|--------------|
//! | `save` | 식별자 생성 후 삽입 (업서트) |
//! | `find_by_id` | `Ok(None)` |
//! | `delete_by_id` | 아무 것도 하지 않음 (`Ok(())`) |
//! | `delete_all` | 모든 삭제를 시도한 뒤 실패 목록을 `BatchDelete`로 보고 |
//!
//! 리포지토리는 호출 간 상태를 갖지 않으며 재시도하지 않습니다.
//! 동시 호출에 안전하며, 동기화 단위는 저장소 자체입니다.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use futures_util::stream::BoxStream;
use log::warn;

use crate::domain::entities::entity::{Entity, EntityId};
use crate::domain::models::{Example, Page, PageRequest, Sort};
use crate::errors::{BatchFailure, RepositoryError, RepositoryResult};

/// 지연 평가되는 유한한 문서 스트림
///
/// 호출할 때마다 새 스트림(커서)이 열리므로 처음부터 다시 순회할 수 있습니다.
pub type DocumentStream<T> = BoxStream<'static, RepositoryResult<T>>;

/// 제네릭 문서 리포지토리
///
/// `T`는 저장할 문서 타입, `ID`는 식별자 타입입니다.
///
/// ```rust,ignore
/// async fn rename(repo: &impl DocumentRepository<Product>, id: &String) -> RepositoryResult<()> {
///     if let Some(mut product) = repo.find_by_id(id).await? {
///         product.name = "Widget v2".to_string();
///         repo.save(product).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DocumentRepository<T, ID = <T as Entity>::Id>: Send + Sync
where
    T: Entity<Id = ID>,
    ID: EntityId,
{
    /// 업서트: 식별자가 없으면 생성 후 삽입, 있으면 같은 식별자의 문서를 교체(없으면 삽입)합니다.
    ///
    /// 생성된 식별자를 포함한 저장된 문서를 반환합니다.
    async fn save(&self, document: T) -> RepositoryResult<T>;

    /// 삽입 전용 경로: 같은 식별자가 이미 있으면 `DuplicateKey`를 반환합니다.
    async fn insert(&self, document: T) -> RepositoryResult<T>;

    /// 각 문서에 `save`를 순서대로 적용합니다. 첫 실패에서 중단합니다.
    async fn save_all(&self, documents: Vec<T>) -> RepositoryResult<Vec<T>> {
        let mut saved = Vec::with_capacity(documents.len());
        for document in documents {
            saved.push(self.save(document).await?);
        }
        Ok(saved)
    }

    async fn find_by_id(&self, id: &ID) -> RepositoryResult<Option<T>>;

    async fn exists_by_id(&self, id: &ID) -> RepositoryResult<bool>;

    /// 컬렉션의 모든 문서를 순회합니다. 순서는 보장되지 않습니다.
    async fn find_all(&self) -> RepositoryResult<DocumentStream<T>>;

    /// 지정한 정렬 순서로 모든 문서를 순회합니다.
    async fn find_all_sorted(&self, sort: &Sort) -> RepositoryResult<DocumentStream<T>>;

    /// 정렬과 페이지(offset + limit)가 적용된 조회
    async fn find_page(&self, request: &PageRequest) -> RepositoryResult<Page<T>>;

    /// 주어진 식별자 중 존재하는 문서들을 반환합니다.
    async fn find_all_by_id(&self, ids: &[ID]) -> RepositoryResult<Vec<T>>;

    async fn count(&self) -> RepositoryResult<u64>;

    /// 문서가 없으면 아무 것도 하지 않습니다.
    async fn delete_by_id(&self, id: &ID) -> RepositoryResult<()>;

    /// 문서의 식별자로 삭제합니다. 식별자가 없는 문서는 `ValidationError`입니다.
    async fn delete(&self, document: &T) -> RepositoryResult<()> {
        match document.id() {
            Some(id) => self.delete_by_id(id).await,
            None => Err(RepositoryError::ValidationError(
                "식별자가 없는 문서는 삭제할 수 없습니다".to_string(),
            )),
        }
    }

    /// 모든 식별자에 대해 삭제를 시도하고, 실패가 있으면 한 번에 보고합니다.
    async fn delete_all_by_id(&self, ids: &[ID]) -> RepositoryResult<()> {
        let mut failures = Vec::new();
        for id in ids {
            if let Err(e) = self.delete_by_id(id).await {
                failures.push(BatchFailure::new(id.to_string(), e.to_string()));
            }
        }
        batch_result(failures, ids.len())
    }

    /// 각 문서를 식별자로 삭제합니다.
    ///
    /// 식별자가 없는 문서는 실패로 기록되며, 나머지 문서의 삭제는 계속 시도됩니다.
    async fn delete_all(&self, documents: Vec<T>) -> RepositoryResult<()> {
        let total = documents.len();
        let mut failures = Vec::new();
        for document in &documents {
            match document.id() {
                Some(id) => {
                    if let Err(e) = self.delete_by_id(id).await {
                        failures.push(BatchFailure::new(id.to_string(), e.to_string()));
                    }
                }
                None => failures.push(BatchFailure::new("<unset>", "document has no identifier")),
            }
        }
        batch_result(failures, total)
    }

    /// 컬렉션의 모든 문서를 삭제합니다.
    async fn clear(&self) -> RepositoryResult<()>;

    /// 예제와 일치하는 모든 문서를 반환합니다.
    async fn find_by_example(
        &self,
        example: &Example<T>,
        sort: Option<&Sort>,
    ) -> RepositoryResult<Vec<T>>;

    async fn find_one_by_example(&self, example: &Example<T>) -> RepositoryResult<Option<T>>;

    async fn count_by_example(&self, example: &Example<T>) -> RepositoryResult<u64>;

    async fn exists_by_example(&self, example: &Example<T>) -> RepositoryResult<bool> {
        Ok(self.count_by_example(example).await? > 0)
    }

    /// `find_all` 스트림을 벡터로 모읍니다.
    async fn find_all_vec(&self) -> RepositoryResult<Vec<T>> {
        self.find_all().await?.try_collect().await
    }
}

fn batch_result(failures: Vec<BatchFailure>, attempted: usize) -> RepositoryResult<()> {
    if failures.is_empty() {
        return Ok(());
    }

    warn!(
        "⚠️ 일괄 삭제 중 {}/{}건 실패: {:?}",
        failures.len(),
        attempted,
        failures.iter().map(|f| f.id.as_str()).collect::<Vec<_>>()
    );
    Err(RepositoryError::BatchDelete { failures })
}
