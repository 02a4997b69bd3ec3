//! # MongoDB 문서 리포지토리 구현
//!
//! [`DocumentRepository`] 계약을 MongoDB 컬렉션에 직접 매핑하는 어댑터입니다.
//!
//! ## 특징
//!
//! - **명시적 생성**: `Database` 핸들과 `RepositoryConfig`를 생성자로 전달받음
//! - **단일 요청**: 각 연산은 저장소와의 단일 요청/응답 (일괄 연산 제외)
//! - **호출별 타임아웃**: `timeout_ms` 초과 시 `PersistenceError`
//! - **취소**: `CancellationToken`이 취소되면 진행 중인 요청을 중단하고 `Cancelled` 반환
//!
//! 커서의 후속 배치(getMore) 요청에도 같은 타임아웃과 취소가 적용됩니다.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use futures_util::{StreamExt, TryStreamExt};
use log::{debug, warn};
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Cursor, IndexModel};
use tokio_util::sync::CancellationToken;

use crate::config::RepositoryConfig;
use crate::db::Database;
use crate::domain::entities::entity::{Entity, EntityId, display_id, generate_id};
use crate::domain::models::{Example, Page, PageRequest, Sort};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::repositories::document_repository::{DocumentRepository, DocumentStream};

/// MongoDB 기반 문서 리포지토리
///
/// 복제 비용이 낮으며(`Collection`은 연결 풀을 공유), 여러 태스크에서 동시에 사용할 수 있습니다.
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let config = RepositoryConfig::from_env();
/// let database = Database::connect(&config).await?;
/// let products: MongoRepository<Product> = MongoRepository::new(&database, &config);
///
/// let saved = products.save(Product::new("Widget", 9.99)).await?;
/// let found = products.find_by_id(saved.id.as_ref().unwrap()).await?;
/// ```
pub struct MongoRepository<T: Entity> {
    collection: Collection<T>,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl<T: Entity> Clone for MongoRepository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        }
    }
}

/// 요청 하나에 적용되는 타임아웃과 취소 조건
#[derive(Clone)]
struct Bounds {
    collection_name: String,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Bounds {
    /// 타임아웃과 취소를 적용하여 저장소 요청을 실행합니다.
    ///
    /// 취소되거나 타임아웃이 나면 요청 future는 드롭되어 중단됩니다.
    async fn run<R, F>(&self, operation: &'static str, request: F) -> RepositoryResult<R>
    where
        F: Future<Output = RepositoryResult<R>> + Send,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
                    RepositoryError::PersistenceError(format!(
                        "{} timed out after {}ms",
                        operation,
                        limit.as_millis()
                    ))
                })?,
                None => request.await,
            }
        };

        let result = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(RepositoryError::Cancelled(format!(
                    "{} on {}",
                    operation, self.collection_name
                ))),
                result = bounded => result,
            },
            None => bounded.await,
        };

        if let Err(e) = &result {
            warn!("⚠️ {} 실패 ({}): {}", operation, self.collection_name, e);
        }
        result
    }
}

impl<T: Entity> MongoRepository<T> {
    /// 설정의 컬렉션 이름과 타임아웃으로 리포지토리를 생성합니다.
    pub fn new(database: &Database, config: &RepositoryConfig) -> Self {
        Self {
            collection: database.collection::<T>(&config.collection_name),
            timeout: config.timeout(),
            cancel: None,
        }
    }

    /// 취소 토큰이 연결된 복제본을 반환합니다.
    ///
    /// 토큰이 취소되면 이 복제본의 모든 진행 중/이후 호출은 `Cancelled`로 끝납니다.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// 컬렉션에 인덱스를 생성합니다.
    pub async fn create_indexes(&self, indexes: Vec<IndexModel>) -> RepositoryResult<()> {
        let collection = self.collection.clone();
        self.guard("create_indexes", async move {
            collection.create_indexes(indexes).await?;
            Ok::<_, RepositoryError>(())
        })
        .await
    }

    fn bounds(&self) -> Bounds {
        Bounds {
            collection_name: self.collection.name().to_string(),
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        }
    }

    async fn guard<R, F>(&self, operation: &'static str, request: F) -> RepositoryResult<R>
    where
        F: Future<Output = RepositoryResult<R>> + Send,
    {
        self.bounds().run(operation, request).await
    }

    /// 커서를 리포지토리 스트림으로 변환합니다.
    ///
    /// 각 항목(후속 배치 요청 포함)마다 타임아웃과 취소가 적용되며,
    /// 첫 에러를 내보낸 뒤 스트림은 끝납니다.
    fn into_stream(&self, cursor: Cursor<T>) -> DocumentStream<T> {
        let bounds = self.bounds();

        stream::unfold(Some(cursor), move |state| {
            let bounds = bounds.clone();
            async move {
                let mut cursor = state?;
                let next = bounds
                    .run("cursor", async { cursor.try_next().await.map_err(RepositoryError::from) })
                    .await;
                match next {
                    Ok(Some(document)) => Some((Ok(document), Some(cursor))),
                    Ok(None) => None,
                    Err(e) => Some((Err(e), None)),
                }
            }
        })
        .boxed()
    }

    async fn open_cursor(
        &self,
        operation: &'static str,
        filter: Document,
        sort: Option<&Sort>,
    ) -> RepositoryResult<Cursor<T>> {
        let collection = self.collection.clone();
        let sort = Self::sort_document(sort);

        self.guard(operation, async move {
            let mut find = collection.find(filter);
            if let Some(sort) = sort {
                find = find.sort(sort);
            }
            find.await.map_err(RepositoryError::from)
        })
        .await
    }

    /// 조회와 결과 수집 전체를 하나의 요청으로 묶어 실행합니다.
    async fn find_vec(
        &self,
        operation: &'static str,
        filter: Document,
        sort: Option<&Sort>,
        skip: Option<u64>,
        limit: Option<i64>,
    ) -> RepositoryResult<Vec<T>> {
        let collection = self.collection.clone();
        let sort = Self::sort_document(sort);

        self.guard(operation, async move {
            let mut find = collection.find(filter);
            if let Some(sort) = sort {
                find = find.sort(sort);
            }
            if let Some(skip) = skip {
                find = find.skip(skip);
            }
            if let Some(limit) = limit {
                find = find.limit(limit);
            }
            let cursor = find.await?;
            cursor.try_collect::<Vec<T>>().await.map_err(RepositoryError::from)
        })
        .await
    }

    async fn insert_document(&self, operation: &'static str, document: &T) -> RepositoryResult<()> {
        let collection = self.collection.clone();
        self.guard(operation, async move {
            collection.insert_one(document).await?;
            Ok::<_, RepositoryError>(())
        })
        .await
    }

    fn sort_document(sort: Option<&Sort>) -> Option<Document> {
        sort.filter(|s| !s.is_unsorted()).map(Sort::to_document)
    }

    fn id_filter(id: &T::Id) -> Document {
        doc! { "_id": id.to_bson() }
    }
}

#[async_trait]
impl<T: Entity> DocumentRepository<T, T::Id> for MongoRepository<T> {
    async fn save(&self, mut document: T) -> RepositoryResult<T> {
        document.validate_entity()?;

        match document.id().cloned() {
            Some(id) => {
                let collection = self.collection.clone();
                let filter = Self::id_filter(&id);
                let replacement = &document;
                let upserted = self
                    .guard("save", async move {
                        let result = collection.replace_one(filter, replacement).upsert(true).await?;
                        Ok::<_, RepositoryError>(result.upserted_id.is_some())
                    })
                    .await?;
                debug!(
                    "{} {} ({})",
                    if upserted { "inserted" } else { "replaced" },
                    id,
                    self.collection.name()
                );
            }
            None => {
                document.set_id(generate_id::<T::Id>()?);
                self.insert_document("save", &document).await?;
                debug!(
                    "inserted {} ({})",
                    display_id(document.id()),
                    self.collection.name()
                );
            }
        }

        Ok(document)
    }

    async fn insert(&self, mut document: T) -> RepositoryResult<T> {
        document.validate_entity()?;

        if document.id().is_none() {
            document.set_id(generate_id::<T::Id>()?);
        }

        self.insert_document("insert", &document).await?;
        debug!("inserted {} ({})", display_id(document.id()), self.collection.name());
        Ok(document)
    }

    async fn find_by_id(&self, id: &T::Id) -> RepositoryResult<Option<T>> {
        let collection = self.collection.clone();
        let filter = Self::id_filter(id);
        self.guard("find_by_id", async move {
            collection.find_one(filter).await.map_err(RepositoryError::from)
        })
        .await
    }

    async fn exists_by_id(&self, id: &T::Id) -> RepositoryResult<bool> {
        let collection = self.collection.clone();
        let filter = Self::id_filter(id);
        let count = self
            .guard("exists_by_id", async move {
                collection.count_documents(filter).limit(1).await.map_err(RepositoryError::from)
            })
            .await?;
        Ok(count > 0)
    }

    async fn find_all(&self) -> RepositoryResult<DocumentStream<T>> {
        let cursor = self.open_cursor("find_all", doc! {}, None).await?;
        Ok(self.into_stream(cursor))
    }

    async fn find_all_sorted(&self, sort: &Sort) -> RepositoryResult<DocumentStream<T>> {
        let cursor = self.open_cursor("find_all_sorted", doc! {}, Some(sort)).await?;
        Ok(self.into_stream(cursor))
    }

    async fn find_page(&self, request: &PageRequest) -> RepositoryResult<Page<T>> {
        request.validate()?;

        let total = self.count().await?;
        let limit = i64::try_from(request.size).unwrap_or(i64::MAX);
        let content = self
            .find_vec(
                "find_page",
                doc! {},
                Some(&request.sort),
                Some(request.offset()),
                Some(limit),
            )
            .await?;

        Ok(Page::new(content, request, total))
    }

    async fn find_all_by_id(&self, ids: &[T::Id]) -> RepositoryResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<_> = ids.iter().map(EntityId::to_bson).collect();
        self.find_vec("find_all_by_id", doc! { "_id": { "$in": values } }, None, None, None)
            .await
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let collection = self.collection.clone();
        self.guard("count", async move {
            collection.count_documents(doc! {}).await.map_err(RepositoryError::from)
        })
        .await
    }

    async fn delete_by_id(&self, id: &T::Id) -> RepositoryResult<()> {
        let collection = self.collection.clone();
        let filter = Self::id_filter(id);
        let deleted = self
            .guard("delete_by_id", async move {
                Ok::<_, RepositoryError>(collection.delete_one(filter).await?.deleted_count)
            })
            .await?;

        if deleted == 0 {
            debug!("delete_by_id: {} 없음 ({})", id, self.collection.name());
        }
        Ok(())
    }

    async fn clear(&self) -> RepositoryResult<()> {
        let collection = self.collection.clone();
        let deleted = self
            .guard("clear", async move {
                Ok::<_, RepositoryError>(collection.delete_many(doc! {}).await?.deleted_count)
            })
            .await?;
        debug!("cleared {} document(s) from {}", deleted, self.collection.name());
        Ok(())
    }

    async fn find_by_example(
        &self,
        example: &Example<T>,
        sort: Option<&Sort>,
    ) -> RepositoryResult<Vec<T>> {
        let filter = example.to_filter()?;
        self.find_vec("find_by_example", filter, sort, None, None).await
    }

    async fn find_one_by_example(&self, example: &Example<T>) -> RepositoryResult<Option<T>> {
        let collection = self.collection.clone();
        let filter = example.to_filter()?;
        self.guard("find_one_by_example", async move {
            collection.find_one(filter).await.map_err(RepositoryError::from)
        })
        .await
    }

    async fn count_by_example(&self, example: &Example<T>) -> RepositoryResult<u64> {
        let collection = self.collection.clone();
        let filter = example.to_filter()?;
        self.guard("count_by_example", async move {
            collection.count_documents(filter).await.map_err(RepositoryError::from)
        })
        .await
    }
}
