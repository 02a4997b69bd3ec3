//! 인메모리 문서 리포지토리 (`RwLock<Vec<Document>>` 기반)
//!
//! MongoDB 없이 [`DocumentRepository`] 계약을 같은 의미로 제공하는 구현입니다.
//! 문서는 BSON으로 직렬화되어 저장되므로, 직렬화 실패도 MongoDB 어댑터와 같이 드러납니다.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use log::debug;
use mongodb::bson::{self, Bson, Document};
use tokio_util::sync::CancellationToken;

use crate::domain::entities::entity::{Entity, EntityId, generate_id};
use crate::domain::models::{Direction, Example, Page, PageRequest, Sort};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::repositories::document_repository::{DocumentRepository, DocumentStream};
use crate::utils::bson_utils::{compare_bson, get_path, matches_filter};

/// 인메모리 문서 리포지토리 (개발 및 테스트용)
///
/// 복제본은 같은 저장 공간을 공유합니다. 삽입 순서가 유지되며,
/// 정렬이 지정되지 않은 조회는 삽입 순서로 반환됩니다.
pub struct InMemoryRepository<T> {
    documents: Arc<RwLock<Vec<Document>>>,
    cancel: Option<CancellationToken>,
    _entity: std::marker::PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            cancel: self.cancel.clone(),
            _entity: std::marker::PhantomData,
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
            cancel: None,
            _entity: std::marker::PhantomData,
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    /// 빈 리포지토리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 저장 공간을 공유하며 취소 토큰이 연결된 복제본을 반환합니다.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    fn check_cancelled(&self, operation: &str) -> RepositoryResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                Err(RepositoryError::Cancelled(format!("{} on in-memory store", operation)))
            }
            _ => Ok(()),
        }
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<Document>>> {
        self.documents
            .read()
            .map_err(|_| RepositoryError::PersistenceError("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Vec<Document>>> {
        self.documents
            .write()
            .map_err(|_| RepositoryError::PersistenceError("in-memory store lock poisoned".to_string()))
    }

    fn encode(document: &T) -> RepositoryResult<Document> {
        Ok(bson::to_document(document)?)
    }

    fn decode(document: Document) -> RepositoryResult<T> {
        Ok(bson::from_document(document)?)
    }

    fn position(documents: &[Document], id: &Bson) -> Option<usize> {
        documents.iter().position(|d| d.get("_id") == Some(id))
    }

    /// 정렬/필터가 적용된 스냅샷
    fn snapshot(&self, filter: Option<&Document>, sort: Option<&Sort>) -> RepositoryResult<Vec<Document>> {
        let mut selected: Vec<Document> = self
            .read()?
            .iter()
            .filter(|d| filter.is_none_or(|f| matches_filter(d, f)))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            selected.sort_by(|a, b| {
                sort.orders().iter().fold(std::cmp::Ordering::Equal, |ordering, order| {
                    ordering.then_with(|| {
                        let path = order.field_path();
                        let natural = compare_bson(get_path(a, path), get_path(b, path));
                        match order.direction {
                            Direction::Ascending => natural,
                            Direction::Descending => natural.reverse(),
                        }
                    })
                })
            });
        }

        Ok(selected)
    }

    fn upsert(&self, document: &T) -> RepositoryResult<bool> {
        let encoded = Self::encode(document)?;
        let id = encoded
            .get("_id")
            .cloned()
            .ok_or_else(|| RepositoryError::SerializationError("_id 필드가 직렬화되지 않았습니다".to_string()))?;

        let mut documents = self.write()?;
        match Self::position(&documents, &id) {
            Some(index) => {
                documents[index] = encoded;
                Ok(false)
            }
            None => {
                documents.push(encoded);
                Ok(true)
            }
        }
    }

    fn insert_new(&self, document: &T) -> RepositoryResult<()> {
        let encoded = Self::encode(document)?;
        let id = encoded
            .get("_id")
            .cloned()
            .ok_or_else(|| RepositoryError::SerializationError("_id 필드가 직렬화되지 않았습니다".to_string()))?;

        let mut documents = self.write()?;
        if Self::position(&documents, &id).is_some() {
            return Err(RepositoryError::DuplicateKey(format!("_id {} already exists", id)));
        }
        documents.push(encoded);
        Ok(())
    }

    fn remove(&self, id: &Bson) -> RepositoryResult<bool> {
        let mut documents = self.write()?;
        match Self::position(&documents, id) {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn decode_all(documents: Vec<Document>) -> RepositoryResult<Vec<T>> {
        documents.into_iter().map(Self::decode).collect()
    }

    fn stream_of(documents: Vec<Document>) -> DocumentStream<T> {
        stream::iter(documents.into_iter().map(Self::decode)).boxed()
    }
}

#[async_trait]
impl<T: Entity> DocumentRepository<T, T::Id> for InMemoryRepository<T> {
    async fn save(&self, mut document: T) -> RepositoryResult<T> {
        self.check_cancelled("save")?;
        document.validate_entity()?;

        if document.id().is_none() {
            document.set_id(generate_id::<T::Id>()?);
        }

        let inserted = self.upsert(&document)?;
        debug!("in-memory save: inserted={}", inserted);
        Ok(document)
    }

    async fn insert(&self, mut document: T) -> RepositoryResult<T> {
        self.check_cancelled("insert")?;
        document.validate_entity()?;

        if document.id().is_none() {
            document.set_id(generate_id::<T::Id>()?);
        }

        self.insert_new(&document)?;
        Ok(document)
    }

    async fn find_by_id(&self, id: &T::Id) -> RepositoryResult<Option<T>> {
        self.check_cancelled("find_by_id")?;
        let found = {
            let documents = self.read()?;
            Self::position(&documents, &id.to_bson()).map(|index| documents[index].clone())
        };
        found.map(Self::decode).transpose()
    }

    async fn exists_by_id(&self, id: &T::Id) -> RepositoryResult<bool> {
        self.check_cancelled("exists_by_id")?;
        let documents = self.read()?;
        Ok(Self::position(&documents, &id.to_bson()).is_some())
    }

    async fn find_all(&self) -> RepositoryResult<DocumentStream<T>> {
        self.check_cancelled("find_all")?;
        Ok(Self::stream_of(self.snapshot(None, None)?))
    }

    async fn find_all_sorted(&self, sort: &Sort) -> RepositoryResult<DocumentStream<T>> {
        self.check_cancelled("find_all_sorted")?;
        Ok(Self::stream_of(self.snapshot(None, Some(sort))?))
    }

    async fn find_page(&self, request: &PageRequest) -> RepositoryResult<Page<T>> {
        self.check_cancelled("find_page")?;
        request.validate()?;

        let all = self.snapshot(None, Some(&request.sort))?;
        let total = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        let content = Self::decode_all(all.into_iter().skip(offset).take(size).collect())?;

        Ok(Page::new(content, request, total))
    }

    async fn find_all_by_id(&self, ids: &[T::Id]) -> RepositoryResult<Vec<T>> {
        self.check_cancelled("find_all_by_id")?;
        let wanted: Vec<Bson> = ids.iter().map(EntityId::to_bson).collect();
        let selected: Vec<Document> = self
            .read()?
            .iter()
            .filter(|d| d.get("_id").is_some_and(|id| wanted.contains(id)))
            .cloned()
            .collect();
        Self::decode_all(selected)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        self.check_cancelled("count")?;
        Ok(self.read()?.len() as u64)
    }

    async fn delete_by_id(&self, id: &T::Id) -> RepositoryResult<()> {
        self.check_cancelled("delete_by_id")?;
        if !self.remove(&id.to_bson())? {
            debug!("in-memory delete_by_id: {} 없음", id);
        }
        Ok(())
    }

    async fn clear(&self) -> RepositoryResult<()> {
        self.check_cancelled("clear")?;
        self.write()?.clear();
        Ok(())
    }

    async fn find_by_example(
        &self,
        example: &Example<T>,
        sort: Option<&Sort>,
    ) -> RepositoryResult<Vec<T>> {
        self.check_cancelled("find_by_example")?;
        let filter = example.to_filter()?;
        Self::decode_all(self.snapshot(Some(&filter), sort)?)
    }

    async fn find_one_by_example(&self, example: &Example<T>) -> RepositoryResult<Option<T>> {
        self.check_cancelled("find_one_by_example")?;
        let filter = example.to_filter()?;
        let first = self.snapshot(Some(&filter), None)?.into_iter().next();
        first.map(Self::decode).transpose()
    }

    async fn count_by_example(&self, example: &Example<T>) -> RepositoryResult<u64> {
        self.check_cancelled("count_by_example")?;
        let filter = example.to_filter()?;
        Ok(self.snapshot(Some(&filter), None)?.len() as u64)
    }
}
