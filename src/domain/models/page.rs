//! 페이지 요청과 페이지 결과

use serde::Serialize;

use crate::domain::models::sort::Sort;
use crate::errors::{RepositoryError, RepositoryResult};

/// 페이지 요청 (0부터 시작하는 페이지 번호 + 페이지 크기 + 정렬)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    pub fn of(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// 건너뛸 문서 수 (`page * size`)
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// 크기가 0인 페이지는 허용하지 않습니다.
    pub fn validate(&self) -> RepositoryResult<()> {
        if self.size == 0 {
            return Err(RepositoryError::ValidationError(
                "페이지 크기는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 다음 페이지 요청. 마지막 페이지 번호(`u64::MAX`)에서는 그대로 유지됩니다.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }
}

/// 페이지 결과
///
/// `total_elements`는 필터 없는 전체 컬렉션의 문서 수입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(self.size)
        }
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}
