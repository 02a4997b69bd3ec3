//! 정렬 조건

use mongodb::bson::Document;

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn as_i32(self) -> i32 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }
}

/// 단일 필드 정렬 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub property: String,
    pub direction: Direction,
}

impl Order {
    /// 저장된 문서에서의 필드 경로 (`id`는 `_id`로 매핑)
    pub fn field_path(&self) -> &str {
        if self.property == "id" {
            "_id"
        } else {
            &self.property
        }
    }
}

/// 순서가 있는 정렬 조건 목록
///
/// ```rust,ignore
/// let sort = Sort::by("price").and("name", Direction::Descending);
/// assert_eq!(sort.to_document(), doc! { "price": 1, "name": -1 });
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// 정렬 없음
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// 오름차순 정렬
    pub fn by(property: impl Into<String>) -> Self {
        Self::unsorted().and(property, Direction::Ascending)
    }

    /// 내림차순 정렬
    pub fn by_desc(property: impl Into<String>) -> Self {
        Self::unsorted().and(property, Direction::Descending)
    }

    /// 다음 우선순위의 정렬 조건을 추가합니다.
    pub fn and(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(Order {
            property: property.into(),
            direction,
        });
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// MongoDB 정렬 문서로 변환합니다.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        for order in &self.orders {
            document.insert(order.field_path(), order.direction.as_i32());
        }
        document
    }
}
