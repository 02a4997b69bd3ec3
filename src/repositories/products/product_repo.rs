//! # 상품 리포지토리
//!
//! [`Product`] 문서를 위한 [`MongoRepository`] 특수화와 컬렉션 인덱스 정의입니다.
//! 조회/저장 연산은 모두 [`DocumentRepository`](crate::repositories::DocumentRepository) 계약을 그대로 사용합니다.

use log::info;
use mongodb::IndexModel;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;

use crate::domain::entities::products::Product;
use crate::errors::RepositoryResult;
use crate::repositories::mongo::MongoRepository;

/// MongoDB 기반 상품 리포지토리
///
/// ```rust,ignore
/// let products = ProductRepository::new(&database, &config);
/// products.create_product_indexes().await?;
///
/// let widget = products.save(Product::new("Widget", 9.99)).await?;
/// ```
pub type ProductRepository = MongoRepository<Product>;

impl MongoRepository<Product> {
    /// 상품 컬렉션 인덱스를 생성합니다.
    ///
    /// | 인덱스 | 키 | 용도 |
    /// |--------|----|------|
    /// | `name_asc` | `name: 1` | 이름 예제 조회, 이름 정렬 |
    /// | `price_asc` | `price: 1` | 가격 정렬 페이지 조회 |
    ///
    /// 이미 같은 정의의 인덱스가 있으면 아무 것도 하지 않습니다.
    pub async fn create_product_indexes(&self) -> RepositoryResult<()> {
        // 이름 인덱스
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().name("name_asc".to_string()).build())
            .build();

        // 가격 인덱스
        let price_index = IndexModel::builder()
            .keys(doc! { "price": 1 })
            .options(IndexOptions::builder().name("price_asc".to_string()).build())
            .build();

        self.create_indexes(vec![name_index, price_index]).await?;

        info!("✅ 상품 인덱스 생성 완료 ({})", self.collection_name());
        Ok(())
    }
}
