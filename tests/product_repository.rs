//! 리포지토리 계약 테스트 (인메모리 구현)

use futures_util::TryStreamExt;
use product_store::domain::entities::Entity;
use product_store::domain::entities::products::Product;
use product_store::domain::models::{Direction, Example, PageRequest, Sort};
use product_store::errors::RepositoryError;
use product_store::repositories::{DocumentRepository, InMemoryRepository};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Uuid 식별자를 쓰는 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Ticket {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        with = "product_store::utils::serde_helpers::optional_uuid_string"
    )]
    id: Option<Uuid>,
    title: String,
}

impl Entity for Ticket {
    type Id = Uuid;

    fn id(&self) -> Option<&Uuid> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

fn repository() -> InMemoryRepository<Product> {
    InMemoryRepository::new()
}

async fn seed(repo: &InMemoryRepository<Product>) -> Vec<Product> {
    repo.save_all(vec![
        Product::new("Widget", 9.99).with_id("p1"),
        Product::new("Gadget", 24.5).with_id("p2"),
        Product::new("Gizmo", 3.0).with_id("p3"),
        Product::new("Widget", 12.0).with_id("p4").with_description("large"),
        Product::new("Doohickey", 7.25).with_id("p5"),
    ])
    .await
    .unwrap()
}

#[tokio::test]
async fn test_widget_lifecycle_restores_count() {
    let repo = repository();
    seed(&repo).await;
    let before = repo.count().await.unwrap();

    let saved = repo.save(Product::new("Widget", 9.99)).await.unwrap();

    let id = saved.id.clone().expect("identifier assigned");
    assert_eq!(id.len(), 24);
    assert_eq!(repo.find_by_id(&id).await.unwrap(), Some(saved));
    assert_eq!(repo.count().await.unwrap(), before + 1);

    repo.delete_by_id(&id).await.unwrap();

    assert_eq!(repo.find_by_id(&id).await.unwrap(), None);
    assert_eq!(repo.count().await.unwrap(), before);
}

#[tokio::test]
async fn test_save_then_find_returns_equal_document() {
    let repo = repository();
    let product = Product::new("Gadget", 24.5).with_id("p1").with_description("blue");

    repo.save(product.clone()).await.unwrap();

    assert_eq!(repo.find_by_id(&"p1".to_string()).await.unwrap(), Some(product));
}

#[tokio::test]
async fn test_save_is_idempotent() {
    let repo = repository();
    let product = Product::new("Gadget", 24.5).with_id("p1");

    repo.save(product.clone()).await.unwrap();
    repo.save(product.clone()).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.find_by_id(&"p1".to_string()).await.unwrap(), Some(product));
}

#[tokio::test]
async fn test_save_with_existing_id_overwrites() {
    let repo = repository();
    repo.save(Product::new("Widget", 9.99).with_id("p1")).await.unwrap();

    repo.save(Product::new("Widget v2", 11.0).with_id("p1")).await.unwrap();

    let found = repo.find_by_id(&"p1".to_string()).await.unwrap().unwrap();
    assert_eq!(found.name, "Widget v2");
    assert_eq!(found.price, 11.0);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_hex_ids_differing_in_case_stay_distinct() {
    let repo = repository();
    let upper = Product::new("Upper", 1.0).with_id("507F1F77BCF86CD799439011");
    let lower = Product::new("Lower", 2.0).with_id("507f1f77bcf86cd799439011");

    repo.save(upper.clone()).await.unwrap();
    repo.save(lower.clone()).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
    assert_eq!(repo.find_by_id(&"507F1F77BCF86CD799439011".to_string()).await.unwrap(), Some(upper));
    assert_eq!(repo.find_by_id(&"507f1f77bcf86cd799439011".to_string()).await.unwrap(), Some(lower));
}

#[tokio::test]
async fn test_find_missing_id_is_none() {
    let repo = repository();

    assert_eq!(repo.find_by_id(&"missing".to_string()).await.unwrap(), None);
    assert!(!repo.exists_by_id(&"missing".to_string()).await.unwrap());
}

#[tokio::test]
async fn test_delete_then_find_is_empty() {
    let repo = repository();
    seed(&repo).await;

    repo.delete_by_id(&"p2".to_string()).await.unwrap();

    assert_eq!(repo.find_by_id(&"p2".to_string()).await.unwrap(), None);
    assert_eq!(repo.count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_delete_missing_id_is_noop() {
    let repo = repository();
    seed(&repo).await;

    repo.delete_by_id(&"missing".to_string()).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_delete_document_without_id_is_validation_error() {
    let repo = repository();

    let result = repo.delete(&Product::new("Widget", 1.0)).await;

    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
}

#[tokio::test]
async fn test_count_matches_find_all() {
    let repo = repository();
    seed(&repo).await;

    let all = repo.find_all_vec().await.unwrap();

    assert_eq!(all.len() as u64, repo.count().await.unwrap());
}

#[tokio::test]
async fn test_find_all_is_restartable() {
    let repo = repository();
    seed(&repo).await;

    let first: Vec<Product> = repo.find_all().await.unwrap().try_collect().await.unwrap();
    let second: Vec<Product> = repo.find_all().await.unwrap().try_collect().await.unwrap();

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_insert_existing_id_is_duplicate_key() {
    let repo = repository();
    repo.insert(Product::new("Widget", 9.99).with_id("p1")).await.unwrap();

    let result = repo.insert(Product::new("Other", 1.0).with_id("p1")).await;

    assert!(matches!(result, Err(RepositoryError::DuplicateKey(_))));
    let stored = repo.find_by_id(&"p1".to_string()).await.unwrap().unwrap();
    assert_eq!(stored.name, "Widget");
}

#[tokio::test]
async fn test_invalid_product_is_rejected_before_write() {
    let repo = repository();

    let result = repo.save(Product::new("Widget", -1.0)).await;

    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_all_reports_unset_id_and_deletes_others() {
    let repo = repository();
    let saved = seed(&repo).await;

    let batch = vec![
        saved[0].clone(),
        Product::new("Unsaved", 1.0),
        saved[2].clone(),
    ];
    let err = repo.delete_all(batch).await.unwrap_err();

    match &err {
        RepositoryError::BatchDelete { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].id, "<unset>");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.failed_ids(), vec!["<unset>"]);
    assert_eq!(repo.find_by_id(&"p1".to_string()).await.unwrap(), None);
    assert_eq!(repo.find_by_id(&"p3".to_string()).await.unwrap(), None);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_delete_all_by_id_ignores_missing_ids() {
    let repo = repository();
    seed(&repo).await;

    repo.delete_all_by_id(&["p1".to_string(), "missing".to_string(), "p5".to_string()])
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_find_all_by_id_returns_existing_only() {
    let repo = repository();
    seed(&repo).await;

    let found = repo
        .find_all_by_id(&["p2".to_string(), "missing".to_string(), "p4".to_string()])
        .await
        .unwrap();

    let mut ids: Vec<String> = found.into_iter().filter_map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["p2", "p4"]);
}

#[tokio::test]
async fn test_find_all_sorted_by_price_descending() {
    let repo = repository();
    seed(&repo).await;

    let sorted: Vec<Product> = repo
        .find_all_sorted(&Sort::by_desc("price"))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let prices: Vec<f64> = sorted.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![24.5, 12.0, 9.99, 7.25, 3.0]);
}

#[tokio::test]
async fn test_secondary_sort_breaks_ties() {
    let repo = repository();
    seed(&repo).await;

    let sort = Sort::by("name").and("price", Direction::Descending);
    let sorted: Vec<Product> = repo.find_all_sorted(&sort).await.unwrap().try_collect().await.unwrap();

    let ids: Vec<&str> = sorted.iter().filter_map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, vec!["p5", "p2", "p3", "p4", "p1"]);
}

#[tokio::test]
async fn test_find_page_applies_sort_and_offset() {
    let repo = repository();
    seed(&repo).await;

    let request = PageRequest::of(1, 2).with_sort(Sort::by("price"));
    let page = repo.find_page(&request).await.unwrap();

    let prices: Vec<f64> = page.content.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![9.99, 12.0]);
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages(), 3);
    assert!(page.has_next());

    let last = repo.find_page(&request.next()).await.unwrap();
    assert_eq!(last.number_of_elements(), 1);
    assert!(last.is_last());
}

#[tokio::test]
async fn test_find_page_beyond_end_is_empty() {
    let repo = repository();
    seed(&repo).await;

    let page = repo.find_page(&PageRequest::of(10, 2)).await.unwrap();

    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 5);
}

#[tokio::test]
async fn test_find_page_at_max_page_number_is_empty_last_page() {
    let repo = repository();
    seed(&repo).await;

    let page = repo.find_page(&PageRequest::of(u64::MAX, 1)).await.unwrap();

    assert!(page.content.is_empty());
    assert!(!page.has_next());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_find_page_with_zero_size_is_validation_error() {
    let repo = repository();

    let result = repo.find_page(&PageRequest::of(0, 0)).await;

    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
}

#[tokio::test]
async fn test_find_by_example_matches_set_fields() {
    let repo = repository();
    seed(&repo).await;

    let example = Example::of(Product::new("Widget", 0.0)).ignoring(["price"]);
    let widgets = repo.find_by_example(&example, Some(&Sort::by("price"))).await.unwrap();

    let ids: Vec<&str> = widgets.iter().filter_map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, vec!["p1", "p4"]);
    assert_eq!(repo.count_by_example(&example).await.unwrap(), 2);
    assert!(repo.exists_by_example(&example).await.unwrap());
}

#[tokio::test]
async fn test_find_one_by_example_with_description() {
    let repo = repository();
    seed(&repo).await;

    let example = Example::of(Product::new("Widget", 0.0).with_description("large")).ignoring(["price"]);
    let found = repo.find_one_by_example(&example).await.unwrap().unwrap();

    assert_eq!(found.id.as_deref(), Some("p4"));
}

#[tokio::test]
async fn test_example_without_match_is_empty() {
    let repo = repository();
    seed(&repo).await;

    let example = Example::of(Product::new("Sprocket", 0.0)).ignoring(["price"]);

    assert!(repo.find_by_example(&example, None).await.unwrap().is_empty());
    assert_eq!(repo.find_one_by_example(&example).await.unwrap(), None);
    assert!(!repo.exists_by_example(&example).await.unwrap());
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let repo = repository();
    seed(&repo).await;

    repo.clear().await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cancelled_token_fails_with_cancelled() {
    let repo = repository();
    seed(&repo).await;
    let token = CancellationToken::new();
    let cancellable = repo.with_cancellation(token.clone());

    token.cancel();

    assert!(matches!(
        cancellable.find_by_id(&"p1".to_string()).await,
        Err(RepositoryError::Cancelled(_))
    ));
    assert!(matches!(
        cancellable.save(Product::new("Late", 1.0)).await,
        Err(RepositoryError::Cancelled(_))
    ));
    assert_eq!(repo.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_clones_share_storage() {
    let repo = repository();
    let other = repo.clone();

    repo.save(Product::new("Widget", 9.99).with_id("p1")).await.unwrap();

    assert!(other.exists_by_id(&"p1".to_string()).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_saves_are_all_visible() {
    let repo = repository();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.save(Product::new(format!("item-{i}"), i as f64)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 16);
}

#[tokio::test]
async fn test_uuid_identifiers_are_generated_and_found() {
    let repo: InMemoryRepository<Ticket> = InMemoryRepository::new();

    let saved = repo
        .save(Ticket { id: None, title: "restock".to_string() })
        .await
        .unwrap();
    let id = saved.id.expect("uuid assigned");

    assert_eq!(repo.find_by_id(&id).await.unwrap(), Some(saved));
    assert!(!repo.exists_by_id(&Uuid::new_v4()).await.unwrap());
}
