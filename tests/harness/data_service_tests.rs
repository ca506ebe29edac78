//! Macro-generated test suite for `DataService<TestProduct>` contract validation.
//!
//! The `data_service_tests!` macro generates a test module that validates any
//! `DataService<TestProduct>` implementation against the full contract: CRUD
//! operations, exact-match search across `FieldValue` kinds, list pages
//! through the engine, and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//!
//! use harness::*;
//! use listing::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<TestProduct>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: get with random UUID returns None
//! - `test_list_empty` / `test_list_multiple`
//! - `test_update_existing` / `test_update_nonexistent`
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Search
//! - `test_search_string_field`, `test_search_integer_field`,
//!   `test_search_float_field`, `test_search_boolean_field`
//! - `test_search_unknown_field`: unknown field matches nothing
//!
//! ## List pages
//! - `test_list_page_defaults`: default page over stored order
//! - `test_list_page_filter_sort_paginate`
//! - `test_list_page_reports_list_errors`
//!
//! ## Edge Cases
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `DataService<TestProduct>` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an instance implementing
/// `DataService<TestProduct>`. It is re-evaluated for each test to ensure
/// isolation. For the concurrent access test, the returned service must also
/// implement `Clone + 'static` (shared state via Arc pattern).
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use listing::prelude::*;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let entity = product("Anvil", Some("heavy"), 99.5, true);
                let original_id = entity.id;

                let created = service.create(entity).await.unwrap();
                assert_eq!(created.id(), original_id);
                assert_eq!(created.name(), "Anvil");
                assert_eq!(created.entity_type, "test_product");
                assert_eq!(created.description.as_deref(), Some("heavy"));
                assert!((created.price - 99.5).abs() < f64::EPSILON);
                assert!(created.active);

                let retrieved = service.get(&original_id).await.unwrap();
                assert_eq!(retrieved, Some(created));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                let result = service.get(&Uuid::new_v4()).await.unwrap();
                assert!(result.is_none(), "Getting a nonexistent entity should return None");
            }

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let service = $factory;
                let batch = sample_products(5);
                let expected_ids: Vec<Uuid> = batch.iter().map(|p| p.id).collect();

                for entity in batch {
                    service.create(entity).await.unwrap();
                }

                let all = service.list().await.unwrap();
                let returned_ids: Vec<Uuid> = all.iter().map(|e| e.id()).collect();
                assert_eq!(returned_ids, expected_ids, "List should keep insertion order");
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let mut entity = product("Bolt", None, 0.5, true);
                let id = entity.id;
                service.create(entity.clone()).await.unwrap();

                entity.name = "Bolt M8".to_string();
                entity.stock = 500;
                entity.touch();

                let updated = service.update(&id, entity).await.unwrap();
                assert_eq!(updated.name(), "Bolt M8");

                let retrieved = service.get(&id).await.unwrap().unwrap();
                assert_eq!(retrieved.name(), "Bolt M8");
                assert_eq!(retrieved.stock, 500);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let entity = product("Ghost", None, 0.0, false);
                let id = entity.id;

                let result = service.update(&id, entity).await;
                assert!(result.is_err(), "Updating a nonexistent entity should return an error");
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let entity = product("Chisel", None, 14.0, true);
                let id = entity.id;

                service.create(entity).await.unwrap();
                assert!(service.get(&id).await.unwrap().is_some());

                service.delete(&id).await.unwrap();
                assert!(service.get(&id).await.unwrap().is_none());
            }

            /// Deleting a nonexistent entity: backends may be idempotent or strict.
            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                let _ = service.delete(&Uuid::new_v4()).await;
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_string_field() {
                let service = $factory;
                for entity in sample_products(6) {
                    service.create(entity).await.unwrap();
                }

                let results = service.search("category", "garden").await.unwrap();
                assert_eq!(results.len(), 2);
                assert!(results.iter().all(|p| p.category == "garden"));
            }

            #[tokio::test]
            async fn test_search_integer_field() {
                let service = $factory;
                let mut first = product("Drill", None, 80.0, true);
                first.stock = 3;
                let mut second = product("Easel", None, 45.0, true);
                second.stock = 3;
                service.create(first).await.unwrap();
                service.create(second).await.unwrap();
                service.create(product("Fan", None, 20.0, true)).await.unwrap();

                let results = service.search("stock", "3").await.unwrap();
                assert_eq!(results.len(), 2);
            }

            #[tokio::test]
            async fn test_search_float_field() {
                let service = $factory;
                service.create(product("High", None, 9.5, true)).await.unwrap();
                service.create(product("Low", None, 2.0, true)).await.unwrap();

                let results = service.search("price", "9.5").await.unwrap();
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].name(), "High");
            }

            #[tokio::test]
            async fn test_search_boolean_field() {
                let service = $factory;
                service.create(product("On1", None, 1.0, true)).await.unwrap();
                service.create(product("On2", None, 1.0, true)).await.unwrap();
                service.create(product("Off", None, 1.0, false)).await.unwrap();

                assert_eq!(service.search("active", "true").await.unwrap().len(), 2);
                assert_eq!(service.search("active", "false").await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_search_unknown_field() {
                let service = $factory;
                service.create(product("Anvil", None, 1.0, true)).await.unwrap();

                let results = service.search("nonexistent_field", "anything").await.unwrap();
                assert!(results.is_empty(), "Search on unknown field should return empty vec");
            }

            // ==================================================================
            // List pages
            // ==================================================================

            #[tokio::test]
            async fn test_list_page_defaults() {
                let service = $factory;
                let batch = sample_products(12);
                let first_ten: Vec<Uuid> = batch.iter().take(10).map(|p| p.id).collect();
                for entity in batch {
                    service.create(entity).await.unwrap();
                }

                let page = service.list_page(&ListRequest::new()).await.unwrap();
                let ids: Vec<Uuid> = page.items.iter().map(|p| p.id).collect();
                assert_eq!(ids, first_ten);
                assert_eq!(page.pagination.total_count, 12);
                assert_eq!(page.pagination.total_pages(), Some(2));
                assert!(page.pagination.has_more);
            }

            #[tokio::test]
            async fn test_list_page_filter_sort_paginate() {
                let service = $factory;
                for entity in sample_products(25) {
                    service.create(entity).await.unwrap();
                }

                let request = ListRequest::new()
                    .filter(FilterRequest::new().and("category", FilterOp::Eq, "TOOLS"))
                    .sort(SortRequest::new().desc("price"))
                    .paginate(PaginationRequest::offset(2, 3));
                let page = service.list_page(&request).await.unwrap();

                // tools are indices 0, 3, ..., 24; descending price puts 24 first
                assert_eq!(page.pagination.total_count, 9);
                assert_eq!(names(&page.items), vec!["anvil 15", "chisel 12", "easel 09"]);
                let prices: Vec<f64> = page.items.iter().map(|p| p.price).collect();
                assert_eq!(prices, vec![38.5, 31.0, 23.5]);
            }

            #[tokio::test]
            async fn test_list_page_reports_list_errors() {
                let service = $factory;
                service.create(product("Anvil", None, 1.0, true)).await.unwrap();

                let request = ListRequest::new()
                    .filter(FilterRequest::new().and("weight", FilterOp::Gt, 1i64));
                let err = service.list_page(&request).await.unwrap_err();
                assert_list_error(&err, "INVALID_FILTER_FIELD");
            }

            // ==================================================================
            // Edge case — Concurrent access
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let service = $factory;
                let mut handles = Vec::new();

                for i in 0..10 {
                    let svc = service.clone();
                    handles.push(tokio::spawn(async move {
                        let entity = product(&format!("Concurrent {}", i), None, i as f64, true);
                        svc.create(entity).await.unwrap();
                        svc.list_page(&ListRequest::new()).await.unwrap().pagination.total_count
                    }));
                }

                for handle in handles {
                    let seen = handle.await.unwrap();
                    assert!((1..=10).contains(&seen));
                }

                assert_eq!(service.list().await.unwrap().len(), 10);
            }
        }
    };
}
