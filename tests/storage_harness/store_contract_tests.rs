//! Macro-generated test suite for the `CrmStore` contract.
//!
//! The `crm_store_tests!` macro validates a backend through `CrmService`:
//! mutation rules, bulk creation, every filter field, sorting, pagination
//! and concurrent writes.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use crm::storage::InMemoryCrmStore;
//!
//! crm_store_tests!(InMemoryCrmStore::new());
//! ```

/// Generate a full `CrmStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `CrmStore + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! crm_store_tests {
    ($factory:expr) => {
        mod crm_store_contract_tests {
            use super::*;
            use chrono::{Days, Utc};
            use crm::core::{CrmService, ListParams, SortSpec};
            use crm::entities::{CustomerFilter, NewCustomer, OrderFilter, ProductFilter};
            use rust_decimal_macros::dec;

            async fn svc() -> CrmService {
                service_for($factory)
            }

            fn all() -> ListParams {
                ListParams::default()
            }

            // ==================================================================
            // Customers
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get_customer() {
                let svc = svc().await;
                let created =
                    seed_customer(&svc, "Alice", "alice@example.com", Some("+12345678901")).await;

                let fetched = svc.get_customer(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.name, "Alice");
                assert_eq!(fetched.email, "alice@example.com");
                assert_eq!(fetched.phone.as_deref(), Some("+12345678901"));
                assert!(svc.get_customer(created.id + 1000).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_duplicate_email_rejected() {
                let svc = svc().await;
                seed_customer(&svc, "Alice", "alice@example.com", None).await;

                let err = svc
                    .create_customer(NewCustomer::new("Again", "alice@example.com", None))
                    .await
                    .unwrap_err();
                assert_eq!(err.to_string(), "Email already exists");
                assert_eq!(err.error_code(), "EMAIL_ALREADY_EXISTS");
            }

            #[tokio::test]
            async fn test_phone_formats() {
                let svc = svc().await;
                seed_customer(&svc, "Intl", "intl@example.com", Some("+12345678901")).await;
                seed_customer(&svc, "Dashed", "dash@example.com", Some("123-456-7890")).await;
                seed_customer(&svc, "Empty", "empty@example.com", Some("")).await;

                for (i, bad) in ["12345", "+123", "123 456 7890", "abc-def-ghij"]
                    .into_iter()
                    .enumerate()
                {
                    let err = svc
                        .create_customer(NewCustomer::new(
                            "Bad",
                            format!("bad{i}@example.com"),
                            Some(bad.to_string()),
                        ))
                        .await
                        .unwrap_err();
                    assert_eq!(err.to_string(), "Invalid phone format", "phone {bad}");
                }

                let customers = svc
                    .list_customers(&CustomerFilter::default(), &all())
                    .await
                    .unwrap();
                assert_eq!(customers.len(), 3);
            }

            // ==================================================================
            // Bulk creation
            // ==================================================================

            #[tokio::test]
            async fn test_bulk_create_collects_row_errors() {
                let svc = svc().await;
                seed_customer(&svc, "Existing", "existing@example.com", None).await;

                let outcome = svc
                    .bulk_create_customers(vec![
                        NewCustomer::new("Valid One", "one@example.com", None),
                        NewCustomer::new("Dup", "existing@example.com", None),
                        NewCustomer::new("Valid Two", "two@example.com", Some("+251911234567".into())),
                        NewCustomer::new("Bad Phone", "bad@example.com", Some("555".into())),
                    ])
                    .await
                    .unwrap();

                assert_eq!(
                    names(&outcome.created, |c| c.name.clone()),
                    vec!["Valid One", "Valid Two"]
                );
                assert_eq!(
                    outcome.errors,
                    vec![
                        "Row 2: Email already exists".to_string(),
                        "Row 4: Invalid phone format".to_string(),
                    ]
                );

                let stored = svc
                    .list_customers(&CustomerFilter::default(), &all())
                    .await
                    .unwrap();
                assert_eq!(stored.len(), 3);
            }

            #[tokio::test]
            async fn test_bulk_create_accepts_long_fields() {
                let svc = svc().await;
                let long_name = "Maximilian ".repeat(20);
                let long_email = format!("{}@example.com", "a".repeat(300));

                let outcome = svc
                    .bulk_create_customers(vec![
                        NewCustomer::new("Short", "short@example.com", None),
                        NewCustomer::new(long_name.clone(), long_email.clone(), None),
                        NewCustomer::new("Bad Phone", "bad@example.com", Some("555".into())),
                    ])
                    .await
                    .unwrap();

                assert_eq!(
                    names(&outcome.created, |c| c.name.clone()),
                    vec!["Short".to_string(), long_name]
                );
                assert_eq!(outcome.created[1].email, long_email);
                assert_eq!(outcome.errors, vec!["Row 3: Invalid phone format".to_string()]);
            }

            #[tokio::test]
            async fn test_bulk_create_sees_earlier_rows() {
                let svc = svc().await;
                let outcome = svc
                    .bulk_create_customers(vec![
                        NewCustomer::new("First", "same@example.com", None),
                        NewCustomer::new("Second", "same@example.com", None),
                    ])
                    .await
                    .unwrap();

                assert_eq!(outcome.created.len(), 1);
                assert_eq!(outcome.errors, vec!["Row 2: Email already exists".to_string()]);
            }

            // ==================================================================
            // Products
            // ==================================================================

            #[tokio::test]
            async fn test_product_rules() {
                let svc = svc().await;
                let err = svc
                    .create_product(crm::entities::NewProduct::new("Free", dec!(0.00), 5))
                    .await
                    .unwrap_err();
                assert_eq!(err.to_string(), "Price must be positive");

                let err = svc
                    .create_product(crm::entities::NewProduct::new("Neg", dec!(-1.00), -5))
                    .await
                    .unwrap_err();
                assert_eq!(err.to_string(), "Price must be positive");

                let err = svc
                    .create_product(crm::entities::NewProduct::new("Short", dec!(1.00), -1))
                    .await
                    .unwrap_err();
                assert_eq!(err.to_string(), "Stock cannot be negative");

                let ok = seed_product(&svc, "Cable", dec!(9.99), 0).await;
                assert_eq!(ok.price, dec!(9.99));
                assert_eq!(ok.stock, 0);
            }

            #[tokio::test]
            async fn test_sub_cent_price_is_rounded_before_validation() {
                let svc = svc().await;
                let err = svc
                    .create_product(crm::entities::NewProduct::new("Dust", dec!(0.004), 1))
                    .await
                    .unwrap_err();
                assert_eq!(err.to_string(), "Price must be positive");

                let crumb = seed_product(&svc, "Crumb", dec!(0.005), 1).await;
                assert_eq!(crumb.price, dec!(0.01));
                let pricey = seed_product(&svc, "Pricey", dec!(19.999), 1).await;
                assert_eq!(pricey.price, dec!(20.00));

                let stored = svc
                    .list_products(&ProductFilter::default(), &all())
                    .await
                    .unwrap();
                assert_eq!(
                    stored.iter().map(|p| p.price).collect::<Vec<_>>(),
                    vec![dec!(0.01), dec!(20.00)]
                );
            }

            #[tokio::test]
            async fn test_large_price_and_long_names_are_stored() {
                let svc = svc().await;
                let name = "Industrial ".repeat(30);
                let product = seed_product(&svc, &name, dec!(123456789012.34), 1).await;
                assert_eq!(product.name, name);
                assert_eq!(product.price, dec!(123456789012.34));
            }

            // ==================================================================
            // Orders
            // ==================================================================

            #[tokio::test]
            async fn test_order_total_is_sum_of_prices() {
                let svc = svc().await;
                let alice = seed_customer(&svc, "Alice", "alice@example.com", None).await;
                let laptop = seed_product(&svc, "Laptop", dec!(999.99), 10).await;
                let mouse = seed_product(&svc, "Mouse", dec!(25.50), 50).await;

                let order = seed_order(&svc, &alice, &[&laptop, &mouse], None).await;
                assert_eq!(order.total_amount, dec!(1025.49));
                assert_eq!(order.customer_id, alice.id);
                assert_eq!(order.product_ids, vec![laptop.id, mouse.id]);

                let stored = svc
                    .list_orders(&OrderFilter::default(), &all())
                    .await
                    .unwrap();
                assert_eq!(stored.len(), 1);
                assert_eq!(stored[0].total_amount, dec!(1025.49));
                assert_eq!(stored[0].product_ids, vec![laptop.id, mouse.id]);
            }

            #[tokio::test]
            async fn test_order_rejections_persist_nothing() {
                let svc = svc().await;
                let alice = seed_customer(&svc, "Alice", "alice@example.com", None).await;
                let laptop = seed_product(&svc, "Laptop", dec!(999.99), 10).await;
                let cid = alice.id.to_string();
                let pid = laptop.id.to_string();

                let cases: Vec<(String, Vec<String>, &str)> = vec![
                    (cid.clone(), vec![], "At least one product must be selected"),
                    ("424242".into(), vec![pid.clone()], "Invalid customer ID"),
                    ("not-a-number".into(), vec![pid.clone()], "Invalid customer ID"),
                    (cid.clone(), vec![pid.clone(), "424242".into()], "Invalid product ID"),
                    (cid.clone(), vec![pid.clone(), pid.clone()], "Invalid product ID"),
                ];
                for (customer_id, product_ids, expected) in cases {
                    let err = svc
                        .create_order(&customer_id, &product_ids, None)
                        .await
                        .unwrap_err();
                    assert_eq!(err.to_string(), expected);
                }

                let stored = svc
                    .list_orders(&OrderFilter::default(), &all())
                    .await
                    .unwrap();
                assert!(stored.is_empty());
            }

            // ==================================================================
            // Filters
            // ==================================================================

            #[tokio::test]
            async fn test_customer_filters() {
                let svc = svc().await;
                seed_customer(&svc, "Alice Smith", "alice@example.com", Some("+12345678901")).await;
                seed_customer(&svc, "Bob Jones", "bob@Example.org", Some("+251911234567")).await;
                seed_customer(&svc, "Carol Smith", "carol@test.com", None).await;

                let by_name = CustomerFilter {
                    name: Some("smith".into()),
                    ..Default::default()
                };
                let found = svc.list_customers(&by_name, &all()).await.unwrap();
                assert_eq!(names(&found, |c| c.name.clone()), vec!["Alice Smith", "Carol Smith"]);

                let by_email = CustomerFilter {
                    email: Some("EXAMPLE".into()),
                    ..Default::default()
                };
                let found = svc.list_customers(&by_email, &all()).await.unwrap();
                assert_eq!(found.len(), 2);

                let by_phone = CustomerFilter {
                    phone_pattern: Some("+251".into()),
                    ..Default::default()
                };
                let found = svc.list_customers(&by_phone, &all()).await.unwrap();
                assert_eq!(names(&found, |c| c.name.clone()), vec!["Bob Jones"]);

                let combined = CustomerFilter {
                    name: Some("smith".into()),
                    phone_pattern: Some("+1".into()),
                    ..Default::default()
                };
                let found = svc.list_customers(&combined, &all()).await.unwrap();
                assert_eq!(names(&found, |c| c.name.clone()), vec!["Alice Smith"]);
            }

            #[tokio::test]
            async fn test_customer_created_at_bounds() {
                let svc = svc().await;
                seed_customer(&svc, "Alice", "alice@example.com", None).await;

                let today = Utc::now().date_naive();
                let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
                let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

                let whole_day = CustomerFilter {
                    created_at_gte: Some(today),
                    created_at_lte: Some(today),
                    ..Default::default()
                };
                // A test started just before midnight UTC can see the day roll over
                let found = svc.list_customers(&whole_day, &all()).await.unwrap();
                assert!(found.len() <= 1);

                let future = CustomerFilter {
                    created_at_gte: Some(tomorrow),
                    ..Default::default()
                };
                assert!(svc.list_customers(&future, &all()).await.unwrap().is_empty());

                let past = CustomerFilter {
                    created_at_lte: Some(yesterday),
                    ..Default::default()
                };
                assert!(svc.list_customers(&past, &all()).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_product_filters() {
                let svc = svc().await;
                seed_product(&svc, "Laptop", dec!(999.99), 10).await;
                seed_product(&svc, "Mouse", dec!(25.50), 50).await;
                seed_product(&svc, "USB Cable", dec!(5.00), 9).await;
                seed_product(&svc, "Laptop Stand", dec!(45.00), 0).await;

                let price_range = ProductFilter {
                    price_gte: Some(dec!(25.50)),
                    price_lte: Some(dec!(999.99)),
                    ..Default::default()
                };
                let found = svc.list_products(&price_range, &all()).await.unwrap();
                assert_eq!(names(&found, |p| p.name.clone()), vec!["Laptop", "Mouse", "Laptop Stand"]);

                let stock_range = ProductFilter {
                    stock_gte: Some(9),
                    stock_lte: Some(10),
                    ..Default::default()
                };
                let found = svc.list_products(&stock_range, &all()).await.unwrap();
                assert_eq!(names(&found, |p| p.name.clone()), vec!["Laptop", "USB Cable"]);

                let low = ProductFilter {
                    low_stock: Some(true),
                    ..Default::default()
                };
                let found = svc.list_products(&low, &all()).await.unwrap();
                assert_eq!(names(&found, |p| p.name.clone()), vec!["USB Cable", "Laptop Stand"]);

                let not_low = ProductFilter {
                    low_stock: Some(false),
                    ..Default::default()
                };
                assert_eq!(svc.list_products(&not_low, &all()).await.unwrap().len(), 4);

                let by_name = ProductFilter {
                    name: Some("LAPTOP".into()),
                    ..Default::default()
                };
                assert_eq!(svc.list_products(&by_name, &all()).await.unwrap().len(), 2);
            }

            #[tokio::test]
            async fn test_order_filters() {
                let svc = svc().await;
                let alice = seed_customer(&svc, "Alice Smith", "alice@example.com", None).await;
                let bob = seed_customer(&svc, "Bob Jones", "bob@example.com", None).await;
                let laptop = seed_product(&svc, "Gaming Laptop", dec!(1500.00), 5).await;
                let mouse = seed_product(&svc, "Mouse", dec!(25.00), 50).await;

                let big = seed_order(&svc, &alice, &[&laptop, &mouse], Some(at("2024-03-10T23:30:00Z"))).await;
                let small = seed_order(&svc, &bob, &[&mouse], Some(at("2024-03-11T00:00:00Z"))).await;

                let by_amount = OrderFilter {
                    total_amount_gte: Some(dec!(100)),
                    ..Default::default()
                };
                let found = svc.list_orders(&by_amount, &all()).await.unwrap();
                assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![big.id]);

                let by_max = OrderFilter {
                    total_amount_lte: Some(dec!(25.00)),
                    ..Default::default()
                };
                let found = svc.list_orders(&by_max, &all()).await.unwrap();
                assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![small.id]);

                let march_10 = chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
                let on_day = OrderFilter {
                    order_date_gte: Some(march_10),
                    order_date_lte: Some(march_10),
                    ..Default::default()
                };
                let found = svc.list_orders(&on_day, &all()).await.unwrap();
                assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![big.id]);

                let by_customer = OrderFilter {
                    customer_name: Some("jones".into()),
                    ..Default::default()
                };
                let found = svc.list_orders(&by_customer, &all()).await.unwrap();
                assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![small.id]);

                let by_product = OrderFilter {
                    product_name: Some("laptop".into()),
                    ..Default::default()
                };
                let found = svc.list_orders(&by_product, &all()).await.unwrap();
                assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![big.id]);

                let by_product_id = OrderFilter::for_product(mouse.id);
                let found = svc.list_orders(&by_product_id, &all()).await.unwrap();
                assert_eq!(found.len(), 2);

                let by_customer_id = OrderFilter::for_customer(alice.id);
                let found = svc.list_orders(&by_customer_id, &all()).await.unwrap();
                assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![big.id]);
            }

            // ==================================================================
            // Sorting & pagination
            // ==================================================================

            #[tokio::test]
            async fn test_sort_and_paginate() {
                let svc = svc().await;
                seed_product(&svc, "B", dec!(20.00), 1).await;
                seed_product(&svc, "A", dec!(30.00), 2).await;
                seed_product(&svc, "C", dec!(10.00), 3).await;
                seed_product(&svc, "D", dec!(20.00), 4).await;

                let by_price_desc = ListParams {
                    sort: SortSpec {
                        field: "price".into(),
                        descending: true,
                    },
                    limit: None,
                    offset: 0,
                };
                let found = svc
                    .list_products(&ProductFilter::default(), &by_price_desc)
                    .await
                    .unwrap();
                // Ties on price keep ascending id order
                assert_eq!(names(&found, |p| p.name.clone()), vec!["A", "B", "D", "C"]);

                let page = ListParams {
                    sort: SortSpec {
                        field: "name".into(),
                        descending: false,
                    },
                    limit: Some(2),
                    offset: 1,
                };
                let found = svc
                    .list_products(&ProductFilter::default(), &page)
                    .await
                    .unwrap();
                assert_eq!(names(&found, |p| p.name.clone()), vec!["B", "C"]);

                let past_end = ListParams {
                    offset: 10,
                    ..ListParams::default()
                };
                assert!(
                    svc.list_products(&ProductFilter::default(), &past_end)
                        .await
                        .unwrap()
                        .is_empty()
                );
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let svc = svc().await;
                let mut handles = Vec::new();
                for i in 0..8 {
                    let svc = svc.clone();
                    handles.push(tokio::spawn(async move {
                        svc.create_customer(NewCustomer::new(
                            format!("User {i}"),
                            format!("user{i}@example.com"),
                            None,
                        ))
                        .await
                    }));
                }
                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                let stored = svc
                    .list_customers(&CustomerFilter::default(), &all())
                    .await
                    .unwrap();
                assert_eq!(stored.len(), 8);
            }

            #[tokio::test]
            async fn test_concurrent_same_email_single_winner() {
                let svc = svc().await;
                let mut handles = Vec::new();
                for i in 0..4 {
                    let svc = svc.clone();
                    handles.push(tokio::spawn(async move {
                        svc.create_customer(NewCustomer::new(
                            format!("Racer {i}"),
                            "race@example.com",
                            None,
                        ))
                        .await
                    }));
                }

                let mut winners = 0;
                for handle in handles {
                    match handle.await.unwrap() {
                        Ok(_) => winners += 1,
                        Err(e) => assert_eq!(e.to_string(), "Email already exists"),
                    }
                }
                assert_eq!(winners, 1);
            }
        }
    };
}
