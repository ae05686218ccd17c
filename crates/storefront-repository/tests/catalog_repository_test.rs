//! Integration tests for the MySQL category and product repositories.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use bigdecimal::BigDecimal;
use common::{create_test_user, TestDatabase};
use std::str::FromStr;
use storefront_core::{
    NewCategory, NewProduct, PageRequest, ProductFilter, ProductOrdering, StorefrontError, User, UserId,
};
use storefront_repository::{
    CategoryRepository, MySqlCategoryRepository, MySqlProductRepository, MySqlUserRepository, ProductRepository,
    UserRepository,
};

fn new_product(owner: UserId, name: &str, price: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: BigDecimal::from_str(price).unwrap(),
        url: format!("https://shop.example.com/{}", name.to_lowercase()),
        image: None,
        category_id: None,
        user_id: owner,
    }
}

async fn seed_owner(db: &TestDatabase, username: &str) -> User {
    let user = create_test_user(username, &format!("{username}@example.com"));
    MySqlUserRepository::new(db.pool()).save(&user).await.unwrap();
    user
}

#[tokio::test]
async fn test_category_crud_with_counts() {
    let db = TestDatabase::new().await;
    let categories = MySqlCategoryRepository::new(db.pool());
    let products = MySqlProductRepository::new(db.pool());
    let owner = seed_owner(&db, "seller").await;

    let electronics = categories
        .create(&NewCategory::new("Electronics".to_string(), Some("Gadgets".to_string())))
        .await
        .unwrap();
    assert_eq!(electronics.slug, "electronics");

    let mut phone = new_product(owner.id, "Phone", "499.99");
    phone.category_id = Some(electronics.id);
    let phone = products.create(&phone).await.unwrap();

    let listed = categories.list_with_counts().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].products_count, 1);

    let duplicate = categories
        .create(&NewCategory::new("electronics".to_string(), None))
        .await
        .expect_err("duplicate slug must fail");
    assert!(matches!(duplicate, StorefrontError::Conflict(_)));

    assert!(categories.delete(electronics.id).await.unwrap());
    let orphan = products.find_view_by_id(phone.id).await.unwrap().unwrap();
    assert!(orphan.product.category_id.is_none());
    assert!(orphan.category.is_none());
}

#[tokio::test]
async fn test_product_search_joins_owner_and_category() {
    let db = TestDatabase::new().await;
    let categories = MySqlCategoryRepository::new(db.pool());
    let products = MySqlProductRepository::new(db.pool());
    let owner = seed_owner(&db, "seller").await;

    let lighting = categories
        .create(&NewCategory::new("Lighting".to_string(), None))
        .await
        .unwrap();
    let mut lamp = new_product(owner.id, "Lamp", "30.00");
    lamp.category_id = Some(lighting.id);
    products.create(&lamp).await.unwrap();
    products.create(&new_product(owner.id, "Desk", "120.00")).await.unwrap();
    products.create(&new_product(owner.id, "Chair", "75.50")).await.unwrap();

    let by_price = ProductFilter {
        ordering: ProductOrdering::parse("-price").unwrap(),
        ..ProductFilter::default()
    };
    let page = products.search(&by_price, PageRequest::new(1, 2)).await.unwrap();
    let names: Vec<_> = page.content.iter().map(|v| v.product.name.as_str()).collect();
    assert_eq!(names, ["Desk", "Chair"]);
    assert_eq!(page.total_elements(), 3);
    assert_eq!(page.content[0].owner.username, "seller");

    let by_category_name = ProductFilter {
        search: Some("light".to_string()),
        ..ProductFilter::default()
    };
    let found = products.search(&by_category_name, PageRequest::first()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.content[0].category.as_ref().unwrap().name, "Lighting");

    assert_eq!(products.count_by_owner(owner.id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_product_update_and_delete() {
    let db = TestDatabase::new().await;
    let products = MySqlProductRepository::new(db.pool());
    let owner = seed_owner(&db, "seller").await;

    let mut lamp = products.create(&new_product(owner.id, "Lamp", "30.00")).await.unwrap();
    lamp.price = BigDecimal::from_str("25.00").unwrap();
    products.update(&lamp).await.unwrap();

    let reloaded = products.find_by_id(lamp.id).await.unwrap().unwrap();
    assert_eq!(reloaded.price, BigDecimal::from_str("25.00").unwrap());

    let taken = products
        .create(&new_product(owner.id, "Lamp", "10.00"))
        .await
        .expect_err("duplicate url must fail");
    assert!(matches!(taken, StorefrontError::Conflict(_)));

    assert!(products.delete(lamp.id).await.unwrap());
    assert!(!products.delete(lamp.id).await.unwrap());
}
