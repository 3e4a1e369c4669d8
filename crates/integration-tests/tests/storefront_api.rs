//! HTTP flows against a running storefront and a fake catalog.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use shopfront_integration_tests::{TestServer, spawn_catalog, two_products};

async fn server() -> TestServer {
    TestServer::spawn(spawn_catalog(two_products()).await).await
}

fn ids(listing: &Value) -> Vec<u64> {
    listing["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_listing_filter_sort_and_badges() {
    let server = server().await;

    let (status, listing) = server.get("/products?category=mobiles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["status"], "fulfilled");
    assert_eq!(ids(&listing), vec![1]);

    let phone = &listing["products"][0];
    assert_eq!(phone["price"], 1000);
    let badges = phone["badges"].as_array().unwrap();
    assert!(badges.contains(&json!("Top Rated")));
    assert!(badges.contains(&json!("Budget Pick")));
    assert_eq!(phone["in_stock"], true);
    assert_eq!(phone["availability"], "In Stock");

    let (_, listing) = server.get("/products?sort=price_desc").await;
    assert_eq!(ids(&listing), vec![2, 1]);
    assert_eq!(listing["brands"], json!(["A", "B"]));

    let (_, listing) = server.get("/products?brand=B&min_price=10000").await;
    assert_eq!(ids(&listing), vec![2]);

    let (_, listing) = server.get("/products?search=laptop&category=mobiles").await;
    assert!(ids(&listing).is_empty());
}

#[tokio::test]
async fn test_product_detail_and_missing_product() {
    let server = server().await;

    let (status, product) = server.get("/products/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["specifications"]["sku"], "SKU-2");
    assert_eq!(product["category"], "laptops");

    let (status, body) = server.get("/products/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_shopping_flow() {
    let server = server().await;
    let (status, _) = server
        .post(
            "/auth/signup",
            &json!({"name": "Asha", "email": "asha@example.com", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    server.post("/cart/add", &json!({"product_id": 1, "quantity": 2})).await;
    let (_, cart) = server.post("/cart/add", &json!({"product_id": 2})).await;
    assert_eq!(cart["count"], 3);
    assert_eq!(cart["total"], 22_000);
    assert_eq!(cart["total_display"], "₹22,000");

    let (_, cart) = server.post("/cart/remove", &json!({"product_id": 1})).await;
    assert_eq!(cart["count"], 1);

    let (status, order) = server
        .post(
            "/checkout",
            &json!({"name": "Asha", "city": "Pune", "state": "MH", "pincode": "411001"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"], 20_000);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);

    let (_, cart) = server.get("/cart").await;
    assert_eq!(cart["count"], 0);

    let (_, orders) = server.get("/orders").await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let (_, account) = server.get("/account").await;
    assert_eq!(account["order_count"], 1);
    assert_eq!(account["total_spent"], 20_000);
}

#[tokio::test]
async fn test_cart_isolation_across_identities() {
    let server = server().await;
    let asha = json!({"name": "Asha", "email": "asha@example.com", "password": "secret1"});
    let ravi = json!({"name": "Ravi", "email": "ravi@example.com", "password": "secret2"});

    server.post("/auth/signup", &asha).await;
    server.post("/cart/add", &json!({"product_id": 1})).await;
    server.post("/wishlist/toggle", &json!({"product_id": 2})).await;
    server.post("/auth/logout", &json!({})).await;

    server.post("/auth/signup", &ravi).await;
    let (_, cart) = server.get("/cart").await;
    assert_eq!(cart["count"], 0);
    let (_, wishlist) = server.get("/wishlist").await;
    assert_eq!(wishlist["items"], json!([]));
    server.post("/auth/logout", &json!({})).await;

    let (status, _) = server
        .post(
            "/auth/login",
            &json!({"email": "asha@example.com", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, cart) = server.get("/cart").await;
    assert_eq!(cart["count"], 1);
    let (_, wishlist) = server.get("/wishlist").await;
    assert_eq!(wishlist["items"], json!([2]));
}

#[tokio::test]
async fn test_unreachable_catalog_degrades() {
    let server = TestServer::spawn("http://127.0.0.1:9/".parse().unwrap()).await;

    let (status, listing) = server.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["status"], "rejected");
    assert_eq!(listing["products"], json!([]));

    let (status, _) = server.get("/products/1").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_header() {
    let server = server().await;
    let response = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "it-1")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "it-1");
}

#[tokio::test]
async fn test_cart_add_is_limited_by_stock() {
    let server = server().await;

    let (status, body) = server
        .post("/cart/add", &json!({"product_id": 1, "quantity": 4_294_967_295_u64}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "only 25 of Pocket Phone in stock");

    let (status, cart) = server.post("/cart/add", &json!({"product_id": 1, "quantity": 25})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["count"], 25);
}
