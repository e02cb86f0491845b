// HTML list pagination: page numbers, `last`, invalid pages, filter carry-over

use axum::http::StatusCode;

mod common;
use common::{PER_PAGE, create_member, get, setup_test_app, setup_test_db};

async fn app_with_members(count: usize) -> axum::Router {
    let db = setup_test_db().await.expect("Failed to setup test database");
    for i in 0..count {
        create_member(&db, "Clan", &format!("Prezime{i:02}"), &format!("clan{i}@klub.hr")).await;
    }
    setup_test_app(db)
}

#[tokio::test]
async fn test_first_page_is_full() {
    let app = app_with_members(12).await;

    let response = get(&app, "/members/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.table_rows(), PER_PAGE as usize);
    assert!(response.body.contains("Page 1 of 2"));
    assert!(response.body.contains(r#"href="/members/?page=2""#));
}

#[tokio::test]
async fn test_last_page() {
    let app = app_with_members(12).await;

    let by_number = get(&app, "/members/?page=2").await;
    assert_eq!(by_number.status, StatusCode::OK);
    assert_eq!(by_number.table_rows(), 2);
    assert!(by_number.body.contains("Prezime11"));

    let by_name = get(&app, "/members/?page=last").await;
    assert_eq!(by_name.status, StatusCode::OK);
    assert_eq!(by_name.table_rows(), 2);
    assert!(by_name.body.contains("Page 2 of 2"));
}

#[tokio::test]
async fn test_invalid_pages_are_not_found() {
    let app = app_with_members(3).await;

    for uri in ["/members/?page=2", "/members/?page=0", "/members/?page=abc"] {
        assert_eq!(get(&app, uri).await.status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_empty_list_has_one_page() {
    let app = app_with_members(0).await;

    assert_eq!(get(&app, "/members/?page=1").await.status, StatusCode::OK);
    assert_eq!(get(&app, "/dives/?page=last").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_navigation_keeps_search() {
    let app = app_with_members(15).await;

    let response = get(&app, "/members/?q=clan").await;
    assert!(response.body.contains(r#"href="/members/?q=clan&amp;page=2""#));
}
