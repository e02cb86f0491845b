// Dive screens: search across locations and member names, form parsing and
// validation, foreign key checks

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};

mod common;
use common::{create_dive, create_member, get, post_form, setup_test_app, setup_test_db};
use diveclub::entities::dive;

#[tokio::test]
async fn test_search_by_location_is_newest_first() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());
    let ivan = create_member(&db, "Ivan", "Horvat", "ivan@klub.hr").await;
    create_dive(&db, ivan.id, "Jadransko more", "2024-05-01").await;
    create_dive(&db, ivan.id, "Jadransko more", "2024-07-01").await;
    create_dive(&db, ivan.id, "Plitvice", "2024-08-01").await;
    create_dive(&db, ivan.id, "Jadransko more", "2024-06-01").await;

    let response = get(&app, "/dives/?q=Jadransko").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.table_rows(), 3);
    assert!(!response.body.contains("2024-08-01"));

    let july = response.body.find("2024-07-01").unwrap();
    let june = response.body.find("2024-06-01").unwrap();
    let may = response.body.find("2024-05-01").unwrap();
    assert!(july < june && june < may);
}

#[tokio::test]
async fn test_search_matches_member_name() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());
    let ivan = create_member(&db, "Ivan", "Horvat", "ivan@klub.hr").await;
    let ana = create_member(&db, "Ana", "Kovac", "ana@klub.hr").await;
    create_dive(&db, ivan.id, "Plitvice", "2024-05-01").await;
    create_dive(&db, ana.id, "Plitvice", "2024-05-02").await;

    let response = get(&app, "/dives/?q=kovac").await;
    assert_eq!(response.table_rows(), 1);
    assert!(response.body.contains("Ana Kovac"));
}

#[tokio::test]
async fn test_create_dive() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());
    let ivan = create_member(&db, "Ivan", "Horvat", "ivan@klub.hr").await;

    let form = get(&app, "/dives/create/").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("Ivan Horvat"));

    let response = post_form(
        &app,
        "/dives/create/",
        &format!(
            "member={}&location=+Plitvice+&date=2024-05-17&depth=12.5&duration=40",
            ivan.id
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let dives = dive::Entity::find().all(&db).await.unwrap();
    assert_eq!(dives.len(), 1);
    assert_eq!(dives[0].location, "Plitvice");
    assert_eq!(dives[0].duration, 40);
    let expected = format!("/dives/{}/", dives[0].id);
    assert_eq!(response.location(), Some(expected.as_str()));

    let detail = get(&app, &expected).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Plitvice"));
}

#[tokio::test]
async fn test_unparsable_fields_are_reported() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());
    let ivan = create_member(&db, "Ivan", "Horvat", "ivan@klub.hr").await;

    let response = post_form(
        &app,
        "/dives/create/",
        &format!("member={}&location=&date=17.05.2024&depth=deep&duration=", ivan.id),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Enter a valid date."));
    assert!(response.body.contains("Enter a number."));
    assert!(response.body.contains("This field is required."));
    assert_eq!(dive::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_out_of_range_values_are_rejected() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());
    let ivan = create_member(&db, "Ivan", "Horvat", "ivan@klub.hr").await;

    let response = post_form(
        &app,
        "/dives/create/",
        &format!("member={}&location=Plitvice&date=2024-05-17&depth=1234.5&duration=0", ivan.id),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Ensure this value is greater than 0."));
    assert!(response.body.contains("digits before the decimal point"));
    assert_eq!(dive::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_member_is_an_invalid_choice() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());

    let response = post_form(
        &app,
        "/dives/create/",
        "member=999&location=Plitvice&date=2024-05-17&depth=10&duration=30",
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Select a valid choice."));
    assert_eq!(dive::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_and_delete_dive() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db.clone());
    let ivan = create_member(&db, "Ivan", "Horvat", "ivan@klub.hr").await;
    let dive = create_dive(&db, ivan.id, "Plitvice", "2024-05-01").await;

    let response = post_form(
        &app,
        &format!("/dives/{}/update/", dive.id),
        &format!("member={}&location=Crveno+more&date=2024-05-02&depth=30&duration=55", ivan.id),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let updated = dive::Entity::find_by_id(dive.id).one(&db).await.unwrap().unwrap();
    assert_eq!(updated.location, "Crveno more");
    assert_eq!(updated.duration, 55);

    let response = post_form(&app, &format!("/dives/{}/delete/", dive.id), "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/dives/"));
    assert_eq!(dive::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_unknown_dive_is_not_found() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let app = setup_test_app(db);

    let response = post_form(&app, "/dives/42/update/", "member=&location=").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/dives/42/").await.status, StatusCode::NOT_FOUND);
}
