//! Integration tests for jfl-catalog API endpoints

mod helpers;

use axum::http::StatusCode;
use helpers::{body_json, create_test_app, empty_request, foo_metadata, json_request, StubResolver};
use serde_json::json;
use tower::util::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app.oneshot(empty_request("GET", "/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "jfl-catalog");
    assert!(json["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_create_article_with_title_override() {
    let (app, _pool) = create_test_app(StubResolver::returning(foo_metadata())).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/articles",
            None,
            json!({"doi": "10.1/xyz", "title": "Bar"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/articles/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let article = body_json(response).await;
    assert_eq!(article["title"], "Bar");
    assert_eq!(article["doi"], "10.1/xyz");
    assert_eq!(article["publication_year"], 2020);
    assert_eq!(article["journal_name"], "Journal of Foo");
    assert_eq!(article["authors"][0]["name"], "Jane Doe");
    assert_eq!(article["authors"][0]["author_order"], 1);
    assert_eq!(article["authors"][1]["name"], "John Roe");
    assert_eq!(article["authors"][1]["author_order"], 2);

    let response = app.oneshot(empty_request("GET", "/api/authors", None)).await.unwrap();
    let authors = body_json(response).await;
    assert_eq!(authors.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_doi_is_conflict() {
    let (app, _pool) = create_test_app(StubResolver::returning(foo_metadata())).await;
    let body = json!({"doi": "10.1/xyz"});

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/articles", None, body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request("POST", "/api/articles", None, body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let error = body_json(second).await;
    assert_eq!(error["error"]["code"], "CONFLICT");
    assert!(error["error"]["message"].as_str().unwrap().contains("10.1/xyz"));
}

#[tokio::test]
async fn test_unavailable_metadata_without_title_is_bad_request() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/articles",
            None,
            json!({"doi": "10.9/none", "authors": ["A. One"], "publication_year": 2001}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");

    let response = app.oneshot(empty_request("GET", "/api/articles", None)).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_unavailable_metadata_falls_back_to_request() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/articles",
            None,
            json!({
                "doi": "10.9/offline",
                "title": "Offline Paper",
                "abstract": "Written by hand",
                "publication_year": 2015,
                "authors": ["A. One", "B. Two"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(empty_request("GET", "/api/articles/by-doi?doi=10.9/offline", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let article = body_json(response).await;
    assert_eq!(article["title"], "Offline Paper");
    assert_eq!(article["abstract"], "Written by hand");
    assert_eq!(article["journal_name"], serde_json::Value::Null);
    assert_eq!(article["authors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_lookup_preview() {
    let (app, pool) = create_test_app(StubResolver::returning(foo_metadata())).await;

    let response = app
        .oneshot(json_request("POST", "/api/articles/lookup", None, json!({"doi": "10.1/xyz"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let preview = body_json(response).await;
    assert_eq!(preview["title"], "Foo");
    assert_eq!(preview["author_names"], json!(["Jane Doe", "John Roe"]));

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_lookup_unavailable_is_not_found() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .oneshot(json_request("POST", "/api/articles/lookup", None, json!({"doi": "10.9/x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_article_lookup_errors() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/articles/0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/articles/404", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");

    let response = app
        .oneshot(empty_request("GET", "/api/articles/by-doi?doi=10.0/missing", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_article() {
    let (app, _pool) = create_test_app(StubResolver::returning(foo_metadata())).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/articles", None, json!({"doi": "10.1/xyz"})))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/articles/{}", id);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, None, json!({"title": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            None,
            json!({"title": "Foo, revised", "publication_year": 2021}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let article = body_json(response).await;
    assert_eq!(article["title"], "Foo, revised");
    assert_eq!(article["publication_year"], 2021);
    assert_eq!(article["doi"], "10.1/xyz");
    assert_eq!(article["authors"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(empty_request("GET", &uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_requires_principal() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/profiles", None, json!({"name": "Ada"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");

    let response = app
        .oneshot(empty_request("GET", "/api/profiles/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_lifecycle_and_author_claim() {
    let (app, _pool) = create_test_app(StubResolver::returning(foo_metadata())).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/profiles",
            Some(7),
            json!({"name": "Jane Doe", "institution": "Foo University"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let profile_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/profiles", Some(7), json!({"name": "Again"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/profiles/me", Some(7)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], profile_id);

    // No author claims the profile yet
    let author_uri = format!("/api/profiles/{}/author", profile_id);
    let response = app
        .clone()
        .oneshot(empty_request("GET", &author_uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/articles", None, json!({"doi": "10.1/xyz"})))
        .await
        .unwrap();
    let article_id = body_json(response).await["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/articles/{}", article_id), None))
        .await
        .unwrap();
    let author_id = body_json(response).await["authors"][0]["author_id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/authors/{}", author_id),
            None,
            json!({"name": "Jane Doe", "profile_id": profile_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["profile_id"], profile_id);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &author_uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], author_id);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/profiles/{}", profile_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", &format!("/api/authors/{}", author_id), None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["profile_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_author_rename_collision_is_conflict() {
    let (app, _pool) = create_test_app(StubResolver::returning(foo_metadata())).await;

    app.clone()
        .oneshot(json_request("POST", "/api/articles", None, json!({"doi": "10.1/xyz"})))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/authors", None))
        .await
        .unwrap();
    let authors = body_json(response).await;
    let second_id = authors[1]["id"].as_i64().unwrap();
    let first_name = authors[0]["name"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/authors/{}", second_id),
            None,
            json!({"name": first_name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_library_bootstrap() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/libraries", Some(5)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["default_library"]["name"], "My Library");
    assert_eq!(first["default_library"]["is_default"], true);
    assert_eq!(first["default_library"]["is_public"], true);
    assert_eq!(first["other_libraries"], json!([]));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/libraries",
            Some(5),
            json!({"name": "Reading group"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(empty_request("GET", "/api/libraries", Some(5)))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["default_library"]["id"], first["default_library"]["id"]);
    assert_eq!(second["other_libraries"][0]["name"], "Reading group");
    assert_eq!(second["other_libraries"][0]["is_default"], false);
}

#[tokio::test]
async fn test_library_requires_principal() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/libraries", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = empty_request("GET", "/api/libraries", None);
    request
        .headers_mut()
        .insert("x-user-id", "not-a-number".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_article_to_library() {
    let (app, _pool) = create_test_app(StubResolver::returning(foo_metadata())).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/articles", None, json!({"doi": "10.1/xyz"})))
        .await
        .unwrap();
    let article_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/libraries", Some(3)))
        .await
        .unwrap();
    let library_id = body_json(response).await["default_library"]["id"].as_i64().unwrap();
    let uri = format!("/api/libraries/{}/articles", library_id);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &uri,
            Some(3),
            json!({"article_id": article_id, "reading_status": "skimmed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &uri,
            Some(3),
            json!({"article_id": article_id, "reading_status": "reading", "notes": "section 2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(3), json!({"article_id": article_id})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/libraries/999/articles",
            Some(3),
            json!({"article_id": article_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/api/libraries", Some(3)))
        .await
        .unwrap();
    let entry = &body_json(response).await["default_library"]["articles"][0];
    assert_eq!(entry["article_title"], "Foo");
    assert_eq!(entry["reading_status"], "reading");
    assert_eq!(entry["notes"], "section 2");
}

#[tokio::test]
async fn test_library_update_and_delete_not_supported() {
    let (app, _pool) = create_test_app(StubResolver::unavailable()).await;

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/libraries/1", Some(1), json!({"name": "x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_SUPPORTED");

    let response = app
        .oneshot(empty_request("DELETE", "/api/libraries/1", Some(1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}
