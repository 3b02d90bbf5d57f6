use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- meta ---

#[tokio::test]
async fn meta_reports_field_requirements() {
    let resp = app().oneshot(get_request("/person/meta")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let meta = body_json(resp).await;
    assert_eq!(meta["name"]["required"], json!(true));
    assert_eq!(meta["email"]["required"], json!(false));
}

// --- list ---

#[tokio::test]
async fn list_persons_empty() {
    let resp = app().oneshot(get_request("/persons")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

// --- create ---

#[tokio::test]
async fn create_person_assigns_an_id() {
    let resp = app()
        .oneshot(json_request("POST", "/person", r#"{"name":"Eric"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let person = body_json(resp).await;
    assert_eq!(person["name"], json!("Eric"));
    assert!(person["id"].is_string());
}

#[tokio::test]
async fn create_person_keeps_a_caller_supplied_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/person",
            r#"{"id":"fixed","name":"Eric"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["id"], json!("fixed"));
}

#[tokio::test]
async fn create_person_without_name_returns_422_with_errors() {
    let resp = app()
        .oneshot(json_request("POST", "/person", r#"{"email":"e@x.com"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await, json!({"errors": ["name is required"]}));
}

#[tokio::test]
async fn create_person_rejects_a_non_object_body() {
    let resp = app()
        .oneshot(json_request("POST", "/person", r#"["not an object"]"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert!(body["errors"].is_array());
}

// --- get ---

#[tokio::test]
async fn get_person_not_found_has_a_null_body() {
    let resp = app().oneshot(get_request("/person/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, Value::Null);
}

// --- update ---

#[tokio::test]
async fn update_person_not_found_has_a_null_body() {
    let resp = app()
        .oneshot(json_request("PUT", "/person/missing", r#"{"name":"X"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, Value::Null);
}

// --- delete ---

#[tokio::test]
async fn delete_person_not_found_has_a_null_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/person/missing")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, Value::Null);
}

// --- full lifecycle ---

#[tokio::test]
async fn person_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/person",
            r#"{"name":"Eric","email":"eric@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    // list contains the one record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/persons"))
        .await
        .unwrap();
    let persons = body_json(resp).await;
    assert_eq!(persons.as_array().unwrap().len(), 1);
    assert_eq!(persons[0]["id"], json!(id.clone()));

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/person/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);

    // update merges attributes
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/person/{id}"),
            r#"{"email":"new@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], json!("Eric"));
    assert_eq!(updated["email"], json!("new@example.com"));

    // an invalid update is rejected and not stored
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/person/{id}"), r#"{"name":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/person/{id}")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["name"], json!("Eric"));

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/person/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"deleted": true}));

    // list is empty again
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/persons"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!([]));
}
