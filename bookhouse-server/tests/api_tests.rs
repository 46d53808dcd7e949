use bookhouse_seed::{reconcile, SeedDataset};
use bookhouse_server::build_router;
use bookhouse_store::CatalogStore;
use serde_json::{json, Value};

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_server(store: CatalogStore) -> String {
    let app = build_router(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

/// In-memory store with the built-in dataset reconciled, plus the base URL.
async fn spawn_seeded_server() -> (String, CatalogStore) {
    let store = CatalogStore::open_in_memory().unwrap();
    reconcile(&store, &SeedDataset::builtin()).unwrap();
    let base = spawn_server(store.clone()).await;
    (base, store)
}

async fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status();
    let body = resp.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn health_returns_ok() {
    let (base, _store) = spawn_seeded_server().await;
    let (status, body) = get_json(&format!("{base}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

// ── Books ────────────────────────────────────────────────────────

#[tokio::test]
async fn list_books_includes_the_seeded_catalog() {
    let (base, _store) = spawn_seeded_server().await;
    let (status, body) = get_json(&format!("{base}/books")).await;
    assert_eq!(status, 200);

    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Introduction to Algorithms",
            "Introduction to Machine Learning"
        ]
    );
}

#[tokio::test]
async fn get_book_round_trips_and_404s_on_unknown_id() {
    let (base, store) = spawn_seeded_server().await;
    let seeded = store
        .find_book_by_title("Introduction to Algorithms")
        .unwrap()
        .unwrap();

    let (status, body) = get_json(&format!("{base}/books/{}", seeded.id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["author"], "Cormen et al.");
    assert_eq!(body["year"], 2009);

    let (status, body) = get_json(&format!("{base}/books/9999")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "book not found: 9999");
}

#[tokio::test]
async fn create_book_returns_201_and_persists() {
    let (base, store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({"title": "Dune", "author": "Frank Herbert", "year": 1965}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();

    let created = store.find_book_by_title("Dune").unwrap().unwrap();
    assert_eq!(body["id"], created.id.as_i64());
    assert_eq!(created.year, Some(1965));
}

#[tokio::test]
async fn create_book_with_duplicate_title_is_rejected() {
    let (base, _store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({"title": "Introduction to Algorithms", "author": "impostor"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
}

#[tokio::test]
async fn update_book_replaces_fields() {
    let (base, store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();
    let seeded = store
        .find_book_by_title("Introduction to Machine Learning")
        .unwrap()
        .unwrap();

    let resp = client
        .put(format!("{base}/books/{}", seeded.id))
        .json(&json!({"title": "Introduction to Machine Learning", "author": "Someone New"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let updated = store.get_book(seeded.id).unwrap();
    assert_eq!(updated.author, "Someone New");
    assert_eq!(updated.year, None, "PUT replaces all mutable fields");
}

// ── Branches & faculties ─────────────────────────────────────────

#[tokio::test]
async fn branch_crud_round_trip() {
    let (base, _store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/branches"))
        .json(&json!({"name": "South Branch", "address": "9 River Road"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let (status, body) = get_json(&format!("{base}/branches/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "South Branch");

    let resp = client
        .put(format!("{base}/branches/{id}"))
        .json(&json!({"name": "South Branch"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let (_, body) = get_json(&format!("{base}/branches/{id}")).await;
    assert_eq!(body["address"], Value::Null);

    let (status, _) = get_json(&format!("{base}/branches/9999")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn faculties_are_listed_in_id_order() {
    let (base, _store) = spawn_seeded_server().await;
    let (status, body) = get_json(&format!("{base}/faculties")).await;
    assert_eq!(status, 200);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Faculty of Information Technology", "Faculty of Mathematics"]
    );
}

// ── Catalog operations ───────────────────────────────────────────

#[tokio::test]
async fn copies_endpoint_reports_seeded_stock() {
    let (base, store) = spawn_seeded_server().await;
    let branch = store.find_branch_by_name("Main Branch").unwrap().unwrap();
    let book = store
        .find_book_by_title("Introduction to Algorithms")
        .unwrap()
        .unwrap();

    let (status, body) =
        get_json(&format!("{base}/branches/{}/books/{}/copies", branch.id, book.id)).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "branch_id": branch.id.as_i64(),
            "book_id": book.id.as_i64(),
            "copies": 5
        })
    );
}

#[tokio::test]
async fn copies_endpoint_reads_zero_for_a_missing_stock_row() {
    let (base, store) = spawn_seeded_server().await;
    let branch = store.find_branch_by_name("IT Branch").unwrap().unwrap();
    let book = store
        .find_book_by_title("Introduction to Machine Learning")
        .unwrap()
        .unwrap();

    let (status, body) =
        get_json(&format!("{base}/branches/{}/books/{}/copies", branch.id, book.id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["copies"], 0);
}

#[tokio::test]
async fn copies_endpoint_404s_on_unknown_parents() {
    let (base, store) = spawn_seeded_server().await;
    let book = store
        .find_book_by_title("Introduction to Algorithms")
        .unwrap()
        .unwrap();

    let (status, body) = get_json(&format!("{base}/branches/9999/books/{}/copies", book.id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "branch not found: 9999");
}

#[tokio::test]
async fn faculties_endpoint_returns_the_ordered_usage_set() {
    let (base, store) = spawn_seeded_server().await;
    let branch = store.find_branch_by_name("Main Branch").unwrap().unwrap();
    let book = store
        .find_book_by_title("Introduction to Algorithms")
        .unwrap()
        .unwrap();

    let (status, body) =
        get_json(&format!("{base}/branches/{}/books/{}/faculties", branch.id, book.id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["faculty_count"], 2);

    let names: Vec<&str> = body["faculties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Faculty of Information Technology", "Faculty of Mathematics"]
    );
}

#[tokio::test]
async fn adding_a_usage_is_idempotent_over_http() {
    let (base, store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();
    let branch = store.find_branch_by_name("IT Branch").unwrap().unwrap();
    let book = store
        .find_book_by_title("Introduction to Algorithms")
        .unwrap()
        .unwrap();
    let faculty = store
        .find_faculty_by_name("Faculty of Mathematics")
        .unwrap()
        .unwrap();

    let url = format!(
        "{base}/branches/{}/books/{}/faculties/{}",
        branch.id, book.id, faculty.id
    );
    let first: Value = client.post(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(first["faculty_count"], 2); // IT faculty was seeded, math just added

    let second: Value = client.post(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(second, first);
    assert_eq!(store.list_usage().unwrap().len(), 5);
}

#[tokio::test]
async fn adding_a_usage_with_unknown_faculty_404s() {
    let (base, store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();
    let branch = store.find_branch_by_name("Main Branch").unwrap().unwrap();
    let book = store
        .find_book_by_title("Introduction to Algorithms")
        .unwrap()
        .unwrap();

    let resp = client
        .post(format!(
            "{base}/branches/{}/books/{}/faculties/9999",
            branch.id, book.id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "faculty not found: 9999");
}

#[tokio::test]
async fn malformed_create_body_is_a_client_error() {
    let (base, _store) = spawn_seeded_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({"title": "No Author"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (base, _store) = spawn_seeded_server().await;
    let resp = reqwest::get(format!("{base}/nonexistent")).await.unwrap();
    assert_eq!(resp.status(), 404);
}
