use book_etl::core::pipeline::{CSV_FILENAME, JSON_FILENAME, SUMMARY_FILENAME};
use book_etl::{BookErrorPolicy, BookPipeline, CliConfig, EtlEngine, EtlError, LocalStorage};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn cli_config(base_url: String, output_path: String) -> CliConfig {
    CliConfig {
        author: "le guin".to_string(),
        base_url,
        output_path,
        formats: vec!["json".to_string(), "csv".to_string()],
        timeout_seconds: Some(10),
        max_books: None,
        on_book_error: BookErrorPolicy::Abort,
        verbose: false,
        monitor: false,
    }
}

async fn mock_le_guin(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search.json")
                .query_param("author", "le guin");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "docs": [
                        {
                            "key": "/works/OL59800W",
                            "title": "A Wizard of Earthsea",
                            "author_name": ["Ursula K. Le Guin"],
                            "first_publish_year": 1968,
                            "edition_count": 130,
                            "language": ["eng"],
                            "cover_edition_key": "OL7281766M"
                        },
                        {
                            "key": "/works/OL59863W",
                            "title": "The Left Hand of Darkness",
                            "author_name": ["Ursula K. Le Guin"],
                            "edition_count": 95,
                            "lending_edition_s": "OL24381520M"
                        }
                    ]
                }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/works/OL59800W.json");
            then.status(200)
                .json_body(json!({"subjects": ["Wizards", "Fantasy fiction"]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/OL7281766M.json");
            then.status(200).json_body(json!({
                "publishers": ["Parnassus Press"],
                "isbn_10": ["0553262505"]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/works/OL59863W.json");
            then.status(200).json_body(json!({"subjects": ["Gender"]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/books/OL24381520M.json");
            then.status(200).json_body(json!({"publishers": ["Ace Books"]}));
        })
        .await;
}

#[tokio::test]
async fn test_end_to_end_etl_writes_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    mock_le_guin(&server).await;

    let config = cli_config(server.base_url(), output_path.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = BookPipeline::new(storage, config).unwrap();
    let engine = EtlEngine::new_with_monitoring(pipeline, true);
    assert!(engine.monitoring_enabled());

    let result = engine.run().await;
    assert_eq!(result.unwrap(), output_path);
    assert_eq!(engine.pipeline().client().requests_sent(), 5);

    let books: Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join(JSON_FILENAME)).unwrap())
            .unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["title"], json!("A Wizard of Earthsea"));
    assert_eq!(books[0]["publisher"], json!(["Parnassus Press"]));
    assert_eq!(books[1]["first_publish_year"], json!([]));
    assert_eq!(books[1]["language"], json!([]));
    assert_eq!(books[1]["publisher"], json!(["Ace Books"]));

    let csv = std::fs::read_to_string(temp_dir.path().join(CSV_FILENAME)).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Wizards; Fantasy fiction"));
    assert!(csv.contains("0553262505"));

    let summary: Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join(SUMMARY_FILENAME)).unwrap())
            .unwrap();
    assert_eq!(summary["author"], json!("le guin"));
    assert_eq!(summary["books"], json!(2));
    assert_eq!(summary["skipped"], json!([]));
    assert!(summary["generated_at"].is_string());
}

#[tokio::test]
async fn test_max_books_limits_enrichment() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    mock_le_guin(&server).await;

    let mut config = cli_config(server.base_url(), output_path.clone());
    config.max_books = Some(1);
    config.formats = vec!["json".to_string()];

    let pipeline = BookPipeline::new(LocalStorage::new(output_path), config).unwrap();
    let engine = EtlEngine::new(pipeline);

    engine.run().await.unwrap();

    assert_eq!(engine.pipeline().client().requests_sent(), 3);
    assert!(temp_dir.path().join(JSON_FILENAME).exists());
    assert!(!temp_dir.path().join(CSV_FILENAME).exists());
}

#[tokio::test]
async fn test_end_to_end_with_api_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/search.json");
            then.status(500);
        })
        .await;

    let config = cli_config(server.base_url(), output_path.clone());
    let pipeline = BookPipeline::new(LocalStorage::new(output_path), config).unwrap();
    let engine = EtlEngine::new(pipeline);

    let result = engine.run().await;

    api_mock.assert_async().await;
    assert!(matches!(result, Err(EtlError::HttpStatus { status: 500, .. })));
    // 失敗時不應產生任何輸出
    assert!(!temp_dir.path().join(JSON_FILENAME).exists());
    assert!(!temp_dir.path().join(SUMMARY_FILENAME).exists());
}

#[tokio::test]
async fn test_skipped_books_are_listed_in_summary() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search.json");
            then.status(200).json_body(json!({
                "docs": [
                    {"key": "/works/OL1W", "title": "Lost", "edition_count": 1, "cover_edition_key": "OL1M"}
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/works/OL1W.json");
            then.status(404);
        })
        .await;

    let mut config = cli_config(server.base_url(), output_path.clone());
    config.on_book_error = BookErrorPolicy::Skip;

    let pipeline = BookPipeline::new(LocalStorage::new(output_path), config).unwrap();
    EtlEngine::new(pipeline).run().await.unwrap();

    let books: Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join(JSON_FILENAME)).unwrap())
            .unwrap();
    assert_eq!(books, json!([]));

    let summary: Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join(SUMMARY_FILENAME)).unwrap())
            .unwrap();
    assert_eq!(summary["books"], json!(0));
    assert_eq!(summary["skipped"][0]["work_key"], json!("/works/OL1W"));
}
