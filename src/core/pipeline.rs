use crate::adapters::http::OpenLibraryClient;
use crate::core::enrich::enrich_books;
use crate::core::{ConfigProvider, Pipeline, Record, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::time::Duration;

pub const JSON_FILENAME: &str = "books.json";
pub const CSV_FILENAME: &str = "books.csv";
pub const SUMMARY_FILENAME: &str = "summary.json";

const CSV_COLUMNS: [&str; 10] = [
    "id",
    "title",
    "author_name",
    "first_publish_year",
    "edition_count",
    "language",
    "subjects",
    "publisher",
    "isbn_10",
    "isbn_13",
];

/// Author search → per-book enrichment → JSON/CSV files.
pub struct BookPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: OpenLibraryClient,
}

impl<S: Storage, C: ConfigProvider> BookPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = match config.timeout_seconds() {
            Some(secs) => {
                OpenLibraryClient::with_timeout(config.base_url(), Duration::from_secs(secs))?
            }
            None => OpenLibraryClient::new(config.base_url()),
        };

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn client(&self) -> &OpenLibraryClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BookPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let author = self.config.author();
        tracing::info!(
            "🚀 Searching books by '{}' at {}",
            author,
            self.client.base_url()
        );

        let mut docs = self.client.search_by_author(author).await?;

        if let Some(max_books) = self.config.max_books() {
            if docs.len() > max_books {
                tracing::info!("✂️ Keeping the first {} of {} books", max_books, docs.len());
                docs.truncate(max_books);
            }
        }

        tracing::info!("📊 Extracted {} search results", docs.len());
        Ok(docs)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<TransformResult> {
        tracing::info!(
            "🔧 Enriching {} books (on error: {})",
            data.len(),
            self.config.book_error_policy()
        );

        let result = enrich_books(&self.client, &data, self.config.book_error_policy()).await?;

        if !result.skipped.is_empty() {
            tracing::warn!("⚠️ {} books were skipped", result.skipped.len());
        }
        tracing::info!(
            "✅ Enrichment complete: {} books merged",
            result.processed_records.len()
        );
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        for format in self.config.output_formats() {
            match format.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&result.processed_records)?;
                    self.storage.write_file(JSON_FILENAME, json.as_bytes()).await?;
                }
                "csv" => {
                    let csv = render_csv(&result.processed_records)?;
                    self.storage.write_file(CSV_FILENAME, &csv).await?;
                }
                other => {
                    return Err(EtlError::ConfigError {
                        message: format!("Unsupported output format: {}", other),
                    })
                }
            }
        }

        let summary = serde_json::json!({
            "author": self.config.author(),
            "base_url": self.client.base_url(),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "books": result.processed_records.len(),
            "skipped": result.skipped,
        });
        let summary = serde_json::to_string_pretty(&summary)?;
        self.storage
            .write_file(SUMMARY_FILENAME, summary.as_bytes())
            .await?;

        let location = self.storage.location();
        tracing::info!("💾 Output saved to: {}", location);
        Ok(location)
    }

    fn requests_sent(&self) -> usize {
        self.client.requests_sent()
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell(Some(item)))
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
    }
}

/// One row per book; list fields are joined with `"; "` and `isbn` is split in two columns.
pub fn render_csv(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;

    for record in records {
        let isbn = record.get("isbn");
        let row: Vec<String> = CSV_COLUMNS
            .iter()
            .map(|column| match *column {
                "isbn_10" | "isbn_13" => cell(isbn.and_then(|i| i.get(*column))),
                _ => cell(record.get(*column)),
            })
            .collect();
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
