use crate::adapters::http::OpenLibraryClient;
use crate::core::merge::merge_records;
use crate::core::normalize::{edition_key, normalize_record};
use crate::domain::model::{EditionData, Record, SkippedBook, TransformResult};
use crate::domain::ports::BookErrorPolicy;
use crate::utils::error::Result;

/// Turns one raw search hit into a merged book: normalize, fetch subjects, fetch the edition.
///
/// A hit without any edition key gets an empty [`EditionData`] instead of an edition request.
pub async fn enrich_book(client: &OpenLibraryClient, raw: &Record) -> Result<Record> {
    let edition = edition_key(raw);
    let book = normalize_record(raw)?;

    let work_key = book.work_key()?.to_string();
    let subjects = client.fetch_subjects(&work_key).await?;

    let edition_data = match edition.as_deref() {
        Some(key) => client.fetch_edition(key).await?,
        None => {
            tracing::debug!("No edition key for {}, skipping edition lookup", work_key);
            EditionData::default()
        }
    };

    Ok(merge_records([
        Record::from(book),
        Record::from(subjects),
        Record::from(edition_data),
    ]))
}

/// Enriches every hit in order. Under [`BookErrorPolicy::Abort`] the first failure is returned
/// and nothing else; under [`BookErrorPolicy::Skip`] remote failures are recorded and skipped.
pub async fn enrich_books(
    client: &OpenLibraryClient,
    raws: &[Record],
    policy: BookErrorPolicy,
) -> Result<TransformResult> {
    let mut result = TransformResult::default();

    for (index, raw) in raws.iter().enumerate() {
        match enrich_book(client, raw).await {
            Ok(book) => result.processed_records.push(book),
            Err(e) if policy == BookErrorPolicy::Skip && e.is_remote() => {
                let work_key = raw
                    .get("key")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{}", index));
                tracing::warn!("⚠️ Skipping {}: {}", work_key, e);
                result.skipped.push(SkippedBook {
                    work_key,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

/// Search, normalize, enrich and merge every book by `author`.
pub async fn generate_book_data(
    client: &OpenLibraryClient,
    author: &str,
    policy: BookErrorPolicy,
) -> Result<TransformResult> {
    let docs = client.search_by_author(author).await?;
    tracing::info!("📚 Found {} books by '{}'", docs.len(), author);
    enrich_books(client, &docs, policy).await
}
