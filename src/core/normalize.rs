use crate::domain::model::{EditionData, Isbn, NormalizedBook, Record, SubjectData};
use crate::utils::error::Result;
use crate::utils::fields::{get_or_default, require, require_value, value_or_empty_list};

fn doc_context(raw: &Record) -> String {
    match raw.get("key").and_then(|v| v.as_str()) {
        Some(key) => format!("search result {}", key),
        None => "search result".to_string(),
    }
}

/// Projects a raw search hit onto [`NormalizedBook`].
///
/// `key`, `title` and `edition_count` must be present. `author_name`, `first_publish_year`
/// and `language` fall back to an empty list. Only key presence is checked; values are copied
/// as they are.
pub fn normalize_record(raw: &Record) -> Result<NormalizedBook> {
    let context = doc_context(raw);

    Ok(NormalizedBook {
        id: require_value(raw, "key", &context)?,
        title: require_value(raw, "title", &context)?,
        author_name: value_or_empty_list(raw, "author_name"),
        first_publish_year: value_or_empty_list(raw, "first_publish_year"),
        edition_count: require_value(raw, "edition_count", &context)?,
        language: value_or_empty_list(raw, "language"),
    })
}

pub fn normalize_records(raws: &[Record]) -> Result<Vec<NormalizedBook>> {
    raws.iter().map(normalize_record).collect()
}

/// Picks the edition used for publisher/ISBN lookups.
///
/// `cover_edition_key` wins over `lending_edition_s`; empty strings count as missing.
pub fn edition_key(raw: &Record) -> Option<String> {
    ["cover_edition_key", "lending_edition_s"]
        .iter()
        .filter_map(|field| raw.get(*field).and_then(|v| v.as_str()))
        .find(|key| !key.is_empty())
        .map(str::to_string)
}

pub fn subjects_from_response(body: &Record, work_key: &str) -> Result<SubjectData> {
    let context = format!("work {}", work_key);
    Ok(SubjectData {
        subjects: get_or_default(body, "subjects", &context)?,
    })
}

pub fn edition_from_response(body: &Record, edition_key: &str) -> Result<EditionData> {
    let context = format!("edition {}", edition_key);
    Ok(EditionData {
        publisher: require(body, "publishers", &context)?,
        isbn: Isbn {
            isbn_10: get_or_default(body, "isbn_10", &context)?,
            isbn_13: get_or_default(body, "isbn_13", &context)?,
        },
    })
}
