use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A string-keyed JSON document: raw search hits, raw work/edition bodies and merged books.
pub type Record = serde_json::Map<String, Value>;

/// The canonical projection of one search hit.
///
/// Values are carried exactly as the API sent them. Optional fields hold an empty array when
/// the hit has no such key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBook {
    pub id: Value,
    pub title: Value,
    pub author_name: Value,
    pub first_publish_year: Value,
    pub edition_count: Value,
    pub language: Value,
}

impl NormalizedBook {
    /// The work key as a path segment for the subjects lookup.
    pub fn work_key(&self) -> Result<&str> {
        self.id.as_str().ok_or_else(|| EtlError::InvalidField {
            field: "key".to_string(),
            context: "search result".to_string(),
            message: format!("work key must be a string to build a URL, got {}", self.id),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectData {
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Isbn {
    pub isbn_10: Vec<String>,
    pub isbn_13: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditionData {
    pub publisher: Vec<String>,
    pub isbn: Isbn,
}

/// A book left out of the batch under the `skip` failure policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBook {
    pub work_key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub processed_records: Vec<Record>,
    pub skipped: Vec<SkippedBook>,
}

fn string_list(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

impl From<NormalizedBook> for Record {
    fn from(book: NormalizedBook) -> Self {
        let mut record = Record::new();
        record.insert("id".to_string(), book.id);
        record.insert("title".to_string(), book.title);
        record.insert("author_name".to_string(), book.author_name);
        record.insert("first_publish_year".to_string(), book.first_publish_year);
        record.insert("edition_count".to_string(), book.edition_count);
        record.insert("language".to_string(), book.language);
        record
    }
}

impl From<SubjectData> for Record {
    fn from(data: SubjectData) -> Self {
        let mut record = Record::new();
        record.insert("subjects".to_string(), string_list(data.subjects));
        record
    }
}

impl From<EditionData> for Record {
    fn from(data: EditionData) -> Self {
        let mut isbn = Record::new();
        isbn.insert("isbn_10".to_string(), string_list(data.isbn.isbn_10));
        isbn.insert("isbn_13".to_string(), string_list(data.isbn.isbn_13));

        let mut record = Record::new();
        record.insert("publisher".to_string(), string_list(data.publisher));
        record.insert("isbn".to_string(), Value::Object(isbn));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edition_data_record_shape() {
        let data = EditionData {
            publisher: vec!["X".to_string()],
            isbn: Isbn::default(),
        };
        let record = Record::from(data);
        assert_eq!(
            Value::Object(record),
            json!({"publisher": ["X"], "isbn": {"isbn_10": [], "isbn_13": []}})
        );
    }

    #[test]
    fn test_normalized_book_record_keys() {
        let book = NormalizedBook {
            id: json!("/works/OL675783W"),
            title: json!("The Handmaid's Tale"),
            author_name: json!(["Margaret Atwood"]),
            first_publish_year: json!(1985),
            edition_count: json!(147),
            language: json!([]),
        };
        assert_eq!(book.work_key().unwrap(), "/works/OL675783W");
        let record = Record::from(book);
        let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "author_name",
                "edition_count",
                "first_publish_year",
                "id",
                "language",
                "title"
            ]
        );
        assert_eq!(record["language"], json!([]));
    }

    #[test]
    fn test_work_key_must_be_a_string() {
        let book = NormalizedBook {
            id: json!(42),
            title: json!(null),
            author_name: json!([]),
            first_publish_year: json!([]),
            edition_count: json!(1),
            language: json!([]),
        };
        assert!(matches!(
            book.work_key(),
            Err(EtlError::InvalidField { ref field, .. }) if field == "key"
        ));
    }
}
