use crate::domain::model::Record;

/// Folds `records` into one, in order. A key keeps the first value it was seen with.
pub fn merge_records<I>(records: I) -> Record
where
    I: IntoIterator<Item = Record>,
{
    let mut merged = Record::new();
    for record in records {
        for (key, value) in record {
            merged.entry(key).or_insert(value);
        }
    }
    merged
}
