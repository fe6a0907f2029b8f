use std::cmp::Ordering;
use std::collections::HashMap;

use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::record_store::{RecordStore, StoreError, StoreResult};

/// In-process `RecordStore` used by the test suite and by `serve --in-memory`.
///
/// Understands the subset of MongoDB query syntax the application issues:
/// equality on (dotted) paths, `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`,
/// `$in`, `$exists`, multi-key sorts, and `$set` / `$inc` updates. Like the
/// real server it assigns an `_id` to inserted records.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, collection: &str, mut record: Document) -> StoreResult<()> {
        if !record.contains_key("_id") {
            record.insert("_id", ObjectId::new());
        }
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        let Some(records) = collections.get(collection) else {
            return Ok(None);
        };
        for record in records {
            if matches(record, &filter)? {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found = Vec::new();
        for record in collections.get(collection).into_iter().flatten() {
            if matches(record, &filter)? {
                found.push(record.clone());
            }
        }
        if let Some(sort) = sort {
            sort_records(&mut found, &sort);
        }
        Ok(found)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };
        for record in records.iter_mut() {
            if matches(record, &filter)? {
                apply_update(record, &update)?;
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };
        for index in 0..records.len() {
            if matches(&records[index], &filter)? {
                records.remove(index);
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn count(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let mut count = 0;
        for record in collections.get(collection).into_iter().flatten() {
            if matches(record, &filter)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

fn lookup<'a>(record: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_path(record: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            record.insert(path, value);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(inner)) = record.get_mut(head) {
                set_path(inner, rest, value);
                return;
            }
            let mut inner = Document::new();
            set_path(&mut inner, rest, value);
            record.insert(head, inner);
        }
    }
}

fn matches(record: &Document, filter: &Document) -> StoreResult<bool> {
    for (key, condition) in filter {
        if key.starts_with('$') {
            return Err(StoreError::Unsupported(format!("top-level operator {key}")));
        }
        let value = lookup(record, key);
        let matched = match condition {
            Bson::Document(ops) if is_operator_document(ops) => match_operators(value, ops)?,
            _ => equals(value, condition),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn match_operators(value: Option<&Bson>, ops: &Document) -> StoreResult<bool> {
    for (op, operand) in ops {
        let matched = match op.as_str() {
            "$eq" => equals(value, operand),
            "$ne" => !equals(value, operand),
            "$gt" => compares(value, operand, |o| o == Ordering::Greater),
            "$gte" => compares(value, operand, |o| o != Ordering::Less),
            "$lt" => compares(value, operand, |o| o == Ordering::Less),
            "$lte" => compares(value, operand, |o| o != Ordering::Greater),
            "$in" => match operand {
                Bson::Array(candidates) => candidates.iter().any(|c| equals(value, c)),
                _ => return Err(StoreError::Unsupported("$in needs an array".to_string())),
            },
            "$exists" => match operand {
                Bson::Boolean(expected) => value.is_some() == *expected,
                _ => return Err(StoreError::Unsupported("$exists needs a bool".to_string())),
            },
            other => return Err(StoreError::Unsupported(format!("query operator {other}"))),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| same_value(item, expected))
        }
        Some(actual) => same_value(actual, expected),
    }
}

fn same_value(a: &Bson, b: &Bson) -> bool {
    compare_values(a, b) == Some(Ordering::Equal) || a == b
}

fn compares(value: Option<&Bson>, operand: &Bson, accept: impl Fn(Ordering) -> bool) -> bool {
    value
        .and_then(|v| compare_values(v, operand))
        .is_some_and(accept)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Orders two values of the same type class; values of different classes
/// are incomparable, as in MongoDB query bracketing.
fn compare_values(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::ObjectId(_)) => 6,
        Some(Bson::Boolean(_)) => 7,
        Some(Bson::DateTime(_)) => 8,
        Some(_) => 9,
    }
}

fn sort_records(records: &mut [Document], sort: &Document) {
    records.sort_by(|a, b| {
        for (key, direction) in sort {
            let (left, right) = (lookup(a, key), lookup(b, key));
            let rank = type_rank(left).cmp(&type_rank(right));
            let ordering = match (rank, left, right) {
                (Ordering::Equal, Some(l), Some(r)) => {
                    compare_values(l, r).unwrap_or(Ordering::Equal)
                }
                _ => rank,
            };
            let ordering = if as_number(direction).unwrap_or(1.0) < 0.0 {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn apply_update(record: &mut Document, update: &Document) -> StoreResult<()> {
    for (op, fields) in update {
        let Bson::Document(fields) = fields else {
            return Err(StoreError::Unsupported(format!("{op} needs a document")));
        };
        match op.as_str() {
            "$set" => {
                for (path, value) in fields {
                    set_path(record, path, value.clone());
                }
            }
            "$inc" => {
                for (path, delta) in fields {
                    let next = increment(lookup(record, path), delta)?;
                    set_path(record, path, next);
                }
            }
            other => return Err(StoreError::Unsupported(format!("update operator {other}"))),
        }
    }
    Ok(())
}

fn increment(current: Option<&Bson>, delta: &Bson) -> StoreResult<Bson> {
    let non_numeric = || StoreError::Unsupported("$inc on a non-numeric value".to_string());
    let next = match (current, delta) {
        (None | Some(Bson::Null), d) if as_number(d).is_some() => d.clone(),
        (Some(Bson::Int32(a)), Bson::Int32(b)) => match a.checked_add(*b) {
            Some(sum) => Bson::Int32(sum),
            None => Bson::Int64(i64::from(*a) + i64::from(*b)),
        },
        (Some(Bson::Int32(a)), Bson::Int64(b)) => Bson::Int64(i64::from(*a) + b),
        (Some(Bson::Int64(a)), Bson::Int32(b)) => Bson::Int64(a + i64::from(*b)),
        (Some(Bson::Int64(a)), Bson::Int64(b)) => Bson::Int64(a + b),
        (Some(a), b) => {
            let (x, y) = as_number(a).zip(as_number(b)).ok_or_else(non_numeric)?;
            Bson::Double(x + y)
        }
        _ => return Err(non_numeric()),
    };
    Ok(next)
}
