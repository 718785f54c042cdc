use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};

use super::{DocumentStore, FindQuery, SortDirection, StoreError, INTERNAL_ID};

/// In-process store with the subset of query semantics the service relies on:
/// equality filters, exclusion projections, single-field sort and limit.
#[derive(Default, Clone)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Document>>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store mutex poisoned".to_string()))
    }
}

fn with_internal_id(mut document: Document) -> Document {
    if !document.contains_key(INTERNAL_ID) {
        document.insert(INTERNAL_ID, ObjectId::new());
    }
    document
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Only exclusion projections (`{field: 0}`) are supported.
fn project(mut document: Document, projection: Option<&Document>) -> Document {
    if let Some(projection) = projection {
        for (key, flag) in projection {
            let excluded = match flag {
                Bson::Int32(0) | Bson::Int64(0) | Bson::Boolean(false) => true,
                Bson::Double(value) => *value == 0.0,
                _ => false,
            };
            if excluded {
                document.remove(key);
            }
        }
    }
    document
}

fn compare_bson(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => match (left, right) {
            (Bson::String(a), Bson::String(b)) => a.cmp(b),
            (Bson::DateTime(a), Bson::DateTime(b)) => a.cmp(b),
            (Bson::Int32(a), Bson::Int32(b)) => a.cmp(b),
            (Bson::Int64(a), Bson::Int64(b)) => a.cmp(b),
            (Bson::Int32(a), Bson::Int64(b)) => i64::from(*a).cmp(b),
            (Bson::Int64(a), Bson::Int32(b)) => a.cmp(&i64::from(*b)),
            (Bson::Double(a), Bson::Double(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        guard
            .entry(collection.to_string())
            .or_default()
            .push(with_internal_id(document));
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        let mut guard = self.lock()?;
        let written = documents.len();
        guard
            .entry(collection.to_string())
            .or_default()
            .extend(documents.into_iter().map(with_internal_id));
        Ok(written)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        query: FindQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let guard = self.lock()?;
        let mut documents: Vec<Document> = guard
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(guard);

        if let Some(order) = &query.sort {
            // stable, so ties keep insertion order
            documents.sort_by(|a, b| {
                let ordering = compare_bson(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            documents.truncate(limit as usize);
        }

        Ok(documents
            .into_iter()
            .map(|document| project(document, query.projection.as_ref()))
            .collect())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| matches(document, &filter)))
            .cloned()
            .map(|document| project(document, projection.as_ref())))
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let mut guard = self.lock()?;
        let Some(documents) = guard.get_mut(collection) else {
            return Ok(0);
        };
        match documents
            .iter()
            .position(|document| matches(document, &filter))
        {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches(document, &filter))
                    .count() as u64
            })
            .unwrap_or(0))
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::without_internal_id;
    use bson::doc;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_many(
                "items",
                vec![
                    doc! { "id": "a", "rank": 2, "stamp": "2025-01-02T00:00:00.000000+00:00" },
                    doc! { "id": "b", "rank": 1, "stamp": "2025-01-03T00:00:00.000000+00:00" },
                    doc! { "id": "c", "rank": 3, "stamp": "2025-01-01T00:00:00.000000+00:00" },
                ],
            )
            .await
            .expect("insert many");
        store
    }

    #[tokio::test]
    async fn insert_assigns_internal_id_and_projection_strips_it() {
        let store = seeded().await;
        let raw = store
            .find_one("items", doc! { "id": "a" }, None)
            .await
            .expect("find")
            .expect("present");
        assert!(raw.get_object_id(INTERNAL_ID).is_ok());

        let projected = store
            .find_one("items", doc! { "id": "a" }, Some(without_internal_id()))
            .await
            .expect("find")
            .expect("present");
        assert!(!projected.contains_key(INTERNAL_ID));
        assert_eq!(projected.get_i32("rank").expect("rank"), 2);
    }

    #[tokio::test]
    async fn find_preserves_insertion_order_without_sort() {
        let store = seeded().await;
        let ids: Vec<String> = store
            .find("items", doc! {}, FindQuery::new())
            .await
            .expect("find")
            .iter()
            .map(|document| document.get_str("id").expect("id").to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn find_sorts_descending_then_limits() {
        let store = seeded().await;
        let query = FindQuery::new()
            .sort("stamp", SortDirection::Descending)
            .limit(2);
        let ids: Vec<String> = store
            .find("items", doc! {}, query)
            .await
            .expect("find")
            .iter()
            .map(|document| document.get_str("id").expect("id").to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn delete_one_reports_removed_count() {
        let store = seeded().await;
        assert_eq!(store.delete_one("items", doc! { "id": "b" }).await.unwrap(), 1);
        assert_eq!(store.delete_one("items", doc! { "id": "b" }).await.unwrap(), 0);
        assert_eq!(store.delete_one("missing", doc! { "id": "b" }).await.unwrap(), 0);
        assert_eq!(store.count("items", doc! {}).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn count_applies_equality_filter() {
        let store = seeded().await;
        assert_eq!(store.count("items", doc! { "rank": 3 }).await.unwrap(), 1);
        assert_eq!(store.count("empty", doc! {}).await.unwrap(), 0);
    }
}
