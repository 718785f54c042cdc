use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use bson::Document;
use serde_json::Value;

use crate::listings::domain::{ContactMessageCreate, PropertyCreate, PropertyStatus};
use crate::listings::{listing_router, ListingService};
use crate::store::{DocumentStore, FindQuery, MemoryStore, StoreError};

pub(super) fn property_create() -> PropertyCreate {
    PropertyCreate {
        title: "Riverside Bungalow".to_string(),
        address: "12 River Rd, Eastside".to_string(),
        price: "$315,000".to_string(),
        bedrooms: 2,
        bathrooms: 1,
        sqft: 980,
        image: "https://images.example/bungalow.jpg".to_string(),
        description: "Single-level bungalow backing onto the river trail.".to_string(),
        status: PropertyStatus::Pending,
    }
}

pub(super) fn contact_create(name: &str) -> ContactMessageCreate {
    ContactMessageCreate {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase()),
        phone: "555-0100".to_string(),
        message: "Property Address: 42 Elm St".to_string(),
    }
}

pub(super) fn build_service() -> (ListingService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let service = ListingService::new(Arc::new(store.clone()));
    (service, store)
}

pub(super) fn router_with_service<S>(service: ListingService<S>) -> axum::Router
where
    S: DocumentStore + 'static,
{
    listing_router(Arc::new(service))
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn insert(&self, _collection: &str, _document: Document) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn insert_many(
        &self,
        _collection: &str,
        _documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn find(
        &self,
        _collection: &str,
        _filter: Document,
        _query: FindQuery,
    ) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn find_one(
        &self,
        _collection: &str,
        _filter: Document,
        _projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn delete_one(&self, _collection: &str, _filter: Document) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn count(&self, _collection: &str, _filter: Document) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
