use std::sync::Arc;

use bson::doc;
use tracing::{debug, info};

use super::domain::{
    ContactMessage, ContactMessageCreate, Property, PropertyCreate, PropertyId, CONTACT_MESSAGES,
    LIST_LIMIT, PROPERTIES,
};
use super::records::{self, RecordError};
use super::seed::{self, SeedOutcome};
use crate::store::{without_internal_id, DocumentStore, FindQuery, SortDirection, StoreError};

/// Typed facade over the document store for listings and inquiries.
pub struct ListingService<S> {
    store: Arc<S>,
}

impl<S> ListingService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Up to [`LIST_LIMIT`] listings in store order.
    pub async fn list_properties(&self) -> Result<Vec<Property>, ListingServiceError> {
        let query = FindQuery::new()
            .projection(without_internal_id())
            .limit(LIST_LIMIT);
        let documents = self.store.find(PROPERTIES, doc! {}, query).await?;
        debug!(count = documents.len(), "listed properties");

        documents
            .into_iter()
            .map(|document| records::from_document(document).map_err(Into::into))
            .collect()
    }

    pub async fn get_property(&self, id: &PropertyId) -> Result<Property, ListingServiceError> {
        let document = self
            .store
            .find_one(
                PROPERTIES,
                doc! { "id": id.as_str() },
                Some(without_internal_id()),
            )
            .await?
            .ok_or(ListingServiceError::NotFound)?;

        Ok(records::from_document(document)?)
    }

    /// Stores a new listing with a generated id and creation time.
    pub async fn create_property(
        &self,
        create: PropertyCreate,
    ) -> Result<Property, ListingServiceError> {
        let property = Property::from_create(create, records::creation_time());
        let document = records::to_document(&property, &property.created_at)?;
        self.store.insert(PROPERTIES, document).await?;

        info!(property_id = %property.id.as_str(), "property created");
        Ok(property)
    }

    pub async fn delete_property(&self, id: &PropertyId) -> Result<(), ListingServiceError> {
        let deleted = self
            .store
            .delete_one(PROPERTIES, doc! { "id": id.as_str() })
            .await?;
        if deleted == 0 {
            return Err(ListingServiceError::NotFound);
        }

        info!(property_id = %id.as_str(), "property deleted");
        Ok(())
    }

    pub async fn create_contact_message(
        &self,
        create: ContactMessageCreate,
    ) -> Result<ContactMessage, ListingServiceError> {
        let message = ContactMessage::from_create(create, records::creation_time());
        let document = records::to_document(&message, &message.created_at)?;
        self.store.insert(CONTACT_MESSAGES, document).await?;

        info!(message_id = %message.id.0, "contact message received");
        Ok(message)
    }

    /// Up to [`LIST_LIMIT`] inquiries, newest first.
    pub async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, ListingServiceError> {
        let query = FindQuery::new()
            .projection(without_internal_id())
            .sort("created_at", SortDirection::Descending)
            .limit(LIST_LIMIT);
        let documents = self.store.find(CONTACT_MESSAGES, doc! {}, query).await?;

        documents
            .into_iter()
            .map(|document| records::from_document(document).map_err(Into::into))
            .collect()
    }

    pub async fn seed_properties(&self) -> Result<SeedOutcome, ListingServiceError> {
        seed::seed_properties(self.store.as_ref()).await
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("Property not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Record(#[from] RecordError),
}
