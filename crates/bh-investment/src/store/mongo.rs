use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOneOptions, FindOptions};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use super::{DocumentStore, FindQuery, StoreError};
use crate::config::StoreConfig;

/// MongoDB-backed store. One client (and its pool) per process.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.url)
            .await
            .map_err(|err| StoreError::Connection(format!("{}: {err}", config.url)))?;
        options.app_name = options.app_name.or(Some("bh-investment".to_string()));
        options.min_pool_size = options.min_pool_size.or(Some(1));
        options.max_pool_size = options.max_pool_size.or(Some(10));

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);

        info!(database = %config.database, "document store client created");
        Ok(Self { client, database })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.collection(collection).insert_one(document, None).await?;
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        if documents.is_empty() {
            return Ok(0);
        }
        let result = self.collection(collection).insert_many(documents, None).await?;
        Ok(result.inserted_ids.len())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        query: FindQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let sort = query.sort.map(|order| {
            let mut sort = Document::new();
            sort.insert(order.field, order.direction.as_i32());
            sort
        });
        let options = FindOptions::builder()
            .projection(query.projection)
            .sort(sort)
            .limit(query.limit)
            .build();

        let cursor = self.collection(collection).find(filter, options).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(collection, returned = documents.len(), "find");
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> Result<Option<Document>, StoreError> {
        let options = FindOneOptions::builder().projection(projection).build();
        Ok(self.collection(collection).find_one(filter, options).await?)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection(collection).delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Ok(self
            .collection(collection)
            .count_documents(filter, None)
            .await?)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        info!("document store client closed");
        Ok(())
    }
}
