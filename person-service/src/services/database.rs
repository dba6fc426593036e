use crate::models::Person;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

pub const PERSONS_COLLECTION: &str = "persons";

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Connect and verify the server is reachable.
    ///
    /// The driver connects lazily, so a ping is issued here to fail at startup
    /// rather than on the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let mongo = Self { client, db };
        mongo.health_check().await?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(mongo)
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for person-service");

        // Update-age and delete-by-name filter on name
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_lookup".to_string())
                    .build(),
            )
            .build();

        // Multikey index for find-by-food
        let food_index = IndexModel::builder()
            .keys(doc! { "favoriteFoods": 1 })
            .options(
                IndexOptions::builder()
                    .name("favorite_foods_lookup".to_string())
                    .build(),
            )
            .build();

        self.persons()
            .create_indexes([name_index, food_index], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on persons collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created indexes on persons.name and persons.favoriteFoods");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Close pooled connections and stop driver background tasks.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB connection closed");
    }

    pub fn persons(&self) -> Collection<Person> {
        self.db.collection(PERSONS_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
