use crate::models::{storage_timestamp, NewPerson, Person};
use crate::services::MongoDb;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument};
use service_core::error::AppError;

/// Storage operations behind the person handlers.
///
/// Lookups return `Ok(None)` when nothing matches; callers decide whether that
/// is a 404. Where several records match, "first" means ascending `_id`, i.e.
/// the earliest created.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn insert_one(&self, person: NewPerson) -> Result<Person, AppError>;

    /// Insert the whole batch in a single write.
    async fn insert_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError>;

    async fn find_all(&self) -> Result<Vec<Person>, AppError>;

    async fn find_one_by_food(&self, food: &str) -> Result<Option<Person>, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError>;

    /// Atomically append `food` to the record's favorites and return the
    /// updated record.
    async fn push_favorite_food(
        &self,
        id: ObjectId,
        food: &str,
    ) -> Result<Option<Person>, AppError>;

    /// Atomically set the age of the first record named `name` and return the
    /// updated record.
    async fn update_age_by_name(&self, name: &str, age: i32) -> Result<Option<Person>, AppError>;

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError>;

    /// Delete every record whose name is exactly `name`; returns the count.
    async fn delete_many_by_name(&self, name: &str) -> Result<u64, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;

    /// Release the underlying connection. Further calls may fail.
    async fn shutdown(&self);
}

#[derive(Clone)]
pub struct MongoPersonRepository {
    db: MongoDb,
}

impl MongoPersonRepository {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<Person>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .sort(doc! { "_id": 1 })
            .return_document(ReturnDocument::After)
            .build();

        self.db
            .persons()
            .find_one_and_update(filter, update, options)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl PersonRepository for MongoPersonRepository {
    async fn insert_one(&self, person: NewPerson) -> Result<Person, AppError> {
        let person = person.into_person(ObjectId::new(), storage_timestamp());

        self.db
            .persons()
            .insert_one(&person, None)
            .await
            .map_err(|e| {
                tracing::error!(person_id = %person.id, "Failed to insert person: {}", e);
                AppError::from(e)
            })?;

        Ok(person)
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError> {
        // The driver rejects an empty insert_many
        if people.is_empty() {
            return Ok(Vec::new());
        }

        let now = storage_timestamp();
        let people: Vec<Person> = people
            .into_iter()
            .map(|p| p.into_person(ObjectId::new(), now))
            .collect();

        self.db
            .persons()
            .insert_many(&people, None)
            .await
            .map_err(|e| {
                tracing::error!(count = people.len(), "Failed to insert persons: {}", e);
                AppError::from(e)
            })?;

        Ok(people)
    }

    async fn find_all(&self) -> Result<Vec<Person>, AppError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let cursor = self.db.persons().find(None, options).await?;
        let people = cursor.try_collect().await?;
        Ok(people)
    }

    async fn find_one_by_food(&self, food: &str) -> Result<Option<Person>, AppError> {
        let options = FindOneOptions::builder().sort(doc! { "_id": 1 }).build();

        // Equality on an array field matches any element
        let person = self
            .db
            .persons()
            .find_one(doc! { "favoriteFoods": food }, options)
            .await?;
        Ok(person)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError> {
        let person = self.db.persons().find_one(doc! { "_id": id }, None).await?;
        Ok(person)
    }

    async fn push_favorite_food(
        &self,
        id: ObjectId,
        food: &str,
    ) -> Result<Option<Person>, AppError> {
        self.find_one_and_update(
            doc! { "_id": id },
            doc! {
                "$push": { "favoriteFoods": food },
                "$currentDate": { "updatedAt": true },
            },
        )
        .await
    }

    async fn update_age_by_name(&self, name: &str, age: i32) -> Result<Option<Person>, AppError> {
        self.find_one_and_update(
            doc! { "name": name },
            doc! {
                "$set": { "age": age },
                "$currentDate": { "updatedAt": true },
            },
        )
        .await
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError> {
        let person = self
            .db
            .persons()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?;
        Ok(person)
    }

    async fn delete_many_by_name(&self, name: &str) -> Result<u64, AppError> {
        let result = self
            .db
            .persons()
            .delete_many(doc! { "name": name }, None)
            .await?;
        Ok(result.deleted_count)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }

    async fn shutdown(&self) {
        self.db.shutdown().await;
    }
}
