use crate::models::{storage_timestamp, NewPerson, Person};
use crate::services::PersonRepository;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use tokio::sync::RwLock;

/// Process-local repository for tests and database-free local runs.
///
/// Records are kept in insertion order, which matches ascending `ObjectId`
/// order for ids minted by this process.
#[derive(Default)]
pub struct InMemoryPersonRepository {
    people: RwLock<Vec<Person>>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.people.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.people.read().await.is_empty()
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn insert_one(&self, person: NewPerson) -> Result<Person, AppError> {
        let person = person.into_person(ObjectId::new(), storage_timestamp());
        self.people.write().await.push(person.clone());
        Ok(person)
    }

    async fn insert_many(&self, people: Vec<NewPerson>) -> Result<Vec<Person>, AppError> {
        let now = storage_timestamp();
        let people: Vec<Person> = people
            .into_iter()
            .map(|p| p.into_person(ObjectId::new(), now))
            .collect();

        self.people.write().await.extend(people.iter().cloned());
        Ok(people)
    }

    async fn find_all(&self) -> Result<Vec<Person>, AppError> {
        Ok(self.people.read().await.clone())
    }

    async fn find_one_by_food(&self, food: &str) -> Result<Option<Person>, AppError> {
        let people = self.people.read().await;
        Ok(people
            .iter()
            .find(|p| p.favorite_foods.iter().any(|f| f == food))
            .cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError> {
        let people = self.people.read().await;
        Ok(people.iter().find(|p| p.id == id).cloned())
    }

    async fn push_favorite_food(
        &self,
        id: ObjectId,
        food: &str,
    ) -> Result<Option<Person>, AppError> {
        let mut people = self.people.write().await;
        Ok(people.iter_mut().find(|p| p.id == id).map(|person| {
            person.favorite_foods.push(food.to_string());
            person.updated_at = storage_timestamp();
            person.clone()
        }))
    }

    async fn update_age_by_name(&self, name: &str, age: i32) -> Result<Option<Person>, AppError> {
        let mut people = self.people.write().await;
        Ok(people.iter_mut().find(|p| p.name == name).map(|person| {
            person.age = Some(age);
            person.updated_at = storage_timestamp();
            person.clone()
        }))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Person>, AppError> {
        let mut people = self.people.write().await;
        Ok(people
            .iter()
            .position(|p| p.id == id)
            .map(|index| people.remove(index)))
    }

    async fn delete_many_by_name(&self, name: &str) -> Result<u64, AppError> {
        let mut people = self.people.write().await;
        let before = people.len();
        people.retain(|p| p.name != name);
        Ok((before - people.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn shutdown(&self) {}
}
