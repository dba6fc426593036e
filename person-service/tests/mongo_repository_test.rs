//! Runs against a live MongoDB. Start one locally and run with
//! `MONGODB_URI=mongodb://localhost:27017 cargo test -- --ignored`.

use person_service::models::NewPerson;
use person_service::services::{MongoDb, MongoPersonRepository, PersonRepository};
use uuid::Uuid;

struct TestDb {
    repository: MongoPersonRepository,
    db: MongoDb,
}

impl TestDb {
    async fn connect() -> Self {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("person_test_{}", Uuid::new_v4());

        let db = MongoDb::connect(&uri, &db_name)
            .await
            .expect("Failed to connect to MongoDB");
        db.initialize_indexes()
            .await
            .expect("Failed to create indexes");

        Self {
            repository: MongoPersonRepository::new(db.clone()),
            db,
        }
    }

    async fn cleanup(self) {
        let _ = self.db.database().drop(None).await;
        self.db.shutdown().await;
    }
}

fn new_person(name: &str, age: Option<i32>, foods: &[&str]) -> NewPerson {
    NewPerson {
        name: name.to_string(),
        age,
        favorite_foods: foods.iter().map(|f| f.to_string()).collect(),
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn insert_and_read_back() {
    let test = TestDb::connect().await;
    let repo = &test.repository;

    let created = repo
        .insert_one(new_person("Al", Some(30), &["pizza"]))
        .await
        .unwrap();
    let fetched = repo.find_by_id(created.id).await.unwrap();

    assert_eq!(fetched, Some(created));

    test.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn atomic_updates_return_the_new_document() {
    let test = TestDb::connect().await;
    let repo = &test.repository;

    let created = repo.insert_one(new_person("Sam", None, &[])).await.unwrap();

    repo.push_favorite_food(created.id, "hamburger")
        .await
        .unwrap();
    let pushed = repo
        .push_favorite_food(created.id, "hamburger")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pushed.favorite_foods, vec!["hamburger", "hamburger"]);
    assert!(pushed.updated_at >= created.updated_at);

    let aged = repo.update_age_by_name("Sam", 55).await.unwrap().unwrap();
    assert_eq!(aged.id, created.id);
    assert_eq!(aged.age, Some(55));

    assert!(repo
        .update_age_by_name("Nobody", 1)
        .await
        .unwrap()
        .is_none());

    test.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn bulk_insert_find_by_food_and_delete() {
    let test = TestDb::connect().await;
    let repo = &test.repository;

    let people = repo
        .insert_many(vec![
            new_person("Mary", None, &["pizza"]),
            new_person("Mary", None, &[]),
            new_person("John", None, &["pizza"]),
        ])
        .await
        .unwrap();
    assert_eq!(people.len(), 3);
    assert!(repo.insert_many(Vec::new()).await.unwrap().is_empty());

    let by_food = repo.find_one_by_food("pizza").await.unwrap().unwrap();
    assert_eq!(by_food.id, people[0].id);

    assert_eq!(repo.delete_many_by_name("Mary").await.unwrap(), 2);

    let deleted = repo.delete_by_id(people[2].id).await.unwrap();
    assert_eq!(deleted.map(|p| p.name), Some("John".to_string()));
    assert!(repo.find_all().await.unwrap().is_empty());

    test.cleanup().await;
}
