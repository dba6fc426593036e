use crate::models::Person;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    pub favorite_foods: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id.to_hex(),
            name: person.name,
            age: person.age,
            favorite_foods: person.favorite_foods,
            created_at: person.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: person.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Summary of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteManyResponse {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
