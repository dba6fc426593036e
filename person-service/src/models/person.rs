use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Food appended by the "add favorite" operation.
pub const FAVORITE_FOOD: &str = "hamburger";

/// Name removed by the bulk delete operation.
pub const BULK_DELETE_NAME: &str = "Mary";

/// A person as persisted in the `persons` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new person, before schema checks.
///
/// `name` is trimmed while deserializing so the length rule sees the stored
/// value. `favorite_foods` distinguishes an absent field (`None`, defaulted to
/// empty) from an explicit `null` (`Some(None)`, rejected).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "name is required"),
        length(min = 2, message = "name must be at least 2 characters")
    )]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 120, message = "age must be between 0 and 120"))]
    pub age: Option<i32>,

    #[serde(default, deserialize_with = "present")]
    pub favorite_foods: Option<Option<Vec<String>>>,
}

/// A person that passed schema validation and can be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    pub name: String,
    pub age: Option<i32>,
    pub favorite_foods: Vec<String>,
}

/// Body of the update-age operation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AgeUpdate {
    #[serde(default, deserialize_with = "whole_number")]
    #[validate(
        required(message = "age is required"),
        range(min = 0, max = 120, message = "age must be between 0 and 120")
    )]
    pub age: Option<i32>,
}

impl PersonInput {
    pub fn into_new_person(self) -> Result<NewPerson, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if matches!(self.favorite_foods, Some(None)) {
            errors.add(
                "favoriteFoods",
                field_error("type", "favoriteFoods must be an array of strings"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewPerson {
            name: self.name.unwrap_or_default(),
            age: self.age,
            favorite_foods: self.favorite_foods.flatten().unwrap_or_default(),
        })
    }
}

impl AgeUpdate {
    pub fn into_age(self) -> Result<i32, ValidationErrors> {
        self.validate()?;
        match self.age {
            Some(age) => Ok(age),
            None => {
                let mut errors = ValidationErrors::new();
                errors.add("age", field_error("required", "age is required"));
                Err(errors)
            }
        }
    }
}

impl NewPerson {
    /// Materialize the stored document; `now` stamps both timestamps.
    pub fn into_person(self, id: ObjectId, now: DateTime<Utc>) -> Person {
        Person {
            id,
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Current time at the precision BSON stores (milliseconds), so a freshly
/// written record compares equal to the same record read back.
pub fn storage_timestamp() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

/// Accepts any JSON number with no fractional part, so `30` and `30.0` are
/// the same age.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) => {
            Ok(Some(n as i32))
        }
        Some(n) => Err(D::Error::custom(format!(
            "age must be a whole number, got {}",
            n
        ))),
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
