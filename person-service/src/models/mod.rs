pub mod person;

pub use person::{
    storage_timestamp, AgeUpdate, NewPerson, Person, PersonInput, BULK_DELETE_NAME, FAVORITE_FOOD,
};
