pub mod health;
pub mod persons;

pub use health::{health_check, metrics, readiness_check};
pub use persons::{
    add_favorite_food, create_many_people, create_person, delete_all_named_mary,
    delete_person_by_id, find_one_by_food, find_person_by_id, list_people, update_age_by_name,
};
