pub mod persons;

pub use persons::{DeleteManyResponse, PersonResponse};
