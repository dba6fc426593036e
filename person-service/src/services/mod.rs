pub mod database;
pub mod memory;
pub mod metrics;
pub mod repository;

pub use database::MongoDb;
pub use memory::InMemoryPersonRepository;
pub use metrics::{get_metrics, init_metrics};
pub use repository::{MongoPersonRepository, PersonRepository};
