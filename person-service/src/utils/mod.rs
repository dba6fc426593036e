pub mod extract;

pub use extract::{parse_object_id, JsonBody};
