mod schema;
pub mod store;

pub use schema::{LOG_HEADER, Record, STUDENT_HEADER, TIMESTAMP_FORMAT};
pub use store::RecordStore;
