mod tokio_postgres;

pub use self::in_memory_test::{
    InMemoryRows, InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedQuery,
};
pub use self::tokio_postgres::{TokioPostgresDriver, TokioPostgresRows};
