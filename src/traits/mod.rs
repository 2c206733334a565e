mod driver;
mod row_source;
mod scannable;

pub use driver::DatabaseDriver;
pub use row_source::RowSource;
pub use scannable::{FieldMut, ScanFields, Scannable, Slot};
