pub mod constants;
pub mod record;
pub mod sort_order;
pub mod util;
pub mod value;

pub use constants::{DOC_ID, RESERVED_FIELDS};
pub use record::Record;
pub use sort_order::SortOrder;
pub use util::{atomic, Atomic, ReadExecutor, WriteExecutor};
pub use value::Value;
