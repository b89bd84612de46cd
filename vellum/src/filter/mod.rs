pub mod filter;
pub mod fluent;

pub use filter::{and, by_id, match_all, or, CmpOp, FilterExpr};
pub use fluent::{contains, ends_with, field, starts_with, FluentFilter};
