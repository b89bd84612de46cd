pub mod cursor;
pub mod mapped_collection;

pub use cursor::DocumentCursor;
pub use mapped_collection::MappedCollection;
