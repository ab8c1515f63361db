pub mod fs;
pub mod slug;
pub mod sort;

pub use fs::exists;
pub use slug::generate_slug;
pub use sort::{sort, Int64Arr, Sortable};
