pub mod search_result;
pub mod sort_order;

pub use search_result::SearchResult;
pub use sort_order::SortOrder;
