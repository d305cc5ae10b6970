pub mod pagination;
pub mod validate;

pub use pagination::{PageQuery, Pagination};
