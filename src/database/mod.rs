pub mod manager;
pub mod models;
pub mod seed;
pub mod service;

pub use manager::DatabaseError;
