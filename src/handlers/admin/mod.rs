pub mod analytics;
pub mod categories;
pub mod contacts;
pub mod products;
pub mod users;
