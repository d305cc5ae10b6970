pub mod analytics;
pub mod catalog;
pub mod contact;
pub mod user;
