pub mod auth;
pub mod catalog;
pub mod contact;
pub mod tracking;
