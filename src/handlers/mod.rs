// Three route tiers: public (no auth), protected (bearer token), and
// admin (bearer token + admin role). The tiers map one-to-one onto the
// middleware stacks composed in main.rs.
pub mod admin;
pub mod protected;
pub mod public;
