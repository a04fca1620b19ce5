//! Database queries

pub mod client;
pub mod courier;
pub mod delivery;
pub mod package;
pub mod proof;
pub mod route;
pub mod tracking;
pub mod user;
pub mod vehicle;
