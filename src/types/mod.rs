//! Type definitions

pub mod client;
pub mod courier;
pub mod delivery;
pub mod messages;
pub mod package;
pub mod proof;
pub mod route;
pub mod tracking;
pub mod user;
pub mod vehicle;

pub use client::*;
pub use courier::*;
pub use delivery::*;
pub use messages::*;
pub use package::*;
pub use proof::*;
pub use route::*;
pub use tracking::*;
pub use user::*;
pub use vehicle::*;
