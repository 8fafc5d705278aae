#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, the authentication and"]
#![doc = "authorization core (token issuance, rotation, access middleware,"]
#![doc = "role gates), the persistence stores, the change-notification feed,"]
#![doc = "routing configuration, and error handling for the Taskboard API."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the"]
#![doc = "application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod routes;
pub mod store;
