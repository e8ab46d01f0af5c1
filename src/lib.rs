//! Client library for the Booker25 resource booking API.
//!
//! The `engine` module turns raw resource, availability and service records into a
//! queryable result; everything else fetches those records and handles reservations.

pub mod api;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod observability;
pub mod price;
pub mod records;
pub mod request;
pub mod reservation;

pub use client::Client;
pub use config::{ClientConfig, Environment};
pub use engine::{Condition, ConditionGroup, Operator, Resource, ResourceResult};
pub use error::{Error, Result};
pub use request::ResourceRequest;
pub use reservation::{Person, Reservation, ServiceReservation};
