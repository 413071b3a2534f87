//! Citizen Service Library
//!
//! This library provides the citizen search/index service used by the
//! health-records front-end components: configuration-driven dispatch between
//! a real HTTP backend and a deterministic mock data generator, together with
//! the mock path's filtering, field projection, and pagination.
//!
//! # Modules
//!
//! - `config`: Configuration snapshots and the shared configuration store.
//! - `errors`: Error handling types.
//! - `factory`: Seeded mock citizen generator.
//! - `handlers`: HTTP handlers of the mock backend binary.
//! - `masks`: CPF/CNS mask removal, matching, and validation.
//! - `models`: Citizen, request, and response models.
//! - `service`: The citizen service dispatcher.

pub mod config;
pub mod errors;
pub mod factory;
pub mod handlers;
pub mod masks;
pub mod models;
pub mod service;

pub use config::{Config, ConfigPatch, ConfigStore, Endpoint, EndpointsPatch};
pub use errors::{CitizenError, Operation};
pub use service::CitizenService;
