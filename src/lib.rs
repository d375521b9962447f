//! Core library exports for the meme service.
//!
//! The `data` feature exposes the domain types, Diesel models and schema;
//! the `server` feature adds repositories, media storage, forms, services and
//! the Actix-web routes of the application.

#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod identity;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "server")]
pub mod password;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;
