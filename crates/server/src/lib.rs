#[cfg(feature = "server")]
pub mod config;

#[cfg(feature = "server")]
pub mod db;

#[cfg(feature = "server")]
pub mod rest;

#[cfg(feature = "server")]
pub mod openapi;

#[cfg(feature = "server")]
pub mod error_convert;

#[cfg(feature = "server")]
pub mod telemetry;

#[cfg(feature = "server")]
pub mod health;

#[cfg(feature = "server")]
pub mod auth;

// Portal domain modules
#[cfg(feature = "server")]
pub mod access;

#[cfg(feature = "server")]
pub mod repo;

#[cfg(feature = "server")]
pub mod seed;
