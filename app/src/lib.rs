pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod models;
pub mod rest;
pub mod station;
pub mod store;
