//! Single-user notes: a REST API over SQLite plus a terminal client.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod ui;
pub mod validation;
