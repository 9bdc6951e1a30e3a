//! Todo API: user registration and login plus per-user todo management over
//! JSON/HTTP.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod memory;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod state;
pub mod todos;
pub mod validation;
