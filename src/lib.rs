//! Multi-user task tracking backend: signup/login with hashed credentials,
//! JWT sessions, and task CRUD scoped to the token's owner.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod tasks;
