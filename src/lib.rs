pub mod auth;
pub mod cli;
pub mod error;
pub mod github;
pub mod health;
pub mod models;
pub mod oauth;
pub mod routes;
pub mod settings;
pub mod state;
pub mod types;
pub mod views;
pub mod youtube;
