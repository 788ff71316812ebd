pub mod api;
pub mod clients;
pub mod config;
pub mod generator;
pub mod models;
pub mod prompt;
pub mod signals;
pub mod utils;
