pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod menu;
pub mod models;
pub mod services;
pub mod utils;
