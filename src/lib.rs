// src/lib.rs

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod types;
