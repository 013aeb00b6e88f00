// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod controller;
pub mod errors;
pub mod evaluator;
pub mod markdown;
pub mod models;
pub mod render;
