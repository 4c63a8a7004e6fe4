//! FoodLens Library
//!
//! Nutrition normalization, food classification, and meal logging.

pub mod analysis;
pub mod build_info;
pub mod classify;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod quota;
pub mod search;
pub mod tools;
