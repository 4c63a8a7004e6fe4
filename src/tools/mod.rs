//! FoodLens Tools module
//!
//! MCP tool implementations for food analysis and meal logging.

pub mod foods;
pub mod meals;
pub mod status;
