//! Ingredients Domain
//!
//! This module provides a complete domain implementation for managing
//! cosmetic ingredients and their cost data.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Business logic, cost cache maintenance
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! The pure helpers in [`units`] and [`costing`] are the standardization
//! layer every cost computation goes through: all quantities normalize to
//! grams, all unit costs to cost-per-gram.

pub mod costing;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod units;

// Re-export commonly used types
pub use costing::{cost_per_gram, cost_per_unit_options, COST_FRESHNESS_DAYS};
pub use error::{IngredientError, IngredientResult};
pub use models::{
    CostPerUnit, CreateIngredient, Ingredient, IngredientFilter, Tier, UpdateIngredient,
    UpdateIngredientCost,
};
pub use postgres::PgIngredientRepository;
pub use repository::IngredientRepository;
pub use service::IngredientService;
pub use units::{from_grams, to_grams, GRAMS_PER_OUNCE};
