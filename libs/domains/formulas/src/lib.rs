//! Formulas Domain
//!
//! Formula CRUD with ordered ingredient associations and manufacturing
//! steps, plus the batch cost engine.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   ┌──────────────────┐
//! │    Service     │   │  CostCalculator  │  ← breakdown over associations
//! └───────┬────────┘   └────────┬─────────┘
//!         │                     │ joins ingredients + currency
//! ┌───────▼─────────────────────▼─────────┐
//! │              Repository               │
//! └───────────────────┬───────────────────┘
//!                     │
//! ┌───────────────────▼───────────────────┐
//! │          Models / Entities            │
//! └───────────────────────────────────────┘
//! ```
//!
//! The invariant maintained on write: association percentages sum to 100
//! within ±0.5; drifting inputs are proportionally renormalized.

pub mod cost_calculator;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use cost_calculator::{quantity_needed, CostCalculator};
pub use error::{FormulaError, FormulaResult};
pub use models::{
    CreateFormula, Formula, FormulaCostBreakdown, FormulaFilter, FormulaIngredient, FormulaStep,
    IngredientCostLine, UpdateFormula, PERCENT_SUM_TOLERANCE,
};
pub use postgres::PgFormulaRepository;
pub use repository::FormulaRepository;
pub use service::FormulaService;
