//! Formulation Domain
//!
//! Rule-based formula composition: given a product type, target skin
//! concerns, and the user's ingredient-access tier, select ingredients,
//! assign percentages, and derive an ordered manufacturing-step sequence.
//!
//! The rule table ([`FormulationRules`]) is an immutable configuration
//! value constructed once at startup and injected into the composer, so
//! alternate rule sets drop straight into tests. The composer itself is a
//! linear pipeline with no back-edges:
//!
//! ```text
//! select_base -> select_actives -> adjust_percentages -> generate_steps
//! ```
//!
//! Composition is pure aside from one ingredient-repository read; the
//! produced [`ComposedFormula`] is handed back to the caller, which may
//! persist it through the formulas API.

pub mod composer;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rules;
pub mod steps;

// Re-export commonly used types
pub use composer::FormulaComposer;
pub use error::{FormulationError, FormulationResult};
pub use models::{ComposeRequest, ComposedFormula, ComposedIngredient, ComposedStep};
pub use rules::{FormulationRules, FunctionRecommendation, PhaseRequirement, Priority};
