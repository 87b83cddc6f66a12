//! Custom Axum extractors shared by the domain routers.

mod uuid_path;
mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
