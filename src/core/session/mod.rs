// Stateful session and result export

pub mod export;
pub mod manager;

pub use export::{render_export, ExportArtifact, ExportFormat};
pub use manager::{ModelInfo, Session, HISTORY_LIMIT, SUPPORTED_ENTITY_TYPES};
