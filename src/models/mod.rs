// Models module

pub mod document;

// Re-export commonly used types
pub use document::JsonDocument;
