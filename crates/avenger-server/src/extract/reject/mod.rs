//! Request extractors that reject with the API's error envelope.

pub mod enhanced_json;
pub mod enhanced_path;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
