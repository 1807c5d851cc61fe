pub mod generation;
pub mod manager;
pub mod traits;

pub use generation::GenerationConfig;
pub use manager::{ConfigManager, EngineConfig};
pub use traits::ConfigSection;
