//! Settings and the key-value store they persist to

mod settings;
mod store;

pub use settings::{Settings, USES_BEFORE_RATE_PROMPT};
pub use store::{ConfigStore, JsonFileConfigStore, MemoryConfigStore};
