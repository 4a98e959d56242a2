mod cache;
mod error;
mod loader;
mod types;

pub use cache::{CacheDecision, SceneCache, SceneLookup};
pub use error::LoadError;
pub use loader::{DirectorySceneLoader, SceneLoader};
pub use types::Scene;
