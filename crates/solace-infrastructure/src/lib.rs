pub mod dir_store;
pub mod memory_store;
pub mod paths;
pub mod vision;

pub use crate::dir_store::DirSessionStore;
pub use crate::memory_store::MemorySessionStore;
pub use crate::paths::SolacePaths;
pub use crate::vision::{FullFrameLocalizer, StaticEmotionEstimator};
