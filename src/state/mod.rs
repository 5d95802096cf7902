mod editor;
pub mod persistence;

pub use editor::Editor;
pub use persistence::{
    LoadOutcome,
    MemoryStorage,
    PersistenceError,
    PersistenceResult,
    SceneSnapshot,
    SlotStorage,
};
