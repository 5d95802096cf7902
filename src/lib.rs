#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod command;
pub mod config;
pub mod dnd;
pub mod document;
pub mod element;
pub mod event;
pub mod export;
pub mod layer;
pub mod node;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod texture_manager;
pub mod util;
pub mod viewport;
pub mod widgets;

pub use app::WellSchematicApp;
pub use command::Command;
pub use document::Schematic;
pub use element::{ComponentId, ComponentKind, PlacedComponent};
pub use layer::{LayerKey, LayerVisibility};
pub use renderer::Renderer;
pub use state::{Editor, LoadOutcome};
pub use viewport::Viewport;
