mod central_panel;
mod layers_panel;
mod palette_panel;
mod toolbar;

pub use central_panel::central_panel;
pub use layers_panel::layers_panel;
pub use palette_panel::palette_panel;
pub use toolbar::toolbar;
