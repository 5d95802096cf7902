use egui::{Color32, CursorIcon, Id, Pos2, Rect, Response, Stroke, Ui, Vec2};

use crate::element::ComponentId;

pub const HANDLE_SIZE: f32 = 8.0;
pub const HANDLE_BORDER: Color32 = Color32::from_rgb(0x00, 0xBC, 0xD4);

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNwSe,
            Corner::TopRight => CursorIcon::ResizeNeSw,
            Corner::BottomLeft => CursorIcon::ResizeNeSw,
            Corner::BottomRight => CursorIcon::ResizeNwSe,
        }
    }

    /// Position of this corner on `rect`
    pub fn of(&self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }
}

/// A corner anchor for resizing a placed component
pub struct ResizeHandle {
    component_id: ComponentId,
    corner: Corner,
    position: Pos2,
}

impl ResizeHandle {
    pub fn new(component_id: ComponentId, corner: Corner, position: Pos2) -> Self {
        Self {
            component_id,
            corner,
            position,
        }
    }

    /// Show the resize handle and return the response
    pub fn show(&self, ui: &mut Ui) -> Response {
        let id = Id::new(("resize_handle", self.component_id, self.corner.as_str()));

        let rect = Rect::from_center_size(self.position, Vec2::splat(HANDLE_SIZE));

        ui.painter().rect_filled(rect, 4.0, Color32::WHITE);
        ui.painter().rect_stroke(rect, 4.0, Stroke::new(1.0, HANDLE_BORDER));

        ui.interact(rect, id, egui::Sense::drag())
            .on_hover_cursor(self.corner.cursor_icon())
    }

    pub fn corner(&self) -> Corner {
        self.corner
    }
}
