use egui::{Rect, Vec2};

// Common constants for placed components
pub const MIN_ELEMENT_SIZE: f32 = 10.0;
pub const PLACEHOLDER_SIZE: Vec2 = Vec2::splat(100.0);
pub const DEFAULT_LABEL: &str = "Label";
pub const LABEL_GAP: f32 = 5.0;
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Validates that a rectangle has minimum dimensions
pub(crate) fn validate_rect(rect: &Rect) -> Result<(), String> {
    if !rect.is_finite() {
        return Err(format!("Element rectangle is not finite: {:?}", rect));
    }
    if rect.width() < MIN_ELEMENT_SIZE || rect.height() < MIN_ELEMENT_SIZE {
        Err(format!(
            "Element dimensions too small (min: {}). Width: {}, Height: {}",
            MIN_ELEMENT_SIZE,
            rect.width(),
            rect.height()
        ))
    } else {
        Ok(())
    }
}
