//! Pan/zoom transform between canvas-local screen points and scene space.
//!
//! A scene point `s` is drawn at `s * scale + offset`. Zooming keeps the scene
//! point under the pointer fixed.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Scale limits applied by [`Viewport::zoom_at`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub factor: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            factor: 1.05,
            min_scale: 0.1,
            max_scale: 10.0,
        }
    }
}

impl From<&crate::config::EditorConfig> for ZoomLimits {
    fn from(config: &crate::config::EditorConfig) -> Self {
        Self {
            factor: config.zoom_factor,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Always positive
    pub scale: f32,
    /// Screen position of the scene origin
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(scale: f32, offset: Vec2) -> Self {
        Self { scale, offset }
    }

    /// A positive, finite scale and a finite offset
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.offset.x.is_finite() && self.offset.y.is_finite()
    }

    /// Canvas-local point to scene point
    pub fn to_scene(&self, pointer: Pos2) -> Pos2 {
        ((pointer.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    /// Scene point to canvas-local point
    pub fn to_screen(&self, scene: Pos2) -> Pos2 {
        (scene.to_vec2() * self.scale + self.offset).to_pos2()
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    /// Zooms in for a positive direction, out otherwise, anchored at `pointer`.
    /// Returns the new viewport; `self` is untouched.
    pub fn zoom_at(&self, pointer: Pos2, direction: f32, limits: &ZoomLimits) -> Viewport {
        let anchor = self.to_scene(pointer);

        let scale = if direction > 0.0 {
            self.scale * limits.factor
        } else {
            self.scale / limits.factor
        };
        let scale = scale.clamp(limits.min_scale, limits.max_scale);

        Viewport {
            scale,
            offset: pointer.to_vec2() - anchor.to_vec2() * scale,
        }
    }

    /// Translates the whole scene by a screen-space delta
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_to_scene_inverts_to_screen() {
        let view = Viewport::new(2.5, Vec2::new(-40.0, 13.0));
        let scene = Pos2::new(120.0, -7.5);
        assert!(approx(view.to_scene(view.to_screen(scene)), scene));
    }

    #[test]
    fn test_identity_view() {
        let view = Viewport::default();
        assert_eq!(view.to_scene(Pos2::new(5.0, 6.0)), Pos2::new(5.0, 6.0));
    }

    #[test]
    fn test_zoom_keeps_point_under_pointer() {
        let view = Viewport::new(1.3, Vec2::new(25.0, -10.0));
        let pointer = Pos2::new(310.0, 215.0);
        let before = view.to_scene(pointer);

        let zoomed = view.zoom_at(pointer, 1.0, &ZoomLimits::default());
        assert!((zoomed.scale - 1.3 * 1.05).abs() < EPS);
        assert!(approx(zoomed.to_scene(pointer), before));
    }

    #[test]
    fn test_zoom_in_then_out_restores_scale() {
        let limits = ZoomLimits::default();
        let view = Viewport::new(0.8, Vec2::new(3.0, 4.0));
        let pointer = Pos2::new(400.0, 100.0);
        let before = view.to_scene(pointer);

        for dir in [1.0, -1.0] {
            let round_trip = view.zoom_at(pointer, dir, &limits).zoom_at(pointer, -dir, &limits);
            assert!((round_trip.scale - view.scale).abs() < EPS);
            assert!(approx(round_trip.to_scene(pointer), before));
        }
    }

    #[test]
    fn test_zoom_is_clamped() {
        let limits = ZoomLimits::default();
        let view = Viewport::new(limits.max_scale, Vec2::ZERO);
        let pointer = Pos2::new(50.0, 50.0);

        let zoomed = view.zoom_at(pointer, 1.0, &limits);
        assert_eq!(zoomed.scale, limits.max_scale);
        assert!(approx(zoomed.to_scene(pointer), view.to_scene(pointer)));
    }

    #[test]
    fn test_pan_moves_offset() {
        let mut view = Viewport::default();
        view.pan(Vec2::new(10.0, -5.0));
        assert_eq!(view.to_screen(Pos2::ZERO), Pos2::new(10.0, -5.0));
    }
}
