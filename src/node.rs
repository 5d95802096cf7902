//! Interaction state of a single scene node.
//!
//! ```text
//!   Idle ──click──► Selected ──double click──► Editing(draft)
//!    ▲                 │  ▲                          │
//!    └──other select───┘  └────────commit/blur───────┘
//! ```
//!
//! Dragging and resizing are gestures orthogonal to that state. Every change
//! to the scene leaves a node as a [`Command`]; the node only keeps its
//! transient gesture data and the label draft.

use egui::{Pos2, Rect, Vec2};
use log::debug;

use crate::command::Command;
use crate::element::{ComponentId, PlacedComponent, MIN_ELEMENT_SIZE};
use crate::widgets::Corner;

/// Visible state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Idle,
    Selected,
    Editing,
}

/// A pointer gesture in progress on a node
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    None,
    Dragging {
        /// Pointer position relative to the component's top-left corner
        grab_offset: Vec2,
    },
    Resizing {
        corner: Corner,
        original_rect: Rect,
        start_pos: Pos2,
    },
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    id: ComponentId,
    draft: Option<String>,
    gesture: Gesture,
}

impl SceneNode {
    pub fn new(id: ComponentId) -> Self {
        Self {
            id,
            draft: None,
            gesture: Gesture::None,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn state(&self, is_selected: bool) -> NodeState {
        match (&self.draft, is_selected) {
            (Some(_), _) => NodeState::Editing,
            (None, true) => NodeState::Selected,
            (None, false) => NodeState::Idle,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Single click or tap
    pub fn on_click(&self) -> Command {
        Command::Select(self.id)
    }

    /// Double click or tap: starts editing the label in place
    pub fn on_double_click(&mut self, component: &PlacedComponent) -> Command {
        if self.draft.is_none() {
            debug!("Editing label of {}", self.id);
            self.draft = Some(component.label().to_owned());
        }
        Command::Select(self.id)
    }

    pub fn draft_mut(&mut self) -> Option<&mut String> {
        self.draft.as_mut()
    }

    /// Leaves edit mode, handing back the draft as the new label.
    /// Empty labels are allowed.
    pub fn commit_edit(&mut self) -> Option<Command> {
        self.draft.take().map(|label| Command::SetLabel { id: self.id, label })
    }

    pub fn begin_drag(&mut self, component: &PlacedComponent, pointer: Pos2) {
        self.gesture = Gesture::Dragging {
            grab_offset: pointer - component.position(),
        };
    }

    /// Scene pointer moved while the gesture is held
    pub fn drag_to(&self, pointer: Pos2) -> Option<Command> {
        match self.gesture {
            Gesture::Dragging { grab_offset } => Some(Command::MoveComponent {
                id: self.id,
                position: pointer - grab_offset,
            }),
            _ => None,
        }
    }

    pub fn begin_resize(&mut self, component: &PlacedComponent, corner: Corner, pointer: Pos2) {
        self.gesture = Gesture::Resizing {
            corner,
            original_rect: component.rect(),
            start_pos: pointer,
        };
    }

    pub fn resize_to(&self, pointer: Pos2) -> Option<Command> {
        match &self.gesture {
            Gesture::Resizing {
                corner,
                original_rect,
                start_pos,
            } => Some(Command::ResizeComponent {
                id: self.id,
                rect: resized_rect(*original_rect, *corner, pointer - *start_pos),
            }),
            _ => None,
        }
    }

    /// Pointer released: emits the final position or size and ends the gesture
    pub fn end_gesture(&mut self, pointer: Pos2) -> Option<Command> {
        let command = match self.gesture {
            Gesture::Dragging { .. } => self.drag_to(pointer),
            Gesture::Resizing { .. } => self.resize_to(pointer),
            Gesture::None => None,
        };
        self.gesture = Gesture::None;
        command
    }
}

/// Moves `corner` of `original` by `delta`, keeping the opposite corner fixed.
/// Aspect ratio is free; the result is never smaller than the minimum size.
pub fn resized_rect(original: Rect, corner: Corner, delta: Vec2) -> Rect {
    let mut rect = original;
    let min = MIN_ELEMENT_SIZE;

    match corner {
        Corner::TopLeft => {
            rect.min.x = (original.min.x + delta.x).min(original.max.x - min);
            rect.min.y = (original.min.y + delta.y).min(original.max.y - min);
        }
        Corner::TopRight => {
            rect.max.x = (original.max.x + delta.x).max(original.min.x + min);
            rect.min.y = (original.min.y + delta.y).min(original.max.y - min);
        }
        Corner::BottomLeft => {
            rect.min.x = (original.min.x + delta.x).min(original.max.x - min);
            rect.max.y = (original.max.y + delta.y).max(original.min.y + min);
        }
        Corner::BottomRight => {
            rect.max.x = (original.max.x + delta.x).max(original.min.x + min);
            rect.max.y = (original.max.y + delta.y).max(original.min.y + min);
        }
    }

    rect
}
