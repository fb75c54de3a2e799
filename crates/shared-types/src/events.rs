//! Pointer event types decoupled from the DOM event objects
//!
//! DOM events are not safe to hold past the dispatching turn, so hosts copy
//! the fields the engine needs into a [`PointerSample`] at arrival time.

use crate::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Move,
    Leave,
    TouchStart,
}

impl PointerEventKind {
    pub const ALL: [PointerEventKind; 4] = [
        PointerEventKind::Enter,
        PointerEventKind::Move,
        PointerEventKind::Leave,
        PointerEventKind::TouchStart,
    ];

    /// DOM event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            PointerEventKind::Enter => "pointerenter",
            PointerEventKind::Move => "pointermove",
            PointerEventKind::Leave => "pointerleave",
            PointerEventKind::TouchStart => "touchstart",
        }
    }
}

/// Pointer position in viewport (client) coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub client_x: f64,
    pub client_y: f64,
    /// `None` for touch events, which carry no pointer id
    pub pointer_id: Option<i32>,
}

impl PointerSample {
    pub fn new(client_x: f64, client_y: f64, pointer_id: Option<i32>) -> Self {
        Self {
            client_x,
            client_y,
            pointer_id,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}
