//! interaction - Pointer and resize input

use crate::presets::{ClickMode, Interactivity};
use crate::render::{Point, Surface};
use crate::ParticleField;

/// Last known pointer position, local to the surface.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Cursor {
    pub position: Point,
    pub active: bool,
}

/// Listener categories registered with the host while mounted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    PointerMove,
    PointerLeave,
    Click,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Resize,
        EventKind::PointerMove,
        EventKind::PointerLeave,
        EventKind::Click,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    /// The host container changed size.
    Resize,
    /// Pointer moved, in the host's coordinate space.
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    Click,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Resize => EventKind::Resize,
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::PointerLeave => EventKind::PointerLeave,
            Event::Click => EventKind::Click,
        }
    }
}

pub fn pointer_move<S: Surface + ?Sized>(cursor: &mut Cursor, surface: &S, x: f32, y: f32) {
    let origin = surface.origin();
    cursor.position = Point::new(x - origin.x, y - origin.y);
    cursor.active = true;
}

pub fn pointer_leave(cursor: &mut Cursor) {
    cursor.active = false;
}

/// Spawns the push batch. Returns how many particles were added.
pub fn click(field: &mut ParticleField, interactivity: &Interactivity) -> usize {
    match interactivity.click {
        ClickMode::Push { count } => {
            for _ in 0..count {
                field.spawn_one();
            }
            count
        }
        ClickMode::None => 0,
    }
}

/// Matches the surface to the container. Particles keep their positions.
pub fn resize<S: Surface + ?Sized>(
    surface: &mut S,
    field: &mut ParticleField,
    container: (u32, u32),
) {
    let (width, height) = container;
    surface.set_size(width, height);
    field.set_bounds(width as f32, height as f32);
}
