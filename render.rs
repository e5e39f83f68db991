//! render - Paints one frame of the field onto a host surface

use crate::interaction::Cursor;
use crate::presets::{Color, HoverMode, Preset};
use crate::Particle;

/// Links fainter than this are not drawn at all.
pub const MIN_LINK_OPACITY: f32 = 0.01;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D drawing surface placed inside the host container.
pub trait Surface {
    /// Pixel dimensions.
    fn size(&self) -> (u32, u32);

    fn set_size(&mut self, width: u32, height: u32);

    /// Top-left corner in the host's pointer coordinate space.
    fn origin(&self) -> Point;

    fn clear(&mut self);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color, alpha: f32);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, alpha: f32, width: f32);
}

/// Opacity of a link of length `distance`, fading linearly to zero at `max_distance`.
pub fn link_opacity(distance: f32, max_distance: f32, base_opacity: f32) -> f32 {
    base_opacity * (1.0 - distance / max_distance)
}

/// Like [`link_opacity`] but never negative.
pub fn hover_opacity(distance: f32, max_distance: f32, opacity_cap: f32) -> f32 {
    opacity_cap * (1.0 - distance / max_distance).max(0.0)
}

/// Draws discs, particle links and cursor links. Does not clear the surface.
///
/// PERF: the link pass compares every pair, fine for the few hundred
/// particles a background holds.
pub fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    particles: &[Particle],
    cursor: &Cursor,
    preset: &Preset,
) {
    let style = &preset.particles;
    let links = &preset.links;

    for p in particles {
        surface.fill_circle(Point::new(p.x, p.y), p.radius, style.color, p.alpha);
    }

    if links.enabled {
        let max_sq = links.distance * links.distance;
        for (i, p) in particles.iter().enumerate() {
            for q in &particles[i + 1..] {
                let dx = p.x - q.x;
                let dy = p.y - q.y;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq >= max_sq {
                    continue;
                }
                let opacity = link_opacity(libm::sqrtf(dist_sq), links.distance, links.opacity);
                if opacity > MIN_LINK_OPACITY {
                    surface.stroke_line(
                        Point::new(p.x, p.y),
                        Point::new(q.x, q.y),
                        links.color,
                        opacity,
                        links.width,
                    );
                }
            }
        }
    }

    if let HoverMode::Grab { distance, opacity } = preset.interactivity.hover {
        if !cursor.active {
            return;
        }
        for p in particles {
            let dx = p.x - cursor.position.x;
            let dy = p.y - cursor.position.y;
            let dist = libm::sqrtf(dx * dx + dy * dy);
            if dist < distance {
                surface.stroke_line(
                    Point::new(p.x, p.y),
                    cursor.position,
                    links.color,
                    hover_opacity(dist, distance, opacity),
                    links.width,
                );
            }
        }
    }
}
