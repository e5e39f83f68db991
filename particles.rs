//! particle_field - Animated particle background, host-agnostic core
//! no_std + alloc: the host supplies the surface, frames and input events

#![no_std]

extern crate alloc;

pub mod interaction;
pub mod lifecycle;
pub mod presets;
pub mod render;

use alloc::vec::Vec;

pub use interaction::{Cursor, Event, EventKind};
pub use lifecycle::{FrameHandle, Host, ListenerHandle, ParticleBackground};
pub use presets::{
    resolve, ClickMode, Color, HoverMode, Interactivity, LinkStyle, ParticleStyle, Preset,
    PresetError, PresetKey, ThemeMode,
};
pub use render::{draw_frame, Point, Surface};

// Used whenever a zero seed would lock xorshift at zero
const FALLBACK_SEED: u32 = 0x1234_5678;

/// xorshift32, deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }

    /// Uniform in `[0, 1]`.
    pub fn random(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state as f32) / (u32::MAX as f32)
    }

    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random() * (max - min)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub alpha: f32,
}

/// Live particle set of one mount. Only ever grows.
pub struct ParticleField {
    particles: Vec<Particle>,
    style: ParticleStyle,
    width: f32,
    height: f32,
    rng: Rng,
}

impl ParticleField {
    pub fn new(style: ParticleStyle, width: f32, height: f32, seed: u32) -> Self {
        Self {
            particles: Vec::with_capacity(style.count),
            style,
            width,
            height,
            rng: Rng::new(seed),
        }
    }

    fn create_particle(&mut self) -> Particle {
        let angle = self.rng.random() * 2.0 * core::f32::consts::PI;
        let speed = self.rng.random_range(self.style.base_speed, 2.0 * self.style.base_speed);
        let x = self.rng.random() * self.width;
        let y = self.rng.random() * self.height;

        // Random radii get a one pixel floor but never exceed the base size
        let radius = if self.style.random_size {
            (self.style.size * self.rng.random()).max(1.0).min(self.style.size)
        } else {
            self.style.size
        };
        let alpha = if self.style.random_opacity {
            self.style.opacity * self.rng.random()
        } else {
            self.style.opacity
        };

        Particle {
            x,
            y,
            vx: libm::cosf(angle) * speed,
            vy: libm::sinf(angle) * speed,
            radius,
            alpha,
        }
    }

    pub fn seed(&mut self, n: usize) {
        for _ in 0..n {
            self.spawn_one();
        }
    }

    pub fn spawn_one(&mut self) {
        let particle = self.create_particle();
        self.particles.push(particle);
    }

    /// Moves every particle one tick and wraps it toroidally at the edges.
    pub fn advance_all(&mut self, width: f32, height: f32) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            if p.x < -p.radius {
                p.x = width + p.radius;
            } else if p.x > width + p.radius {
                p.x = -p.radius;
            }
            if p.y < -p.radius {
                p.y = height + p.radius;
            } else if p.y > height + p.radius {
                p.y = -p.radius;
            }
        }
    }

    /// Bounds used by later spawns. Existing particles stay where they are.
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_style(count: usize) -> ParticleStyle {
        ParticleStyle {
            count,
            size: 1.0,
            random_size: false,
            base_speed: 0.0,
            color: Color::from_hex(0xffffff),
            opacity: 1.0,
            random_opacity: false,
        }
    }

    fn single(particle: Particle) -> ParticleField {
        let mut field = ParticleField::new(still_style(0), 100.0, 100.0, 7);
        field.particles.push(particle);
        field
    }

    #[test]
    fn rng_stays_in_unit_range() {
        let mut rng = Rng::new(0);
        for _ in 0..10_000 {
            let v = rng.random();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn rng_is_deterministic() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn spawned_particles_respect_style() {
        let style = ParticleStyle {
            count: 200,
            size: 2.5,
            random_size: true,
            base_speed: 0.6,
            color: Color::from_hex(0x374151),
            opacity: 0.8,
            random_opacity: true,
        };
        let mut field = ParticleField::new(style, 320.0, 170.0, 99);
        field.seed(style.count);

        assert_eq!(field.len(), 200);
        for p in field.particles() {
            assert!((0.0..=320.0).contains(&p.x));
            assert!((0.0..=170.0).contains(&p.y));
            assert!(p.radius > 0.0 && p.radius <= 2.5);
            assert!((0.0..=0.8).contains(&p.alpha));
            let speed = libm::sqrtf(p.vx * p.vx + p.vy * p.vy);
            assert!(speed >= 0.6 - 1e-4 && speed <= 1.2 + 1e-4, "speed {speed}");
        }
    }

    #[test]
    fn fixed_size_and_opacity() {
        let mut field = ParticleField::new(still_style(5), 100.0, 100.0, 3);
        field.seed(5);
        for p in field.particles() {
            assert_eq!(p.radius, 1.0);
            assert_eq!(p.alpha, 1.0);
        }
    }

    #[test]
    fn population_only_grows() {
        let mut field = ParticleField::new(still_style(10), 100.0, 100.0, 1);
        field.seed(10);
        for k in 1..=7 {
            field.spawn_one();
            assert_eq!(field.len(), 10 + k);
            field.advance_all(100.0, 100.0);
            assert_eq!(field.len(), 10 + k);
        }
    }

    #[test]
    fn zero_particles_is_fine() {
        let mut field = ParticleField::new(still_style(0), 0.0, 0.0, 1);
        field.seed(0);
        field.advance_all(0.0, 0.0);
        assert!(field.is_empty());
    }

    #[test]
    fn wraps_right_to_left() {
        let mut field = single(Particle { x: 102.5, y: 50.0, vx: 1.0, vy: 0.0, radius: 2.0, alpha: 1.0 });
        field.advance_all(100.0, 100.0);
        assert_eq!(field.particles()[0].x, -2.0);
        assert_eq!(field.particles()[0].y, 50.0);
        assert_eq!(field.particles()[0].vx, 1.0);
    }

    #[test]
    fn wraps_left_to_right() {
        let mut field = single(Particle { x: -2.5, y: 50.0, vx: -1.0, vy: 0.0, radius: 2.0, alpha: 1.0 });
        field.advance_all(100.0, 100.0);
        assert_eq!(field.particles()[0].x, 102.0);
        assert_eq!(field.particles()[0].vx, -1.0);
    }

    #[test]
    fn wraps_bottom_to_top() {
        let mut field = single(Particle { x: 50.0, y: 102.5, vx: 0.0, vy: 1.0, radius: 2.0, alpha: 1.0 });
        field.advance_all(100.0, 100.0);
        assert_eq!(field.particles()[0].y, -2.0);
    }

    #[test]
    fn wraps_top_to_bottom() {
        let mut field = single(Particle { x: 50.0, y: -2.5, vx: 0.0, vy: -1.0, radius: 2.0, alpha: 1.0 });
        field.advance_all(100.0, 100.0);
        assert_eq!(field.particles()[0].y, 102.0);
    }

    #[test]
    fn stays_within_one_radius_of_surface() {
        let style = ParticleStyle {
            base_speed: 3.0,
            random_size: true,
            size: 4.0,
            ..still_style(50)
        };
        let mut field = ParticleField::new(style, 64.0, 48.0, 11);
        field.seed(50);
        for _ in 0..2_000 {
            field.advance_all(64.0, 48.0);
            for p in field.particles() {
                assert!(p.x >= -p.radius && p.x <= 64.0 + p.radius);
                assert!(p.y >= -p.radius && p.y <= 48.0 + p.radius);
            }
        }
    }

    #[test]
    fn spawns_use_updated_bounds() {
        let mut field = ParticleField::new(still_style(0), 10.0, 10.0, 5);
        field.set_bounds(1000.0, 2000.0);
        field.seed(100);
        assert_eq!(field.bounds(), (1000.0, 2000.0));
        assert!(field.particles().iter().any(|p| p.x > 10.0 || p.y > 10.0));
    }
}
