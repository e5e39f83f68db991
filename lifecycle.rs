//! lifecycle - Mount/unmount state machine and the per-frame step
//!
//! [`ParticleBackground`] owns every piece of mutable simulation state behind a
//! single handle. The host only mounts, unmounts, swaps presets, forwards
//! events and fires the frames it was asked for.

use crate::interaction::{self, Cursor, Event, EventKind};
use crate::presets::Preset;
use crate::render::{draw_frame, Surface};
use crate::{Particle, ParticleField};

/// Token for one scheduled animation frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Token for one registered event listener.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u32);

/// Embedding environment: container, surface factory, frame scheduler and
/// listener registry.
pub trait Host {
    type Surface: Surface;

    fn container_size(&self) -> (u32, u32);

    /// Removes every child of the container.
    fn clear_container(&mut self);

    /// Appends a surface of the given size to the container. `None` when the
    /// host cannot provide a 2D drawing context.
    fn create_surface(&mut self, width: u32, height: u32) -> Option<Self::Surface>;

    /// Asks for [`ParticleBackground::on_frame`] to be called once, on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn add_listener(&mut self, kind: EventKind) -> ListenerHandle;

    fn remove_listener(&mut self, handle: ListenerHandle);
}

impl<H: Host + ?Sized> Host for &mut H {
    type Surface = H::Surface;

    fn container_size(&self) -> (u32, u32) {
        (**self).container_size()
    }

    fn clear_container(&mut self) {
        (**self).clear_container()
    }

    fn create_surface(&mut self, width: u32, height: u32) -> Option<Self::Surface> {
        (**self).create_surface(width, height)
    }

    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn add_listener(&mut self, kind: EventKind) -> ListenerHandle {
        (**self).add_listener(kind)
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        (**self).remove_listener(handle)
    }
}

const LISTENERS: usize = EventKind::ALL.len();

struct Mount<S> {
    preset: Preset,
    surface: S,
    field: ParticleField,
    cursor: Cursor,
    frame: Option<FrameHandle>,
    listeners: [(EventKind, ListenerHandle); LISTENERS],
}

impl<S: Surface> Mount<S> {
    /// Clear, advance, paint, reschedule. Frame-rate coupled: no delta time.
    fn step<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.surface.clear();
        let (width, height) = self.surface.size();
        self.field.advance_all(width as f32, height as f32);
        draw_frame(&mut self.surface, self.field.particles(), &self.cursor, &self.preset);
        self.frame = Some(host.request_frame());
    }

    fn listens(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }
}

enum State<S> {
    Unmounted,
    Mounted(Mount<S>),
}

/// Animated particle background mounted into a host container.
///
/// Dropping it tears the mount down.
pub struct ParticleBackground<H: Host> {
    host: H,
    state: State<H::Surface>,
    seed: u32,
    mounts: u32,
}

impl<H: Host> ParticleBackground<H> {
    /// Creates an unmounted background. `seed` drives particle placement.
    pub fn new(host: H, seed: u32) -> Self {
        Self {
            host,
            state: State::Unmounted,
            seed,
            mounts: 0,
        }
    }

    /// Builds a fresh surface and particle set for `preset` and starts the loop.
    /// Any previous mount is torn down first. Without a drawing context the
    /// background stays unmounted.
    pub fn mount(&mut self, preset: Preset) {
        self.unmount();
        self.host.clear_container();

        let (width, height) = self.host.container_size();
        let Some(surface) = self.host.create_surface(width, height) else {
            return;
        };

        self.mounts = self.mounts.wrapping_add(1);
        let seed = self.seed ^ self.mounts.wrapping_mul(0x9E37_79B9);
        let mut field = ParticleField::new(preset.particles, width as f32, height as f32, seed);
        field.seed(preset.particles.count);

        let listeners = EventKind::ALL.map(|kind| (kind, self.host.add_listener(kind)));

        let mut mount = Mount {
            preset,
            surface,
            field,
            cursor: Cursor::default(),
            frame: None,
            listeners,
        };
        mount.step(&mut self.host);
        self.state = State::Mounted(mount);
    }

    /// Cancels the pending frame, removes listeners and empties the container.
    pub fn unmount(&mut self) {
        let State::Mounted(mount) = core::mem::replace(&mut self.state, State::Unmounted) else {
            return;
        };
        if let Some(frame) = mount.frame {
            self.host.cancel_frame(frame);
        }
        for (_, handle) in mount.listeners {
            self.host.remove_listener(handle);
        }
        self.host.clear_container();
    }

    /// Remounts with `preset` unless it is already the mounted one.
    pub fn set_preset(&mut self, preset: Preset) {
        if self.preset() == Some(&preset) {
            return;
        }
        self.mount(preset);
    }

    /// Runs one simulation step if `handle` is the frame currently scheduled.
    /// Returns whether the step ran.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        let State::Mounted(mount) = &mut self.state else {
            return false;
        };
        if mount.frame != Some(handle) {
            return false;
        }
        mount.frame = None;
        mount.step(&mut self.host);
        true
    }

    /// Forwards a host event. Ignored unless a listener for it is registered.
    pub fn dispatch(&mut self, event: Event) {
        let State::Mounted(mount) = &mut self.state else {
            return;
        };
        if !mount.listens(event.kind()) {
            return;
        }
        match event {
            Event::Resize => {
                let container = self.host.container_size();
                interaction::resize(&mut mount.surface, &mut mount.field, container);
            }
            Event::PointerMove { x, y } => {
                interaction::pointer_move(&mut mount.cursor, &mount.surface, x, y);
            }
            Event::PointerLeave => interaction::pointer_leave(&mut mount.cursor),
            Event::Click => {
                interaction::click(&mut mount.field, &mount.preset.interactivity);
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, State::Mounted(_))
    }

    pub fn preset(&self) -> Option<&Preset> {
        self.mount_ref().map(|m| &m.preset)
    }

    pub fn surface(&self) -> Option<&H::Surface> {
        self.mount_ref().map(|m| &m.surface)
    }

    pub fn particles(&self) -> &[Particle] {
        self.mount_ref().map_or(&[], |m| m.field.particles())
    }

    pub fn particle_count(&self) -> usize {
        self.particles().len()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.mount_ref().map(|m| m.cursor)
    }

    pub fn scheduled_frame(&self) -> Option<FrameHandle> {
        self.mount_ref().and_then(|m| m.frame)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn mount_ref(&self) -> Option<&Mount<H::Surface>> {
        match &self.state {
            State::Mounted(mount) => Some(mount),
            State::Unmounted => None,
        }
    }
}

impl<H: Host> Drop for ParticleBackground<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
