//! main.rs - Desktop simulator host for the particle background
//! Owns the window, the frame clock and input; the library owns the simulation

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use particle_field::{
    Color, Event, EventKind, FrameHandle, Host, ListenerHandle, ParticleBackground, Preset,
    PresetKey, Surface, ThemeMode,
};

#[derive(Parser)]
#[command(name = "particle-field")]
#[command(about = "Animated particle background in a desktop simulator window", long_about = None)]
#[command(version)]
struct Args {
    /// Built-in preset to start with (light or dark)
    #[arg(long, default_value = "light")]
    preset: PresetKey,

    /// TOML preset to start with instead of a built-in one
    #[arg(long)]
    preset_file: Option<PathBuf>,

    /// Container width in pixels
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Container height in pixels
    #[arg(long, default_value_t = 200)]
    height: u32,

    /// Window pixel scale
    #[arg(long, default_value_t = 3)]
    scale: u32,

    /// Seed for particle placement
    #[arg(long, default_value_t = 0x1234_5678)]
    seed: u32,

    /// Frames per second; particle speed is per frame
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn parse_preset(text: &str) -> Result<Preset> {
    let preset: Preset = toml::from_str(text)?;
    preset.validate()?;
    Ok(preset)
}

fn load_preset(path: &Path) -> Result<Preset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading preset file {}", path.display()))?;
    parse_preset(&text).with_context(|| format!("parsing preset file {}", path.display()))
}

/// Page background behind the surface for each theme.
fn page_color(mode: ThemeMode) -> Rgb888 {
    match mode {
        ThemeMode::Light => Rgb888::new(0xf9, 0xfa, 0xfb),
        ThemeMode::Dark => Rgb888::new(0x03, 0x07, 0x12),
    }
}

/// The display has no alpha channel, so translucent shapes are mixed into the
/// page colour instead of into what is already drawn.
fn blend(under: Rgb888, over: Color, alpha: f32) -> Rgb888 {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * alpha).round() as u8;
    Rgb888::new(mix(under.r(), over.r), mix(under.g(), over.g), mix(under.b(), over.b))
}

fn to_pixel(point: particle_field::Point) -> Point {
    Point::new(point.x.round() as i32, point.y.round() as i32)
}

struct DisplaySurface {
    display: SimulatorDisplay<Rgb888>,
    background: Rgb888,
}

impl Surface for DisplaySurface {
    fn size(&self) -> (u32, u32) {
        let size = self.display.size();
        (size.width, size.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if Surface::size(self) != (width, height) {
            self.display = SimulatorDisplay::new(Size::new(width, height));
        }
    }

    fn origin(&self) -> particle_field::Point {
        particle_field::Point::new(0.0, 0.0)
    }

    fn clear(&mut self) {
        let _ = self.display.clear(self.background);
    }

    fn fill_circle(&mut self, center: particle_field::Point, radius: f32, color: Color, alpha: f32) {
        let diameter = (radius * 2.0).round().max(1.0) as u32;
        let _ = Circle::with_center(to_pixel(center), diameter)
            .into_styled(PrimitiveStyle::with_fill(blend(self.background, color, alpha)))
            .draw(&mut self.display);
    }

    fn stroke_line(
        &mut self,
        from: particle_field::Point,
        to: particle_field::Point,
        color: Color,
        alpha: f32,
        width: f32,
    ) {
        let stroke = width.round().max(1.0) as u32;
        let _ = Line::new(to_pixel(from), to_pixel(to))
            .into_styled(PrimitiveStyle::with_stroke(blend(self.background, color, alpha), stroke))
            .draw(&mut self.display);
    }
}

/// Fixed-size container with a single pending frame slot.
struct SimulatorHost {
    size: (u32, u32),
    background: Rgb888,
    next_id: u32,
    pending: Option<FrameHandle>,
    listeners: Vec<(ListenerHandle, EventKind)>,
}

impl SimulatorHost {
    fn new(width: u32, height: u32, background: Rgb888) -> Self {
        Self {
            size: (width, height),
            background,
            next_id: 0,
            pending: None,
            listeners: Vec::new(),
        }
    }

    fn id(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }
}

impl Host for SimulatorHost {
    type Surface = DisplaySurface;

    fn container_size(&self) -> (u32, u32) {
        self.size
    }

    // The surface is owned by the background; dropping it empties the window
    fn clear_container(&mut self) {}

    fn create_surface(&mut self, width: u32, height: u32) -> Option<DisplaySurface> {
        Some(DisplaySurface {
            display: SimulatorDisplay::new(Size::new(width, height)),
            background: self.background,
        })
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.id());
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn add_listener(&mut self, kind: EventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.id());
        self.listeners.push((handle, kind));
        handle
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        self.listeners.retain(|(h, _)| *h != handle);
    }
}

fn switch_preset(background: &mut ParticleBackground<SimulatorHost>, preset: Preset) {
    background.host_mut().background = page_color(preset.mode);
    background.set_preset(preset);
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut key = args.preset;
    let preset = match &args.preset_file {
        Some(path) => load_preset(path)?,
        None => key.preset(),
    };

    let host = SimulatorHost::new(args.width, args.height, page_color(preset.mode));
    let mut background = ParticleBackground::new(host, args.seed);
    background.mount(preset);

    let output_settings = OutputSettingsBuilder::new().scale(args.scale).build();
    let mut window = Window::new("Particle Field", &output_settings);

    let frame_duration = Duration::from_secs_f32(1.0 / args.fps.max(1) as f32);

    println!("=== Particle Field ===");
    match &args.preset_file {
        Some(path) => println!("Preset: {}", path.display()),
        None => println!("Preset: {}", key.name()),
    }
    println!("Controls:");
    println!("  Mouse: Grab links / click to push particles");
    println!("  L: Pointer leave");
    println!("  T or Space: Toggle light/dark");
    println!("  Q: Quit");

    'main_loop: loop {
        let now = Instant::now();

        if let Some(handle) = background.host_mut().pending.take() {
            background.on_frame(handle);
        }

        let Some(surface) = background.surface() else {
            bail!("no drawing surface mounted");
        };
        window.update(&surface.display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'main_loop,
                SimulatorEvent::MouseMove { point } => {
                    background.dispatch(Event::PointerMove {
                        x: point.x as f32,
                        y: point.y as f32,
                    });
                }
                SimulatorEvent::MouseButtonUp { .. } => {
                    background.dispatch(Event::Click);
                    println!("Particles: {}", background.particle_count());
                }
                SimulatorEvent::KeyDown { keycode, .. } => {
                    let key_name = format!("{:?}", keycode).to_lowercase();
                    match key_name.as_str() {
                        "l" => background.dispatch(Event::PointerLeave),
                        "t" | "space" => {
                            key = key.toggled();
                            switch_preset(&mut background, key.preset());
                            println!("Preset: {}", key.name());
                        }
                        "q" => break 'main_loop,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Frame pacing stands in for the display's refresh callback
        let elapsed = now.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    background.unmount();
    Ok(())
}
