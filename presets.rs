//! presets - Typed preset table for the particle background
//! Pure lookup, no defaulting: every preset is self-contained

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresetError {
    #[error("unknown preset: {0}")]
    Unknown(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

fn check(field: &'static str, value: f32, ok: bool) -> Result<(), PresetError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(PresetError::OutOfRange { field, value })
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), PresetError> {
    check(field, value, (0.0..=1.0).contains(&value))
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), PresetError> {
    check(field, value, value >= 0.0)
}

/// 24-bit sRGB color, written `#rrggbb` in preset files.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }
}

impl FromStr for Color {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| PresetError::InvalidColor(s.into()))?;
        let hex = u32::from_str_radix(digits, 16).map_err(|_| PresetError::InvalidColor(s.into()))?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Color {
    type Error = PresetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        alloc::format!("{color}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemeMode {
    Light,
    Dark,
}

/// Particle generation parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleStyle {
    pub count: usize,
    /// Base radius in surface pixels.
    pub size: f32,
    pub random_size: bool,
    /// Lower bound of the per-frame speed; particles move at up to twice this.
    pub base_speed: f32,
    pub color: Color,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f32,
    pub random_opacity: bool,
}

/// Particle-to-particle link parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkStyle {
    pub enabled: bool,
    /// Maximum link length in surface pixels.
    pub distance: f32,
    pub color: Color,
    /// Opacity of a zero-length link; fades linearly to zero at `distance`.
    pub opacity: f32,
    pub width: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum HoverMode {
    None,
    /// Link particles within `distance` of the cursor to the cursor.
    Grab { distance: f32, opacity: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum ClickMode {
    None,
    /// Spawn `count` particles per click.
    Push { count: usize },
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interactivity {
    pub hover: HoverMode,
    pub click: ClickMode,
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Preset {
    pub mode: ThemeMode,
    pub particles: ParticleStyle,
    pub links: LinkStyle,
    pub interactivity: Interactivity,
}

impl Preset {
    /// Rejects values the simulation cannot honour: non-finite numbers, a
    /// non-positive size, opacities outside `[0, 1]`, negative distances,
    /// widths or speeds.
    pub fn validate(&self) -> Result<(), PresetError> {
        let particles = &self.particles;
        check("particles.size", particles.size, particles.size > 0.0)?;
        check_non_negative("particles.base_speed", particles.base_speed)?;
        check_unit("particles.opacity", particles.opacity)?;

        let links = &self.links;
        check_non_negative("links.distance", links.distance)?;
        check_unit("links.opacity", links.opacity)?;
        check_non_negative("links.width", links.width)?;

        if let HoverMode::Grab { distance, opacity } = self.interactivity.hover {
            check_non_negative("interactivity.hover.distance", distance)?;
            check_unit("interactivity.hover.opacity", opacity)?;
        }
        Ok(())
    }
}

pub const LIGHT: Preset = Preset {
    mode: ThemeMode::Light,
    particles: ParticleStyle {
        count: 60,
        size: 2.5,
        random_size: true,
        base_speed: 0.6,
        color: Color::from_hex(0x374151),
        opacity: 0.5,
        random_opacity: false,
    },
    links: LinkStyle {
        enabled: true,
        distance: 180.0,
        color: Color::from_hex(0x6b7280),
        opacity: 0.35,
        width: 1.2,
    },
    interactivity: Interactivity {
        hover: HoverMode::Grab { distance: 160.0, opacity: 0.6 },
        click: ClickMode::Push { count: 3 },
    },
};

pub const DARK: Preset = Preset {
    mode: ThemeMode::Dark,
    particles: ParticleStyle {
        count: 120,
        size: 2.0,
        random_size: true,
        base_speed: 0.4,
        color: Color::from_hex(0xe5e7eb),
        opacity: 0.8,
        random_opacity: true,
    },
    links: LinkStyle {
        enabled: true,
        distance: 150.0,
        color: Color::from_hex(0x9ca3af),
        opacity: 0.5,
        width: 1.0,
    },
    interactivity: Interactivity {
        hover: HoverMode::Grab { distance: 180.0, opacity: 1.0 },
        click: ClickMode::Push { count: 4 },
    },
};

/// Key into the built-in preset table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PresetKey {
    Light,
    Dark,
}

impl PresetKey {
    pub const ALL: [PresetKey; 2] = [PresetKey::Light, PresetKey::Dark];

    pub const fn preset(self) -> Preset {
        match self {
            PresetKey::Light => LIGHT,
            PresetKey::Dark => DARK,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PresetKey::Light => "light",
            PresetKey::Dark => "dark",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PresetKey::Light => "Light Mode",
            PresetKey::Dark => "Dark Mode",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            PresetKey::Light => PresetKey::Dark,
            PresetKey::Dark => PresetKey::Light,
        }
    }
}

impl FromStr for PresetKey {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| PresetError::Unknown(s.into()))
    }
}

impl fmt::Display for PresetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a preset by its string key.
pub fn resolve(key: &str) -> Result<Preset, PresetError> {
    key.parse::<PresetKey>().map(PresetKey::preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_keys() {
        assert_eq!(resolve("light"), Ok(LIGHT));
        assert_eq!(resolve("dark"), Ok(DARK));
        assert_eq!(resolve("dark").unwrap().particles.count, 120);
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(resolve("sepia"), Err(PresetError::Unknown("sepia".into())));
        assert!(resolve("Light").is_err());
    }

    #[test]
    fn key_round_trips_through_str() {
        for key in PresetKey::ALL {
            assert_eq!(key.as_str().parse::<PresetKey>(), Ok(key));
        }
        assert_eq!(PresetKey::Light.toggled(), PresetKey::Dark);
        assert_eq!(PresetKey::Dark.toggled().toggled(), PresetKey::Dark);
    }

    #[test]
    fn color_parsing() {
        assert_eq!("#374151".parse::<Color>(), Ok(Color::from_rgb(0x37, 0x41, 0x51)));
        assert_eq!(alloc::format!("{}", Color::from_hex(0x9ca3af)), "#9ca3af");
        assert!("374151".parse::<Color>().is_err());
        assert!("#37415".parse::<Color>().is_err());
        assert!("#zz4151".parse::<Color>().is_err());
    }

    #[test]
    fn table_presets_validate() {
        for key in PresetKey::ALL {
            assert_eq!(key.preset().validate(), Ok(()));
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut preset = LIGHT;
        preset.particles.size = -3.0;
        assert_eq!(
            preset.validate(),
            Err(PresetError::OutOfRange { field: "particles.size", value: -3.0 })
        );

        let mut preset = LIGHT;
        preset.particles.size = 0.0;
        assert!(preset.validate().is_err());

        let mut preset = LIGHT;
        preset.particles.opacity = 5.0;
        assert_eq!(
            preset.validate(),
            Err(PresetError::OutOfRange { field: "particles.opacity", value: 5.0 })
        );

        let mut preset = LIGHT;
        preset.particles.base_speed = f32::NAN;
        assert!(matches!(
            preset.validate(),
            Err(PresetError::OutOfRange { field: "particles.base_speed", .. })
        ));

        let mut preset = LIGHT;
        preset.links.distance = -1.0;
        assert!(preset.validate().is_err());

        let mut preset = LIGHT;
        preset.links.opacity = -0.1;
        assert!(preset.validate().is_err());

        let mut preset = LIGHT;
        preset.links.width = f32::INFINITY;
        assert!(preset.validate().is_err());

        let mut preset = LIGHT;
        preset.interactivity.hover = HoverMode::Grab { distance: f32::NAN, opacity: 0.5 };
        assert!(preset.validate().is_err());

        let mut preset = LIGHT;
        preset.interactivity.hover = HoverMode::Grab { distance: 100.0, opacity: 1.5 };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let mut preset = DARK;
        preset.particles.base_speed = 0.0;
        preset.particles.opacity = 1.0;
        preset.links.distance = 0.0;
        preset.links.opacity = 0.0;
        preset.links.width = 0.0;
        preset.interactivity.hover = HoverMode::None;
        assert_eq!(preset.validate(), Ok(()));
    }

    #[test]
    fn table_presets_are_interactive() {
        for key in PresetKey::ALL {
            let preset = key.preset();
            assert!(matches!(preset.interactivity.hover, HoverMode::Grab { .. }));
            assert!(matches!(preset.interactivity.click, ClickMode::Push { count } if count > 0));
            assert!(preset.links.enabled);
        }
    }
}
