use std::{collections::HashMap, fmt, fs, path::Path, str::FromStr};

use anyhow::bail;
use serde::{de::Visitor, Deserialize};
use winit::keyboard::{self, NamedKey};

use crate::{shapes::Shape, surface::Surface};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Surface the drawing is projected onto.
    pub surface: Surface,
    /// Preset selected at startup.
    pub shape: Shape,
    pub canvas: CanvasConfig,
    pub plot: PlotConfig,
    /// Extra key bindings, layered over [`default_bindings`].
    pub bind: HashMap<Key, CommandVerb>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            surface: Surface::Sphere,
            shape: Shape::Line,
            canvas: CanvasConfig::default(),
            plot: PlotConfig::default(),
            bind: default_bindings(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    /// Initial camera azimuth, in degrees.
    pub azimuth: f32,
    /// Initial camera elevation, in degrees.
    pub elevation: f32,
    /// Number of wireframe lines per parameter direction.
    pub wireframe_lines: usize,
    /// Number of samples along each wireframe line.
    pub wireframe_samples: usize,
    /// Diameter of a plotted point, in logical pixels.
    pub point_size: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            azimuth: -60.0,
            elevation: 30.0,
            wireframe_lines: 20,
            wireframe_samples: 100,
            point_size: 6.0,
        }
    }
}

impl Config {
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(contents)?;

        // `bind` only holds what the file listed; the defaults stay active underneath.
        let mut bind = default_bindings();
        bind.extend(config.bind.drain());
        config.bind = bind;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let CanvasConfig { width, height } = self.canvas;
        if width == 0 || height == 0 {
            bail!("[canvas] size must be positive (got {width}x{height})");
        }
        let plot = &self.plot;
        if plot.width == 0 || plot.height == 0 {
            bail!(
                "[plot] size must be positive (got {}x{})",
                plot.width,
                plot.height
            );
        }
        if !(-90.0..=90.0).contains(&plot.elevation) {
            bail!(
                "[plot] elevation must be within -90..=90 degrees (got {})",
                plot.elevation
            );
        }
        if plot.wireframe_lines == 0 || plot.wireframe_samples < 2 {
            bail!("[plot] needs at least 1 wireframe line with at least 2 samples");
        }
        if !(plot.point_size > 0.0) {
            bail!("[plot] point_size must be positive (got {})", plot.point_size);
        }
        Ok(())
    }
}

pub fn default_bindings() -> HashMap<Key, CommandVerb> {
    [
        ("1", CommandVerb::SelectLine),
        ("2", CommandVerb::SelectSquare),
        ("3", CommandVerb::SelectRectangle),
        ("4", CommandVerb::SelectCircle),
        ("5", CommandVerb::SelectEllipse),
        ("Tab", CommandVerb::NextShape),
        ("Enter", CommandVerb::DrawShape),
        ("d", CommandVerb::DrawShape),
        ("c", CommandVerb::Clear),
        ("Delete", CommandVerb::Clear),
        ("r", CommandVerb::ResetView),
        ("Escape", CommandVerb::Quit),
    ]
    .into_iter()
    .filter_map(|(name, verb)| Some((name.parse::<Key>().ok()?, verb)))
    .collect()
}

/// A logical key, as produced by the keyboard layout.
///
/// Character keys are stored lowercased so bindings ignore Shift and Caps Lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(pub(crate) keyboard::Key);

impl Key {
    pub fn from_logical(key: &keyboard::Key) -> Self {
        match key {
            keyboard::Key::Character(c) => Key(keyboard::Key::Character(c.to_lowercase().into())),
            other => Key(other.clone()),
        }
    }
}

impl FromStr for Key {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let named = match s {
            "Enter" => NamedKey::Enter,
            "Escape" => NamedKey::Escape,
            "Tab" => NamedKey::Tab,
            "Space" => NamedKey::Space,
            "Delete" => NamedKey::Delete,
            "Backspace" => NamedKey::Backspace,
            "Insert" => NamedKey::Insert,
            "Home" => NamedKey::Home,
            "End" => NamedKey::End,
            "PageUp" => NamedKey::PageUp,
            "PageDown" => NamedKey::PageDown,
            "ArrowUp" => NamedKey::ArrowUp,
            "ArrowDown" => NamedKey::ArrowDown,
            "ArrowLeft" => NamedKey::ArrowLeft,
            "ArrowRight" => NamedKey::ArrowRight,
            _ if s.chars().count() == 1 => {
                return Ok(Key::from_logical(&keyboard::Key::Character(s.into())))
            }
            _ => return Err(()),
        };
        Ok(Key(keyboard::Key::Named(named)))
    }
}

impl<'a> Deserialize<'a> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        struct FromStrVisitor;

        impl<'de> Visitor<'de> for FromStrVisitor {
            type Value = Key;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a single character or a key name like `Enter`")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse()
                    .map_err(|()| E::custom(format_args!("invalid key name '{v}'")))
            }
        }

        deserializer.deserialize_str(FromStrVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandVerb {
    SelectLine,
    SelectSquare,
    SelectRectangle,
    SelectCircle,
    SelectEllipse,
    NextShape,
    DrawShape,
    Clear,
    ResetView,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Key {
        name.parse().unwrap()
    }

    #[test]
    fn parses_example_config() {
        let config = Config::load("config.example.toml").unwrap();
        assert_eq!(config.surface, Surface::Cylinder);
        assert_eq!(config.bind[&key("x")], CommandVerb::Clear);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.surface, Surface::Sphere);
        assert_eq!(config.shape, Shape::Line);
        assert_eq!((config.canvas.width, config.canvas.height), (400, 400));
        assert_eq!(config.plot.wireframe_samples, 100);
        assert_eq!(config.bind, default_bindings());
        assert_eq!(default_bindings().len(), 12);
    }

    #[test]
    fn bindings_layer_over_defaults() {
        let config = Config::parse(
            r#"
            [bind]
            c = "DRAW_SHAPE"
            Space = "NEXT_SHAPE"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind[&key("c")], CommandVerb::DrawShape);
        assert_eq!(config.bind[&key("Space")], CommandVerb::NextShape);
        assert_eq!(config.bind[&key("Escape")], CommandVerb::Quit);
    }

    #[test]
    fn character_keys_ignore_case() {
        assert_eq!(key("C"), key("c"));
        assert_eq!(
            Key::from_logical(&keyboard::Key::Character("D".into())),
            key("d")
        );
    }

    #[test]
    fn rejects_unknown_key_names() {
        let err = Config::parse("[bind]\nHyperspace = \"CLEAR\"\n").unwrap_err();
        assert!(err.to_string().contains("Hyperspace"), "{err}");
        assert!(Config::parse("[bind]\nc = \"EXPLODE\"\n").is_err());
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(Config::parse("[canvas]\nwidth = 0\n").is_err());
        assert!(Config::parse("[plot]\nwireframe_samples = 1\n").is_err());
        assert!(Config::parse("[plot]\nelevation = 120.0\n").is_err());
    }

    #[test]
    fn parses_surface_and_shape() {
        let config = Config::parse("surface = \"cylinder\"\nshape = \"Ellipse\"\n").unwrap();
        assert_eq!(config.surface, Surface::Cylinder);
        assert_eq!(config.shape, Shape::Ellipse);
        assert!(Config::parse("surface = \"torus\"\n").is_err());
    }
}
