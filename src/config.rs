//! Physics configuration: timestep, gravity, event budget and the layer ignore matrix.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::types::{LayerId, MAX_LAYERS};

/// Gravity acceleration applied per unit of gravity scale.
pub const GRAVITY: f32 = 9.8;

/// Default per-collider margin for deciding whether a penetration is new.
pub const DEFAULT_BUFFER: f32 = 0.02;

/// Symmetric layer × layer ignore matrix.
///
/// Serialized as the list of ignored pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LayerMatrixDef", into = "LayerMatrixDef")]
pub struct LayerMatrix {
    rows: [u32; MAX_LAYERS],
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct LayerMatrixDef {
    #[serde(default)]
    ignore: Vec<(LayerId, LayerId)>,
}

impl LayerMatrix {
    /// Every pair collides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ignored(&mut self, a: LayerId, b: LayerId, ignored: bool) -> Result<(), PhysicsError> {
        let (ia, ib) = (Self::check(a)?, Self::check(b)?);
        if ignored {
            self.rows[ia] |= 1 << ib;
            self.rows[ib] |= 1 << ia;
        } else {
            self.rows[ia] &= !(1 << ib);
            self.rows[ib] &= !(1 << ia);
        }
        Ok(())
    }

    /// Builder form of [`LayerMatrix::set_ignored`].
    pub fn ignoring(mut self, a: LayerId, b: LayerId) -> Result<Self, PhysicsError> {
        self.set_ignored(a, b, true)?;
        Ok(self)
    }

    /// Out-of-range layers never ignore anything.
    pub fn ignores(&self, a: LayerId, b: LayerId) -> bool {
        let (a, b) = (a as usize, b as usize);
        a < MAX_LAYERS && b < MAX_LAYERS && self.rows[a] & (1 << b) != 0
    }

    /// Ignored pairs with `a <= b`, in layer order.
    pub fn ignored_pairs(&self) -> Vec<(LayerId, LayerId)> {
        let mut out = Vec::new();
        for a in 0..MAX_LAYERS {
            for b in a..MAX_LAYERS {
                if self.rows[a] & (1 << b) != 0 {
                    out.push((a as LayerId, b as LayerId));
                }
            }
        }
        out
    }

    fn check(layer: LayerId) -> Result<usize, PhysicsError> {
        let idx = layer as usize;
        if idx < MAX_LAYERS {
            Ok(idx)
        } else {
            Err(PhysicsError::InvalidLayer(layer))
        }
    }
}

impl TryFrom<LayerMatrixDef> for LayerMatrix {
    type Error = PhysicsError;

    fn try_from(def: LayerMatrixDef) -> Result<Self, Self::Error> {
        let mut m = LayerMatrix::new();
        for (a, b) in def.ignore {
            m.set_ignored(a, b, true)?;
        }
        Ok(m)
    }
}

impl From<LayerMatrix> for LayerMatrixDef {
    fn from(m: LayerMatrix) -> Self {
        LayerMatrixDef {
            ignore: m.ignored_pairs(),
        }
    }
}

/// Tunables shared by the physics and hitbox ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Gravity acceleration per unit of gravity scale.
    pub gravity: f32,
    /// Maximum number of events buffered per tick; extra are dropped.
    pub max_events: usize,
    /// Buffer given to physics colliders that do not set their own.
    pub default_buffer: f32,
    pub layers: LayerMatrix,
}

impl PhysicsConfig {
    pub fn new() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            gravity: GRAVITY,
            max_events: 1024,
            default_buffer: DEFAULT_BUFFER,
            layers: LayerMatrix::new(),
        }
    }

    pub fn with_fixed_dt(mut self, dt: f32) -> Self {
        self.fixed_dt = dt;
        self
    }

    pub fn with_layers(mut self, layers: LayerMatrix) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        if self.max_events == 0 {
            return Err(ConfigError::Invalid("max_events must be at least 1".to_string()));
        }
        if !(self.default_buffer.is_finite() && self.default_buffer >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default_buffer must be non-negative, got {}",
                self.default_buffer
            )));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFile for PhysicsConfig {}

/// File-backed configuration, format picked by extension (`.toml` or `.ron`).
pub trait ConfigFile: Serialize + for<'de> Deserialize<'de> + Default {
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
