//! Collision layers.
//!
//! [`LayerMask`] is a symmetric matrix telling whether shapes on two layers
//! may collide. [`LayerConfig`] pairs it with the set of layers currently
//! enabled and persists both in a plain-text file:
//!
//! ```text
//! 1 0 0 ... 0 \n      one line per layer row, "0 " or "1 " per column
//! ...
//! LayerBitset: 11111111111111111
//! ```
//!
//! The bitset line lists layer 16 first and layer 0 last.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

/// Number of collision layers.
pub const LAYER_COUNT: usize = 17;

/// Display names of the built-in layers.
pub const LAYER_NAMES: [&str; LAYER_COUNT] = [
    "Default", "Layer1", "Layer2", "Layer3", "Layer4", "Layer5", "Layer6", "Layer7", "Layer8",
    "Layer9", "Layer10", "Layer11", "Layer12", "Layer13", "Layer14", "Layer15", "Layer16",
];

const ALL_LAYERS: u32 = (1 << LAYER_COUNT) - 1;
const BITSET_PREFIX: &str = "LayerBitset:";

/// Symmetric layer-vs-layer collision matrix.
///
/// Row `i` stores which layers collide with layer `i` as a bitset. Writes
/// always touch both `(i, j)` and `(j, i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerMask {
    rows: [u32; LAYER_COUNT],
}

impl LayerMask {
    /// A mask where no layers collide.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mask where every layer collides with every other layer.
    pub fn all() -> Self {
        Self {
            rows: [ALL_LAYERS; LAYER_COUNT],
        }
    }

    /// Enable or disable collisions between layers `a` and `b`.
    ///
    /// Out-of-range layers are a debug assertion and ignored in release builds.
    pub fn set_collision(&mut self, a: usize, b: usize, enabled: bool) {
        debug_assert!(a < LAYER_COUNT, "layer {a} out of range");
        debug_assert!(b < LAYER_COUNT, "layer {b} out of range");
        if a >= LAYER_COUNT || b >= LAYER_COUNT {
            return;
        }

        if enabled {
            self.rows[a] |= 1 << b;
            self.rows[b] |= 1 << a;
        } else {
            self.rows[a] &= !(1 << b);
            self.rows[b] &= !(1 << a);
        }
    }

    /// Whether shapes on layers `a` and `b` may collide.
    #[inline]
    pub fn collide(&self, a: usize, b: usize) -> bool {
        debug_assert!(a < LAYER_COUNT, "layer {a} out of range");
        debug_assert!(b < LAYER_COUNT, "layer {b} out of range");
        if a >= LAYER_COUNT || b >= LAYER_COUNT {
            return false;
        }
        self.rows[a] & (1 << b) != 0
    }

    /// Bitset of layers colliding with `layer`.
    pub fn row(&self, layer: usize) -> u32 {
        self.rows.get(layer).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.rows = [0; LAYER_COUNT];
    }
}

/// Errors produced while parsing a layer configuration file.
#[derive(Debug, Error)]
pub enum LayerFileError {
    /// A matrix entry that is not an integer.
    #[error("invalid entry {token:?} at row {row}, column {column}")]
    InvalidEntry {
        row: usize,
        column: usize,
        token: String,
    },
    /// The enabled-layer bitset contains something other than `0` and `1`.
    #[error("invalid layer bitset {0:?}")]
    InvalidBitset(String),
}

/// Persisted layer settings: the collision matrix and which layers are enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    pub mask: LayerMask,
    enabled: u32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            mask: LayerMask::new(),
            enabled: ALL_LAYERS,
        }
    }
}

impl LayerConfig {
    pub fn new(mask: LayerMask) -> Self {
        Self {
            mask,
            ..Self::default()
        }
    }

    /// Whether shapes on `layer` take part in the frame at all.
    pub fn is_enabled(&self, layer: usize) -> bool {
        layer < LAYER_COUNT && self.enabled & (1 << layer) != 0
    }

    pub fn set_enabled(&mut self, layer: usize, enabled: bool) {
        debug_assert!(layer < LAYER_COUNT, "layer {layer} out of range");
        if layer >= LAYER_COUNT {
            return;
        }
        if enabled {
            self.enabled |= 1 << layer;
        } else {
            self.enabled &= !(1 << layer);
        }
    }

    /// Enabled layers as a bitset, layer 0 in the lowest bit.
    pub fn enabled_bits(&self) -> u32 {
        self.enabled
    }

    /// Names of the layers that are switched off, in layer order.
    pub fn disabled_layer_names(&self) -> Vec<&'static str> {
        LAYER_NAMES
            .iter()
            .enumerate()
            .filter(|(layer, _)| !self.is_enabled(*layer))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Render the configuration in the layer file format.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(LAYER_COUNT * (LAYER_COUNT * 2 + 1) + 32);
        for row in 0..LAYER_COUNT {
            for column in 0..LAYER_COUNT {
                let bit = u8::from(self.mask.collide(row, column));
                let _ = write!(out, "{bit} ");
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{BITSET_PREFIX} {:0width$b}",
            self.enabled,
            width = LAYER_COUNT
        );
        out
    }

    /// Parse the layer file format.
    ///
    /// Blank lines are skipped without consuming a row. Rows past the last
    /// layer and columns past the last layer are ignored. Short rows leave the remaining cells cleared and a missing bitset line
    /// keeps every layer enabled. Each entry is applied with
    /// [`LayerMask::set_collision`], so a later row wins over an asymmetric
    /// earlier one.
    pub fn from_text(text: &str) -> std::result::Result<Self, LayerFileError> {
        let mut config = Self::default();
        let mut row = 0;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(bits) = line.strip_prefix(BITSET_PREFIX) {
                config.enabled = parse_bitset(bits.trim())?;
                continue;
            }
            if row >= LAYER_COUNT {
                continue;
            }

            for (column, token) in line.split_whitespace().take(LAYER_COUNT).enumerate() {
                let value: i32 = token.parse().map_err(|_| LayerFileError::InvalidEntry {
                    row,
                    column,
                    token: token.to_string(),
                })?;
                config.mask.set_collision(row, column, value == 1);
            }
            row += 1;
        }

        if row < LAYER_COUNT {
            warn!("Layer config has {} of {} rows", row, LAYER_COUNT);
        }
        Ok(config)
    }

    /// Load a layer configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading layer config from {:?}", path);

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layer config from {:?}", path))?;
        let config = Self::from_text(&text)
            .with_context(|| format!("Failed to parse layer config {:?}", path))?;

        let disabled = config.disabled_layer_names();
        if disabled.is_empty() {
            info!("Loaded layer config, all {} layers enabled", LAYER_COUNT);
        } else {
            info!("Loaded layer config, disabled layers: {}", disabled.join(", "));
        }
        Ok(config)
    }

    /// Write the configuration to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_text())
            .with_context(|| format!("Failed to write layer config to {:?}", path))?;
        info!("Saved layer config to {:?}", path);
        Ok(())
    }
}

/// Parse a bitstring with the highest layer first. Shorter strings fill the
/// lowest layers.
fn parse_bitset(bits: &str) -> std::result::Result<u32, LayerFileError> {
    if bits.len() > LAYER_COUNT {
        return Err(LayerFileError::InvalidBitset(bits.to_string()));
    }
    let mut value = 0u32;
    for (i, c) in bits.chars().rev().enumerate() {
        match c {
            '1' => value |= 1 << i,
            '0' => {}
            _ => return Err(LayerFileError::InvalidBitset(bits.to_string())),
        }
    }
    Ok(value)
}
