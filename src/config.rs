// Engine configuration: data directory, oscillator display offsets and the
// per-line colors handed to the chart sink. Everything is passed into the
// engine explicitly; nothing reads a global file.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "INDICATORS";
const FALLBACK_COLOR: &str = "#2962ff";

/// Vertical translation subtracted from each oscillator and its threshold
/// lines, so the oscillator pane can share a price-scaled axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorOffsets {
    pub rsi: f64,
    pub stochastic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding cached `{SYMBOL}_{end_date}.csv` bar files.
    pub data_dir: PathBuf,
    pub offsets: OscillatorOffsets,
    /// Field name (e.g. `SMA 9`, `%K`) to line color. Lookup ignores case.
    pub colors: HashMap<String, String>,
    pub line_width: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            offsets: OscillatorOffsets::default(),
            colors: HashMap::new(),
            line_width: 1,
        }
    }
}

impl EngineConfig {
    /// Reads an optional config file, then `INDICATORS__*` environment
    /// overrides (e.g. `INDICATORS__OFFSETS__RSI=100`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("Loading indicator config from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to read indicator configuration")?;

        settings
            .try_deserialize::<EngineConfig>()
            .context("Invalid indicator configuration")
    }

    /// Configured color for a field, else the built-in chart palette.
    pub fn color_for(&self, field: &str) -> String {
        self.colors
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, color)| color.clone())
            .unwrap_or_else(|| default_color(field).to_string())
    }
}

fn default_color(field: &str) -> &'static str {
    match field {
        "RSI" => "#ff00ff",
        "RSI 30%" => "#ff0000",
        "RSI 70%" => "#00ff00",
        "%K" => "#2962ff",
        "%D" => "#ff6d00",
        "Stochastic 20%" => "#00ff00",
        "Stochastic 80%" => "#ff0000",
        f if f.starts_with("SMA") => "#ffeb3b",
        f if f.contains("Bollinger") => "#26a69a",
        f if f.contains("Donchian") => "#ab47bc",
        _ => FALLBACK_COLOR,
    }
}
