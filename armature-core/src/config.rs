//! Run settings. Every field has a default, so an empty YAML document (or no
//! file at all) gives the stock behaviour.

use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::rig::mirror::MirrorAxis;
use crate::rig::names::NameRules;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub lengths: LengthConfig,
    pub names: NameConfig,
    pub mirror: MirrorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthConfig {
    /// Bones shorter than this get extended.
    pub min_length: f32,
    pub extension: f32,
    /// Used for zero-length bones without a usable parent.
    pub default_direction: Vec3,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self { min_length: 1.0, extension: 2.5, default_direction: Vec3::Z }
    }
}

impl LengthConfig {
    /// `default_direction` as a unit vector; falls back to +Z when degenerate.
    pub fn fallback_direction(&self) -> Vec3 {
        self.default_direction.try_normalize().unwrap_or(Vec3::Z)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    /// Apply the eye-bone table before the generic rules.
    pub special_cases: bool,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self { special_cases: true }
    }
}

impl NameConfig {
    pub fn rules(&self) -> &'static NameRules {
        if self.special_cases { NameRules::standard() } else { NameRules::generic_only() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub axis: MirrorAxis,
}

pub fn load_from_yaml_str(s: &str) -> Result<NormalizeConfig> {
    let cfg: NormalizeConfig = serde_yaml::from_str(s)?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<NormalizeConfig> {
    let data = std::fs::read_to_string(path)?;
    load_from_yaml_str(&data)
}
