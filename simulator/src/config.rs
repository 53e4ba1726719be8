use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::pattern::Pattern;
use crate::rule::RuleKind;
use crate::session::RunOptions;

/// Run settings, loadable from a JSON file. Every field is optional in the
/// file; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    /// A rule name (`conway`, `highlife`, ...) or a `B3/S23` rulestring.
    pub rule: String,
    /// Named pattern stamped at the center of the grid.
    pub pattern: Option<String>,
    /// Fraction of cells made alive at start, instead of a pattern.
    pub density: Option<f64>,
    pub seed: Option<u64>,
    /// Generations to run; `None` runs until interrupted.
    pub generations: Option<u64>,
    pub interval_ms: u64,
    pub stop_when_stable: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rule: "conway".to_string(),
            pattern: None,
            density: None,
            seed: None,
            generations: None,
            interval_ms: 100,
            stop_when_stable: false,
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("failed to read config: {:?}", path))?;
        let config: SimConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse config JSON: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "grid dimensions must be positive (got {}x{})",
                self.width,
                self.height
            );
        }
        if self.width.checked_mul(self.height).is_none() {
            bail!(
                "grid of {}x{} cells is too large to allocate",
                self.width,
                self.height
            );
        }
        if let Some(density) = self.density {
            if !(0.0..=1.0).contains(&density) {
                bail!("density must be within [0, 1] (got {density})");
            }
        }
        self.rule_kind()?;
        self.pattern()?;
        Ok(())
    }

    pub fn rule_kind(&self) -> Result<RuleKind> {
        self.rule.parse()
    }

    pub fn pattern(&self) -> Result<Option<&'static Pattern>> {
        self.pattern.as_deref().map(Pattern::by_name).transpose()
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            limit: self.generations,
            interval: Duration::from_millis(self.interval_ms),
            stop_when_stable: self.stop_when_stable,
        }
    }
}
