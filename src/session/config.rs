use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{BorderError, BorderResult};
use crate::growth::recipe::{Recipe, RecipePreset, RecipeStep};
use crate::host::source::AlphaMatch;
use crate::session::border::{BorderOpts, DEFAULT_COLOR};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How the growth recipe is described in a config file.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RecipeSpec {
    /// A named shape expanded to `thickness` steps.
    Preset {
        /// Shape name.
        preset: RecipePreset,
        /// Border thickness in pixels.
        thickness: u32,
    },
    /// Explicit policy/step entries.
    Steps {
        /// Entries in application order.
        steps: Vec<RecipeStep>,
    },
}

impl RecipeSpec {
    /// Expand into a runnable recipe.
    pub fn to_recipe(&self) -> Recipe {
        match self {
            Self::Preset { preset, thickness } => Recipe::from_preset(*preset, *thickness),
            Self::Steps { steps } => Recipe::new(steps.clone()),
        }
    }
}

/// Half-open frame window as written in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimelineSpec {
    /// First frame.
    pub start: u64,
    /// One past the last frame.
    pub end: u64,
}

/// JSON-facing border configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderConfig {
    /// Growth recipe.
    pub recipe: RecipeSpec,
    /// Frames to process; absent means the current frame only.
    #[serde(default)]
    pub timeline: Option<TimelineSpec>,
    /// Writer thread count.
    #[serde(default = "default_targets")]
    pub targets: usize,
    /// Generator thread count.
    #[serde(default)]
    pub generators: Option<usize>,
    /// Straight RGBA8 border color.
    #[serde(default = "default_color")]
    pub color: [u8; 4],
    /// Which alpha values count as transparent.
    #[serde(default)]
    pub transparency: AlphaMatch,
}

fn default_targets() -> usize {
    1
}

fn default_color() -> [u8; 4] {
    DEFAULT_COLOR
}

impl BorderConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BorderResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BorderError::serde(format!("parse border config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BorderResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BorderError::validation(format!("open border config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate and convert into orchestrator options.
    pub fn into_opts(self) -> BorderResult<BorderOpts> {
        let recipe = self.recipe.to_recipe();
        let timeline = self
            .timeline
            .map(|t| FrameRange::new(FrameIndex(t.start), FrameIndex(t.end)))
            .transpose()?;
        let opts = BorderOpts {
            thickness: recipe.thickness(),
            recipe,
            timeline,
            targets: self.targets,
            generators: self.generators,
            color: self.color,
        };
        opts.validate()?;
        Ok(opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
