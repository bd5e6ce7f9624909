use crate::foundation::error::{BorderError, BorderResult};
use crate::growth::policy::GrowthPolicy;

/// One recipe entry: run `policy` for `steps` consecutive steps.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RecipeStep {
    /// Growth policy applied on each step.
    pub policy: GrowthPolicy,
    /// Number of steps.
    pub steps: u32,
}

impl RecipeStep {
    /// Create a recipe entry.
    pub fn new(policy: GrowthPolicy, steps: u32) -> Self {
        Self { policy, steps }
    }
}

/// Named border shapes that expand into a [`Recipe`] of a given thickness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipePreset {
    /// 4-connected growth on every step.
    Diamond,
    /// Alternating 4-connected growth and corner filling.
    Square,
    /// Alternating 4-connected growth and non-corner growth.
    Rounded,
    /// Strict horizontal growth only.
    Horizontal,
    /// Strict vertical growth only.
    Vertical,
}

/// Ordered sequence of growth steps; the total step count is the border thickness.
#[derive(Clone, Debug, Default)]
pub struct Recipe {
    steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Build a recipe from explicit entries.
    pub fn new(steps: Vec<RecipeStep>) -> Self {
        Self { steps }
    }

    /// A single policy repeated `thickness` times.
    pub fn uniform(policy: GrowthPolicy, thickness: u32) -> Self {
        Self::new(vec![RecipeStep::new(policy, thickness)])
    }

    /// Expand `preset` into exactly `thickness` steps.
    pub fn from_preset(preset: RecipePreset, thickness: u32) -> Self {
        let alternate = |second: GrowthPolicy| {
            let steps = (0..thickness)
                .map(|i| {
                    let policy = if i % 2 == 0 {
                        GrowthPolicy::AnyNeighbor
                    } else {
                        second
                    };
                    RecipeStep::new(policy, 1)
                })
                .collect();
            Self::new(steps)
        };
        match preset {
            RecipePreset::Diamond => Self::uniform(GrowthPolicy::AnyNeighbor, thickness),
            RecipePreset::Square => alternate(GrowthPolicy::Corners),
            RecipePreset::Rounded => alternate(GrowthPolicy::NotCorners),
            RecipePreset::Horizontal => Self::uniform(GrowthPolicy::StrictHorizontal, thickness),
            RecipePreset::Vertical => Self::uniform(GrowthPolicy::StrictVertical, thickness),
        }
    }

    /// Entries in application order.
    pub fn steps(&self) -> &[RecipeStep] {
        &self.steps
    }

    /// Total number of growth steps.
    pub fn total_steps(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.steps)).sum()
    }

    /// Border thickness in pixels, saturating at `u32::MAX`.
    pub fn thickness(&self) -> u32 {
        u32::try_from(self.total_steps()).unwrap_or(u32::MAX)
    }

    /// Append an entry.
    pub fn push(&mut self, step: RecipeStep) {
        self.steps.push(step);
    }

    /// Reject recipes the pipeline cannot run.
    pub fn validate(&self) -> BorderResult<()> {
        if self.steps.is_empty() {
            return Err(BorderError::validation("recipe must contain at least one step"));
        }
        if self.total_steps() > u64::from(u32::MAX) {
            return Err(BorderError::validation("recipe thickness exceeds u32::MAX"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/growth/recipe.rs"]
mod tests;
