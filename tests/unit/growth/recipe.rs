use super::*;

#[test]
fn presets_expand_to_exact_thickness() {
    for preset in [
        RecipePreset::Diamond,
        RecipePreset::Square,
        RecipePreset::Rounded,
        RecipePreset::Horizontal,
        RecipePreset::Vertical,
    ] {
        for t in [0u32, 1, 4, 7] {
            assert_eq!(Recipe::from_preset(preset, t).total_steps(), u64::from(t));
        }
    }
}

#[test]
fn square_alternates_growth_and_corners() {
    let r = Recipe::from_preset(RecipePreset::Square, 3);
    let names: Vec<_> = r.steps().iter().map(|s| s.policy.name()).collect();
    assert_eq!(names, vec!["any-neighbor", "corners", "any-neighbor"]);
}

#[test]
fn empty_recipe_is_rejected() {
    assert!(Recipe::default().validate().is_err());
    assert!(
        Recipe::uniform(GrowthPolicy::Always, 2)
            .validate()
            .is_ok()
    );
}

#[test]
fn zero_step_recipe_is_valid() {
    let r = Recipe::uniform(GrowthPolicy::Always, 0);
    assert!(r.validate().is_ok());
    assert_eq!(r.thickness(), 0);
}

#[test]
fn steps_deserialize_from_json() {
    let steps: Vec<RecipeStep> = serde_json::from_str(
        r#"[{ "policy": "any-neighbor", "steps": 2 }, { "policy": "corners", "steps": 1 }]"#,
    )
    .unwrap();
    let mut r = Recipe::new(steps);
    r.push(RecipeStep::new(GrowthPolicy::StrictHorizontal, 4));
    assert_eq!(r.total_steps(), 7);
    assert_eq!(r.thickness(), 7);
}
