//! Default catalog of exercises.
//!
//! The catalog only decorates output (names, categories). Workouts may log
//! exercise ids that are not in the catalog; reports then fall back to the id.

use crate::config::CustomExercise;
use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Read-only exercise metadata lookup
pub trait ExerciseCatalog {
    fn get_by_id(&self, id: &str) -> Option<&ExerciseInfo>;
}

impl ExerciseCatalog for Catalog {
    fn get_by_id(&self, id: &str) -> Option<&ExerciseInfo> {
        self.exercises.get(id)
    }
}

/// Human-readable name for an exercise id, or the id itself when unknown
pub fn display_name(catalog: &dyn ExerciseCatalog, id: &str) -> String {
    catalog
        .get_by_id(id)
        .map(|info| info.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn exercise(
    id: &str,
    name: &str,
    category: ExerciseCategory,
    equipment: Equipment,
    muscle_groups: &[MuscleGroup],
) -> (String, ExerciseInfo) {
    (
        id.to_string(),
        ExerciseInfo {
            id: id.to_string(),
            name: name.to_string(),
            muscle_groups: muscle_groups.to_vec(),
            equipment,
            category,
        },
    )
}

/// Builds the default catalog of built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> Catalog {
    use Equipment as E;
    use ExerciseCategory as C;
    use MuscleGroup as M;

    let exercises: HashMap<String, ExerciseInfo> = [
        // Barbell
        exercise(
            "bench_press",
            "Bench Press",
            C::Strength,
            E::Barbell,
            &[M::Chest, M::Triceps, M::Shoulders],
        ),
        exercise(
            "squat",
            "Back Squat",
            C::Strength,
            E::Barbell,
            &[M::Quadriceps, M::Glutes, M::Hamstrings],
        ),
        exercise(
            "deadlift",
            "Deadlift",
            C::Strength,
            E::Barbell,
            &[M::Hamstrings, M::Glutes, M::Back],
        ),
        exercise(
            "overhead_press",
            "Overhead Press",
            C::Strength,
            E::Barbell,
            &[M::Shoulders, M::Triceps],
        ),
        exercise(
            "barbell_row",
            "Barbell Row",
            C::Strength,
            E::Barbell,
            &[M::Back, M::Biceps],
        ),
        // Dumbbell / kettlebell
        exercise(
            "dumbbell_curl",
            "Dumbbell Curl",
            C::Strength,
            E::Dumbbell,
            &[M::Biceps],
        ),
        exercise(
            "goblet_squat",
            "Goblet Squat",
            C::Strength,
            E::Kettlebell,
            &[M::Quadriceps, M::Glutes],
        ),
        exercise(
            "kb_swing",
            "Kettlebell Swing",
            C::Strength,
            E::Kettlebell,
            &[M::Glutes, M::Hamstrings, M::Core],
        ),
        // Machines / cables
        exercise(
            "leg_press",
            "Leg Press",
            C::Strength,
            E::Machine,
            &[M::Quadriceps, M::Glutes],
        ),
        exercise(
            "lat_pulldown",
            "Lat Pulldown",
            C::Strength,
            E::Cable,
            &[M::Back, M::Biceps],
        ),
        exercise(
            "triceps_pushdown",
            "Triceps Pushdown",
            C::Strength,
            E::Cable,
            &[M::Triceps],
        ),
        // Bodyweight
        exercise(
            "pullup",
            "Pull-up",
            C::Bodyweight,
            E::PullupBar,
            &[M::Back, M::Biceps],
        ),
        exercise(
            "pushup",
            "Push-up",
            C::Bodyweight,
            E::Bodyweight,
            &[M::Chest, M::Triceps],
        ),
        exercise(
            "plank",
            "Plank",
            C::Bodyweight,
            E::Bodyweight,
            &[M::Core],
        ),
        exercise(
            "burpee",
            "Burpee",
            C::Cardio,
            E::Bodyweight,
            &[M::FullBody],
        ),
        exercise(
            "hip_cars",
            "Hip Controlled Articular Rotations",
            C::Mobility,
            E::Bodyweight,
            &[M::Glutes],
        ),
    ]
    .into_iter()
    .collect();

    Catalog { exercises }
}

impl Catalog {
    /// The default catalog with user-defined exercises layered on top.
    ///
    /// A custom exercise with a built-in id replaces the built-in entry.
    pub fn with_custom(custom: &[CustomExercise]) -> Self {
        let mut catalog = get_default_catalog().clone();
        for entry in custom {
            catalog.exercises.insert(
                entry.id.clone(),
                ExerciseInfo {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    muscle_groups: entry.muscle_groups.clone(),
                    equipment: entry.equipment,
                    category: entry.category,
                },
            );
        }
        catalog
    }

    /// Entries sorted by id, for stable listings
    pub fn sorted(&self) -> Vec<&ExerciseInfo> {
        let mut entries: Vec<_> = self.exercises.values().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, info) in &self.exercises {
            if id.is_empty() || info.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &info.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, info.id
                ));
            }
            if info.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = get_default_catalog();
        let squat = catalog.get_by_id("squat").unwrap();
        assert_eq!(squat.name, "Back Squat");
        assert_eq!(squat.equipment, Equipment::Barbell);
        assert!(catalog.get_by_id("unknown_lift").is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let catalog = get_default_catalog();
        assert_eq!(display_name(catalog, "deadlift"), "Deadlift");
        assert_eq!(display_name(catalog, "zercher_squat"), "zercher_squat");
    }

    #[test]
    fn test_every_category_represented() {
        let catalog = build_default_catalog();
        for category in [
            ExerciseCategory::Strength,
            ExerciseCategory::Bodyweight,
            ExerciseCategory::Cardio,
            ExerciseCategory::Mobility,
        ] {
            assert!(
                catalog.exercises.values().any(|e| e.category == category),
                "missing {:?}",
                category
            );
        }
    }

    #[test]
    fn test_custom_exercises_merge() {
        let custom = vec![
            CustomExercise {
                id: "zercher_squat".into(),
                name: "Zercher Squat".into(),
                category: ExerciseCategory::Strength,
                equipment: Equipment::Barbell,
                muscle_groups: vec![MuscleGroup::Quadriceps],
            },
            CustomExercise {
                id: "squat".into(),
                name: "High-bar Squat".into(),
                category: ExerciseCategory::Strength,
                equipment: Equipment::Barbell,
                muscle_groups: vec![],
            },
        ];
        let catalog = Catalog::with_custom(&custom);
        assert_eq!(
            catalog.get_by_id("zercher_squat").unwrap().name,
            "Zercher Squat"
        );
        assert_eq!(catalog.get_by_id("squat").unwrap().name, "High-bar Squat");
        assert_eq!(
            catalog.exercises.len(),
            get_default_catalog().exercises.len() + 1
        );
        assert!(catalog.validate().is_empty());
    }
}
