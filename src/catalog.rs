//src/catalog.rs
//! Built-in exercise vocabulary used for name suggestions.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Maximum number of suggestions returned by [`search`].
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum Category {
    #[strum(serialize = "Cardio")]
    Cardio,
    #[strum(serialize = "Strength Training")]
    StrengthTraining,
    #[strum(serialize = "Yoga & Flexibility")]
    YogaFlexibility,
    #[strum(serialize = "Sports & Activities")]
    SportsActivities,
    #[strum(serialize = "Home Workouts")]
    HomeWorkouts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: Category,
}

// Declaration order is the match order.
const CATALOG: &[(Category, &[&str])] = &[
    (
        Category::Cardio,
        &[
            "Running",
            "Jogging",
            "Cycling",
            "Swimming",
            "Rowing",
            "Elliptical",
            "Treadmill",
            "Stair Climber",
            "Jump Rope",
            "Burpees",
            "Mountain Climbers",
            "High Knees",
            "Butt Kicks",
            "Sprint Intervals",
            "HIIT Workout",
        ],
    ),
    (
        Category::StrengthTraining,
        &[
            "Push-ups",
            "Pull-ups",
            "Squats",
            "Deadlifts",
            "Bench Press",
            "Overhead Press",
            "Bicep Curls",
            "Tricep Extensions",
            "Shoulder Raises",
            "Lateral Raises",
            "Chest Flyes",
            "Lat Pulldowns",
            "Rows",
            "Dips",
            "Planks",
            "Russian Twists",
            "Lunges",
            "Step-ups",
            "Calf Raises",
            "Leg Press",
            "Leg Curls",
            "Leg Extensions",
        ],
    ),
    (
        Category::YogaFlexibility,
        &[
            "Yoga Flow",
            "Pilates",
            "Stretching",
            "Meditation",
            "Tai Chi",
            "Downward Dog",
            "Warrior Pose",
            "Tree Pose",
            "Child's Pose",
        ],
    ),
    (
        Category::SportsActivities,
        &[
            "Basketball",
            "Soccer",
            "Tennis",
            "Volleyball",
            "Baseball",
            "Golf",
            "Hiking",
            "Rock Climbing",
            "Martial Arts",
            "Boxing",
            "Kickboxing",
            "Dancing",
            "Aerobics",
            "Zumba",
            "CrossFit",
            "Functional Training",
        ],
    ),
    (
        Category::HomeWorkouts,
        &[
            "Bodyweight Exercises",
            "Resistance Band Training",
            "Dumbbell Workout",
            "Kettlebell Workout",
            "Wall Sit",
            "Superman",
            "Bridge",
            "Bicycle Crunches",
            "Leg Raises",
            "Flutter Kicks",
            "Jumping Jacks",
            "Arm Circles",
        ],
    ),
];

/// Shown before the user has typed anything.
const POPULAR: &[CatalogEntry] = &[
    entry("Running", Category::Cardio),
    entry("Push-ups", Category::StrengthTraining),
    entry("Squats", Category::StrengthTraining),
    entry("Cycling", Category::Cardio),
    entry("Swimming", Category::Cardio),
    entry("Yoga Flow", Category::YogaFlexibility),
    entry("Basketball", Category::SportsActivities),
    entry("Bodyweight Exercises", Category::HomeWorkouts),
    entry("HIIT Workout", Category::Cardio),
];

const fn entry(name: &'static str, category: Category) -> CatalogEntry {
    CatalogEntry { name, category }
}

/// Every catalog entry in declaration order.
pub fn entries() -> impl Iterator<Item = CatalogEntry> {
    CATALOG.iter().flat_map(|&(category, names)| {
        names.iter().map(move |&name| CatalogEntry { name, category })
    })
}

/// The fixed list offered for an empty query.
#[must_use]
pub fn popular() -> Vec<CatalogEntry> {
    POPULAR.iter().copied().take(MAX_SUGGESTIONS).collect()
}

/// Looks up the catalog entry for an exact (case-insensitive) name.
#[must_use]
pub fn find(name: &str) -> Option<CatalogEntry> {
    let name = name.trim();
    entries().find(|e| e.name.eq_ignore_ascii_case(name))
}

/// Case-insensitive substring search, first [`MAX_SUGGESTIONS`] matches in
/// catalog order. A blank query returns [`popular`].
#[must_use]
pub fn search(query: &str) -> Vec<CatalogEntry> {
    if query.trim().is_empty() {
        return popular();
    }
    let needle = query.to_lowercase();
    entries()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}
