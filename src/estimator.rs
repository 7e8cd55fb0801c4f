use serde::Serialize;
use tracing::debug;


/// Body mass assumed for every estimate, in kilograms
pub const REFERENCE_BODY_MASS_KG: f64 = 70.0;

/// Flat per-minute rate used when an estimate cannot be computed
pub const FALLBACK_CALORIES_PER_MINUTE: f64 = 5.0;

/// A known activity and its metabolic cost
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct ExerciseProfile {
    pub key: &'static str,
    pub met: f64,
    pub display_name: &'static str,
}

const fn profile(key: &'static str, met: f64, display_name: &'static str) -> ExerciseProfile {
    ExerciseProfile { key, met, display_name }
}

/// Known activities. Order matters: the first substring match wins.
pub static CATALOG: &[ExerciseProfile] = &[
    // Cardio
    profile("running", 8.0, "Running"),
    profile("jogging", 7.0, "Jogging"),
    profile("walking", 3.5, "Walking"),
    profile("cycling", 6.0, "Cycling"),
    profile("swimming", 6.0, "Swimming"),
    profile("elliptical", 5.5, "Elliptical"),
    profile("rowing", 6.0, "Rowing"),
    profile("jumping rope", 12.0, "Jumping Rope"),
    profile("dancing", 4.5, "Dancing"),
    profile("hiking", 6.0, "Hiking"),
    // Strength
    profile("weight lifting", 3.5, "Weight Lifting"),
    profile("strength training", 3.5, "Strength Training"),
    profile("push ups", 3.8, "Push-ups"),
    profile("pull ups", 4.0, "Pull-ups"),
    profile("squats", 5.0, "Squats"),
    profile("lunges", 4.5, "Lunges"),
    profile("deadlifts", 4.0, "Deadlifts"),
    profile("bench press", 3.5, "Bench Press"),
    // Flexibility
    profile("yoga", 2.5, "Yoga"),
    profile("pilates", 3.0, "Pilates"),
    profile("stretching", 2.0, "Stretching"),
    profile("meditation", 1.0, "Meditation"),
    // Sports
    profile("basketball", 8.0, "Basketball"),
    profile("tennis", 7.0, "Tennis"),
    profile("soccer", 7.0, "Soccer"),
    profile("volleyball", 4.0, "Volleyball"),
    profile("badminton", 5.5, "Badminton"),
    profile("golf", 3.5, "Golf"),
    // Other
    profile("boxing", 8.0, "Boxing"),
    profile("kickboxing", 8.5, "Kickboxing"),
    profile("martial arts", 7.5, "Martial Arts"),
    profile("rock climbing", 8.0, "Rock Climbing"),
    profile("skating", 5.5, "Skating"),
    profile("skiing", 7.0, "Skiing"),
    profile("snowboarding", 6.0, "Snowboarding"),
    profile("surfing", 3.0, "Surfing"),
    profile("kayaking", 5.0, "Kayaking"),
    profile("paddleboarding", 3.5, "Paddleboarding"),
    // Gym machines
    profile("treadmill", 7.0, "Treadmill"),
    profile("stationary bike", 6.0, "Stationary Bike"),
    profile("stair climber", 8.0, "Stair Climber"),
    profile("cross trainer", 5.5, "Cross Trainer"),
    // High intensity
    profile("hiit", 10.0, "HIIT"),
    profile("crossfit", 9.0, "CrossFit"),
    profile("circuit training", 8.0, "Circuit Training"),
    profile("burpees", 8.0, "Burpees"),
    profile("mountain climbers", 8.0, "Mountain Climbers"),
    profile("plank", 4.0, "Plank"),
    profile("wall sit", 3.5, "Wall Sit"),
];

/// Returned when nothing in the catalog matches
pub static GENERAL_EXERCISE: ExerciseProfile =
    profile("general exercise", 3.5, "General Exercise");

/// Perceived effort reported by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntensityLevel {
    Light,
    Moderate,
    Vigorous,
    VeryVigorous,
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 4] = [
        IntensityLevel::Light,
        IntensityLevel::Moderate,
        IntensityLevel::Vigorous,
        IntensityLevel::VeryVigorous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IntensityLevel::Light => "light",
            IntensityLevel::Moderate => "moderate",
            IntensityLevel::Vigorous => "vigorous",
            IntensityLevel::VeryVigorous => "very-vigorous",
        }
    }

    /// Labels are case-sensitive
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            IntensityLevel::Light => 0.8,
            IntensityLevel::Moderate => 1.0,
            IntensityLevel::Vigorous => 1.2,
            IntensityLevel::VeryVigorous => 1.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    Substring,
    Fallback,
}

/// Resolve free text to a catalog profile.
///
/// Exact key match first, then the first entry (in declaration order)
/// where either string contains the other, then [`GENERAL_EXERCISE`].
pub fn resolve(activity: &str) -> &'static ExerciseProfile {
    let input = activity.trim().to_lowercase();
    let (profile, kind) = resolve_normalized(&input);

    debug!(input = %input, resolved = profile.display_name, kind = ?kind, "resolved activity");
    profile
}

fn resolve_normalized(input: &str) -> (&'static ExerciseProfile, MatchKind) {
    if let Some(profile) = CATALOG.iter().find(|p| p.key == input) {
        return (profile, MatchKind::Exact);
    }

    CATALOG
        .iter()
        .find(|p| input.contains(p.key) || p.key.contains(input))
        .map(|p| (p, MatchKind::Substring))
        .unwrap_or((&GENERAL_EXERCISE, MatchKind::Fallback))
}

/// Calorie estimate plus the values used to reach it
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieEstimate {
    pub calories: i64,
    pub resolved_name: &'static str,
    pub reference_intensity: f64,
    pub applied_multiplier: f64,
    /// Rounded to one decimal place, display only
    pub adjusted_intensity: f64,
    pub intensity: Option<IntensityLevel>,
}

/// Calories = MET × 70 kg × hours × intensity multiplier
pub fn calculate(activity: &str, duration_minutes: f64, intensity_label: &str) -> CalorieEstimate {
    let profile = resolve(activity);
    let intensity = IntensityLevel::from_label(intensity_label);
    // Unrecognized labels count as moderate
    let multiplier = intensity.map_or(1.0, |level| level.multiplier());

    let adjusted = profile.met * multiplier;
    let duration_hours = duration_minutes / 60.0;
    let calories = round_half_up(adjusted * REFERENCE_BODY_MASS_KG * duration_hours) as i64;

    CalorieEstimate {
        calories,
        resolved_name: profile.display_name,
        reference_intensity: profile.met,
        applied_multiplier: multiplier,
        adjusted_intensity: round_half_up(adjusted * 10.0) / 10.0,
        intensity,
    }
}

/// Human-readable account of how an estimate was reached.
/// `duration` is the duration as the client wrote it.
pub fn explain(estimate: &CalorieEstimate, duration: &str, intensity_label: &str) -> String {
    let name = estimate.resolved_name;

    let mut explanation = format!(
        "Based on {duration} minutes of {name} at {intensity_label} intensity, \
         I estimate approximately {} calories burned. ",
        estimate.calories
    );
    explanation.push_str(&format!(
        "This calculation uses a MET (Metabolic Equivalent of Task) value of {} for {name}, \
         adjusted by a {}x intensity multiplier to {} METs. ",
        estimate.reference_intensity, estimate.applied_multiplier, estimate.adjusted_intensity
    ));
    explanation.push_str(&format!(
        "The calculation assumes an average person ({REFERENCE_BODY_MASS_KG}kg/154lbs) and uses the formula: \
         Calories = MET × Weight × Duration × Intensity. "
    ));

    match estimate.intensity {
        Some(IntensityLevel::Light) => {
            explanation.push_str("Since this was light intensity, the calorie burn is conservative.")
        }
        Some(IntensityLevel::Vigorous | IntensityLevel::VeryVigorous) => {
            explanation.push_str("The high intensity level significantly increases calorie burn.")
        }
        _ => {}
    }

    explanation.push_str(
        " Remember, actual calorie burn varies based on individual factors like age, weight, \
         fitness level, and exercise form.",
    );
    explanation
}

/// Flat-rate estimate used when the formula cannot run
pub fn fallback_calories(duration_minutes: Option<f64>) -> i64 {
    duration_minutes
        .filter(|minutes| minutes.is_finite())
        .map_or(0, |minutes| round_half_up(minutes * FALLBACK_CALORIES_PER_MINUTE) as i64)
}

/// Nearest integer, ties toward positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
