use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EstimationError;
use crate::estimator::ExerciseProfile;

/// Workout submitted by the client.
/// Required fields stay raw JSON so truthiness and the fallback
/// message can be judged from the single parse.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkoutRequest {
    #[serde(default)]
    pub exercise: Value,
    #[serde(default)]
    pub duration: Value,
    #[serde(default)]
    pub intensity: Value,
    /// Client-side workout date, logged only
    #[serde(default)]
    pub date: Option<Value>,
}

impl WorkoutRequest {
    /// All three required fields are present and truthy
    pub fn has_required_fields(&self) -> bool {
        is_truthy(&self.exercise) && is_truthy(&self.duration) && is_truthy(&self.intensity)
    }

    pub fn exercise_text(&self) -> Result<&str, EstimationError> {
        self.exercise.as_str().ok_or(EstimationError::ExerciseNotText)
    }

    /// Duration in minutes, from a number or a numeric string
    pub fn duration_minutes(&self) -> Result<f64, EstimationError> {
        let minutes = match &self.duration {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| EstimationError::MalformedDuration(display_value(&self.duration)))?;

        if !minutes.is_finite() {
            return Err(EstimationError::NonFiniteDuration(minutes));
        }
        Ok(minutes)
    }

    /// Duration as the client wrote it, numbers in shortest form
    pub fn duration_text(&self) -> String {
        match &self.duration {
            Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
            other => display_value(other),
        }
    }

    pub fn intensity_label(&self) -> String {
        display_value(&self.intensity)
    }
}

/// Client truthiness: null, false, 0 and "" are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings verbatim, anything else as JSON text
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Successful estimate, computed or fallback
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalorieResponse {
    pub calories: i64,
    pub explanation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct IntensityEntry {
    pub label: &'static str,
    pub multiplier: f64,
}

/// Catalog listing for clients
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub exercises: &'static [ExerciseProfile],
    pub intensities: Vec<IntensityEntry>,
}
