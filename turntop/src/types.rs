//! Types that mirror the server's live snapshot JSON.
//!
//! Numeric telemetry is decoded leniently: null, missing, non-numeric or
//! non-finite values become `None` so one odd field never costs the whole
//! frame. Only structural problems (not an object, `items` not a list of
//! objects) reject a frame. An item without a usable `pid` is kept but cannot
//! be terminated.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ConsoleError, Result};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProcessEntry {
    #[serde(default, deserialize_with = "lenient_pid")]
    pub pid: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cpu_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub memory_percent: Option<f64>,
    // cumulative user+system seconds
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cpu_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub predicted_turnaround_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_turnaround_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub turnaround_status: Option<String>,
}

/// A process the server saw finish, with its predicted and measured turnaround.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Completion {
    #[serde(deserialize_with = "required_pid")]
    pub pid: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub predicted_turnaround_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub actual_turnaround_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub turnaround_status: Option<String>,
    // unix seconds
    #[serde(default, deserialize_with = "lenient_f64")]
    pub completed_at: Option<f64>,
    // actual - predicted
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration_error: Option<f64>,
}

/// One complete server push. Replaces the previous snapshot wholesale.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub system_prediction: Option<f64>,
    pub items: Vec<ProcessEntry>,
    // quantum echoed back by the server
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_completions")]
    pub recent_completions: Vec<Completion>,
}

impl Snapshot {
    /// Decode one text frame.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ConsoleError::decode("snapshot frame is not a JSON object"));
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(v.as_f64().filter(|x| x.is_finite()))
}

// Integral JSON numbers only: `42` and `42.0` are pids, `42.5` and `-1` are not.
fn pid_from_value(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    let x = v.as_f64()?;
    if x.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&x) {
        Some(x as u32)
    } else {
        None
    }
}

fn lenient_pid<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u32>, D::Error> {
    Ok(pid_from_value(&Value::deserialize(d)?))
}

fn required_pid<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    pid_from_value(&Value::deserialize(d)?)
        .ok_or_else(|| serde::de::Error::custom("pid is not an unsigned integer"))
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    Ok(Value::deserialize(d)?.as_u64())
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(v.as_str().map(str::to_owned).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(v.as_str().map(str::to_owned))
}

// Completions are supplementary; a bad entry is skipped rather than failing the frame.
fn lenient_completions<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<Completion>, D::Error> {
    let v = Value::deserialize(d)?;
    let Value::Array(entries) = v else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|e| serde_json::from_value(e).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pid_accepts_integral_numbers_only() {
        assert_eq!(pid_from_value(&json!(42)), Some(42));
        assert_eq!(pid_from_value(&json!(42.0)), Some(42));
        assert_eq!(pid_from_value(&json!(42.5)), None);
        assert_eq!(pid_from_value(&json!(-1)), None);
        assert_eq!(pid_from_value(&json!(u64::from(u32::MAX) + 1)), None);
        assert_eq!(pid_from_value(&json!("42")), None);
        assert_eq!(pid_from_value(&Value::Null), None);
    }
}
