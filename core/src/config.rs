use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::*;

/// Where named settings come from. Missing names fall back to the defaults.
pub trait ConfigSource {
    fn value(&self, name: &str) -> Option<Value>;
}

impl ConfigSource for Map<String, Value> {
    fn value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl ConfigSource for BTreeMap<String, Value> {
    fn value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl ConfigSource for Value {
    fn value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<C: ConfigSource + ?Sized> ConfigSource for &C {
    fn value(&self, name: &str) -> Option<Value> {
        (**self).value(name)
    }
}

/// Settings of a single task round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    pub rows: Coord,
    pub cols: Coord,
    /// Shuffle the iteration order instead of going row by row.
    pub random: bool,
    /// Reveal one card per `interval` automatically.
    pub dynamic: bool,
    /// Seconds between automatic reveals.
    pub interval: f64,
    /// Offer a separate resolve step after stopping.
    pub feedback: bool,
    /// Allow picked cards to be put back.
    pub undoable: bool,
    /// Discard any persisted round when the task is built.
    pub reset_on_load: bool,
    /// Select cards by entering a number instead of clicking.
    pub input_mode: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            rows: 7,
            cols: 7,
            random: false,
            dynamic: false,
            interval: 1.0,
            feedback: true,
            undoable: true,
            reset_on_load: false,
            input_mode: false,
        }
    }
}

impl TaskConfig {
    pub fn load(source: &impl ConfigSource) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            rows: read_coord(source, "rows", defaults.rows)?,
            cols: read_coord(source, "cols", defaults.cols)?,
            random: read_bool(source, "random", defaults.random)?,
            dynamic: read_bool(source, "dynamic", defaults.dynamic)?,
            interval: read_number(source, "interval", defaults.interval)?,
            feedback: read_bool(source, "feedback", defaults.feedback)?,
            undoable: read_bool(source, "undoable", defaults.undoable)?,
            reset_on_load: read_bool(source, "resetOnLoad", defaults.reset_on_load)?,
            input_mode: read_bool(source, "inputMode", defaults.input_mode)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| TaskError::configuration("settings", format!("{err}")))?;
        if !(value.is_object() || value.is_null()) {
            return Err(TaskError::configuration("settings", "expected an object"));
        }
        Self::load(&value)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(TaskError::configuration("rows", "must be at least 1"));
        }
        if self.cols == 0 {
            return Err(TaskError::configuration("cols", "must be at least 1"));
        }
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err(TaskError::configuration(
                "interval",
                "must be a positive number of seconds",
            ));
        }
        Duration::try_from_secs_f64(self.interval)
            .map_err(|_| TaskError::configuration("interval", "too large"))?;
        Ok(())
    }

    /// Automatic reveal period, see [`TaskConfig::interval`].
    pub fn period(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval).unwrap_or(Duration::from_secs(1))
    }

    /// Whether rounds need an iteration order at all.
    pub const fn uses_iteration_order(&self) -> bool {
        self.dynamic || self.input_mode
    }
}

pub(crate) fn read_bool(source: &impl ConfigSource, key: &'static str, default: bool) -> Result<bool> {
    match source.value(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(value)) => Ok(value),
        Some(other) => Err(TaskError::configuration(
            key,
            format!("expected a boolean, got {other}"),
        )),
    }
}

pub(crate) fn read_number(source: &impl ConfigSource, key: &'static str, default: f64) -> Result<f64> {
    match source.value(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(value)) => value
            .as_f64()
            .ok_or_else(|| TaskError::configuration(key, "not representable")),
        Some(other) => Err(TaskError::configuration(
            key,
            format!("expected a number, got {other}"),
        )),
    }
}

pub(crate) fn read_integer(
    source: &impl ConfigSource,
    key: &'static str,
    default: u64,
    max: u64,
) -> Result<u64> {
    match source.value(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(value)) => match value.as_u64() {
            Some(value) if (1..=max).contains(&value) => Ok(value),
            _ => Err(TaskError::configuration(
                key,
                format!("expected an integer between 1 and {max}, got {value}"),
            )),
        },
        Some(other) => Err(TaskError::configuration(
            key,
            format!("expected an integer, got {other}"),
        )),
    }
}

fn read_coord(source: &impl ConfigSource, key: &'static str, default: Coord) -> Result<Coord> {
    let value = read_integer(source, key, default.into(), Coord::MAX.into())?;
    // bounded by Coord::MAX above
    Ok(value as Coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_use_defaults() {
        let config = TaskConfig::load(&json!({})).unwrap();

        assert_eq!(config, TaskConfig::default());
        assert_eq!(config.rows, 7);
        assert_eq!(config.cols, 7);
        assert!(config.feedback && config.undoable);
        assert!(!config.dynamic && !config.random && !config.input_mode && !config.reset_on_load);
        assert_eq!(config.period(), Duration::from_secs(1));
    }

    #[test]
    fn reads_named_values() {
        let config = TaskConfig::from_json(
            r#"{"rows": 2, "cols": 3, "random": true, "dynamic": true, "interval": 0.25,
                "feedback": false, "undoable": false, "resetOnLoad": true, "inputMode": true}"#,
        )
        .unwrap();

        assert_eq!(
            config,
            TaskConfig {
                rows: 2,
                cols: 3,
                random: true,
                dynamic: true,
                interval: 0.25,
                feedback: false,
                undoable: false,
                reset_on_load: true,
                input_mode: true,
            }
        );
        assert_eq!(config.period(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            TaskConfig::load(&json!({"rows": 0})),
            Err(TaskError::Configuration { key: "rows", .. })
        ));
        assert!(matches!(
            TaskConfig::load(&json!({"cols": -4})),
            Err(TaskError::Configuration { key: "cols", .. })
        ));
        assert!(matches!(
            TaskConfig::load(&json!({"cols": 256})),
            Err(TaskError::Configuration { key: "cols", .. })
        ));
    }

    #[test]
    fn rejects_wrong_types_and_intervals() {
        assert!(matches!(
            TaskConfig::load(&json!({"dynamic": "yes"})),
            Err(TaskError::Configuration { key: "dynamic", .. })
        ));
        assert!(matches!(
            TaskConfig::load(&json!({"interval": 0})),
            Err(TaskError::Configuration { key: "interval", .. })
        ));
        assert!(matches!(
            TaskConfig::from_json("[1, 2]"),
            Err(TaskError::Configuration { key: "settings", .. })
        ));
    }

    #[test]
    fn null_settings_are_all_defaults() {
        assert_eq!(TaskConfig::from_json("null"), Ok(TaskConfig::default()));
    }
}
