/// Decoding measurement records out of a database JSON snapshot
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::errors::{MonitorError, Result};
use crate::models::Measurement;

/// Walk a slash-separated path down from the snapshot root
///
/// Returns None when any path segment is missing.
pub fn node_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |node, segment| node.get(segment))
}

/// Decode one measurement record
///
/// A null node decodes to `Ok(None)`. Typed decoding is attempted first,
/// then a field-by-field fallback that tolerates numbers stored as strings
/// or floats stored where integers are expected.
pub fn parse_measurement(node: &Value) -> Result<Option<Measurement>> {
    if node.is_null() {
        return Ok(None);
    }

    match serde_json::from_value::<Measurement>(node.clone()) {
        Ok(data) => Ok(Some(data)),
        Err(e) => {
            warn!("Typed decoding failed ({}), trying lenient parsing", e);
            let object = node.as_object().ok_or_else(|| {
                MonitorError::Parse(format!("expected an object, found {}", kind(node)))
            })?;
            let data = parse_lenient(object);
            debug!("Lenient parsing successful: {:?}", data);
            Ok(Some(data))
        }
    }
}

/// List top-level keys and their direct children as `key/child`
pub fn available_paths(root: &Value) -> Vec<String> {
    let mut paths = Vec::new();

    if let Some(object) = root.as_object() {
        for (key, child) in object {
            paths.push(key.clone());
            if let Some(children) = child.as_object() {
                for grandchild in children.keys() {
                    paths.push(format!("{}/{}", key, grandchild));
                }
            }
        }
    }

    paths
}

fn parse_lenient(object: &Map<String, Value>) -> Measurement {
    Measurement {
        device_name: opt_string(object, "deviceName"),
        timestamp: opt_string(object, "time"),
        temperature: opt_f64(object, "tempValue"),
        humidity: opt_f64(object, "humValue"),
        co2: opt_i32(object, "co2Value"),
        tvoc: opt_i32(object, "tvocValue"),
        pressure: opt_f64(object, "pressureValue"),
        altitude: opt_f64(object, "altitudeValue"),
    }
}

fn opt_f64(object: &Map<String, Value>, key: &str) -> f64 {
    match object.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn opt_i32(object: &Map<String, Value>, key: &str) -> i32 {
    let value = opt_f64(object, key);
    // saturating cast, NaN maps to 0
    value as i32
}

fn opt_string(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_record_decodes() {
        let node = json!({
            "deviceName": "ESP32-lab",
            "time": "2024-05-01 12:00:00",
            "tempValue": 22.4,
            "humValue": 41.0,
            "co2Value": 612,
            "tvocValue": 87,
            "pressureValue": 1008.6,
            "altitudeValue": 35.2,
            "firmware": "1.2.0"
        });
        let data = parse_measurement(&node).unwrap().unwrap();
        assert_eq!(data.device_name, "ESP32-lab");
        assert_eq!(data.co2, 612);
        assert_eq!(data.tvoc, 87);
        assert_eq!(data.altitude, 35.2);
    }

    #[test]
    fn missing_fields_default() {
        let data = parse_measurement(&json!({"co2Value": 700})).unwrap().unwrap();
        assert_eq!(data.co2, 700);
        assert_eq!(data.tvoc, 0);
        assert!(data.device_name.is_empty());
    }

    #[test]
    fn lenient_fallback_coerces_values() {
        let node = json!({
            "deviceName": "ESP32-lab",
            "co2Value": "845",
            "tvocValue": 120.0,
            "tempValue": "23.5"
        });
        let data = parse_measurement(&node).unwrap().unwrap();
        assert_eq!(data.co2, 845);
        assert_eq!(data.tvoc, 120);
        assert_eq!(data.temperature, 23.5);
    }

    #[test]
    fn null_node_is_empty() {
        assert_eq!(parse_measurement(&Value::Null).unwrap(), None);
    }

    #[test]
    fn non_object_node_fails() {
        let err = parse_measurement(&json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn node_lookup_follows_path() {
        let root = json!({"sensors": {"lab": {"co2Value": 500}}});
        assert!(node_at(&root, "sensors/lab").is_some());
        assert!(node_at(&root, "/sensors/lab/").is_some());
        assert!(node_at(&root, "sensors/attic").is_none());
        assert_eq!(node_at(&root, ""), Some(&root));
    }

    #[test]
    fn lists_two_levels_of_paths() {
        let root = json!({
            "test": {"co2Value": 500, "tvocValue": 20},
            "status": "ok"
        });
        let paths = available_paths(&root);
        assert_eq!(paths, vec!["status", "test", "test/co2Value", "test/tvocValue"]);
    }
}
