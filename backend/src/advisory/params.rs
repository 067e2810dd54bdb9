use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Free-form caller parameters for one advisory request.
///
/// Values are never validated; they are rendered verbatim into prompts and
/// only fall back to defaults when absent or null.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AdvisoryParams(Map<String, Value>);

impl AdvisoryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn from_query(query: HashMap<String, String>) -> Self {
        AdvisoryParams(
            query
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Text form of a parameter: strings unquoted, everything else as JSON.
    pub fn text(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => default.to_string(),
        }
    }

    /// Numeric form of a parameter; unparseable values use the default.
    pub fn number(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_renders_values_verbatim() {
        let params = AdvisoryParams::new()
            .with("location", "Pune")
            .with("land_area", 4.5)
            .with("input_costs", json!({"seeds": 3000}))
            .with("season", Value::Null);

        assert_eq!(params.text("location", "Nashik"), "Pune");
        assert_eq!(params.text("land_area", "5"), "4.5");
        assert_eq!(params.text("input_costs", "{}"), "{\"seeds\":3000}");
        assert_eq!(params.text("season", "Kharif"), "Kharif");
        assert_eq!(params.text("budget", "50000"), "50000");
    }

    #[test]
    fn number_parses_strings_and_defaults_on_garbage() {
        let params = AdvisoryParams::new()
            .with("land_area", "12")
            .with("expected_yield", "lots");
        assert_eq!(params.number("land_area", 5.0), 12.0);
        assert_eq!(params.number("expected_yield", 0.0), 0.0);
        assert_eq!(params.number("missing", 5.0), 5.0);
    }

    #[test]
    fn deserializes_from_flat_object() {
        let params: AdvisoryParams =
            serde_json::from_value(json!({"crop": "cotton", "land_area": 3})).unwrap();
        assert_eq!(params.text("crop", ""), "cotton");
        assert_eq!(params.number("land_area", 0.0), 3.0);
    }
}
