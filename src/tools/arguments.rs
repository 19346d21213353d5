//! Typed access to the JSON arguments of a function call.

use serde::de::DeserializeOwned;

use crate::error::LogiqError;

/// Arguments the model supplied for a tool call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    raw: serde_json::Value,
}

impl ToolArguments {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str, LogiqError> {
        self.get_opt_str(key)
            .ok_or_else(|| LogiqError::InvalidArgument(format!("missing string argument '{key}'")))
    }

    /// Optional string argument; empty strings count as absent.
    pub fn get_opt_str(&self, key: &str) -> Option<&str> {
        self.raw
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Optional number; numeric strings are accepted since models emit both.
    pub fn get_opt_f64(&self, key: &str) -> Option<f64> {
        match self.raw.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Deserialize all arguments into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, LogiqError> {
        let value = if self.raw.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            self.raw.clone()
        };
        serde_json::from_value(value)
            .map_err(|e| LogiqError::InvalidArgument(format!("invalid tool arguments: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_arguments() {
        let args = ToolArguments::new(json!({"category": "Refrigerator", "brand": "  "}));
        assert_eq!(args.get_str("category").unwrap(), "Refrigerator");
        assert_eq!(args.get_opt_str("brand"), None);
        assert!(args.get_str("missing").is_err());
    }

    #[test]
    fn numbers_accept_strings() {
        let args = ToolArguments::new(json!({"min_price": "499.5", "max_price": 900}));
        assert_eq!(args.get_opt_f64("min_price"), Some(499.5));
        assert_eq!(args.get_opt_f64("max_price"), Some(900.0));
        assert_eq!(args.get_opt_f64("brand"), None);
    }

    #[test]
    fn null_arguments_deserialize_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct Empty {
            #[serde(default)]
            category: Option<String>,
        }
        let parsed: Empty = ToolArguments::new(serde_json::Value::Null).deserialize().unwrap();
        assert!(parsed.category.is_none());
    }
}
