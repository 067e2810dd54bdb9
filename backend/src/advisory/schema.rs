//! Expected response shapes for advisory operations.
//!
//! Model output is an untyped document. Before it is handed to callers it is
//! checked against the operation's shape: every listed key present, with the
//! right kind of value. Extra keys are allowed.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// A string.
    Text,
    /// A string, number or boolean.
    Scalar,
    /// An array of anything.
    List,
    /// An array whose elements are objects carrying the given keys.
    Records(&'static [FieldSpec]),
    /// An object carrying the given keys.
    Object(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub shape: Shape,
}

/// `fields!["key" => Shape::Text, ...]` builds a static field list.
#[macro_export]
macro_rules! fields {
    ($($key:literal => $shape:expr),* $(,)?) => {
        &[$($crate::advisory::schema::FieldSpec { key: $key, shape: $shape }),*]
    };
}

pub fn validate(value: &Value, schema: &[FieldSpec]) -> Result<(), String> {
    validate_object(value, schema, "")
}

fn validate_object(value: &Value, schema: &[FieldSpec], path: &str) -> Result<(), String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("{} is not an object", display_path(path)))?;

    for spec in schema {
        let child_path = if path.is_empty() {
            spec.key.to_string()
        } else {
            format!("{}.{}", path, spec.key)
        };
        let child = obj
            .get(spec.key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| format!("missing key `{}`", child_path))?;
        validate_shape(child, spec.shape, &child_path)?;
    }
    Ok(())
}

fn validate_shape(value: &Value, shape: Shape, path: &str) -> Result<(), String> {
    match shape {
        Shape::Text => {
            if value.is_string() {
                Ok(())
            } else {
                Err(format!("`{}` should be a string", path))
            }
        }
        Shape::Scalar => {
            if value.is_string() || value.is_number() || value.is_boolean() {
                Ok(())
            } else {
                Err(format!("`{}` should be a plain value", path))
            }
        }
        Shape::List => {
            if value.is_array() {
                Ok(())
            } else {
                Err(format!("`{}` should be a list", path))
            }
        }
        Shape::Records(fields) => {
            let items = value
                .as_array()
                .ok_or_else(|| format!("`{}` should be a list", path))?;
            for (i, item) in items.iter().enumerate() {
                validate_object(item, fields, &format!("{}[{}]", path, i))?;
            }
            Ok(())
        }
        Shape::Object(fields) => validate_object(value, fields, path),
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "response".to_string()
    } else {
        format!("`{}`", path)
    }
}
