//! Wire-shaped report submissions.
//!
//! HTTP clients send loosely-typed JSON: numbers may arrive as strings and
//! the add/subtract flag as `true`, `"false"`, `0` or `"1"`. `normalize`
//! is the single place that turns such a payload into a `ReportInput`.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ReportError;
use crate::model::report::ReportInput;

/// Submission body as received on the wire.
///
/// Field names match the public API verbatim, including `class`.
/// A JSON `null` is treated the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub class: Option<Value>,
    #[serde(default)]
    pub isadd: Option<Value>,
    #[serde(default)]
    pub changescore: Option<Value>,
    #[serde(default)]
    pub note: Option<Value>,
    #[serde(default)]
    pub submitter: Option<Value>,
}

impl RawSubmission {
    /// Validate presence and coerce every field to its typed form.
    ///
    /// Fields are checked in wire order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// A validation variant of `ReportError` naming the offending field.
    pub fn normalize(&self) -> Result<ReportInput, ReportError> {
        Ok(ReportInput {
            class: integer_field("class", self.class.as_ref())?,
            is_add: bool_field("isadd", self.isadd.as_ref())?,
            change_score: integer_field("changescore", self.changescore.as_ref())?,
            note: text_field("note", self.note.as_ref())?,
            submitter: text_field("submitter", self.submitter.as_ref())?,
        })
    }
}

fn integer_field(field: &'static str, value: Option<&Value>) -> Result<i64, ReportError> {
    let not_integer = |v: &Value| ReportError::NotAnInteger {
        field,
        value: v.to_string(),
    };

    match value {
        None | Some(Value::Null) => Err(ReportError::MissingField { field }),
        Some(v @ Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(not_integer(v)),
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ReportError::EmptyField { field });
            }
            trimmed.parse::<i64>().map_err(|_| ReportError::NotAnInteger {
                field,
                value: s.clone(),
            })
        }
        Some(other) => Err(not_integer(other)),
    }
}

fn bool_field(field: &'static str, value: Option<&Value>) -> Result<bool, ReportError> {
    let not_bool = |v: &Value| ReportError::NotABoolean {
        field,
        value: v.to_string(),
    };

    match value {
        None | Some(Value::Null) => Err(ReportError::MissingField { field }),
        Some(Value::Bool(b)) => Ok(*b),
        Some(v @ Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(not_bool(v)),
        },
        Some(v @ Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(ReportError::EmptyField { field }),
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(not_bool(v)),
        },
        Some(other) => Err(not_bool(other)),
    }
}

fn text_field(field: &'static str, value: Option<&Value>) -> Result<String, ReportError> {
    match value {
        None | Some(Value::Null) => Err(ReportError::MissingField { field }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ReportError::EmptyField { field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ReportError::NotText {
            field,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> RawSubmission {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_normalizes_typed_payload() {
        let raw = parse(json!({
            "class": 3, "isadd": true, "changescore": 5,
            "note": "late", "submitter": "teacherA"
        }));

        let input = raw.normalize().unwrap();
        assert_eq!(
            input,
            ReportInput {
                class: 3,
                is_add: true,
                change_score: 5,
                note: "late".to_string(),
                submitter: "teacherA".to_string(),
            }
        );
    }

    #[test]
    fn test_coerces_string_numbers_and_flags() {
        let raw = parse(json!({
            "class": "7", "isadd": "false", "changescore": " -2 ",
            "note": "n", "submitter": "s"
        }));

        let input = raw.normalize().unwrap();
        assert_eq!(input.class, 7);
        assert!(!input.is_add);
        assert_eq!(input.change_score, -2);
    }

    #[test]
    fn test_false_is_a_value_not_a_missing_field() {
        for flag in [json!(false), json!(0), json!("0"), json!("FALSE")] {
            let raw = parse(json!({
                "class": 1, "isadd": flag, "changescore": 1,
                "note": "n", "submitter": "s"
            }));
            assert!(!raw.normalize().unwrap().is_add);
        }
    }

    #[test]
    fn test_missing_and_null_isadd_are_rejected() {
        let missing = parse(json!({
            "class": 1, "changescore": 1, "note": "n", "submitter": "s"
        }));
        assert_eq!(
            missing.normalize(),
            Err(ReportError::MissingField { field: "isadd" })
        );

        let null = parse(json!({
            "class": 1, "isadd": null, "changescore": 1, "note": "n", "submitter": "s"
        }));
        assert_eq!(
            null.normalize(),
            Err(ReportError::MissingField { field: "isadd" })
        );
    }

    #[test]
    fn test_missing_note_is_rejected() {
        let raw = parse(json!({
            "class": 3, "isadd": true, "changescore": 5, "submitter": "teacherA"
        }));
        assert_eq!(
            raw.normalize(),
            Err(ReportError::MissingField { field: "note" })
        );
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let raw = parse(json!({
            "class": 3, "isadd": true, "changescore": 5, "note": "late", "submitter": "   "
        }));
        assert_eq!(
            raw.normalize(),
            Err(ReportError::EmptyField { field: "submitter" })
        );
    }

    #[test]
    fn test_zero_class_is_a_value() {
        let raw = parse(json!({
            "class": 0, "isadd": true, "changescore": 0, "note": "n", "submitter": "s"
        }));
        let input = raw.normalize().unwrap();
        assert_eq!(input.class, 0);
        assert_eq!(input.change_score, 0);
    }

    #[test]
    fn test_rejects_non_integral_numbers() {
        let raw = parse(json!({
            "class": 1.5, "isadd": true, "changescore": 1, "note": "n", "submitter": "s"
        }));
        assert!(matches!(
            raw.normalize(),
            Err(ReportError::NotAnInteger { field: "class", .. })
        ));

        let raw = parse(json!({
            "class": "abc", "isadd": true, "changescore": 1, "note": "n", "submitter": "s"
        }));
        assert!(matches!(
            raw.normalize(),
            Err(ReportError::NotAnInteger { field: "class", .. })
        ));
    }

    #[test]
    fn test_rejects_unrecognised_flag() {
        let raw = parse(json!({
            "class": 1, "isadd": "yes", "changescore": 1, "note": "n", "submitter": "s"
        }));
        assert!(matches!(
            raw.normalize(),
            Err(ReportError::NotABoolean { field: "isadd", .. })
        ));
    }

    #[test]
    fn test_rejects_non_text_note() {
        let raw = parse(json!({
            "class": 1, "isadd": true, "changescore": 1, "note": 12, "submitter": "s"
        }));
        assert!(matches!(
            raw.normalize(),
            Err(ReportError::NotText { field: "note", .. })
        ));
    }
}
