//! Argument parsing and validation
//!
//! Arguments arrive from the reasoning service as untrusted text. They are
//! parsed into a generic JSON object first, then checked against the
//! descriptor's required-field list before anything is dispatched.

use serde_json::{Map, Value};

use super::entities::ToolDescriptor;
use super::value_objects::ToolCallError;

/// Parse raw arguments into a JSON object.
///
/// Blank input is treated as `{}`, which is what reasoning services send for
/// tools without parameters.
pub fn parse_arguments(tool: &str, raw: &str) -> Result<Map<String, Value>, ToolCallError> {
    let parse_error = |reason: String| ToolCallError::ArgumentParse {
        tool: tool.to_string(),
        raw: raw.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(args)) => Ok(args),
        Ok(_) => Err(parse_error("Tool arguments must be a JSON object.".into())),
        Err(e) => Err(parse_error(e.to_string())),
    }
}

/// Validator for parsed tool arguments
///
/// Pure domain check with no I/O.
pub trait ArgumentValidator {
    fn validate(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
    ) -> Result<(), ToolCallError>;
}

/// Checks that every required property is present.
///
/// Declared property types are not enforced; providers validate their own
/// inputs and report mismatches as execution errors.
#[derive(Debug, Clone, Default)]
pub struct RequiredFieldsValidator;

impl ArgumentValidator for RequiredFieldsValidator {
    fn validate(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
    ) -> Result<(), ToolCallError> {
        let missing = descriptor.argument_schema().missing_required(arguments);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ToolCallError::SchemaValidation {
                tool: descriptor.qualified_name().to_string(),
                missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ArgumentSchema;
    use crate::tool::value_objects::FailureKind;
    use serde_json::json;

    fn read_tool() -> ToolDescriptor {
        ToolDescriptor::new(
            "files",
            "read",
            "Read a file",
            ArgumentSchema::from_json(Some(&json!({
                "type": "object",
                "properties": {"path": {"type": "string"}},
                "required": ["path"]
            }))),
        )
    }

    #[test]
    fn test_parse_object() {
        let args = parse_arguments("files__read", r#"{"path": "a.txt"}"#).unwrap();
        assert_eq!(args.get("path"), Some(&json!("a.txt")));
    }

    #[test]
    fn test_parse_blank_is_empty_object() {
        assert!(parse_arguments("t", "").unwrap().is_empty());
        assert!(parse_arguments("t", "  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_arguments("web__search", "{not json").unwrap_err();
        assert_eq!(err.kind(), FailureKind::ArgumentParse);
        assert!(err
            .to_string()
            .starts_with("Invalid arguments for tool 'web__search': {not json. Parse error:"));
    }

    #[test]
    fn test_parse_non_object() {
        let err = parse_arguments("t", "[1, 2]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
        assert!(parse_arguments("t", "\"text\"").is_err());
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = RequiredFieldsValidator;
        let err = validator.validate(&read_tool(), &Map::new()).unwrap_err();
        assert_eq!(
            err,
            ToolCallError::SchemaValidation {
                tool: "files__read".into(),
                missing: vec!["path".into()],
            }
        );
    }

    #[test]
    fn test_validator_accepts_extra_fields() {
        let validator = RequiredFieldsValidator;
        let args = json!({"path": "a.txt", "verbose": true});
        assert!(validator
            .validate(&read_tool(), args.as_object().unwrap())
            .is_ok());
    }
}
