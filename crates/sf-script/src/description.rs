//! Declarative script metadata consumed by the host platform.
//!
//! The host renders its configuration UI from a [`ScriptDescription`] and
//! uses it to validate and populate parameters before invoking the script.

use serde::{Deserialize, Serialize};

use crate::context::Parameters;
use crate::error::{Error, ErrorKind, Result};

/// Kind of value a parameter carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    /// A host connector (web endpoint); resolves to its configured URL.
    Connector,
    /// Free-form text.
    String,
    /// A writable output resource path.
    OutputResource,
}

/// One declared input or output parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub id: String,
    pub display_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl ParameterSpec {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        param_type: ParameterType,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            param_type,
            default_value: None,
            required: false,
        }
    }

    pub fn set_default_value(&mut self, value: Option<impl Into<String>>) -> &mut Self {
        self.default_value = value.map(Into::into);
        self
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }
}

/// Static description of a script: what it does and which parameters it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDescription {
    pub description: String,
    pub icon: String,
    pub input: Vec<ParameterSpec>,
    pub output: Vec<ParameterSpec>,
}

impl ScriptDescription {
    /// Create a description with the stock `script` icon and no parameters.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            icon: "script".to_string(),
            input: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Declare an input parameter, returning it for further configuration.
    pub fn add_input(
        &mut self,
        id: &str,
        display_name: &str,
        description: &str,
        param_type: ParameterType,
    ) -> &mut ParameterSpec {
        self.input
            .push(ParameterSpec::new(id, display_name, description, param_type));
        let last = self.input.len() - 1;
        &mut self.input[last]
    }

    /// Look up a declared input parameter by id.
    pub fn parameter(&self, id: &str) -> Option<&ParameterSpec> {
        self.input.iter().find(|p| p.id == id)
    }

    /// Populate defaults and check required parameters, the way the host
    /// does before invoking `execute`.
    ///
    /// Supplied values win over defaults. An empty supplied value counts as
    /// absent. Values for undeclared ids are passed through untouched.
    pub fn resolve_parameters(&self, supplied: Parameters) -> Result<Parameters> {
        let mut resolved = supplied;

        for spec in &self.input {
            let present = resolved.get(&spec.id).is_some_and(|v| !v.is_empty());
            if present {
                continue;
            }

            match (&spec.default_value, spec.required) {
                (Some(default), _) => resolved.insert(spec.id.clone(), default.clone()),
                (None, true) => {
                    return Err(Error::new(ErrorKind::MissingParameter(spec.id.clone())))
                }
                (None, false) => {}
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScriptDescription {
        let mut desc = ScriptDescription::new("Fetches data.");
        desc.add_input("conn", "conn", "Connector", ParameterType::Connector)
            .set_required(true);
        desc.add_input("path", "path", "Endpoint path", ParameterType::String)
            .set_default_value(Some("/services/data/"))
            .set_required(true);
        desc.add_input("note", "note", "Optional note", ParameterType::String);
        desc
    }

    #[test]
    fn test_serializes_to_host_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["icon"], "script");
        assert_eq!(json["output"], serde_json::json!([]));
        assert_eq!(json["input"][0]["displayName"], "conn");
        assert_eq!(json["input"][0]["type"], "Connector");
        assert_eq!(json["input"][0]["required"], true);
        assert!(json["input"][0].get("defaultValue").is_none());
        assert_eq!(json["input"][1]["defaultValue"], "/services/data/");
        assert_eq!(json["input"][2]["required"], false);
    }

    #[test]
    fn test_deserializes_from_host_shape() {
        let json = r#"{
            "description": "d",
            "icon": "script",
            "input": [
                {"id": "out", "displayName": "out", "description": "o", "type": "OutputResource", "required": true}
            ],
            "output": []
        }"#;

        let desc: ScriptDescription = serde_json::from_str(json).unwrap();
        let out = desc.parameter("out").unwrap();
        assert_eq!(out.param_type, ParameterType::OutputResource);
        assert!(out.required);
        assert_eq!(out.default_value, None);
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let supplied: Parameters = [("conn", "https://a.com/")].into_iter().collect();
        let resolved = sample().resolve_parameters(supplied).unwrap();

        assert_eq!(resolved.get("conn"), Some("https://a.com/"));
        assert_eq!(resolved.get("path"), Some("/services/data/"));
        assert_eq!(resolved.get("note"), None);
    }

    #[test]
    fn test_resolve_supplied_wins_over_default() {
        let supplied: Parameters = [("conn", "https://a.com/"), ("path", "/x")]
            .into_iter()
            .collect();
        let resolved = sample().resolve_parameters(supplied).unwrap();
        assert_eq!(resolved.get("path"), Some("/x"));
    }

    #[test]
    fn test_resolve_rejects_missing_required() {
        let supplied: Parameters = [("conn", "")].into_iter().collect();
        let err = sample().resolve_parameters(supplied).unwrap_err();

        assert!(matches!(err.kind, ErrorKind::MissingParameter(ref id) if id == "conn"));
    }
}
