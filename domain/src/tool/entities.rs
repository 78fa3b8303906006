//! Tool entities: descriptors, argument schemas and the session catalog

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Separator joining a provider id and a local operation name.
pub const QUALIFIED_NAME_SEPARATOR: &str = "__";

/// Build the namespaced name under which a provider's operation is exposed.
///
/// ```
/// use conductor_domain::tool::entities::qualify;
/// assert_eq!(qualify("web", "search"), "web__search");
/// ```
pub fn qualify(provider_id: &str, local_name: &str) -> String {
    format!("{provider_id}{QUALIFIED_NAME_SEPARATOR}{local_name}")
}

/// JSON-Schema-like description of the arguments a tool accepts.
///
/// Only `properties` and `required` carry meaning for the orchestrator; the
/// rest of the schema is kept verbatim so the planner sees what the provider
/// advertised.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSchema {
    raw: Map<String, Value>,
    required: Vec<String>,
}

impl ArgumentSchema {
    /// `{type: object, properties: {}, required: []}`
    pub fn empty() -> Self {
        Self::from_json(None)
    }

    /// Normalize a provider-supplied schema. Absent, `null` or non-object
    /// schemas become the empty object schema.
    pub fn from_json(schema: Option<&Value>) -> Self {
        let mut raw = match schema {
            Some(Value::Object(obj)) => obj.clone(),
            _ => Map::new(),
        };

        raw.entry("type").or_insert_with(|| Value::from("object"));
        if !raw.get("properties").is_some_and(Value::is_object) {
            raw.insert("properties".into(), Value::Object(Map::new()));
        }

        let required: Vec<String> = raw
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        raw.insert(
            "required".into(),
            Value::Array(required.iter().cloned().map(Value::String).collect()),
        );

        Self { raw, required }
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.raw.get("properties").and_then(Value::as_object)
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Declared `type` of a property, if the schema names one.
    pub fn property_type(&self, name: &str) -> Option<&str> {
        self.properties()?
            .get(name)?
            .get("type")
            .and_then(Value::as_str)
    }

    /// Required property names absent from `arguments`, in schema order.
    pub fn missing_required(&self, arguments: &Map<String, Value>) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !arguments.contains_key(name.as_str()))
            .cloned()
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.raw.clone())
    }
}

impl Default for ArgumentSchema {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for ArgumentSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// One callable operation, namespaced by its provider.
///
/// Created during discovery and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    qualified_name: String,
    provider_id: String,
    local_name: String,
    description: String,
    argument_schema: ArgumentSchema,
}

impl ToolDescriptor {
    pub fn new(
        provider_id: impl Into<String>,
        local_name: impl Into<String>,
        description: impl Into<String>,
        argument_schema: ArgumentSchema,
    ) -> Self {
        let provider_id = provider_id.into();
        let local_name = local_name.into();
        Self {
            qualified_name: qualify(&provider_id, &local_name),
            provider_id,
            local_name,
            description: description.into(),
            argument_schema,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn argument_schema(&self) -> &ArgumentSchema {
        &self.argument_schema
    }
}

/// The flat namespace of tools discovered for a session.
///
/// Keeps discovery order (provider order, then the provider's own listing
/// order) so the planner always sees the catalog the same way.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. Returns `false` and keeps the existing entry when
    /// the qualified name is already taken.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> bool {
        if self.index.contains_key(descriptor.qualified_name()) {
            return false;
        }
        self.index
            .insert(descriptor.qualified_name().to_string(), self.tools.len());
        self.tools.push(descriptor);
        true
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ToolDescriptor> {
        self.index.get(qualified_name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.index.contains_key(qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(ToolDescriptor::qualified_name)
    }

    /// Provider ids with their tool counts, in discovery order.
    pub fn providers(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = Vec::new();
        for tool in &self.tools {
            match out.iter_mut().find(|(id, _)| *id == tool.provider_id()) {
                Some((_, count)) => *count += 1,
                None => out.push((tool.provider_id(), 1)),
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(provider: &str, name: &str) -> ToolDescriptor {
        ToolDescriptor::new(provider, name, format!("{name} tool"), ArgumentSchema::empty())
    }

    #[test]
    fn test_absent_schema_defaults_to_empty_object() {
        let schema = ArgumentSchema::from_json(None);
        assert_eq!(
            schema.to_json(),
            json!({"type": "object", "properties": {}, "required": []})
        );
        assert_eq!(ArgumentSchema::from_json(Some(&Value::Null)), schema);
    }

    #[test]
    fn test_schema_keeps_extra_keywords() {
        let raw = json!({
            "type": "object",
            "properties": {"path": {"type": "string"}},
            "required": ["path"],
            "additionalProperties": false
        });
        let schema = ArgumentSchema::from_json(Some(&raw));

        assert_eq!(schema.required(), ["path".to_string()]);
        assert_eq!(schema.property_type("path"), Some("string"));
        assert_eq!(schema.to_json(), raw);
    }

    #[test]
    fn test_schema_ignores_non_string_required_entries() {
        let raw = json!({"properties": {}, "required": ["a", 3, null]});
        let schema = ArgumentSchema::from_json(Some(&raw));
        assert_eq!(schema.required(), ["a".to_string()]);
        assert_eq!(schema.to_json()["type"], "object");
    }

    #[test]
    fn test_missing_required() {
        let raw = json!({"required": ["path", "encoding"]});
        let schema = ArgumentSchema::from_json(Some(&raw));
        let args = json!({"path": "a.txt"});

        assert_eq!(
            schema.missing_required(args.as_object().unwrap()),
            vec!["encoding".to_string()]
        );
    }

    #[test]
    fn test_descriptor_qualified_name() {
        let tool = descriptor("files", "read");
        assert_eq!(tool.qualified_name(), "files__read");
        assert_eq!(tool.provider_id(), "files");
        assert_eq!(tool.local_name(), "read");
    }

    #[test]
    fn test_catalog_same_local_name_different_providers() {
        let mut catalog = ToolCatalog::new();
        assert!(catalog.register(descriptor("web", "search")));
        assert!(catalog.register(descriptor("files", "search")));

        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec!["web__search", "files__search"]);
        assert_eq!(catalog.get("files__search").unwrap().provider_id(), "files");
    }

    #[test]
    fn test_catalog_rejects_duplicate_qualified_name() {
        let mut catalog = ToolCatalog::new();
        assert!(catalog.register(descriptor("web", "search")));
        assert!(!catalog.register(ToolDescriptor::new(
            "web",
            "search",
            "shadow",
            ArgumentSchema::empty()
        )));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("web__search").unwrap().description(), "search tool");
    }

    #[test]
    fn test_catalog_providers_in_order() {
        let mut catalog = ToolCatalog::new();
        catalog.register(descriptor("files", "read"));
        catalog.register(descriptor("web", "search"));
        catalog.register(descriptor("files", "list"));

        assert_eq!(catalog.providers(), vec![("files", 2), ("web", 1)]);
    }
}
