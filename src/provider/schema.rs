//! Declarative resource schemas
//!
//! A [`Schema`] lists the attributes of a resource or data source together with their
//! flags and validators. [`Schema::validate`] checks a JSON configuration record before
//! any network call is made.

use super::diagnostics::Diagnostics;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int64,
    Float64,
    StringMap,
    Object { attributes: Vec<Attribute> },
    ObjectList { attributes: Vec<Attribute> },
}

impl AttributeType {
    fn label(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Int64 => "number",
            AttributeType::Float64 => "number",
            AttributeType::StringMap => "map of string",
            AttributeType::Object { .. } => "object",
            AttributeType::ObjectList { .. } => "list of object",
        }
    }
}

/// Value checks attached to an attribute. Null values are never validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// Canonical hyphenated UUID
    Uuid,
    /// Minimum length in characters
    MinLength { min: usize },
    /// Inclusive integer range
    Between { min: i64, max: i64 },
    AtLeast { min: i64 },
    OneOf { values: &'static [&'static str] },
    /// Sibling attributes that must be null when this one is set
    ConflictsWith { paths: &'static [&'static str] },
    /// Sibling attributes that must be set when this one is set
    AlsoRequires { paths: &'static [&'static str] },
    /// Minimum list length
    SizeAtLeast { min: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType) -> Self {
        Self {
            name,
            kind,
            description: "",
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn bool(name: &'static str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn int64(name: &'static str) -> Self {
        Self::new(name, AttributeType::Int64)
    }

    pub fn float64(name: &'static str) -> Self {
        Self::new(name, AttributeType::Float64)
    }

    pub fn string_map(name: &'static str) -> Self {
        Self::new(name, AttributeType::StringMap)
    }

    pub fn object(name: &'static str, attributes: Vec<Attribute>) -> Self {
        Self::new(name, AttributeType::Object { attributes })
    }

    pub fn object_list(name: &'static str, attributes: Vec<Attribute>) -> Self {
        Self::new(name, AttributeType::ObjectList { attributes })
    }

    /// Computed identifier shared by every resource
    pub fn id(description: &'static str) -> Self {
        Self::string("id").computed().description(description)
    }

    /// Required UUID reference to a parent entity that forces replacement on change
    pub fn parent_id(name: &'static str, description: &'static str) -> Self {
        Self::string(name)
            .required()
            .requires_replace()
            .description(description)
            .validator(Validator::Uuid)
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    fn type_matches(&self, value: &Value) -> bool {
        match &self.kind {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int64 => value.is_i64() || value.is_u64(),
            AttributeType::Float64 => value.is_number(),
            AttributeType::StringMap => value
                .as_object()
                .is_some_and(|map| map.values().all(|v| v.is_string() || v.is_null())),
            AttributeType::Object { .. } => value.is_object(),
            AttributeType::ObjectList { .. } => value.is_array(),
        }
    }
}

/// Schema of a resource, data source or the provider block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Self {
            description,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Validate a configuration record against the schema
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::default();

        match config.as_object() {
            Some(object) => validate_object(&self.attributes, object, "", &mut diags),
            None => diags.add_error(
                "Invalid Configuration",
                format!("expected an object, got {}", kind_of(config)),
            ),
        }

        diags
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn is_set(object: &Map<String, Value>, name: &str) -> bool {
    object.get(name).is_some_and(|v| !v.is_null())
}

fn validate_object(
    attributes: &[Attribute],
    object: &Map<String, Value>,
    prefix: &str,
    diags: &mut Diagnostics,
) {
    for attr in attributes {
        let path = if prefix.is_empty() {
            attr.name.to_string()
        } else {
            format!("{}.{}", prefix, attr.name)
        };

        let value = match object.get(attr.name) {
            Some(v) if !v.is_null() => v,
            _ => {
                if attr.required {
                    diags.add_attribute_error(
                        path,
                        "Missing required argument",
                        format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                    );
                }
                continue;
            }
        };

        if !attr.required && !attr.optional {
            // Computed-only attributes are ignored in configuration
            continue;
        }

        if !attr.type_matches(value) {
            diags.add_attribute_error(
                path,
                "Incorrect attribute value type",
                format!("{} required, got {}", attr.kind.label(), kind_of(value)),
            );
            continue;
        }

        for validator in &attr.validators {
            check_validator(validator, attr.name, value, object, &path, diags);
        }

        match &attr.kind {
            AttributeType::Object { attributes } => {
                if let Some(nested) = value.as_object() {
                    validate_object(attributes, nested, &path, diags);
                }
            }
            AttributeType::ObjectList { attributes } => {
                for (index, item) in value.as_array().into_iter().flatten().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    match item.as_object() {
                        Some(nested) => validate_object(attributes, nested, &item_path, diags),
                        None => diags.add_attribute_error(
                            item_path,
                            "Incorrect attribute value type",
                            format!("object required, got {}", kind_of(item)),
                        ),
                    }
                }
            }
            _ => {}
        }
    }
}

fn check_validator(
    validator: &Validator,
    name: &str,
    value: &Value,
    siblings: &Map<String, Value>,
    path: &str,
    diags: &mut Diagnostics,
) {
    match validator {
        Validator::Uuid => {
            if let Some(s) = value.as_str() {
                if !is_uuid(s) {
                    diags.add_attribute_error(
                        path,
                        "Invalid Attribute Value Match",
                        format!("Attribute {} must be an id, got: {}", name, s),
                    );
                }
            }
        }
        Validator::MinLength { min } => {
            if let Some(s) = value.as_str() {
                let len = s.chars().count();
                if len < *min {
                    diags.add_attribute_error(
                        path,
                        "Invalid Attribute Value Length",
                        format!(
                            "Attribute {} string length must be at least {}, got: {}",
                            name, min, len
                        ),
                    );
                }
            }
        }
        Validator::Between { min, max } => {
            if let Some(n) = value.as_i64() {
                if n < *min || n > *max {
                    diags.add_attribute_error(
                        path,
                        "Invalid Attribute Value",
                        format!(
                            "Attribute {} value must be between {} and {}, got: {}",
                            name, min, max, n
                        ),
                    );
                }
            }
        }
        Validator::AtLeast { min } => {
            if let Some(n) = value.as_i64() {
                if n < *min {
                    diags.add_attribute_error(
                        path,
                        "Invalid Attribute Value",
                        format!("Attribute {} value must be at least {}, got: {}", name, min, n),
                    );
                }
            }
        }
        Validator::OneOf { values } => {
            if let Some(s) = value.as_str() {
                if !values.contains(&s) {
                    diags.add_attribute_error(
                        path,
                        "Invalid Attribute Value Match",
                        format!(
                            "Attribute {} value must be one of: {:?}, got: {:?}",
                            name, values, s
                        ),
                    );
                }
            }
        }
        Validator::ConflictsWith { paths } => {
            for other in paths.iter().filter(|other| is_set(siblings, other)) {
                diags.add_attribute_error(
                    path,
                    "Invalid Attribute Combination",
                    format!("Attribute \"{}\" cannot be specified when \"{}\" is specified", other, name),
                );
            }
        }
        Validator::AlsoRequires { paths } => {
            for other in paths.iter().filter(|other| !is_set(siblings, other)) {
                diags.add_attribute_error(
                    path,
                    "Invalid Attribute Combination",
                    format!("Attribute \"{}\" must be specified when \"{}\" is specified", other, name),
                );
            }
        }
        Validator::SizeAtLeast { min } => {
            if let Some(items) = value.as_array() {
                if items.len() < *min {
                    diags.add_attribute_error(
                        path,
                        "Invalid Attribute Value",
                        format!(
                            "Attribute {} list must contain at least {} elements, got: {}",
                            name,
                            min,
                            items.len()
                        ),
                    );
                }
            }
        }
    }
}

/// Canonical 8-4-4-4-12 hex UUID
pub fn is_uuid(s: &str) -> bool {
    s.len() == 36 && uuid::Uuid::try_parse(s).is_ok()
}
