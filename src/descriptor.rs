//! Structural descriptors produced by the external controller parser.
//!
//! The parser emits a JSON array of class descriptors. This module turns that JSON into
//! immutable Rust values in a single deserialization step: absent or `null` collections
//! become empty, absent strings become empty, and non-string annotation values are
//! rendered to text. Downstream code never has to re-check for missing fields.
//!
//! Annotation names are resolved once into an [`AnnotationRole`] so the translation
//! stages match on an enum instead of comparing strings.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Deserializer};

/// A controller class as reported by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClassDescriptor {
    /// Fully qualified (dotted) class name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Class level annotations in declaration order
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: Vec<Annotation>,
    /// Methods in declaration order
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<MethodDescriptor>,
}

/// A controller method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MethodDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Source type descriptor of the return value, `None` when the parser omitted it
    #[serde(default, rename = "returnType")]
    pub return_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: Vec<Annotation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<ParameterDescriptor>,
}

/// A method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParameterDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Source type descriptor, `None` when the parser omitted it
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: Vec<Annotation>,
}

/// A declarative annotation with its positional values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Annotation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_values")]
    pub values: Vec<String>,
}

/// HTTP verbs a route annotation can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// The verb as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }
}

/// What a recognized annotation means to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationRole {
    /// Class level base route
    BaseRoute,
    /// Method level route bound to a verb
    Route(HttpVerb),
    /// Parameter substituted into the path template
    PathVariable,
    /// Parameter forwarded in the query string
    QueryParam,
    /// Parameter forwarded as the request payload
    RequestBody,
}

impl AnnotationRole {
    /// Look up the role of an annotation name.
    ///
    /// Qualified names (`org.springframework.web.bind.annotation.GetMapping`) are
    /// matched on their last segment. Unrecognized names yield `None`.
    pub fn lookup(name: &str) -> Option<Self> {
        let simple = name.rsplit('.').next().unwrap_or(name).trim_start_matches('@');
        match simple {
            "RequestMapping" => Some(AnnotationRole::BaseRoute),
            "GetMapping" => Some(AnnotationRole::Route(HttpVerb::Get)),
            "PostMapping" => Some(AnnotationRole::Route(HttpVerb::Post)),
            "PutMapping" => Some(AnnotationRole::Route(HttpVerb::Put)),
            "PatchMapping" => Some(AnnotationRole::Route(HttpVerb::Patch)),
            "DeleteMapping" => Some(AnnotationRole::Route(HttpVerb::Delete)),
            "PathVariable" => Some(AnnotationRole::PathVariable),
            "RequestParam" => Some(AnnotationRole::QueryParam),
            "RequestBody" => Some(AnnotationRole::RequestBody),
            _ => None,
        }
    }
}

impl Annotation {
    /// Create an annotation from a name and its values
    pub fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// The resolved role of this annotation
    pub fn role(&self) -> Option<AnnotationRole> {
        AnnotationRole::lookup(&self.name)
    }

    /// Positional value, treating empty strings as absent
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl ClassDescriptor {
    /// Output class name: the last dotted segment of the qualified name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Base path from the first base-route annotation, with `\` normalized to `/`
    pub fn base_path(&self) -> Option<String> {
        self.annotations
            .iter()
            .find(|a| a.role() == Some(AnnotationRole::BaseRoute))
            .and_then(|a| a.value(0))
            .map(|path| path.replace('\\', "/"))
    }
}

impl MethodDescriptor {
    /// The first route annotation on this method together with its path value
    pub fn route(&self) -> Option<(HttpVerb, Option<&str>)> {
        self.annotations.iter().find_map(|a| match a.role() {
            Some(AnnotationRole::Route(verb)) => Some((verb, a.value(0))),
            _ => None,
        })
    }
}

/// Parse the parser's stdout into class descriptors.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] when the text is not JSON, is not an array, or
/// contains entries that are not objects.
pub fn parse_descriptors(json: &str) -> Result<Vec<ClassDescriptor>> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        other => {
            return Err(Error::MalformedInput {
                message: format!(
                    "expected a JSON array of class descriptors, found {}",
                    json_kind(&other)
                ),
            })
        }
    };

    let classes = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(Error::MalformedInput {
                    message: format!(
                        "class descriptor #{} is {}, expected an object",
                        index,
                        json_kind(&entry)
                    ),
                });
            }
            ClassDescriptor::deserialize(entry).map_err(|e| Error::MalformedInput {
                message: format!("class descriptor #{}: {}", index, e),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} class descriptors", classes.len());
    Ok(classes)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_values<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}
