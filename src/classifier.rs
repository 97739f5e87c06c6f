//! Assignment of method parameters to request roles.

use crate::descriptor::{AnnotationRole, MethodDescriptor, ParameterDescriptor};
use crate::diagnostics::DiagnosticKind;
use crate::type_mapper::map_type;
use log::debug;

/// A parameter of the generated method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    /// Source type descriptor as reported by the parser
    pub source_type: Option<String>,
    /// Mapped TypeScript type
    pub ts_type: String,
    /// Whether the argument may be omitted by the caller
    pub optional: bool,
}

/// A parameter substituted into the path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathVariable {
    /// Name of the method parameter
    pub parameter: String,
    /// Name of the `{variable}` in the route template
    pub variable: String,
}

/// A parameter forwarded as a query string entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOption {
    /// Query string key
    pub key: String,
    /// Name of the method parameter
    pub parameter: String,
}

/// The roles of all parameters of one method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParameters {
    /// Signature arguments, required ones first
    pub arguments: Vec<Argument>,
    pub path_variables: Vec<PathVariable>,
    pub query_options: Vec<QueryOption>,
    /// Name of the parameter sent as request payload
    pub body: Option<String>,
    /// Ambiguities found while classifying
    pub issues: Vec<DiagnosticKind>,
}

/// Classify every parameter of a method.
///
/// The first recognized annotation on a parameter decides its role; later recognized
/// annotations are ignored and reported. Only the first request body parameter is
/// used. Classification itself never fails.
pub fn classify_parameters(method: &MethodDescriptor) -> ClassifiedParameters {
    let mut classified = ClassifiedParameters::default();
    let mut required = Vec::new();
    let mut optional = Vec::new();

    for parameter in &method.parameters {
        let is_optional = classify_parameter(parameter, &mut classified);
        let argument = Argument {
            name: parameter.name.clone(),
            source_type: parameter.type_name.clone(),
            ts_type: map_type(parameter.type_name.as_deref()),
            optional: is_optional,
        };
        if is_optional {
            optional.push(argument);
        } else {
            required.push(argument);
        }
    }

    required.extend(optional);
    classified.arguments = required;

    debug!(
        "Classified {} parameters of {}: {} path, {} query, body: {:?}",
        method.parameters.len(),
        method.name,
        classified.path_variables.len(),
        classified.query_options.len(),
        classified.body
    );

    classified
}

/// Record the role of one parameter; returns whether it is optional
fn classify_parameter(parameter: &ParameterDescriptor, classified: &mut ClassifiedParameters) -> bool {
    let mut recognized = parameter
        .annotations
        .iter()
        .filter_map(|a| a.role().map(|role| (a, role)))
        .filter(|(_, role)| {
            matches!(
                role,
                AnnotationRole::PathVariable | AnnotationRole::QueryParam | AnnotationRole::RequestBody
            )
        });

    let Some((annotation, role)) = recognized.next() else {
        return false;
    };

    for (ignored, _) in recognized {
        classified.issues.push(DiagnosticKind::AmbiguousParameter {
            parameter: parameter.name.clone(),
            ignored: ignored.name.clone(),
        });
    }

    match role {
        AnnotationRole::PathVariable => {
            let variable = annotation.value(0).unwrap_or(parameter.name.as_str()).to_string();
            classified.path_variables.push(PathVariable {
                parameter: parameter.name.clone(),
                variable,
            });
            false
        }
        AnnotationRole::QueryParam => {
            let key = annotation.value(0).unwrap_or(parameter.name.as_str()).to_string();
            classified.query_options.push(QueryOption {
                key,
                parameter: parameter.name.clone(),
            });
            annotation
                .value(1)
                .is_some_and(|flag| flag.eq_ignore_ascii_case("false"))
        }
        AnnotationRole::RequestBody => {
            match &classified.body {
                Some(kept) => classified.issues.push(DiagnosticKind::DuplicateBody {
                    parameter: parameter.name.clone(),
                    kept: kept.clone(),
                }),
                None => classified.body = Some(parameter.name.clone()),
            }
            false
        }
        AnnotationRole::BaseRoute | AnnotationRole::Route(_) => false,
    }
}
