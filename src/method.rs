//! Synthesis of a single client method.

use crate::classifier::{classify_parameters, Argument, ClassifiedParameters};
use crate::config::GeneratorConfig;
use crate::descriptor::MethodDescriptor;
use crate::diagnostics::DiagnosticKind;
use crate::path_resolver::{quote_literal, resolve_path};
use crate::type_mapper::{is_degraded, map_type};
use log::debug;

/// Class-level facts every method of the class needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassContext {
    /// Output class name
    pub name: String,
    /// Class base path
    pub base_path: String,
}

/// Generated text of one method plus what degraded along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedMethod {
    pub name: String,
    pub text: String,
    pub issues: Vec<DiagnosticKind>,
}

/// Generate the client method for a controller method.
///
/// Returns `None` for methods without a route annotation.
pub fn synthesize_method(
    method: &MethodDescriptor,
    class: &ClassContext,
    config: &GeneratorConfig,
) -> Option<SynthesizedMethod> {
    let Some((verb, method_path)) = method.route() else {
        debug!("Skipping {}.{}: no route annotation", class.name, method.name);
        return None;
    };

    let parameters = classify_parameters(method);
    let resolved = resolve_path(&class.base_path, &parameters.path_variables, method_path);
    let return_type = map_type(method.return_type.as_deref());

    let mut issues = parameters.issues.clone();
    issues.extend(degraded_types(method, &parameters, &return_type));

    let call = if return_type == "string" {
        config.text_entry_point.clone()
    } else {
        format!("{}<{}>", config.typed_entry_point, return_type)
    };

    let mut options = vec![format!("method: {}", quote_literal(verb.as_str()))];
    if let Some(body) = &parameters.body {
        options.push(format!("body: {}", body));
    }
    if !parameters.query_options.is_empty() {
        let entries: Vec<String> = parameters
            .query_options
            .iter()
            .map(|option| format!("{}: {}", quote_literal(&option.key), option.parameter))
            .collect();
        options.push(format!("params: {{\n{}\n}}", entries.join(",\n")));
    }

    let text = format!(
        "{} {{\nreturn this.{}({}, {}, {{\n{}\n}});\n}}",
        signature(&method.name, &parameters.arguments, &config.format),
        call,
        resolved.address.render(&class.name),
        resolved.action.render(&class.name),
        options.join(",\n"),
    );

    debug!("Synthesized {}.{} ({})", class.name, method.name, verb.as_str());

    Some(SynthesizedMethod {
        name: method.name.clone(),
        text,
        issues,
    })
}

/// `name(a: T, b?: U)`, wrapped one argument per line when it would not fit
fn signature(name: &str, arguments: &[Argument], format: &crate::config::FormatOptions) -> String {
    let rendered: Vec<String> = arguments
        .iter()
        .map(|argument| {
            let marker = if argument.optional { "?" } else { "" };
            format!("{}{}: {}", argument.name, marker, argument.ts_type)
        })
        .collect();

    let single_line = format!("{}({})", name, rendered.join(", "));
    // Method headers sit one level deep and end with " {"
    if rendered.is_empty() || format.indent_width + single_line.len() + 2 <= format.print_width {
        single_line
    } else {
        format!("{}(\n{}\n)", name, rendered.join(",\n"))
    }
}

fn degraded_types(
    method: &MethodDescriptor,
    parameters: &ClassifiedParameters,
    return_type: &str,
) -> Vec<DiagnosticKind> {
    let mut issues = Vec::new();
    for argument in &parameters.arguments {
        if is_degraded(argument.source_type.as_deref(), &argument.ts_type) {
            issues.push(DiagnosticKind::UnmappedType {
                source: argument.source_type.clone().unwrap_or_default(),
                mapped: argument.ts_type.clone(),
            });
        }
    }
    if is_degraded(method.return_type.as_deref(), return_type) {
        issues.push(DiagnosticKind::UnmappedType {
            source: method.return_type.clone().unwrap_or_default(),
            mapped: return_type.to_string(),
        });
    }
    issues
}
