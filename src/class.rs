//! Synthesis of a complete client class.

use crate::config::GeneratorConfig;
use crate::descriptor::ClassDescriptor;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::method::{synthesize_method, ClassContext};
use crate::path_resolver::quote_literal;
use log::debug;

/// Generated text of one class and the diagnostics raised for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedClass {
    /// Output class name
    pub name: String,
    /// Unformatted source text
    pub text: String,
    /// Number of client methods emitted
    pub method_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate the client class for a controller descriptor.
///
/// `include_preamble` controls whether the runtime import is emitted; in a batch only
/// the first class carries it.
///
/// # Errors
///
/// Returns [`Error::Structural`] when the class has no base route.
pub fn synthesize_class(
    class: &ClassDescriptor,
    config: &GeneratorConfig,
    include_preamble: bool,
) -> Result<SynthesizedClass> {
    let base_path = class.base_path().ok_or_else(|| Error::Structural {
        class: class.name.clone(),
    })?;

    let context = ClassContext {
        name: class.simple_name().to_string(),
        base_path,
    };
    debug!("Synthesizing class {} at {}", context.name, context.base_path);

    let mut diagnostics = Vec::new();
    let mut methods = Vec::new();
    for method in &class.methods {
        if let Some(synthesized) = synthesize_method(method, &context, config) {
            diagnostics.extend(synthesized.issues.into_iter().map(|kind| Diagnostic {
                class: context.name.clone(),
                method: synthesized.name.clone(),
                kind,
            }));
            methods.push(synthesized.text);
        }
    }

    let mut sections = Vec::new();
    if include_preamble {
        sections.push(config.preamble());
    }
    sections.push(format!(
        "class {} extends {} {{\nstatic readonly ADDRESS = {};\n\nconstructor() {{\nsuper({placeholder}, {placeholder});\n}}",
        context.name,
        config.base_class,
        quote_literal(&context.base_path),
        placeholder = config.constructor_placeholder,
    ));
    sections.extend(methods.iter().cloned());

    let text = format!("{}\n}}", sections.join("\n\n"));

    debug!("Class {}: {} methods", context.name, methods.len());
    Ok(SynthesizedClass {
        name: context.name,
        text,
        method_count: methods.len(),
        diagnostics,
    })
}
