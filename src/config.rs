//! Settings shared by the synthesizers and the formatter.

/// Layout of the generated TypeScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Column after which parameter lists are wrapped
    pub print_width: usize,
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 90,
            indent_width: 2,
        }
    }
}

/// How generated classes talk to the client runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Base class every generated client extends
    pub base_class: String,
    /// Module the runtime names are imported from
    pub import_module: String,
    /// Extra runtime names imported next to the base class
    pub extra_imports: Vec<String>,
    /// Method used for calls that return text
    pub text_entry_point: String,
    /// Method used for calls that return decoded values
    pub typed_entry_point: String,
    /// Placeholder emitted for constructor arguments the caller must fill in
    pub constructor_placeholder: String,
    pub format: FormatOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_class: "SpringApi".to_string(),
            import_module: "@system/springApi".to_string(),
            extra_imports: vec!["SpringGridRequest".to_string()],
            text_entry_point: "fetchText".to_string(),
            typed_entry_point: "fetch".to_string(),
            constructor_placeholder: "UNKNOWN".to_string(),
            format: FormatOptions::default(),
        }
    }
}

impl GeneratorConfig {
    /// Import statement placed before the first generated class
    pub fn preamble(&self) -> String {
        let mut names = vec![self.base_class.as_str()];
        names.extend(
            self.extra_imports
                .iter()
                .map(String::as_str)
                .filter(|name| *name != self.base_class),
        );
        format!(
            "import {{ {} }} from {};",
            names.join(", "),
            crate::path_resolver::quote_literal(&self.import_module)
        )
    }
}
