//! Mapping of controller-side type descriptors to TypeScript types.
//!
//! The mapping is a fixed table plus a few structural rules: wrapper generics are
//! unwrapped or turned into arrays, well-known scalar types get their TypeScript
//! primitive, and the `Dto` suffix is dropped. The function is total: anything it
//! does not recognize is passed through, and missing types become [`UNKNOWN_TYPE`].

/// Sentinel for types that cannot be determined
pub const UNKNOWN_TYPE: &str = "unknown";

/// Target type for methods without a result
pub const VOID_TYPE: &str = "void";

/// Marker the parser emits for `void` results
const VOID_MARKER: &str = "void -> void";

/// Placeholder the parser emits when it could not infer a type
const UNKNOWN_MARKER: &str = "?";

/// Suffix stripped from data transfer object names
const DTO_SUFFIX: &str = "Dto";

/// Generic wrappers whose content is a collection
const CONTAINER_WRAPPERS: &[&str] = &[
    "List",
    "ArrayList",
    "LinkedList",
    "Set",
    "HashSet",
    "LinkedHashSet",
    "TreeSet",
    "Collection",
    "Iterable",
    "Flux",
    "Stream",
];

/// Generic wrappers around a single value
const VALUE_WRAPPERS: &[&str] = &[
    "ResponseEntity",
    "HttpEntity",
    "Optional",
    "Mono",
    "CompletableFuture",
    "Future",
    "DeferredResult",
    "Callable",
];

/// Map a source type descriptor to a TypeScript type.
///
/// `None`, an empty string and the `?` placeholder yield [`UNKNOWN_TYPE`].
///
/// # Example
///
/// ```
/// use client_from_source::type_mapper::map_type;
///
/// assert_eq!(map_type(Some("List<Long>")), "number[]");
/// assert_eq!(map_type(Some("ResponseEntity<OrderDto>")), "Order");
/// assert_eq!(map_type(None), "unknown");
/// ```
pub fn map_type(type_name: Option<&str>) -> String {
    match type_name {
        Some(name) => map_name(name.trim()),
        None => UNKNOWN_TYPE.to_string(),
    }
}

/// Whether a mapping lost information that was present in the source descriptor.
///
/// A parser placeholder mapping to the sentinel is expected; a concrete source
/// type mapping to it is not.
pub fn is_degraded(source: Option<&str>, mapped: &str) -> bool {
    let concrete = source
        .map(str::trim)
        .is_some_and(|s| !s.is_empty() && s != UNKNOWN_MARKER);
    concrete && mapped.contains(UNKNOWN_TYPE)
}

fn map_name(name: &str) -> String {
    if name == VOID_MARKER {
        return VOID_TYPE.to_string();
    }
    if name.is_empty() || name == UNKNOWN_MARKER {
        return UNKNOWN_TYPE.to_string();
    }

    // Wildcard arguments: `? extends T` is read as `T`, lower bounds are unknown
    if let Some(bound) = name.strip_prefix(UNKNOWN_MARKER) {
        return match bound.trim_start().strip_prefix("extends") {
            Some(upper) if upper.starts_with(char::is_whitespace) => map_name(upper.trim()),
            _ => UNKNOWN_TYPE.to_string(),
        };
    }

    if let Some(element) = name.strip_suffix("[]") {
        return format!("{}[]", map_name(element.trim()));
    }

    if let Some((outer, args)) = split_generic(name) {
        let simple = outer.rsplit('.').next().unwrap_or(outer);
        if CONTAINER_WRAPPERS.contains(&simple) {
            return format!("{}[]", map_first_arg(&args));
        }
        if VALUE_WRAPPERS.contains(&simple) {
            return map_first_arg(&args);
        }
        let mapped: Vec<String> = args.iter().map(|arg| map_name(arg)).collect();
        return format!("{}<{}>", map_simple(outer), mapped.join(", "));
    }

    map_simple(name)
}

fn map_first_arg(args: &[&str]) -> String {
    args.first()
        .map(|arg| map_name(arg))
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
}

/// Alias table lookup followed by suffix stripping
fn map_simple(name: &str) -> String {
    // Qualified names (java.lang.Long) are looked up by their simple name
    let simple = name.rsplit('.').next().unwrap_or(name);

    let aliased = match simple {
        "Long" | "long" | "Integer" | "int" | "Short" | "short" | "Byte" | "byte" | "Double"
        | "double" | "Float" | "float" | "BigDecimal" | "BigInteger" | "Number" => "number",
        "Boolean" | "boolean" => "boolean",
        "String" | "Character" | "char" | "UUID" => "string",
        "void" | "Void" => VOID_TYPE,
        "Object" => UNKNOWN_TYPE,
        "GridRequest" => "SpringGridRequest",
        other => other,
    };

    let mut stripped = aliased;
    while let Some(rest) = stripped.strip_suffix(DTO_SUFFIX).filter(|rest| !rest.is_empty()) {
        stripped = rest;
    }
    stripped.to_string()
}

/// Split `Outer<A, B<C>>` into `("Outer", ["A", "B<C>"])`.
///
/// Returns `None` when the name is not a well-formed single generic application.
fn split_generic(name: &str) -> Option<(&str, Vec<&str>)> {
    let open = name.find('<')?;
    if !name.ends_with('>') {
        return None;
    }
    let outer = name[..open].trim();
    let inner = &name[open + 1..name.len() - 1];
    if outer.is_empty() {
        return None;
    }

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(inner[start..].trim());

    Some((outer, args))
}
