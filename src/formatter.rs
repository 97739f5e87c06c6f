//! Layout of generated TypeScript.
//!
//! The synthesizers emit code line by line without indentation. [`format_source`] indents
//! each line once per earlier line that still has brackets open, drops
//! trailing whitespace and collapses runs of blank lines. Brackets inside string
//! literals, template literals and line comments do not count.
//!
//! The output only depends on the trimmed lines and their bracket structure, so
//! formatting an already formatted text returns it unchanged.

use crate::config::FormatOptions;

/// Re-indent generated source text.
///
/// # Example
///
/// ```
/// use client_from_source::config::FormatOptions;
/// use client_from_source::formatter::format_source;
///
/// let formatted = format_source("class A {\nm() {\nreturn 1;\n}\n}", &FormatOptions::default());
/// assert_eq!(formatted, "class A {\n  m() {\n    return 1;\n  }\n}\n");
/// ```
pub fn format_source(source: &str, options: &FormatOptions) -> String {
    let unit = " ".repeat(options.indent_width);
    let mut output = String::with_capacity(source.len() + source.len() / 4);
    // One frame per line that left brackets open, holding how many are still open
    let mut frames: Vec<usize> = Vec::new();
    let mut pending_blank = false;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            pending_blank = !output.is_empty();
            continue;
        }

        let closers = leading_closers(trimmed);
        // No blank line directly after an opening bracket or before a closing one
        if pending_blank && closers == 0 && !output.trim_end().ends_with(&['{', '(', '['][..]) {
            output.push('\n');
        }
        pending_blank = false;

        for _ in 0..indent_level(&frames, closers) {
            output.push_str(&unit);
        }
        output.push_str(trimmed);
        output.push('\n');

        let mut fresh = 0;
        for open in bracket_events(trimmed) {
            if open {
                fresh += 1;
            } else if fresh > 0 {
                fresh -= 1;
            } else if let Some(top) = frames.last_mut() {
                *top -= 1;
                if *top == 0 {
                    frames.pop();
                }
            }
        }
        if fresh > 0 {
            frames.push(fresh);
        }
    }

    output
}

/// Frames still open once the line's leading closers are applied
fn indent_level(frames: &[usize], closers: usize) -> usize {
    let mut remaining = closers;
    let mut level = frames.len();
    while level > 0 && remaining >= frames[level - 1] {
        remaining -= frames[level - 1];
        level -= 1;
    }
    level
}

/// Number of closing brackets a line starts with
fn leading_closers(line: &str) -> usize {
    line.chars()
        .take_while(|c| matches!(c, '}' | ')' | ']' | ';' | ',' | ' '))
        .filter(|c| matches!(c, '}' | ')' | ']'))
        .count()
}

/// Brackets outside of strings and comments, `true` for opening ones
fn bracket_events(line: &str) -> Vec<bool> {
    let mut events = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => break,
            '{' | '(' | '[' => events.push(true),
            '}' | ')' | ']' => events.push(false),
            _ => {}
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn format(source: &str) -> String {
        format_source(source, &FormatOptions::default())
    }

    #[test]
    fn test_indents_nested_blocks() {
        let source = "class A {\nm(a: number) {\nreturn this.fetch<X>(A.ADDRESS, 'x', {\nmethod: 'GET'\n});\n}\n}";
        assert_eq!(
            format(source),
            "class A {\n  m(a: number) {\n    return this.fetch<X>(A.ADDRESS, 'x', {\n      method: 'GET'\n    });\n  }\n}\n"
        );
    }

    #[test]
    fn test_ignores_brackets_in_strings_and_comments() {
        let source = "// {(\nclass A {\nx = `${a}/{b}`;\ny = '}';\n}";
        assert_eq!(format(source), "// {(\nclass A {\n  x = `${a}/{b}`;\n  y = '}';\n}\n");
    }

    #[test]
    fn test_collapses_blank_lines() {
        let source = "\n\nimport x;\n\n\n\nclass A {\n\nm() {}\n\n\nn() {}\n\n}\n\n";
        assert_eq!(format(source), "import x;\n\nclass A {\n  m() {}\n\n  n() {}\n}\n");
    }

    #[test]
    fn test_wrapped_parameters() {
        let source = "class A {\nm(\na: number,\nb: string\n) {\nreturn 1;\n}\n}";
        assert_eq!(
            format(source),
            "class A {\n  m(\n    a: number,\n    b: string\n  ) {\n    return 1;\n  }\n}\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let source = "import { A } from 'a';\nclass A extends B {\nstatic readonly ADDRESS = '/x';\n\nconstructor() {\nsuper(UNKNOWN, UNKNOWN);\n}\n\nm() {\nreturn this.fetch<unknown>(A.ADDRESS, `${id}`, {\nmethod: 'GET',\nparams: {\n'q': q\n}\n});\n}\n}";
        let once = format(source);
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_unbalanced_input_does_not_underflow() {
        assert_eq!(format("}\n}\nx"), "}\n}\nx\n");
    }

    #[test]
    fn test_custom_indent() {
        let options = FormatOptions {
            print_width: 90,
            indent_width: 4,
        };
        assert_eq!(format_source("a {\nb\n}", &options), "a {\n    b\n}\n");
    }
}
