//! Client from Source - Typed TypeScript clients from annotated controller classes.
//!
//! This library turns Spring-style web controllers into client classes for a
//! TypeScript front end. An external Groovy parser describes each controller as JSON
//! (class, route annotations, methods, parameters); the library maps that description
//! onto a client class whose methods call a shared base client.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Expands input paths into controller source files
//! 2. [`external`] - Locates and runs the parser that describes a source file
//! 3. [`descriptor`] - The JSON class descriptors and the annotations they carry
//! 4. [`type_mapper`] - Maps Java/Groovy type names to TypeScript
//! 5. [`classifier`] - Sorts method parameters into path, query and body roles
//! 6. [`path_resolver`] - Computes the address and action of each request
//! 7. [`method`] / [`class`] - Synthesize client methods and classes
//! 8. [`formatter`] - Re-indents the generated text
//! 9. [`generator`] - Drives the translation of whole files and batches
//! 10. [`output`] - Assembles and writes the result
//!
//! Degraded translations are reported through [`diagnostics`]; hard failures are
//! [`error::Error`]s.
//!
//! # Example Usage
//!
//! ```no_run
//! use client_from_source::{
//!     diagnostics::LogSink,
//!     external::{ParserTool, DEFAULT_INTERPRETER},
//!     generator::{FileOutcome, Generator},
//! };
//! use std::path::{Path, PathBuf};
//!
//! let tool = ParserTool::locate(None, DEFAULT_INTERPRETER, PathBuf::from("Parser.groovy")).unwrap();
//! let generator = Generator::new(tool).with_sink(LogSink);
//!
//! match generator.translate_file(Path::new("OrderController.groovy")).unwrap() {
//!     FileOutcome::Translated(translation) => print!("{}", translation.source),
//!     FileOutcome::NoClasses => eprintln!("no controllers found"),
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod class;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod external;
pub mod formatter;
pub mod generator;
pub mod method;
pub mod output;
pub mod path_resolver;
pub mod scanner;
pub mod type_mapper;
