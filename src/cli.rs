use crate::config::{FormatOptions, GeneratorConfig};
use crate::diagnostics::LogSink;
use crate::external::{ParserTool, DEFAULT_INTERPRETER};
use crate::generator::{BatchPolicy, FileOutcome, FileReport, Generator};
use crate::output::{assemble, write_to_file, OutputBlock};
use crate::scanner::FileScanner;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::path::PathBuf;

/// File name of the parser script looked up next to the executable
pub const DEFAULT_PARSER_SCRIPT: &str = "Parser.groovy";

/// Client from Source - Generate typed TypeScript clients from annotated controller classes
#[derive(Parser, Debug)]
#[command(name = "client-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Controller source files, or directories to search for them
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Groovy interpreter used to run the parser (if not specified, searched in PATH)
    #[arg(long = "groovy", value_name = "PATH", env = "CLIENT_FROM_SOURCE_GROOVY")]
    pub groovy: Option<PathBuf>,

    /// Parser script (if not specified, Parser.groovy next to this executable)
    #[arg(long = "parser", value_name = "PATH", env = "CLIENT_FROM_SOURCE_PARSER")]
    pub parser: Option<PathBuf>,

    /// Base class the generated clients extend
    #[arg(long = "base-class", default_value = "SpringApi")]
    pub base_class: String,

    /// Module the base class is imported from
    #[arg(long = "import-from", default_value = "@system/springApi")]
    pub import_from: String,

    /// Line width after which parameter lists are wrapped
    #[arg(long = "print-width", default_value_t = 90)]
    pub print_width: usize,

    /// Spaces per indentation level
    #[arg(long = "indent", default_value_t = 2)]
    pub indent: usize,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Start each file's output with a comment naming the source file
    #[arg(long = "file-header")]
    pub file_header: bool,

    /// Number of parser processes run at once (default: available CPUs)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Discard all output as soon as one file fails
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Library configuration described by the arguments
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            base_class: self.base_class.clone(),
            import_module: self.import_from.clone(),
            format: FormatOptions {
                print_width: self.print_width,
                indent_width: self.indent,
            },
            ..Default::default()
        }
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        if self.fail_fast {
            BatchPolicy::FailFast
        } else {
            BatchPolicy::Partial
        }
    }

    /// The parser script to run, defaulting to the one shipped with the executable
    pub fn parser_script(&self) -> Result<PathBuf> {
        if let Some(parser) = &self.parser {
            return Ok(parser.clone());
        }
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        let dir = exe
            .parent()
            .context("The running executable has no parent directory")?;
        Ok(dir.join(DEFAULT_PARSER_SCRIPT))
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.indent == 0 {
        anyhow::bail!("Indentation width must be at least 1");
    }
    if args.jobs == Some(0) {
        anyhow::bail!("Number of jobs must be at least 1");
    }
    if args.base_class.trim().is_empty() {
        anyhow::bail!("Base class name must not be empty");
    }
    if let Some(parser) = &args.parser {
        if !parser.is_file() {
            anyhow::bail!("Parser script does not exist: {}", parser.display());
        }
    }

    for input in &args.inputs {
        info!("Input: {}", input.display());
    }
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    info!("Batch policy: {:?}", args.batch_policy());

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    // Step 1: Collect controller sources
    info!("Collecting controller sources...");
    let scan_result = FileScanner::new(args.inputs.clone()).scan()?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    if scan_result.files.is_empty() {
        anyhow::bail!("No controller sources found");
    }
    info!("Found {} controller sources", scan_result.files.len());

    // Step 2: Locate the parser
    let script = args.parser_script()?;
    if !script.is_file() {
        anyhow::bail!("Parser script not found: {}", script.display());
    }
    let tool = ParserTool::locate(args.groovy.as_deref(), DEFAULT_INTERPRETER, script)
        .context("Please specify the groovy binary with --groovy or CLIENT_FROM_SOURCE_GROOVY")?;
    tool.probe_version()?;

    // Step 3: Translate
    info!("Translating controllers...");
    let mut generator = Generator::new(tool)
        .with_config(args.generator_config())
        .with_sink(LogSink);
    if let Some(jobs) = args.jobs {
        generator = generator.with_max_workers(jobs);
    }
    let reports = generator.translate_files(&scan_result.files, args.batch_policy())?;

    // Step 4: Assemble the output, reporting what could not be translated
    let summary = summarize(&reports);
    let blocks: Vec<OutputBlock<'_>> = reports
        .iter()
        .filter_map(|report| match &report.outcome {
            Ok(FileOutcome::Translated(translation)) => Some(OutputBlock {
                file: &report.path,
                source: &translation.source,
            }),
            _ => None,
        })
        .collect();
    let content = assemble(&blocks, args.file_header);

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        print!("{}", content);
    }

    // Step 6: Display summary
    info!("Summary:");
    info!("  - Files translated: {}", summary.translated);
    info!("  - Files without classes: {}", summary.empty);
    info!("  - Files failed: {}", summary.failed);
    info!("  - Classes generated: {}", summary.classes);
    info!("  - Classes skipped: {}", summary.skipped_classes);

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} files could not be translated",
            summary.failed,
            reports.len()
        );
    }

    Ok(())
}

/// Counts over the reports of a batch
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    translated: usize,
    empty: usize,
    failed: usize,
    classes: usize,
    skipped_classes: usize,
}

fn summarize(reports: &[FileReport]) -> Summary {
    let mut summary = Summary::default();
    for report in reports {
        match &report.outcome {
            Ok(FileOutcome::Translated(translation)) => {
                summary.translated += 1;
                summary.classes += translation.classes.len();
                summary.skipped_classes += translation.failures.len();
            }
            Ok(FileOutcome::NoClasses) => {
                warn!("No classes found in {}", report.path.display());
                summary.empty += 1;
            }
            Err(e) => {
                error!("Failed to translate {}: {}", report.path.display(), e);
                summary.failed += 1;
            }
        }
    }
    summary
}
