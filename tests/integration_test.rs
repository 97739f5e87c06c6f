#![cfg(unix)]

use client_from_source::{
    config::FormatOptions,
    diagnostics::{CollectingSink, DiagnosticKind},
    error::Error,
    external::ParserTool,
    formatter::format_source,
    generator::{BatchPolicy, FileOutcome, Generator, Translation},
    output::{assemble, OutputBlock},
    scanner::FileScanner,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

const ORDER_CONTROLLER: &str = include_str!("fixtures/order_controller.json");
const ORDER_CLIENT: &str = include_str!("fixtures/order_controller.ts");

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A parser that prints the descriptor JSON stored in the "controller" file itself
fn fake_parser() -> ParserTool {
    ParserTool::new(PathBuf::from("/bin/sh"), fixture("fake_parser.sh"))
}

/// Helper function to create a temporary source tree
fn create_sources(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn translated(outcome: FileOutcome) -> Translation {
    match outcome {
        FileOutcome::Translated(translation) => translation,
        FileOutcome::NoClasses => panic!("Expected generated classes"),
    }
}

fn controller_json(name: &str, base: &str) -> String {
    format!(
        r#"[{{"name": "com.acme.{name}", "annotations": [{{"name": "RequestMapping", "values": ["{base}"]}}],
             "methods": [{{"name": "all", "returnType": "List<String>",
                          "annotations": [{{"name": "GetMapping", "values": ["/all"]}}], "parameters": []}}]}}]"#
    )
}

#[test]
fn test_order_controller_end_to_end() {
    let sources = create_sources(vec![("OrderController.groovy", ORDER_CONTROLLER)]);
    let generator = Generator::new(fake_parser());

    let translation = translated(
        generator
            .translate_file(&sources.path().join("OrderController.groovy"))
            .expect("Translation should succeed"),
    );

    assert_eq!(translation.classes, vec!["OrderController"]);
    assert!(translation.failures.is_empty());
    assert_eq!(translation.source, ORDER_CLIENT);
}

#[test]
fn test_generated_output_is_stable_under_formatting() {
    let options = FormatOptions::default();
    assert_eq!(format_source(ORDER_CLIENT, &options), ORDER_CLIENT);
}

#[test]
fn test_class_without_base_route_spares_siblings() {
    let json = r#"[
        {"name": "com.acme.HealthController", "annotations": [{"name": "RestController", "values": []}],
         "methods": [{"name": "ping", "returnType": "String",
                      "annotations": [{"name": "GetMapping", "values": ["/ping"]}]}]},
        {"name": "com.acme.TagController", "annotations": [{"name": "RequestMapping", "values": ["/tags"]}],
         "methods": [{"name": "ping", "returnType": "String",
                      "annotations": [{"name": "GetMapping", "values": ["/ping"]}]}]}
    ]"#;
    let sources = create_sources(vec![("Mixed.groovy", json)]);
    let generator = Generator::new(fake_parser());

    let translation =
        translated(generator.translate_file(&sources.path().join("Mixed.groovy")).unwrap());

    assert_eq!(translation.classes, vec!["TagController"]);
    assert_eq!(translation.failures.len(), 1);
    assert_eq!(
        translation.failures[0].to_string(),
        "Unable to find class address for com.acme.HealthController"
    );
    assert!(translation
        .source
        .starts_with("import { SpringApi, SpringGridRequest } from '@system/springApi';\n\nclass TagController"));
}

#[test]
fn test_empty_descriptor_list_is_not_an_error() {
    let sources = create_sources(vec![("Empty.groovy", "[]\n")]);
    let generator = Generator::new(fake_parser());

    let outcome = generator
        .translate_file(&sources.path().join("Empty.groovy"))
        .expect("An empty file is not a failure");
    assert!(matches!(outcome, FileOutcome::NoClasses));
}

#[test]
fn test_parser_exit_status_fails_file() {
    let sources = create_sources(vec![("CrashingController.groovy", "[]")]);
    let generator = Generator::new(fake_parser());

    let err = generator
        .translate_file(&sources.path().join("CrashingController.groovy"))
        .unwrap_err();
    match err {
        Error::ToolFailed { status, stderr } => {
            assert_eq!(status.code(), Some(2));
            assert!(stderr.contains("unexpected token"));
        }
        other => panic!("Expected ToolFailed, got {:?}", other),
    }
}

#[test]
fn test_parser_stderr_fails_file_despite_output() {
    let sources = create_sources(vec![(
        "NoisyController.groovy",
        controller_json("NoisyController", "/noisy").as_str(),
    )]);
    let generator = Generator::new(fake_parser());

    let err = generator
        .translate_file(&sources.path().join("NoisyController.groovy"))
        .unwrap_err();
    assert!(matches!(err, Error::ToolStderr { ref stderr } if stderr == "warning: unresolved import"));
}

#[test]
fn test_malformed_parser_output() {
    let sources = create_sources(vec![
        ("Garbage.groovy", "class Garbage {"),
        ("Object.groovy", r#"{"name": "A"}"#),
    ]);
    let generator = Generator::new(fake_parser());

    for name in ["Garbage.groovy", "Object.groovy"] {
        let err = generator.translate_file(&sources.path().join(name)).unwrap_err();
        assert!(
            matches!(err, Error::MalformedInput { .. }),
            "{} should be malformed, got {:?}",
            name,
            err
        );
    }
}

#[test]
fn test_batch_results_follow_input_order() {
    let sources = create_sources(vec![
        ("SlowController.groovy", controller_json("SlowController", "/slow").as_str()),
        ("FastController.groovy", controller_json("FastController", "/fast").as_str()),
    ]);
    let paths = vec![
        sources.path().join("SlowController.groovy"),
        sources.path().join("FastController.groovy"),
    ];
    let generator = Generator::new(fake_parser());

    let reports = generator
        .translate_files(&paths, BatchPolicy::Partial)
        .expect("Partial batches never fail");

    let names: Vec<Vec<String>> = reports
        .into_iter()
        .map(|report| translated(report.outcome.unwrap()).classes)
        .collect();
    assert_eq!(
        names,
        vec![vec!["SlowController".to_string()], vec!["FastController".to_string()]]
    );
}

#[test]
fn test_partial_and_fail_fast_policies() {
    let sources = create_sources(vec![
        ("OrderController.groovy", ORDER_CONTROLLER),
        ("CrashingController.groovy", "[]"),
        ("TagController.groovy", controller_json("TagController", "/tags").as_str()),
    ]);
    let paths = vec![
        sources.path().join("OrderController.groovy"),
        sources.path().join("CrashingController.groovy"),
        sources.path().join("TagController.groovy"),
    ];
    let generator = Generator::new(fake_parser());

    let reports = generator.translate_files(&paths, BatchPolicy::Partial).unwrap();
    assert_eq!(reports.len(), 3);
    assert!(reports[0].outcome.is_ok());
    assert!(matches!(reports[1].outcome, Err(Error::ToolFailed { .. })));
    assert!(reports[2].outcome.is_ok());

    let err = generator
        .translate_files(&paths, BatchPolicy::FailFast)
        .unwrap_err();
    assert!(err.to_string().contains("CrashingController.groovy"));
}

#[test]
fn test_degraded_types_are_reported_to_sink() {
    let json = r#"[{"name": "RawController", "annotations": [{"name": "RequestMapping", "values": ["/raw"]}],
        "methods": [{"name": "echo", "returnType": "Object",
            "annotations": [{"name": "PostMapping", "values": ["/echo"]}],
            "parameters": [
                {"name": "payload", "type": "Map<String, Object>", "annotations": [{"name": "RequestBody", "values": []}]},
                {"name": "extra", "type": "String", "annotations": [{"name": "RequestBody", "values": []}]}
            ]}]}]"#;
    let sources = create_sources(vec![("RawController.groovy", json)]);
    let sink = Arc::new(CollectingSink::new());
    let generator = Generator::new(fake_parser()).with_sink(sink.clone());

    let translation =
        translated(generator.translate_file(&sources.path().join("RawController.groovy")).unwrap());
    assert!(translation.source.contains("body: payload"));
    assert!(!translation.source.contains("body: extra"));

    let kinds: Vec<DiagnosticKind> = sink.take().into_iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::DuplicateBody {
        parameter: "extra".to_string(),
        kept: "payload".to_string(),
    }));
    assert!(kinds.contains(&DiagnosticKind::UnmappedType {
        source: "Map<String, Object>".to_string(),
        mapped: "Map<string, unknown>".to_string(),
    }));
    assert!(kinds.contains(&DiagnosticKind::UnmappedType {
        source: "Object".to_string(),
        mapped: "unknown".to_string(),
    }));
}

#[test]
fn test_source_tree_with_file_headers() {
    let sources = create_sources(vec![
        ("src/web/OrderController.groovy", ORDER_CONTROLLER),
        ("src/web/Empty.groovy", "[]"),
        ("src/web/notes.txt", "not a controller"),
        ("build/Generated.groovy", "[]"),
    ]);

    let scan = FileScanner::new(vec![sources.path().to_path_buf()])
        .scan()
        .unwrap();
    assert_eq!(scan.files.len(), 2);

    let generator = Generator::new(fake_parser());
    let reports = generator.translate_files(&scan.files, BatchPolicy::Partial).unwrap();
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

    assert_eq!(
        assemble(&blocks, true),
        format!("// OrderController.groovy\n{}", ORDER_CLIENT)
    );
}

#[test]
fn test_version_probe() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let groovy = temp_dir.path().join("groovy");
    std::fs::write(
        &groovy,
        "#!/bin/sh\necho 'Groovy Version: 3.0.9 JVM: 11.0.20 Vendor: Temurin OS: Linux'\n",
    )
    .unwrap();
    std::fs::set_permissions(&groovy, std::fs::Permissions::from_mode(0o755)).unwrap();

    let tool = ParserTool::locate(Some(&groovy), "groovy", fixture("fake_parser.sh")).unwrap();
    assert_eq!(tool.probe_version().unwrap(), Some("3.0.9".to_string()));
}

#[test]
fn test_command_line_reports_partial_failure() {
    let sources = create_sources(vec![
        ("OrderController.groovy", ORDER_CONTROLLER),
        ("CrashingController.groovy", "[]"),
    ]);

    let output = Command::new(env!("CARGO_BIN_EXE_client-from-source"))
        .arg("--groovy")
        .arg("/bin/sh")
        .arg("--parser")
        .arg(fixture("fake_parser.sh"))
        .arg(sources.path().join("OrderController.groovy"))
        .arg(sources.path().join("CrashingController.groovy"))
        .output()
        .expect("Failed to run the binary");

    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), ORDER_CLIENT);
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2 files could not be translated"));
}

#[test]
fn test_command_line_fail_fast_prints_nothing() {
    let sources = create_sources(vec![
        ("OrderController.groovy", ORDER_CONTROLLER),
        ("CrashingController.groovy", "[]"),
    ]);
    let output_file = sources.path().join("out").join("client.ts");

    let output = Command::new(env!("CARGO_BIN_EXE_client-from-source"))
        .arg("--groovy")
        .arg("/bin/sh")
        .arg("--parser")
        .arg(fixture("fake_parser.sh"))
        .arg("--fail-fast")
        .arg("-o")
        .arg(&output_file)
        .arg(sources.path())
        .output()
        .expect("Failed to run the binary");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output_file.exists());
}

#[test]
fn test_command_line_emits_one_preamble_per_batch() {
    let sources = create_sources(vec![
        ("AController.groovy", controller_json("AController", "/a").as_str()),
        ("BController.groovy", controller_json("BController", "/b").as_str()),
    ]);

    let output = Command::new(env!("CARGO_BIN_EXE_client-from-source"))
        .arg("--groovy")
        .arg("/bin/sh")
        .arg("--parser")
        .arg(fixture("fake_parser.sh"))
        .arg("--file-header")
        .arg("-j")
        .arg("1")
        .arg(sources.path().join("AController.groovy"))
        .arg(sources.path().join("BController.groovy"))
        .output()
        .expect("Failed to run the binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("import {").count(), 1);
    assert!(stdout.starts_with(
        "// AController.groovy\nimport { SpringApi, SpringGridRequest } from '@system/springApi';\n\nclass AController"
    ));
    assert!(stdout.contains("}\n\n// BController.groovy\nclass BController extends SpringApi {\n"));
}
