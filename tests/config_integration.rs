use std::path::PathBuf;

use markspan::config::{ConfigFlags, OutputFormat, load_config_flags, parse_flag_tokens};

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markspanrc");
    let content = r#"
# comment
--lenient

--format text

--render-debug-log=edits.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.lenient);
    assert_eq!(flags.format, Some(OutputFormat::Text));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("edits.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markspanrc");
    let content = "--lenient\n--format text\n--render-debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_flags = parse_flag_tokens(&args(&["markspan", "--format", "json", "--perf"]));

    let effective = file_flags.union(&cli_flags);
    assert!(effective.lenient, "file flags should remain enabled");
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(effective.format, Some(OutputFormat::Json), "cli should override format");
    assert_eq!(
        effective.render_debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let flags = parse_flag_tokens(&args(&[
        "markspan",
        "--format=runs",
        "--render-debug-log=edits.log",
    ]));
    assert_eq!(flags.format, Some(OutputFormat::Runs));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("edits.log")));
}

#[test]
fn test_missing_config_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        lenient: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.lenient);
    assert!(merged.perf);
    assert_eq!(merged.format, None);
}
