//! Markspan - edit restricted rich text markup from the command line.
//!
//! # Usage
//!
//! ```bash
//! markspan notes.html -e span:0:5:bold
//! echo 'Hello World' | markspan -e span:6:11:b -e 'insert:11:!'
//! markspan notes.html --format runs
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use markspan::config::{
    ConfigFlags, OutputFormat, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use markspan::document::{InlineSpan, ParseMode};
use markspan::editor::EditorBuffer;
use markspan::perf;
use markspan::script::EditCommand;

/// Apply edits to rich text markup and print the result
#[derive(Parser, Debug)]
#[command(name = "markspan", version, about, long_about = None)]
struct Cli {
    /// Markup file to read, or - for stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Edit to apply, in order (insert:OFFSET:TEXT, delete:START:END, span:START:END:STYLE)
    #[arg(short = 'e', long = "edit", value_name = "CMD")]
    edits: Vec<EditCommand>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Repair unbalanced tags instead of rejecting them
    #[arg(long)]
    lenient: bool,

    /// Print timing for each step to stderr
    #[arg(long)]
    perf: bool,

    /// Write every edit event to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn read_input(file: Option<&Path>) -> Result<String> {
    let mut markup = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    // Trailing newline of the file itself.
    if markup.ends_with('\n') {
        markup.pop();
        if markup.ends_with('\r') {
            markup.pop();
        }
    }
    Ok(markup)
}

fn describe_run(run: &InlineSpan) -> String {
    let style = run.style();
    let mut flags = Vec::new();
    if style.bold {
        flags.push("bold".to_string());
    }
    if style.italic {
        flags.push("italic".to_string());
    }
    if style.underline {
        flags.push("underline".to_string());
    }
    if let Some(fg) = style.fg {
        flags.push(format!("#{:02x}{:02x}{:02x}", fg.r, fg.g, fg.b));
    }
    if flags.is_empty() {
        flags.push("plain".to_string());
    }
    format!("[{}] {:?}", flags.join(" "), run.text())
}

fn render(buffer: &mut EditorBuffer, format: OutputFormat) -> Result<String> {
    let _scope = perf::scope("render");
    Ok(match format {
        OutputFormat::Markup => buffer.markup(),
        OutputFormat::Text => buffer.text(),
        OutputFormat::Runs => buffer
            .document()
            .runs()
            .iter()
            .map(describe_run)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&buffer.document().runs())
            .context("Failed to encode runs")?,
    })
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        lenient: cli.lenient,
        perf: cli.perf,
        format: cli.format,
        render_debug_log: cli.render_debug_log.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("MARKSPAN_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize edit debug log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let markup = read_input(cli.file.as_deref())?;
    let mode = if effective.lenient {
        ParseMode::Lenient
    } else {
        ParseMode::Strict
    };
    let mut buffer = EditorBuffer::empty();
    buffer
        .load_with(Some(&markup), mode)
        .context("Failed to parse markup")?;

    for (index, edit) in cli.edits.iter().enumerate() {
        edit.apply(&mut buffer)
            .with_context(|| format!("Edit #{} ({edit:?}) failed", index + 1))?;
    }

    let output = render(&mut buffer, effective.format.unwrap_or(OutputFormat::Markup))?;
    println!("{output}");
    Ok(())
}
