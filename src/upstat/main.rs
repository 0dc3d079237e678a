use chrono::Utc;
use clap::Parser;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use unicode_width::UnicodeWidthStr;
use upstat::config::{UploadConfig, CONFIG_FILENAME};
use upstat::error::Result;
use upstat::logging;
use upstat::model::Record;
use upstat::outcome::UploadResult;
use upstat::pipeline::UploadPipeline;
use upstat::store::fs::JsonSnapshotFile;
use upstat::store::memory::InMemorySink;

mod args;
use args::{Cli, Commands};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

struct AppContext {
    dir: PathBuf,
    config: UploadConfig,
}

/// Returns Ok(false) when at least one upload failed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let ctx = init_context(&cli);

    match cli.command {
        Commands::Upload { files } => handle_upload(&ctx, &files),
        Commands::List => handle_list(&ctx),
        Commands::Config { init } => handle_config(&ctx, init),
        Commands::Demo => Ok(handle_demo(&ctx)),
    }
}

fn init_context(cli: &Cli) -> AppContext {
    let loaded = UploadConfig::load(&cli.dir);

    let log_file = cli.log_file.clone().or_else(|| {
        loaded
            .as_ref()
            .ok()
            .and_then(|config| config.log_file.as_ref())
            .map(|path| cli.dir.join(path))
    });
    if let Err(e) = logging::init(cli.verbose, log_file.as_deref()) {
        eprintln!("Warning: {}", e);
        if log_file.is_some() {
            let _ = logging::init(cli.verbose, None);
        }
    }

    let config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Config file unreadable, using defaults");
        UploadConfig::default()
    });

    AppContext {
        dir: cli.dir.clone(),
        config,
    }
}

fn open_pipeline(ctx: &AppContext) -> Result<UploadPipeline<JsonSnapshotFile>> {
    UploadPipeline::open(ctx.config.clone(), JsonSnapshotFile::new(&ctx.dir))
}

fn handle_upload(ctx: &AppContext, files: &[PathBuf]) -> Result<bool> {
    let pipeline = open_pipeline(ctx)?;
    let mut all_ok = true;

    for path in files {
        let name = upload_name(path);

        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                if let Some(rejected) = pipeline.screen(&name, meta.len()) {
                    all_ok = false;
                    print_result(&name, &rejected);
                    continue;
                }
            }
            Ok(_) => {}
            Err(e) => {
                all_ok = false;
                println!("{} {} - cannot read file: {}", "Failed".red(), path.display(), e);
                continue;
            }
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                all_ok = false;
                println!("{} {} - cannot read file: {}", "Failed".red(), path.display(), e);
                continue;
            }
        };

        let result = pipeline.upload(&name, Some(bytes.as_slice()));
        all_ok &= result.is_success();
        print_result(&name, &result);
    }

    Ok(all_ok)
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn handle_list(ctx: &AppContext) -> Result<bool> {
    let pipeline = open_pipeline(ctx)?;
    print_records(&pipeline.records());
    Ok(true)
}

fn handle_config(ctx: &AppContext, init: bool) -> Result<bool> {
    if init {
        if ctx.dir.join(CONFIG_FILENAME).exists() {
            println!("{}", "Config already exists, leaving it unchanged.".dimmed());
        } else {
            UploadConfig::default().save(&ctx.dir)?;
            println!(
                "{}",
                format!("Wrote {}", ctx.dir.join(CONFIG_FILENAME).display()).green()
            );
        }
    }

    let exts: Vec<String> = ctx.config.normalized_extensions().into_iter().collect();
    println!("allowed-extensions = {}", exts.join(","));
    println!("max-file-size-bytes = {}", ctx.config.max_file_size_bytes);
    println!(
        "decode-mode = {}",
        serde_json::to_string(&ctx.config.decode_mode)?.trim_matches('"')
    );
    if let Some(log_file) = &ctx.config.log_file {
        println!("log-file = {}", ctx.dir.join(log_file).display());
    }
    Ok(true)
}

fn handle_demo(ctx: &AppContext) -> bool {
    let pipeline = UploadPipeline::new(ctx.config.clone(), InMemorySink::new());

    let scenarios: Vec<(&str, &str, Option<Vec<u8>>)> = vec![
        ("Valid .txt file", "test.txt", Some(b"Hello World\nSecond line".to_vec())),
        ("Valid .csv file", "data.csv", Some(b"Name,Age\nJohn,30".to_vec())),
        ("Invalid file type (.pdf)", "document.pdf", Some(b"some content".to_vec())),
        ("Empty filename", "", Some(b"content".to_vec())),
        ("Missing content", "test.txt", None),
        ("Large file (> 10MB)", "large.txt", Some(vec![0u8; 11 * 1024 * 1024])),
        ("UTF-8 encoding", "utf8.txt", Some("Chinese: 你好".as_bytes().to_vec())),
        (
            "Mixed line endings",
            "mixed.txt",
            Some(b"Line1\r\nLine2\nLine3\rLine4".to_vec()),
        ),
        (
            "Special characters",
            "special.txt",
            Some("Symbols: @#$%^&*()\nEmoji: 😀🎉".as_bytes().to_vec()),
        ),
    ];

    for (i, (label, name, content)) in scenarios.iter().enumerate() {
        println!("\n{}", format!("Test {}: {}", i + 1, label).bold());
        let result = pipeline.upload(name, content.as_deref());
        print_result(name, &result);
    }

    println!(
        "\n{}",
        format!("Demo complete: {} record(s) stored", pipeline.len()).dimmed()
    );
    true
}

fn print_result(name: &str, result: &UploadResult) {
    let label = if name.is_empty() { "<unnamed>" } else { name };
    match result.record() {
        Some(record) => println!(
            "{} {}: {} lines, {} words ({})",
            "Uploaded".green(),
            label,
            record.line_count(),
            record.word_count(),
            record.id().to_string().dimmed()
        ),
        None => println!(
            "{} {} - {}",
            "Failed".red(),
            label,
            result.error_message().unwrap_or_default()
        ),
    }
}

const NAME_WIDTH: usize = 32;
const TIME_WIDTH: usize = 16;

fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    for (i, record) in records.iter().enumerate() {
        let idx = format!("{:>3}. ", i + 1);
        let name = truncate_to_width(record.file_name(), NAME_WIDTH);
        let padding = NAME_WIDTH.saturating_sub(name.width());
        let counts = format!(
            "{:>6} lines {:>7} words {:>9} bytes",
            record.line_count(),
            record.word_count(),
            record.byte_size()
        );

        println!(
            "{}{}{}  {}  {}",
            idx.yellow(),
            name,
            " ".repeat(padding),
            counts,
            format_time_ago(record.processed_at()).dimmed()
        );
    }

    println!("\n{}", format!("Total records: {}", records.len()).dimmed());
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
