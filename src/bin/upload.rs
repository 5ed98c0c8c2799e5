// src/bin/upload.rs
// DOCUMENTATION: Photographer upload tool
// PURPOSE: Create a gallery from a local folder of photos
//
// Usage: upload <dir> --name <gallery> --photographer <name> [--brand-color #rrggbb] [--fail-fast]

use anyhow::{bail, Context, Result};
use artydrop::config::{self, Config};
use artydrop::db::PgGalleryStore;
use artydrop::services::{
    content_type_for, BatchRunner, FailurePolicy, SupabaseStorage, UploadFile, UploadReport,
    UploadService,
};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug)]
struct UploadArgs {
    dir: PathBuf,
    name: String,
    photographer: String,
    brand_color: Option<String>,
    fail_fast: bool,
}

fn usage() -> &'static str {
    "upload <dir> --name <gallery> --photographer <name> [--brand-color #rrggbb] [--fail-fast]"
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<UploadArgs> {
    let mut dir = None;
    let mut name = None;
    let mut photographer = None;
    let mut brand_color = None;
    let mut fail_fast = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => name = Some(args.next().context("--name needs a value")?),
            "--photographer" => {
                photographer = Some(args.next().context("--photographer needs a value")?)
            }
            "--brand-color" => {
                brand_color = Some(args.next().context("--brand-color needs a value")?)
            }
            "--fail-fast" => fail_fast = true,
            "-h" | "--help" => bail!("Usage: {}", usage()),
            flag if flag.starts_with("--") => bail!("Unknown option {}\nUsage: {}", flag, usage()),
            _ if dir.is_none() => dir = Some(PathBuf::from(&arg)),
            _ => bail!("Unexpected argument {}\nUsage: {}", arg, usage()),
        }
    }

    Ok(UploadArgs {
        dir: dir.with_context(|| format!("Missing <dir>\nUsage: {}", usage()))?,
        name: name.with_context(|| format!("Missing --name\nUsage: {}", usage()))?,
        photographer: photographer
            .with_context(|| format!("Missing --photographer\nUsage: {}", usage()))?,
        brand_color,
        fail_fast,
    })
}

/// Image files directly inside `dir`, sorted by name, hidden files skipped
fn collect_photo_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .filter(|entry| {
            content_type_for(&entry.file_name().to_string_lossy()) != "application/octet-stream"
        })
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();
    Ok(paths)
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Reading {}", path.display()))?;
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        files.push(UploadFile { filename, data });
    }
    Ok(files)
}

fn print_summary(report: &UploadReport, base_url: &str) {
    let gallery = &report.gallery;

    println!("\n{}📋 Upload Summary{}", BOLD, RESET);
    println!("──────────────────────────────────────────────────────────────");
    println!("  • Gallery: {} ({})", gallery.name, gallery.id);
    println!(
        "  • Uploaded: {}{}/{}{}",
        GREEN, report.uploaded, gallery.declared_photo_count, RESET
    );
    println!("  • Price: {}", gallery.price);
    println!("  • Duration: {:.1}s", report.duration_seconds);

    if !report.failures.is_empty() {
        println!("\n{}⚠️  {} files failed:{}", YELLOW, report.failures.len(), RESET);
        for failure in &report.failures {
            println!("    {}{}{}: {}", RED, failure.label, RESET, failure.error);
        }
    }

    if report.cancelled {
        println!("\n{}⏹  Upload cancelled, gallery is incomplete{}", YELLOW, RESET);
    } else if report.aborted {
        println!("\n{}⏹  Upload stopped at the first failure (--fail-fast){}", YELLOW, RESET);
    }

    println!("──────────────────────────────────────────────────────────────");
    println!(
        "\n{}🔗 Share: {}/galleries/{}{}",
        CYAN, base_url, gallery.id, RESET
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let paths = collect_photo_paths(&args.dir)?;
    if paths.is_empty() {
        bail!("No photos found in {}", args.dir.display());
    }
    println!(
        "\n{}📷 Found {} photos in {}{}",
        BOLD,
        paths.len(),
        args.dir.display(),
        RESET
    );
    let files = read_files(&paths).await?;

    let pool = config::init_db_pool(&config)
        .await
        .context("Connecting to the database")?;
    if config.apply_schema {
        config::apply_schema(&pool).await.context("Applying schema")?;
    }
    let store = PgGalleryStore::new(pool);
    let storage = SupabaseStorage::new(
        &config.supabase_url,
        config.supabase_service_key.clone(),
        config.storage_bucket.clone(),
        config.http_timeout_secs,
    )?;

    let policy = if args.fail_fast {
        FailurePolicy::AbortOnError
    } else {
        config.upload_failure_policy
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{}Cancelling upload...{}", YELLOW, RESET);
            ctrl_c.cancel();
        }
    });

    let runner = BatchRunner::new(config.batch_concurrency, policy).with_cancellation(cancel);

    println!("{}🚀 Uploading...{}", CYAN, RESET);
    let report = UploadService::create_gallery_with_photos(
        &store,
        &storage,
        &runner,
        &args.name,
        &args.photographer,
        args.brand_color.as_deref(),
        files,
    )
    .await?;

    print_summary(&report, &config.public_base_url);

    if !report.failures.is_empty() || report.cancelled {
        std::process::exit(2);
    }
    Ok(())
}
