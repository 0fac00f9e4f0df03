//! jpeg-meta - Print EXIF, GPS and IPTC metadata of JPEG files.
//!
//! This binary reads each file given on the command line, prints its
//! metadata, and optionally writes out thumbnails and previews.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jpeg_meta::{
    config::{Config, OutputFormat},
    FileSource, JpegReader, LoadedJpeg, MetadataResult, PreviewRenderer,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    for dir in [&config.thumbnail_dir, &config.preview_dir].into_iter().flatten() {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            error!("Failed to create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let renderer = match PreviewRenderer::new(
        config.preview_size,
        config.preview_size,
        config.preview_quality,
    ) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = Arc::new(FileSource::new());
    let reader = if config.worker {
        JpegReader::with_worker(source)
    } else {
        JpegReader::new(source)
    };

    let mut failures = 0usize;
    for file in &config.files {
        if let Err(e) = process_file(&config, &reader, renderer, file).await {
            error!("{}: {}", file.display(), e);
            failures += 1;
        }
    }

    if let Err(e) = reader.shutdown().await {
        warn!("Worker did not shut down cleanly: {}", e);
    }

    if failures > 0 {
        info!("{} of {} file(s) failed", failures, config.files.len());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so stdout carries only metadata.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "jpeg_meta=debug" } else { "jpeg_meta=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Per-file Processing
// =============================================================================

async fn process_file(
    config: &Config,
    reader: &JpegReader,
    renderer: PreviewRenderer,
    file: &Path,
) -> Result<(), String> {
    let id = file.to_string_lossy();
    let loaded = reader.load(&id).await.map_err(|e| e.to_string())?;

    let metadata = loaded.metadata.as_ref().map_err(|e| e.to_string())?;
    print_metadata(config.format, file, metadata)?;

    if let (Some(path), Some(thumbnail)) = (config.thumbnail_path(file), &metadata.thumbnail) {
        tokio::fs::write(&path, thumbnail)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        debug!(path = %path.display(), size = thumbnail.len(), "Wrote thumbnail");
    }

    if let Some(path) = config.preview_path(file) {
        let preview = render_preview(renderer, &loaded).await?;
        tokio::fs::write(&path, &preview)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        debug!(path = %path.display(), size = preview.len(), "Wrote preview");
    }

    Ok(())
}

async fn render_preview(
    renderer: PreviewRenderer,
    loaded: &LoadedJpeg,
) -> Result<bytes::Bytes, String> {
    let bytes = loaded.bytes.clone();
    let metadata = loaded.metadata.clone().unwrap_or_default();

    tokio::task::spawn_blocking(move || renderer.render(&metadata, &bytes))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

// =============================================================================
// Output
// =============================================================================

fn print_metadata(format: OutputFormat, file: &Path, metadata: &MetadataResult) -> Result<(), String> {
    match format {
        OutputFormat::Text => {
            println!("== {} ==", file.display());
            print!("{}", format_text(metadata));
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "file": file.display().to_string(),
                "metadata": metadata,
            });
            let line = serde_json::to_string(&json).map_err(|e| e.to_string())?;
            println!("{}", line);
        }
    }
    Ok(())
}

/// One `section.Name: value` line per entry, sections in a fixed order.
fn format_text(metadata: &MetadataResult) -> String {
    let mut out = String::new();

    for (name, value) in &metadata.exif {
        out.push_str(&format!("exif.{}: {}\n", name, value));
    }
    for (name, value) in &metadata.gps {
        out.push_str(&format!("gps.{}: {}\n", name, value));
    }
    for (name, value) in &metadata.iptc {
        out.push_str(&format!("iptc.{}: {}\n", name, value));
    }
    if let Some(ref thumbnail) = metadata.thumbnail {
        out.push_str(&format!("thumbnail: {} bytes\n", thumbnail.len()));
    }

    out
}
