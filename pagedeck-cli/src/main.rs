//! pagedeck - Collect PDF pages and images into one reordered PDF.

mod cli;

use clap::Parser;
use std::io::{self, Write};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pagedeck::EditorSession;
use pagedeck::assemble::AssembleOptions;
use pagedeck::config::{Config, OverwriteMode};
use pagedeck::error::PageDeckError;
use pagedeck::io::{InputReader, PdfWriter};
use pagedeck::output::{
    ExportPlan, OutputFormatter, display_export_summary, display_plan, display_upload_report,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PageDeckError> {
    cli.validate()?;
    let config = cli.to_config()?;

    // keep stdout clean for the JSON plan
    let formatter = if config.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pagedeck::NAME, pagedeck::VERSION));
    }

    formatter.info(&format!("Reading {} file(s)...", config.inputs.len()));
    let (files, read_stats) = InputReader::new()
        .read_all_with_stats(&config.inputs)
        .await?;
    formatter.debug(&format!(
        "Read {} in {:.2}s",
        read_stats.format_total_size(),
        read_stats.total_time.as_secs_f64()
    ));

    let mut session = EditorSession::new().with_image_sizing(config.image_sizing);
    session.set_assemble_options(AssembleOptions {
        metadata: config.metadata.clone(),
        compression: config.compression,
    });

    let report = session.upload(files).await?;
    display_upload_report(&formatter, &report);
    if report.is_empty() {
        return Err(PageDeckError::invalid_config("No supported input files"));
    }

    if let Some(order) = &config.order {
        session.reorder(order)?;
        formatter.debug(&format!("Kept {} in the requested order", session.page_count_label()));
    }
    if let Some(remove) = &config.remove {
        let removed = session.remove_pages(remove)?;
        formatter.debug(&format!("Removed {removed} page(s)"));
    }
    if session.collection().is_empty() {
        return Err(PageDeckError::EmptyDocument);
    }

    if config.dry_run {
        let plan = ExportPlan::new(&config, session.pages(), report.files_skipped);
        if config.json {
            let json = plan
                .to_json()
                .map_err(|e| PageDeckError::other(format!("Failed to serialize plan: {e}")))?;
            println!("{json}");
        } else {
            display_plan(&formatter, &plan);
            formatter.success("Dry run completed successfully");
            formatter.info("  Run without --dry-run to write the document");
        }
        return Ok(());
    }

    let writer = PdfWriter::new();
    writer.can_write(&config.output).await?;
    handle_output_overwrite(&config, &formatter, &writer).await?;

    formatter.info(&format!("Assembling {}...", session.page_count_label()));
    let exported = session.export().await?;
    debug!("Exported {} as {}", exported.file_name, exported.mime_type);

    let written = writer.write(&exported.bytes, &config.output).await?;
    display_export_summary(&formatter, &exported, &written);

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    writer: &PdfWriter,
) -> Result<(), PageDeckError> {
    if !writer.exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PageDeckError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // no one to ask
            if formatter.is_quiet() {
                return Err(PageDeckError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PageDeckError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(PageDeckError::Cancelled),
            }
        }
    }
}
