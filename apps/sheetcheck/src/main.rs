//! sheetcheck - Spreadsheet validation with content-based document versioning
//!
//! The CLI wires configuration, the result database and the document
//! processor together and renders what each command produced.

mod cli;
mod display;
mod error;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::{CacheReport, CommandOutput, OutputRenderer, ResultsReport, StatusReport};
use crate::error::CliError;
use crate::setup::SystemSetup;
use clap::Parser;
use sheetcheck_config::Config;
use sheetcheck_events::{EventReceiver, EventSender};
use sheetcheck_hash::Fingerprint;
use sheetcheck_processor::{EntityExtractor, MemorySink, ResultSink};
use sheetcheck_types::{BusinessMetadata, EntityId, OutputFormat};
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    logging::init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting sheetcheck v{}", env!("CARGO_PKG_VERSION"));

    // defaults < file < environment < flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global, &cli.command);
    config.validate()?;

    let format = if cli.global.json {
        OutputFormat::Json
    } else {
        config.general.default_output
    };
    let renderer = OutputRenderer::new(format, config.general.color);

    let setup = SystemSetup::new(config);
    let (event_sender, event_receiver) = sheetcheck_events::channel();

    let output =
        execute_command_with_events(cli.command, &setup, event_sender, event_receiver).await?;

    renderer.render_result(&output)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command while draining its events into the log
async fn execute_command_with_events(
    command: Commands,
    setup: &SystemSetup,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
) -> Result<CommandOutput, CliError> {
    let mut command_future = Box::pin(execute_command(command, setup, event_sender));

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(message) = event_receiver.try_recv() {
                    logging::log_event_with_tracing(&message);
                }
                return result;
            }

            message = event_receiver.recv() => {
                if let Some(message) = message {
                    logging::log_event_with_tracing(&message);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    setup: &SystemSetup,
    event_sender: EventSender,
) -> Result<CommandOutput, CliError> {
    match command {
        Commands::Run {
            dir,
            dry_run,
            business_case,
            reporting_year,
            ..
        } => {
            let store = if dry_run {
                setup.existing_store().await?
            } else {
                Some(setup.open_store().await?)
            };
            let cache = setup.warm_cache(store.as_ref()).await?;

            let sink: Arc<dyn ResultSink> = match store {
                Some(store) if !dry_run => Arc::new(store),
                _ => Arc::new(MemorySink::new()),
            };
            let processor = setup.processor(cache, sink, event_sender);
            let source = setup.source(
                dir.as_deref(),
                BusinessMetadata {
                    business_case,
                    reporting_year,
                },
            );

            let summary = processor.process_source(&source).await?;
            Ok(CommandOutput::Summary { summary, dry_run })
        }

        Commands::Status { file, entity } => {
            let document = file
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    CliError::InvalidArguments(format!("not a file: {}", file.display()))
                })?;
            let entity = entity.map_or_else(
                || setup.entity_extractor().extract(&document),
                EntityId::new,
            );
            let fingerprint = Fingerprint::hash_file(&file).await?;

            let store = setup.existing_store().await?;
            let cache = setup.warm_cache(store.as_ref()).await?;
            let status = cache.cache_status(&entity, &document, &fingerprint);

            Ok(CommandOutput::Status(StatusReport {
                document,
                entity,
                fingerprint: fingerprint.to_hex(),
                processed: status.processed,
                version: status.version,
                latest_version: status.latest_version,
            }))
        }

        Commands::Results { entity, version } => {
            if version == Some(0) {
                return Err(CliError::InvalidArguments(
                    "document versions start at 1".to_string(),
                ));
            }
            let entity = EntityId::new(entity);
            let results = match setup.existing_store().await? {
                Some(store) => store.results_for_entity(&entity, version).await?,
                None => Vec::new(),
            };
            Ok(CommandOutput::Results(ResultsReport {
                entity,
                version,
                results,
            }))
        }

        Commands::CacheStats => {
            let store = setup.existing_store().await?;
            let cache = setup.warm_cache(store.as_ref()).await?;
            let stats = cache.statistics();
            let stored_results = match &store {
                Some(store) => store.count_results().await?,
                None => 0,
            };
            Ok(CommandOutput::Cache(CacheReport {
                entities: stats.entities,
                documents: stats.documents,
                versions: stats.versions,
                stored_results,
            }))
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if let Some(database) = &global.database {
        config.storage.database_path = Some(database.clone());
    }

    if let Commands::Run {
        force, concurrency, ..
    } = command
    {
        if *force {
            config.processing.force_reprocess = true;
        }
        if let Some(concurrency) = concurrency {
            config.processing.concurrency = *concurrency;
        }
    }
}
