mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use hatchtv_api::http::{create_router, AppState};
use hatchtv_core::config::PublishMode;
use hatchtv_core::service::{
    HatchReconciler, IntakeService, PublishSync, SystemTranscodeRunner, TranscodeDispatcher,
    VideoLibrary,
};
use hatchtv_core::store::{FtpStore, RemoteStore};
use hatchtv_core::{logging, Config};

/// HLS transcode and hatch release server
#[derive(Parser, Debug)]
#[command(name = "hatchtv", version, about)]
struct Args {
    /// Path to the configuration file; naming a file that does not exist is fatal
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration
    let config = Config::load(args.config.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("HatchTV server starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Wire services
    let library = Arc::new(VideoLibrary::new(&config.transcode.uploads_dir));
    let runner = Arc::new(SystemTranscodeRunner::new(config.transcode.clone()));
    let dispatcher = Arc::new(TranscodeDispatcher::new(runner));
    let intake = Arc::new(IntakeService::new(library.clone(), dispatcher));

    let (reconciler, publisher) = match config.publish.mode {
        PublishMode::Remote => {
            let store: Arc<dyn RemoteStore> = Arc::new(FtpStore::new(config.publish.ftp.clone()));
            info!(host = %config.publish.ftp.host, "remote publishing enabled");
            (
                Some(Arc::new(HatchReconciler::new(store.clone()))),
                Some(Arc::new(PublishSync::new(store))),
            )
        }
        PublishMode::Local => {
            info!("remote publishing disabled, local-only mode");
            (None, None)
        }
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        library,
        intake,
        reconciler,
        publisher,
    };
    let router = create_router(state);

    // 4. Serve until shutdown
    server::serve(&config, router).await
}
