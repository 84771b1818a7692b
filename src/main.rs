use log::info;

use modelplane::app::ModelplaneApp;
use modelplane::config::ViewerConfig;
use modelplane::logging::{init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    info!("modelplane version {}", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::default().with_env();
    ModelplaneApp::new(config)?.run()
}
