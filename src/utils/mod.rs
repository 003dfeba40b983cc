pub mod build_info;
pub mod parse;
pub mod paths;

use std::fs;
use std::path::Path;
use std::sync::Once;

use crate::errors::Result;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "booking_core=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        // A subscriber installed elsewhere (tests, embedding apps) wins.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
