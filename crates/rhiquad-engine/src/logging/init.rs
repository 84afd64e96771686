use std::sync::Once;

/// Logger configuration for the demo binary and tests.
///
/// `env_filter` uses `env_logger` directive syntax, e.g.
/// `"rhiquad_engine=debug,wgpu_core=warn"`. When unset, `RUST_LOG` is
/// consulted before falling back to `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Crates whose info-level output drowns the frame loop.
const NOISY_TARGETS: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

static INIT: Once = Once::new();

fn configure_default(builder: &mut env_logger::Builder) {
    builder.filter_level(log::LevelFilter::Info);
    for target in NOISY_TARGETS {
        builder.filter_module(target, log::LevelFilter::Warn);
    }
}

/// Builder for `config`; `rust_log` is the value of `RUST_LOG`, if any.
fn builder(config: &LoggingConfig, rust_log: Option<String>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    match config.env_filter.clone().or(rust_log) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => configure_default(&mut builder),
    }
    builder.write_style(config.write_style);
    builder
}

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = builder(&config, std::env::var("RUST_LOG").ok());
        if let Err(e) = builder.try_init() {
            eprintln!("logger already installed: {e}");
        }
        log::debug!("logging initialized");
    });
}
