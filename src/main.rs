/*!
# Kansha - A Small Gratitude Journal

Record up to three things you are grateful for each day, look back at any
past day, and see which days of a month you wrote something.

## Usage

```text
kansha [OPTIONS] [COMMAND]

Commands:
  today     Show today's entry (default)
  write     Save up to three gratitude lines for a day
  show      Show the entry for a specific day
  calendar  Show a month with recorded days marked
  clear     Delete every entry
  profile   View or change profile and display preferences
  reminder  Manage the daily reminder

Options:
  -v, --verbose              Enable debug logging
      --log-format <FORMAT>  Log output format [possible values: text, json]
  -h, --help                 Print help
  -V, --version              Print version
```

## Configuration

- `KANSHA_DIR`: where preferences and entries are stored (defaults to `~/.kansha`)
- `KANSHA_LANG_DIR`: a directory of `<code>.json` language files
- `KANSHA_LOG_FORMAT`: `text` or `json`
- `RUST_LOG`: log filter (defaults to `warn`)
*/

use clap::Parser;
use kansha::app::App;
use kansha::cli::CliArgs;
use kansha::config::{self, Config, LogFormat};
use kansha::constants::{
    DEFAULT_LOG_LEVEL, ENV_VAR_NO_COLOR, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
    VERBOSE_LOG_LEVEL,
};
use kansha::errors::AppResult;
use kansha::storage::FilePreferences;
use std::io::{self, IsTerminal};
use tracing::{debug, error, info, info_span};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// The main entry point for the kansha application.
///
/// 1. Parses command-line arguments and loads configuration
/// 2. Initializes logging inside an `app_invocation` span
/// 3. Ensures the data directory exists and opens preference storage
/// 4. Runs the requested command
///
/// # Errors
///
/// Configuration, storage and I/O errors are logged once and returned.
fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    let config = Config::load();

    let log_format = match args.log_format.as_deref() {
        Some(format) => format.parse()?,
        None => config.as_ref().map(|c| c.log_format).unwrap_or_default(),
    };
    init_tracing(log_format, args.verbose);

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    let result = config.and_then(|config| run(args, config));
    if let Err(e) = &result {
        error!(error = %e, "kansha failed");
    }
    result
}

fn run(args: CliArgs, config: Config) -> AppResult<()> {
    debug!(?args, "CLI arguments");
    config.validate()?;
    debug!(?config, "Configuration loaded");

    config::ensure_data_directory_exists(&config.data_dir)?;
    let storage = FilePreferences::open(&config.data_dir);

    let mut app = App::open(storage, config.lang_dir.clone(), color_enabled());
    let command = args.command();
    app.run(command, &mut io::stdin().lock(), &mut io::stdout().lock())?;

    info!("Command completed");
    Ok(())
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let default_level = if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(io::stderr().is_terminal())
                    .with_writer(io::stderr),
            )
            .init(),
    }
}

/// Color is used only on a terminal, and never with `NO_COLOR` or `TERM=dumb`.
fn color_enabled() -> bool {
    let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
    io::stdout().is_terminal() && std::env::var_os(ENV_VAR_NO_COLOR).is_none() && !term_is_dumb
}
