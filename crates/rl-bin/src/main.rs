//! rawline demo entrypoint: reads a username, then a masked password.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{ReadLineRequest, ReadOutcome, Session};
use core_config::{Config, load_from};
use core_events::{BELLS_EMITTED, KEYS_DECODED, RESIZE_EVENTS, UNKNOWN_SEQUENCES};
use core_input::{InputSource, KeyDecoder, ThreadedSource};
use core_terminal::{CrosstermBackend, TerminalBackend, spawn_resize_watcher};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "rawline.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "rawline", version, about = "Raw-mode line editor demo")]
struct Args {
    /// Optional configuration file path (overrides discovery of `rawline.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Text placed in the username line before editing starts.
    #[arg(long = "username")]
    username: Option<String>,
    /// Mask glyph for the password prompt (overrides `display.mask_glyph`).
    #[arg(long = "mask")]
    mask: Option<char>,
}

/// Route logs to `rawline.log`, recreated per run. The returned guard must
/// outlive every log call.
fn configure_logging() -> Result<Option<WorkerGuard>> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Ok(Some(guard)),
        // Global tracing subscriber already installed; drop guard so writer shuts down.
        Err(_err) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn mask_glyph(args: &Args, config: &Config) -> u8 {
    match args.mask {
        Some(c) if c.is_ascii_graphic() || c == ' ' => c as u8,
        Some(c) => {
            warn!(target: "config", glyph = ?c, "mask_override_ignored");
            config.mask_glyph()
        }
        None => config.mask_glyph(),
    }
}

fn read_field<S, W, B>(session: &mut Session<S, W, B>, request: &ReadLineRequest) -> Result<String>
where
    S: InputSource,
    W: Write,
    B: TerminalBackend,
{
    match session.read_line(request)? {
        ReadOutcome::Submitted(line) => Ok(line.to_string_lossy()),
        ReadOutcome::Rejected => {
            warn!(target: "runtime", "line_rejected_at_capacity");
            Ok(String::new())
        }
    }
}

fn run(args: &Args, config: &Config) -> Result<(String, String)> {
    let columns = config.default_columns();
    let backend = CrosstermBackend::new(columns);
    let (feed, watcher) = spawn_resize_watcher(config.resize_poll(), columns)
        .context("starting resize watcher")?;
    let source = ThreadedSource::stdin().context("starting input reader")?;
    let mut session = Session::new(source, io::stdout(), backend)
        .with_decoder(KeyDecoder::new(config.escape_timeout()))
        .with_resize_feed(feed)
        .with_mask_glyph(mask_glyph(args, config));

    let mut username = ReadLineRequest::new("Username : ");
    if let Some(prefill) = args.username.as_deref() {
        username = username.prefill(prefill.as_bytes());
    }
    let user = read_field(&mut session, &username)?;
    let pass = read_field(&mut session, &ReadLineRequest::new("Password : ").masked(true))?;
    watcher.stop();
    Ok((user, pass))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging()?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    println!();
    let result = run(&args, &config);

    info!(
        target: "runtime",
        keys = KEYS_DECODED.load(Ordering::Relaxed),
        unknown_sequences = UNKNOWN_SEQUENCES.load(Ordering::Relaxed),
        bells = BELLS_EMITTED.load(Ordering::Relaxed),
        resizes = RESIZE_EVENTS.load(Ordering::Relaxed),
        "shutdown"
    );

    let (user, pass) = result?;
    println!("\nOUTPUT :- \nUSERNAME = {user}\nPASSWORD = {pass}");
    Ok(())
}
