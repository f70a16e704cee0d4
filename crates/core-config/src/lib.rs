//! Configuration loading and parsing.
//!
//! Parses `rawline.toml` (or an override path provided by the binary). Every
//! table and key is optional; absent keys take their defaults and unknown
//! keys are ignored. A missing or unparsable file yields the defaults.
//!
//! Raw values are kept as read. [`Config`] exposes the effective values,
//! clamped into the range the line editor accepts.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::info;

const FILE_NAME: &str = "rawline.toml";
const FALLBACK_MASK_GLYPH: u8 = b'*';
const FALLBACK_COLUMNS: u16 = 80;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Bounded wait after ESC before it is taken as a lone Escape key.
    #[serde(default = "InputConfig::default_escape_timeout_ms")]
    pub escape_timeout_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            escape_timeout_ms: Self::default_escape_timeout_ms(),
        }
    }
}

impl InputConfig {
    const fn default_escape_timeout_ms() -> u64 {
        25
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_mask_glyph")]
    pub mask_glyph: String,
    /// Width assumed when the terminal cannot be queried.
    #[serde(default = "DisplayConfig::default_columns")]
    pub default_columns: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mask_glyph: Self::default_mask_glyph(),
            default_columns: Self::default_columns(),
        }
    }
}

impl DisplayConfig {
    fn default_mask_glyph() -> String {
        "*".to_string()
    }
    const fn default_columns() -> u16 {
        FALLBACK_COLUMNS
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    #[serde(default = "TerminalConfig::default_resize_poll_ms")]
    pub resize_poll_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            resize_poll_ms: Self::default_resize_poll_ms(),
        }
    }
}

impl TerminalConfig {
    const fn default_resize_poll_ms() -> u64 {
        250
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Working directory first, then the platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("rawline").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            info!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.file.input.escape_timeout_ms)
    }

    pub fn resize_poll(&self) -> Duration {
        Duration::from_millis(self.file.terminal.resize_poll_ms.max(1))
    }

    /// Effective mask glyph: a single printable ASCII character, else `*`.
    pub fn mask_glyph(&self) -> u8 {
        match self.file.display.mask_glyph.as_bytes() {
            [b] if (0x20..=0x7e).contains(b) => *b,
            other => {
                info!(target: "config", len = other.len(), "mask_glyph_clamped");
                FALLBACK_MASK_GLYPH
            }
        }
    }

    /// Effective fallback width, never zero.
    pub fn default_columns(&self) -> u16 {
        match self.file.display.default_columns {
            0 => {
                info!(target: "config", "default_columns_clamped");
                FALLBACK_COLUMNS
            }
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn load_str(content: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.source.is_none());
        assert_eq!(cfg.escape_timeout(), Duration::from_millis(25));
        assert_eq!(cfg.resize_poll(), Duration::from_millis(250));
        assert_eq!(cfg.mask_glyph(), b'*');
        assert_eq!(cfg.default_columns(), 80);
    }

    #[test]
    fn parses_all_tables() {
        let cfg = load_str(
            "[input]\nescape_timeout_ms = 60\n\
             [display]\nmask_glyph = \"#\"\ndefault_columns = 132\n\
             [terminal]\nresize_poll_ms = 100\n",
        );
        assert_eq!(cfg.escape_timeout(), Duration::from_millis(60));
        assert_eq!(cfg.mask_glyph(), b'#');
        assert_eq!(cfg.default_columns(), 132);
        assert_eq!(cfg.resize_poll(), Duration::from_millis(100));
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = load_str("[display]\ndefault_columns = 40\nunknown_key = true\n");
        assert_eq!(cfg.default_columns(), 40);
        assert_eq!(cfg.mask_glyph(), b'*');
        assert_eq!(cfg.file.input, InputConfig::default());
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let cfg = load_str("[input\nescape_timeout_ms = ");
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = load_str("[display]\nmask_glyph = \"ab\"\ndefault_columns = 0\n");
        assert_eq!(cfg.mask_glyph(), b'*');
        assert_eq!(cfg.default_columns(), 80);
        let cfg = load_str("[display]\nmask_glyph = \"\\t\"\n");
        assert_eq!(cfg.mask_glyph(), b'*');
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let cfg = load_str("[display]\ndefault_columns = 0\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            assert_eq!(cfg.default_columns(), 80);
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("default_columns_clamped"));
    }
}
