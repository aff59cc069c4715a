//! Splits document codec
//!
//! Loads a [`Game`] from a splits document and writes it back. Documents are JSON
//! by default; a `.yml` or `.yaml` extension selects the YAML encoding of the same
//! schema.
//!
//! ```rust,no_run
//! use splitkeeper::Timer;
//!
//! fn practice() -> splitkeeper::Result<()> {
//!     let mut game = splitkeeper::load("splits/sm64-16star.json")?;
//!     {
//!         let mut timer = Timer::new(&mut game)?;
//!         timer.start();
//!         // ... drive the timer
//!     }
//!     splitkeeper::save(&game)
//! }
//! ```
//!
//! Documents carrying a `_schemaVersion` marker belong to the generic interchange
//! schema and are rejected with [`SplitsError::UnsupportedSchema`].

mod native;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::game::Game;
use crate::{Result, SplitsError};
use native::NativeDocument;

/// Key marking a document in the generic interchange schema.
pub const SCHEMA_VERSION_KEY: &str = "_schemaVersion";

/// Encoding of a splits document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the encoding from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Outcome of inspecting the top level of a document.
enum Schema {
    Native,
    Generic(String),
}

/// Load a game from the document at `path`.
///
/// The returned game remembers `path` for [`save`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Game> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    info!(path = %path.display(), ?format, "Loading splits document");

    let bytes = std::fs::read(path).map_err(|e| SplitsError::unreadable(path.to_path_buf(), e))?;
    let text = decode_utf8(path, bytes)?;

    let game = match format {
        DocumentFormat::Json => load_json(path, &text)?,
        DocumentFormat::Yaml => load_yaml(path, &text)?,
    };
    debug!(splits = game.split_count(), attempts = game.attempt_count, "Loaded splits document");
    Ok(game)
}

/// Save `game` to [`Game::path`].
///
/// The document is written to a temporary file beside the target and renamed
/// into place, so a failed save leaves any previous document intact.
pub fn save(game: &Game) -> Result<()> {
    let path = game.path.as_path();
    let format = DocumentFormat::from_path(path);
    let document = NativeDocument::from_game(game);

    let mut text = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(&document)?,
        DocumentFormat::Yaml => serde_yaml_ng::to_string(&document)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), ?format, splits = game.split_count(), "Saved splits document");
    Ok(())
}

/// [`load`] on Tokio's blocking pool.
pub async fn load_async<P: AsRef<Path>>(path: P) -> Result<Game> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || load(path)).await?
}

/// [`save`] on Tokio's blocking pool. Saves a snapshot of `game` taken on call.
pub async fn save_async(game: &Game) -> Result<()> {
    let game = game.clone();
    tokio::task::spawn_blocking(move || save(&game)).await?
}

fn load_json(path: &Path, text: &str) -> Result<Game> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| json_malformed(path, &e))?;
    let schema = match &value {
        serde_json::Value::Object(map) => match map.get(SCHEMA_VERSION_KEY) {
            Some(serde_json::Value::String(version)) => Schema::Generic(version.clone()),
            Some(other) => Schema::Generic(other.to_string()),
            None => Schema::Native,
        },
        _ => return Err(not_an_object(path)),
    };
    reject_generic(path, schema)?;

    // Parse the text again so field errors keep their position
    let document: NativeDocument =
        serde_json::from_str(text).map_err(|e| json_malformed(path, &e))?;
    document.into_game(path.to_path_buf())
}

fn load_yaml(path: &Path, text: &str) -> Result<Game> {
    let value: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(text).map_err(|e| yaml_malformed(path, &e))?;
    if !value.is_mapping() {
        return Err(not_an_object(path));
    }
    let schema = match value.get(SCHEMA_VERSION_KEY) {
        Some(version) => Schema::Generic(yaml_scalar(version)),
        None => Schema::Native,
    };
    reject_generic(path, schema)?;

    let document: NativeDocument =
        serde_yaml_ng::from_str(text).map_err(|e| yaml_malformed(path, &e))?;
    document.into_game(path.to_path_buf())
}

fn reject_generic(path: &Path, schema: Schema) -> Result<()> {
    match schema {
        Schema::Native => Ok(()),
        Schema::Generic(version) => {
            warn!(path = %path.display(), %version, "Generic schema documents are not supported");
            Err(SplitsError::unsupported_schema(path.to_path_buf(), version))
        }
    }
}

fn yaml_scalar(value: &serde_yaml_ng::Value) -> String {
    match value {
        serde_yaml_ng::Value::String(s) => s.clone(),
        serde_yaml_ng::Value::Number(n) => n.to_string(),
        serde_yaml_ng::Value::Bool(b) => b.to_string(),
        _ => "unknown".to_string(),
    }
}

fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match valid.iter().rposition(|&b| b == b'\n') {
            Some(newline) => valid.len() - newline,
            None => valid.len() + 1,
        };
        SplitsError::malformed(path.to_path_buf(), "invalid UTF-8", line, column)
    })
}

fn not_an_object(path: &Path) -> SplitsError {
    SplitsError::malformed(path.to_path_buf(), "expected a document object", 1, 1)
}

fn json_malformed(path: &Path, error: &serde_json::Error) -> SplitsError {
    SplitsError::malformed(
        path.to_path_buf(),
        strip_position(&error.to_string()),
        error.line(),
        error.column(),
    )
}

fn yaml_malformed(path: &Path, error: &serde_yaml_ng::Error) -> SplitsError {
    let (line, column) = error.location().map_or((0, 0), |loc| (loc.line(), loc.column()));
    SplitsError::malformed(path.to_path_buf(), strip_position(&error.to_string()), line, column)
}

/// Drop the parser's trailing " at line X column Y"; the error carries it already.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let write_failed = |e: std::io::Error| SplitsError::write_failed(path.to_path_buf(), e);

    let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(write_failed)?;
    file.write_all(contents).map_err(write_failed)?;
    file.as_file().sync_all().map_err(write_failed)?;
    file.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
