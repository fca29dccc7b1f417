use std::path::PathBuf;
use std::time::Duration;

use crate::audio::AudioFormat;
use crate::assets::AssetPath;

/// Fatal problems with the pipeline's inputs. Raised before any work starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("word bank not found at {0}. Run `spellbee-audio export` first.")]
    WordBankNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid difficulty key {0:?}: expected a positive decimal integer without leading zeros")]
    InvalidDifficulty(String),
    #[error("invalid word {word:?} at difficulty {difficulty}: words must be non-empty lowercase a-z")]
    InvalidWord { word: String, difficulty: u32 },
    #[error("difficulty {0:?} appears more than once in the word bank")]
    DuplicateDifficulty(String),
    #[error("word {word:?} is listed twice at difficulty {difficulty}")]
    DuplicateWord { word: String, difficulty: u32 },
    #[error("word bank has no difficulty levels")]
    EmptyWordBank,
    #[error("line {line}: {message}")]
    Authoring { line: usize, message: String },
    #[error("invalid phrase key {key:?}: keys must be non-empty [a-z0-9_]")]
    InvalidPhraseKey { key: String },
    #[error("phrase key {key:?} appears twice in {scope}")]
    DuplicatePhraseKey { key: String, scope: String },
    #[error("phrase {key:?} has empty text")]
    EmptyPhraseText { key: String },
    #[error("asset directory not found: {0}")]
    AssetRootNotFound(PathBuf),
}

/// A backend failed to turn one piece of text into audio.
#[derive(thiserror::Error, Debug)]
#[error("failed to synthesize {text:?}: {cause}")]
pub struct SynthesisError {
    pub text: String,
    #[source]
    pub cause: SynthesisCause,
}

impl SynthesisError {
    pub fn new(text: impl Into<String>, cause: SynthesisCause) -> Self {
        Self {
            text: text.into(),
            cause,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SynthesisCause {
    #[error("backend program {0:?} not found on PATH")]
    BackendNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("backend exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("backend timed out after {0:?}")]
    TimedOut(Duration),
    #[error("backend produced no audio")]
    EmptyOutput,
    #[error("WAV encoding error: {0}")]
    Encoding(#[from] hound::Error),
}

/// Why a single asset could not be materialized. Never fatal to a run.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("backend produced {produced} but {path} declares {declared}")]
    FormatMismatch {
        path: AssetPath,
        produced: AudioFormat,
        declared: AudioFormat,
    },
    #[error("failed to normalize WAV for {path}: {source}")]
    Normalize {
        path: AssetPath,
        #[source]
        source: hound::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
