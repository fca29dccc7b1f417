//! # spellbee-audio
//!
//! Builds and verifies the pre-recorded speech assets a spelling game bundles:
//! word pronunciations, letter-by-letter spellings, single letters, feedback
//! phrases and instruction prompts.
//!
//! ## Pipeline
//!
//! - [`wordbank::WordBank`] and [`phrases::PhraseTables`] define what exists.
//! - [`assets::AssetLayout`] maps every asset to its one canonical path.
//! - [`generator::Generator`] drives a [`SynthesisEngine`] over five phases.
//! - [`completeness::check`] reports expected files that are missing.
//! - [`validate::validate_tree`] checks every file present against the audio
//!   format criteria.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use spellbee_audio::{
//!     engines::espeak::EspeakEngine, generator::{Generator, GeneratorOptions},
//!     phrases::PhraseTables, wordbank::WordBank,
//! };
//!
//! let bank = WordBank::load(Path::new("word_bank.json"))?;
//! let phrases = PhraseTables::default();
//! let mut engine = EspeakEngine::new();
//!
//! let report = Generator::new(&mut engine, &bank, &phrases, Path::new("Audio"))
//!     .with_options(GeneratorOptions::default())
//!     .run();
//! println!("{} files generated", report.succeeded());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assets;
pub mod audio;
pub mod completeness;
pub mod engines;
pub mod error;
pub mod generator;
pub mod phrases;
pub mod report;
pub mod validate;
pub mod wordbank;

use std::path::Path;

pub use audio::AudioFormat;
pub use error::{AssetError, ConfigError, SynthesisCause, SynthesisError};

/// Presentation hint passed to backends.
///
/// `Slow` is used for letter-by-letter spelling. Backends without a slower
/// mode treat it as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechStyle {
    #[default]
    Normal,
    Slow,
}

/// The encoded audio a backend produced, tagged with its real container.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub format: AudioFormat,
}

impl SynthesisResult {
    /// Wrap encoded bytes, detecting the container from their header.
    pub fn from_bytes(audio: Vec<u8>) -> Self {
        let format = AudioFormat::detect(&audio);
        Self { audio, format }
    }

    /// Encode mono f32 samples as a 16-bit PCM WAV.
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Result<Self, hound::Error> {
        Ok(Self {
            audio: audio::encode_pcm16(samples, sample_rate)?,
            format: AudioFormat::Wav,
        })
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.audio)
    }
}

/// Common interface for text-to-speech backends.
///
/// Every call is independent and may fail on its own; callers must not let
/// one failure stop a batch.
pub trait SynthesisEngine {
    /// Short identifier used in logs and summaries (e.g. `"espeak-ng"`).
    fn name(&self) -> &str;

    /// Synthesize speech from the given text.
    fn synthesize(&mut self, text: &str, style: SpeechStyle)
        -> Result<SynthesisResult, SynthesisError>;

    /// Synthesize speech and write the bytes, unchanged, to `path`.
    ///
    /// Returns the container actually written.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        path: &Path,
        style: SpeechStyle,
    ) -> Result<AudioFormat, SynthesisError> {
        let result = self.synthesize(text, style)?;
        result
            .write_to(path)
            .map_err(|e| SynthesisError::new(text, e.into()))?;
        Ok(result.format)
    }
}
