use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::error::{SynthesisCause, SynthesisError};
use crate::{SpeechStyle, SynthesisEngine, SynthesisResult};

use super::process::run_with_timeout;

/// Parameters for the espeak-ng backend.
#[derive(Debug, Clone)]
pub struct EspeakParams {
    /// espeak-ng binary. `None` uses `espeak-ng` from PATH.
    pub bin_path: Option<PathBuf>,
    /// espeak-ng data directory. `None` uses the binary's default.
    pub data_path: Option<PathBuf>,
    /// espeak-ng voice / language code.
    pub voice: String,
    /// Speaking rate in words per minute.
    pub rate_wpm: u32,
    /// Rate used for [`SpeechStyle::Slow`].
    pub slow_rate_wpm: u32,
    pub timeout: Duration,
}

impl Default for EspeakParams {
    fn default() -> Self {
        Self {
            bin_path: None,
            data_path: None,
            voice: "en-us".to_string(),
            rate_wpm: 175,
            slow_rate_wpm: 110,
            timeout: Duration::from_secs(30),
        }
    }
}

/// espeak-ng run as a subprocess.
///
/// espeak-ng writes 22050 Hz mono 16-bit WAV, which is exactly the asset
/// format, so its output needs no conversion.
pub struct EspeakEngine {
    params: EspeakParams,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EspeakEngine {
    pub fn new() -> Self {
        Self::with_params(EspeakParams::default())
    }

    pub fn with_params(params: EspeakParams) -> Self {
        Self { params }
    }

    fn program(&self) -> &Path {
        self.params
            .bin_path
            .as_deref()
            .unwrap_or_else(|| Path::new("espeak-ng"))
    }

    fn args(&self, style: SpeechStyle, output: &Path) -> Vec<OsString> {
        let rate = match style {
            SpeechStyle::Normal => self.params.rate_wpm,
            SpeechStyle::Slow => self.params.slow_rate_wpm,
        };
        let mut args: Vec<OsString> = vec![
            "-v".into(),
            self.params.voice.clone().into(),
            "-s".into(),
            rate.to_string().into(),
            "-w".into(),
            output.as_os_str().to_owned(),
        ];
        if let Some(data) = &self.params.data_path {
            let mut flag = OsString::from("--path=");
            flag.push(data);
            args.push(flag);
        }
        args.push("--stdin".into());
        args
    }
}

impl SynthesisEngine for EspeakEngine {
    fn name(&self) -> &str {
        "espeak-ng"
    }

    fn synthesize(
        &mut self,
        text: &str,
        style: SpeechStyle,
    ) -> Result<SynthesisResult, SynthesisError> {
        let fail = |cause: SynthesisCause| SynthesisError::new(text, cause);

        // espeak-ng's --stdout mode cannot seek back to fix the RIFF sizes,
        // so it always renders to a real file.
        let output = tempfile::Builder::new()
            .prefix("spellbee-espeak-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| fail(e.into()))?;

        let mut command = Command::new(self.program());
        command.args(self.args(style, output.path()));
        run_with_timeout(command, Some(text), self.params.timeout).map_err(fail)?;

        let audio = std::fs::read(output.path()).map_err(|e| fail(e.into()))?;
        if audio.is_empty() {
            return Err(fail(SynthesisCause::EmptyOutput));
        }
        Ok(SynthesisResult::from_bytes(audio))
    }
}
