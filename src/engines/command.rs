//! Any command-line TTS program, described by an argument template.
//!
//! ```text
//! gtts-cli --output {output} {text}           # MP3, text as argument
//! piper --model voice.onnx --output_file {output}   # WAV, text on stdin
//! ```
//!
//! `{text}` is replaced by the text to speak; without it the text is written
//! to the program's stdin. `{output}` is replaced by a temporary file that is
//! read back after the program exits; without it audio is read from stdout.

use std::process::Command;
use std::time::Duration;

use crate::error::{SynthesisCause, SynthesisError};
use crate::{SpeechStyle, SynthesisEngine, SynthesisResult};

use super::process::run_with_timeout;

pub const TEXT_PLACEHOLDER: &str = "{text}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra arguments appended for [`SpeechStyle::Slow`] (e.g. `--slow`).
    pub slow_args: Vec<String>,
    /// Suffix of the `{output}` temp file; some tools pick the codec from it.
    pub output_suffix: String,
    pub timeout: Duration,
}

impl CommandSpec {
    /// Split a whitespace-separated template into program and arguments.
    pub fn parse(template: &str) -> Option<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            slow_args: Vec::new(),
            output_suffix: ".wav".to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_slow_args(mut self, template: &str) -> Self {
        self.slow_args = template.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn uses(&self, placeholder: &str) -> bool {
        self.args
            .iter()
            .chain(&self.slow_args)
            .any(|a| a.contains(placeholder))
    }

    fn render_args(&self, text: &str, output: Option<&str>, style: SpeechStyle) -> Vec<String> {
        let extra: &[String] = match style {
            SpeechStyle::Normal => &[],
            SpeechStyle::Slow => &self.slow_args,
        };
        self.args
            .iter()
            .chain(extra)
            .map(|arg| {
                let arg = arg.replace(TEXT_PLACEHOLDER, text);
                match output {
                    Some(path) => arg.replace(OUTPUT_PLACEHOLDER, path),
                    None => arg,
                }
            })
            .collect()
    }
}

pub struct CommandEngine {
    spec: CommandSpec,
}

impl CommandEngine {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

impl SynthesisEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.spec.program
    }

    fn synthesize(
        &mut self,
        text: &str,
        style: SpeechStyle,
    ) -> Result<SynthesisResult, SynthesisError> {
        let fail = |cause: SynthesisCause| SynthesisError::new(text, cause);

        let output_file = if self.spec.uses(OUTPUT_PLACEHOLDER) {
            let file = tempfile::Builder::new()
                .prefix("spellbee-cmd-")
                .suffix(&self.spec.output_suffix)
                .tempfile()
                .map_err(|e| fail(e.into()))?;
            Some(file)
        } else {
            None
        };
        let output_path = output_file
            .as_ref()
            .map(|f| f.path().to_string_lossy().into_owned());

        let mut command = Command::new(&self.spec.program);
        command.args(self.spec.render_args(text, output_path.as_deref(), style));
        let stdin = (!self.spec.uses(TEXT_PLACEHOLDER)).then_some(text);

        let stdout = run_with_timeout(command, stdin, self.spec.timeout).map_err(fail)?;
        let audio = match &output_file {
            Some(file) => std::fs::read(file.path()).map_err(|e| fail(e.into()))?,
            None => stdout,
        };
        if audio.is_empty() {
            return Err(fail(SynthesisCause::EmptyOutput));
        }

        let result = SynthesisResult::from_bytes(audio);
        log::debug!("{} produced {} bytes of {}", self.spec.program, result.audio.len(), result.format);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioFormat;

    #[test]
    fn parses_templates() {
        let spec = CommandSpec::parse("gtts-cli --output {output} {text}")
            .unwrap()
            .with_slow_args("--slow");
        assert_eq!(spec.program, "gtts-cli");
        assert_eq!(spec.args, vec!["--output", "{output}", "{text}"]);
        assert!(spec.uses(TEXT_PLACEHOLDER));
        assert!(spec.uses(OUTPUT_PLACEHOLDER));
        assert_eq!(CommandSpec::parse("   "), None);
    }

    #[test]
    fn renders_placeholders_and_slow_args() {
        let spec = CommandSpec::parse("gtts-cli --output {output} {text}")
            .unwrap()
            .with_slow_args("--slow");

        let normal = spec.render_args("Great job!", Some("/tmp/a.wav"), SpeechStyle::Normal);
        assert_eq!(normal, vec!["--output", "/tmp/a.wav", "Great job!"]);

        let slow = spec.render_args("C, A, T", Some("/tmp/b.wav"), SpeechStyle::Slow);
        assert_eq!(slow, vec!["--output", "/tmp/b.wav", "C, A, T", "--slow"]);
    }

    #[test]
    fn reads_audio_from_stdout_or_output_file() {
        if Command::new("sh").arg("-c").arg("true").status().is_err() {
            return;
        }

        // Text on stdin, "audio" on stdout.
        let mut stdout_engine = CommandEngine::new(CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "printf 'ID3'; cat".to_string()],
            ..CommandSpec::parse("sh").unwrap()
        });
        let result = stdout_engine.synthesize("cat", SpeechStyle::Normal).unwrap();
        assert_eq!(result.format, AudioFormat::Mp3);
        assert_eq!(result.audio, b"ID3cat\n");

        // Text as argument, audio in the output file.
        let mut file_engine = CommandEngine::new(CommandSpec {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "printf 'OggS%s' \"$1\" > \"$0\"".to_string(),
                "{output}".to_string(),
                "{text}".to_string(),
            ],
            ..CommandSpec::parse("sh").unwrap()
        });
        let result = file_engine.synthesize("dog", SpeechStyle::Normal).unwrap();
        assert_eq!(result.format, AudioFormat::Ogg);
        assert_eq!(result.audio, b"OggSdog");
    }

    #[test]
    fn empty_output_is_an_error() {
        if Command::new("sh").arg("-c").arg("true").status().is_err() {
            return;
        }
        let mut engine = CommandEngine::new(CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "cat > /dev/null".to_string()],
            ..CommandSpec::parse("sh").unwrap()
        });
        let err = engine.synthesize("cat", SpeechStyle::Normal).unwrap_err();
        assert!(matches!(err.cause, SynthesisCause::EmptyOutput));
    }
}
