//! spellbee-audio - build and verify the spelling game's audio assets.
//!
//! Each stage runs on its own and exits with 0 when everything is in order,
//! 1 when it found problems, and 2 when its inputs are unusable.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};

use spellbee_audio::assets::{AssetCategory, AssetLayout};
use spellbee_audio::engines::command::{CommandEngine, CommandSpec};
use spellbee_audio::engines::espeak::{EspeakEngine, EspeakParams};
use spellbee_audio::engines::tone::ToneEngine;
use spellbee_audio::generator::{FormatPolicy, Generator, GeneratorOptionsBuilder};
use spellbee_audio::phrases::PhraseTables;
use spellbee_audio::validate::FormatCriteria;
use spellbee_audio::wordbank::WordBank;
use spellbee_audio::{completeness, validate, SpeechStyle, SynthesisEngine};

/// Generate and verify the speech-audio assets for the spelling game
#[derive(Parser)]
#[command(name = "spellbee-audio")]
#[command(version)]
#[command(about = "Generate and verify spelling-game audio assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log per-asset detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the canonical word-bank JSON document
    Export {
        /// Authoring file (`<difficulty>: word, word ...` lines); defaults to the built-in bank
        #[arg(long)]
        from: Option<PathBuf>,
        /// Destination of the JSON document
        #[arg(short, long, env = "SPELLBEE_WORD_BANK", default_value = "word_bank.json")]
        output: PathBuf,
    },

    /// Synthesize every asset into the asset tree
    Generate {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        backend: BackendArgs,
        /// Skip assets whose file already exists and is non-empty
        #[arg(long)]
        resume: bool,
        /// Write audio whose container does not match the extension instead of failing it
        #[arg(long)]
        keep_mislabeled: bool,
        /// Write WAV payloads exactly as the backend produced them
        #[arg(long)]
        no_normalize: bool,
        /// Run only these phases (repeatable); all phases by default
        #[arg(long = "phase", value_enum)]
        phases: Vec<PhaseArg>,
    },

    /// Report expected asset files that are missing
    Check {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Check every file under the asset root against the audio format criteria
    Validate {
        /// Asset root directory
        #[arg(long, env = "SPELLBEE_ASSET_ROOT", default_value = "Audio")]
        out: PathBuf,
    },

    /// Synthesize a single phrase to a file, to try out a backend
    Say {
        /// Text to speak
        text: String,
        /// Destination file
        #[arg(short, long, default_value = "say.wav")]
        output: PathBuf,
        /// Use the slower spelling style
        #[arg(long)]
        slow: bool,
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[derive(Args)]
struct Inputs {
    /// Canonical word-bank JSON document
    #[arg(long, env = "SPELLBEE_WORD_BANK", default_value = "word_bank.json")]
    word_bank: PathBuf,
    /// Asset root directory
    #[arg(long, env = "SPELLBEE_ASSET_ROOT", default_value = "Audio")]
    out: PathBuf,
    /// JSON replacement for the built-in feedback/instruction phrases
    #[arg(long, env = "SPELLBEE_PHRASES")]
    phrases: Option<PathBuf>,
    /// File extension used for every asset
    #[arg(long, default_value = "wav")]
    extension: String,
}

impl Inputs {
    fn load(&self) -> anyhow::Result<(WordBank, PhraseTables, AssetLayout)> {
        let bank = WordBank::load(&self.word_bank)?;
        let phrases = match &self.phrases {
            Some(path) => PhraseTables::load(path)?,
            None => PhraseTables::default(),
        };
        Ok((bank, phrases, AssetLayout::new(&self.extension)))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// espeak-ng subprocess
    Espeak,
    /// External program given by --command
    Command,
    /// Placeholder tones, no speech software needed
    Tone,
}

#[derive(Args)]
struct BackendArgs {
    #[arg(long, value_enum, default_value_t = Backend::Espeak)]
    backend: Backend,
    /// espeak-ng voice
    #[arg(long)]
    voice: Option<String>,
    /// espeak-ng binary
    #[arg(long)]
    espeak_bin: Option<PathBuf>,
    /// espeak-ng data directory
    #[arg(long)]
    espeak_data: Option<PathBuf>,
    /// Program template, e.g. "gtts-cli --output {output} {text}"
    #[arg(long)]
    command: Option<String>,
    /// Extra arguments for slow (spelling) speech, e.g. "--slow"
    #[arg(long, allow_hyphen_values = true)]
    slow_args: Option<String>,
    /// Per-call timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

impl BackendArgs {
    fn build(&self) -> anyhow::Result<Box<dyn SynthesisEngine>> {
        let timeout = Duration::from_secs(self.timeout);
        let engine: Box<dyn SynthesisEngine> = match self.backend {
            Backend::Espeak => {
                let defaults = EspeakParams::default();
                Box::new(EspeakEngine::with_params(EspeakParams {
                    bin_path: self.espeak_bin.clone(),
                    data_path: self.espeak_data.clone(),
                    voice: self.voice.clone().unwrap_or(defaults.voice),
                    timeout,
                    ..defaults
                }))
            }
            Backend::Command => {
                let Some(template) = &self.command else {
                    bail!("--backend command requires --command <TEMPLATE>");
                };
                let Some(spec) = CommandSpec::parse(template) else {
                    bail!("--command template is empty");
                };
                let spec = spec
                    .with_slow_args(self.slow_args.as_deref().unwrap_or_default())
                    .with_timeout(timeout);
                Box::new(CommandEngine::new(spec))
            }
            Backend::Tone => Box::new(ToneEngine::new()),
        };
        Ok(engine)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PhaseArg {
    Words,
    Spelling,
    Letters,
    Feedback,
    Instructions,
}

impl From<PhaseArg> for AssetCategory {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Words => AssetCategory::Words,
            PhaseArg::Spelling => AssetCategory::SpelledWords,
            PhaseArg::Letters => AssetCategory::Letters,
            PhaseArg::Feedback => AssetCategory::Feedback,
            PhaseArg::Instructions => AssetCategory::Instructions,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("spellbee-audio error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// `Ok(true)` when the stage found nothing wrong.
fn run(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Export { from, output } => export(from.as_deref(), &output),
        Commands::Generate {
            inputs,
            backend,
            resume,
            keep_mislabeled,
            no_normalize,
            phases,
        } => {
            let (bank, phrases, layout) = inputs.load()?;
            let mut engine = backend.build()?;

            let mut options = GeneratorOptionsBuilder::default();
            options
                .layout(layout)
                .skip_existing(resume)
                .normalize(!no_normalize)
                .format_policy(if keep_mislabeled {
                    FormatPolicy::KeepAsIs
                } else {
                    FormatPolicy::Strict
                });
            if !phases.is_empty() {
                options.phases(phases.into_iter().map(AssetCategory::from).collect());
            }

            let report = Generator::new(&mut *engine, &bank, &phrases, &inputs.out)
                .with_options(options.build()?)
                .run();
            println!("{report}");
            Ok(report.is_success())
        }
        Commands::Check { inputs } => {
            let (bank, phrases, layout) = inputs.load()?;
            let report = completeness::check(&inputs.out, &bank, &phrases, &layout)?;
            println!("{report}");
            Ok(report.is_complete())
        }
        Commands::Validate { out } => {
            let report = validate::validate_tree(&out, &FormatCriteria::default())?;
            println!("{report}");
            Ok(report.is_success())
        }
        Commands::Say {
            text,
            output,
            slow,
            backend,
        } => {
            let mut engine = backend.build()?;
            let style = if slow {
                SpeechStyle::Slow
            } else {
                SpeechStyle::Normal
            };
            match engine.synthesize_to_file(&text, &output, style) {
                Ok(format) => {
                    println!("Wrote {format} audio from {} to {}", engine.name(), output.display());
                    Ok(true)
                }
                Err(e) => {
                    log::error!("{e}");
                    Ok(false)
                }
            }
        }
    }
}

fn export(from: Option<&Path>, output: &Path) -> anyhow::Result<bool> {
    let bank = match from {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read authoring file {}", path.display()))?;
            WordBank::parse_authoring(&text)?
        }
        None => WordBank::builtin(),
    };

    let json = bank.to_json_pretty()?;
    fs::write(output, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Word bank statistics:");
    println!("   Difficulty levels: {}", bank.level_count());
    println!("   Total words (with repeats): {}", bank.total_words());
    println!("   Unique words: {}", bank.unique_words());
    println!("Exported to {}", output.display());
    Ok(true)
}
