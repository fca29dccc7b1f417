//! Phase-by-phase asset generation.
//!
//! The generator walks the five phases in canonical order, synthesizes each
//! planned asset and writes it at its resolved path. A failed asset is
//! recorded and skipped; nothing short of a panic stops a run.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use derive_builder::Builder;

use crate::assets::{self, AssetCategory, AssetKind, AssetLayout, AssetPath};
use crate::audio::{self, AudioFormat};
use crate::error::AssetError;
use crate::phrases::PhraseTables;
use crate::wordbank::WordBank;
use crate::SynthesisEngine;

/// What to do when a backend's container differs from the layout's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPolicy {
    /// Fail the asset.
    #[default]
    Strict,
    /// Write it anyway and count it as mislabeled.
    KeepAsIs,
}

#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct GeneratorOptions {
    pub layout: AssetLayout,
    /// Resumable mode: leave non-empty files that already exist alone.
    pub skip_existing: bool,
    pub format_policy: FormatPolicy,
    /// Re-encode WAV payloads to 16-bit mono before writing.
    pub normalize: bool,
    /// Phases to run. They always execute in canonical order.
    pub phases: Vec<AssetCategory>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            layout: AssetLayout::default(),
            skip_existing: false,
            format_policy: FormatPolicy::Strict,
            normalize: true,
            phases: AssetCategory::ALL.to_vec(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Written { format: AudioFormat, mislabeled: bool },
    Skipped,
    Failed(AssetError),
}

/// The result of one synthesis attempt.
#[derive(Debug)]
pub struct AssetRecord {
    pub kind: AssetKind,
    pub path: AssetPath,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct PhaseReport {
    pub category: AssetCategory,
    pub records: Vec<AssetRecord>,
}

impl PhaseReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn mislabeled(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written { mislabeled: true, .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub backend: String,
    pub phases: Vec<PhaseReport>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn phase(&self, category: AssetCategory) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.category == category)
    }

    /// Files synthesized and written in this run.
    pub fn succeeded(&self) -> usize {
        self.phases.iter().map(PhaseReport::written).sum()
    }

    pub fn skipped(&self) -> usize {
        self.phases.iter().map(PhaseReport::skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.phases.iter().map(PhaseReport::failed).sum()
    }

    pub fn mislabeled(&self) -> usize {
        self.phases.iter().map(PhaseReport::mislabeled).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssetRecord> {
        self.phases.iter().flat_map(PhaseReport::failures)
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub struct Generator<'a, E: SynthesisEngine + ?Sized> {
    engine: &'a mut E,
    bank: &'a WordBank,
    phrases: &'a PhraseTables,
    root: PathBuf,
    options: GeneratorOptions,
}

impl<'a, E: SynthesisEngine + ?Sized> Generator<'a, E> {
    pub fn new(
        engine: &'a mut E,
        bank: &'a WordBank,
        phrases: &'a PhraseTables,
        root: &Path,
    ) -> Self {
        Self {
            engine,
            bank,
            phrases,
            root: root.to_path_buf(),
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    fn selected_phases(&self) -> Vec<AssetCategory> {
        AssetCategory::ALL
            .into_iter()
            .filter(|c| self.options.phases.contains(c))
            .collect()
    }

    /// Every path a run with the current options would write.
    pub fn planned_paths(&self) -> Vec<AssetPath> {
        self.selected_phases()
            .into_iter()
            .flat_map(|c| assets::plan(c, self.bank, self.phrases))
            .map(|kind| self.options.layout.resolve(&kind))
            .collect()
    }

    pub fn run(&mut self) -> RunReport {
        let start = Instant::now();
        let phases = self.selected_phases();
        log::info!(
            "Generating into {} with {} ({} phases)",
            self.root.display(),
            self.engine.name(),
            phases.len()
        );

        let phases = phases
            .into_iter()
            .map(|category| self.run_phase(category))
            .collect();

        RunReport {
            backend: self.engine.name().to_string(),
            phases,
            elapsed: start.elapsed(),
        }
    }

    pub fn run_phase(&mut self, category: AssetCategory) -> PhaseReport {
        let planned = assets::plan(category, self.bank, self.phrases);
        log::info!("{}: {} assets", category.description(), planned.len());

        let records: Vec<AssetRecord> = planned
            .into_iter()
            .map(|kind| self.materialize(kind))
            .collect();

        let report = PhaseReport { category, records };
        log::info!(
            "{}: {} written, {} skipped, {} failed",
            category,
            report.written(),
            report.skipped(),
            report.failed()
        );
        report
    }

    fn materialize(&mut self, kind: AssetKind) -> AssetRecord {
        let path = self.options.layout.resolve(&kind);
        let target = path.on_disk(&self.root);

        let outcome = if self.options.skip_existing && is_finished(&target) {
            log::debug!("Skipping {path}: already present");
            Outcome::Skipped
        } else {
            match self.produce(&kind, &path, &target) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("Failed to generate {path}: {e}");
                    Outcome::Failed(e)
                }
            }
        };

        AssetRecord {
            kind,
            path,
            outcome,
        }
    }

    fn produce(
        &mut self,
        kind: &AssetKind,
        path: &AssetPath,
        target: &Path,
    ) -> Result<Outcome, AssetError> {
        let text = kind.synthesis_text();
        let result = self.engine.synthesize(&text, kind.style())?;

        let declared = self.options.layout.declared_format();
        let mislabeled = result.format != declared;
        if mislabeled {
            match self.options.format_policy {
                FormatPolicy::Strict => {
                    return Err(AssetError::FormatMismatch {
                        path: path.clone(),
                        produced: result.format,
                        declared,
                    });
                }
                FormatPolicy::KeepAsIs => log::warn!(
                    "{path}: writing {} audio under a .{} name",
                    result.format,
                    self.options.layout.extension()
                ),
            }
        }

        let bytes = if self.options.normalize && result.format == AudioFormat::Wav {
            audio::normalize_wav(&result.audio).map_err(|source| AssetError::Normalize {
                path: path.clone(),
                source,
            })?
        } else {
            Cow::Borrowed(result.audio.as_slice())
        };

        write_atomic(target, &bytes)?;
        log::debug!("Wrote {path} ({} bytes)", bytes.len());
        Ok(Outcome::Written {
            format: result.format,
            mislabeled,
        })
    }
}

/// A resumable run only trusts regular, non-empty files.
fn is_finished(target: &Path) -> bool {
    fs::metadata(target)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Write through a temp file in the same directory, then rename, so an
/// interrupted run never leaves a truncated asset behind.
fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| AssetError::Write { path, source }
    };
    let parent = target.parent().unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(parent).map_err(write_err(parent))?;
    let mut builder = tempfile::Builder::new();
    // Temp files default to 0600; assets get the usual 0644 less the umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(parent).map_err(write_err(parent))?;
    tmp.write_all(bytes).map_err(write_err(target))?;
    tmp.persist(target)
        .map_err(|e| e.error)
        .map_err(write_err(target))?;
    Ok(())
}
