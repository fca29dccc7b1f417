//! Format conformance of every file present under the asset root.
//!
//! Files are discovered by walking the tree, not by consulting the word bank,
//! so stray and misnamed files are checked too.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{AssetCategory, AssetPath};
use crate::audio::{self, AudioFormat, WavInfo};
use crate::error::ConfigError;

/// Technical acceptance criteria for one asset file.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCriteria {
    pub sample_rates: Vec<u32>,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Exclusive lower bound.
    pub min_duration_secs: f64,
    /// Exclusive upper bound.
    pub max_duration_secs: f64,
}

impl Default for FormatCriteria {
    fn default() -> Self {
        Self {
            sample_rates: vec![22050, 44100],
            channels: 1,
            bits_per_sample: audio::PCM_BITS,
            min_duration_secs: 0.1,
            max_duration_secs: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    SampleRate,
    Channels,
    BitDepth,
    TooShort,
    TooLong,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::SampleRate => "sample rate",
            Metric::Channels => "channels",
            Metric::BitDepth => "bit depth",
            Metric::TooShort => "duration too short",
            Metric::TooLong => "duration too long",
        }
    }
}

/// One failed metric: what was observed and what was required.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub metric: Metric,
    pub observed: String,
    pub expected: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (expected {})",
            self.metric.name(),
            self.observed,
            self.expected
        )
    }
}

impl FormatCriteria {
    pub fn evaluate(&self, info: &WavInfo) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut flag = |metric, observed: String, expected: String| {
            violations.push(Violation {
                metric,
                observed,
                expected,
            })
        };

        if !self.sample_rates.contains(&info.sample_rate) {
            let allowed: Vec<String> = self.sample_rates.iter().map(u32::to_string).collect();
            flag(
                Metric::SampleRate,
                format!("{} Hz", info.sample_rate),
                format!("{} Hz", allowed.join(" or ")),
            );
        }
        if info.channels != self.channels {
            flag(
                Metric::Channels,
                info.channels.to_string(),
                match self.channels {
                    1 => "1 (mono)".to_string(),
                    n => n.to_string(),
                },
            );
        }
        if info.bits_per_sample != self.bits_per_sample {
            flag(
                Metric::BitDepth,
                format!("{}-bit", info.bits_per_sample),
                format!("{}-bit", self.bits_per_sample),
            );
        }

        let secs = info.duration_secs();
        if secs <= self.min_duration_secs {
            flag(
                Metric::TooShort,
                format!("{secs:.2}s"),
                format!("more than {:.2}s", self.min_duration_secs),
            );
        } else if secs >= self.max_duration_secs {
            flag(
                Metric::TooLong,
                format!("{secs:.2}s"),
                format!("less than {:.2}s", self.max_duration_secs),
            );
        }
        violations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    /// Parsed, but out of range on at least one metric.
    Violations(Vec<Violation>),
    /// Could not be parsed as the expected container at all.
    Unreadable(String),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileCheck {
    pub path: AssetPath,
    pub verdict: Verdict,
}

impl FileCheck {
    /// `None` for files outside the five category directories.
    pub fn category(&self) -> Option<AssetCategory> {
        self.path.category()
    }
}

/// Pass counts for one top-level directory; `category: None` groups strays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryValidation {
    pub category: Option<AssetCategory>,
    pub checked: usize,
    pub passed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub files: Vec<FileCheck>,
}

impl ValidationReport {
    pub fn checked(&self) -> usize {
        self.files.len()
    }

    pub fn passed(&self) -> usize {
        self.files.iter().filter(|f| f.verdict.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.checked() - self.passed()
    }

    /// Files that failed a metric or could not be parsed.
    pub fn issues(&self) -> impl Iterator<Item = &FileCheck> {
        self.files.iter().filter(|f| !f.verdict.passed())
    }

    /// Per-category counts in canonical order, strays last. Categories with
    /// no files are omitted.
    pub fn by_category(&self) -> Vec<CategoryValidation> {
        AssetCategory::ALL
            .into_iter()
            .map(Some)
            .chain(std::iter::once(None))
            .filter_map(|category| {
                let files: Vec<&FileCheck> = self
                    .files
                    .iter()
                    .filter(|f| f.category() == category)
                    .collect();
                (!files.is_empty()).then(|| CategoryValidation {
                    category,
                    checked: files.len(),
                    passed: files.iter().filter(|f| f.verdict.passed()).count(),
                })
            })
            .collect()
    }

    /// True only if at least one file was checked and every file passed.
    pub fn is_success(&self) -> bool {
        !self.files.is_empty() && self.failed() == 0
    }
}

pub fn validate_file(path: &Path, criteria: &FormatCriteria) -> Verdict {
    match AudioFormat::sniff_file(path) {
        Err(e) => return Verdict::Unreadable(e.to_string()),
        Ok(AudioFormat::Wav) => {}
        Ok(AudioFormat::Unknown) => {
            return Verdict::Unreadable("not a WAV file (unrecognized header)".to_string())
        }
        Ok(other) => {
            return Verdict::Unreadable(format!("not a WAV file (contains {other} data)"))
        }
    }

    match audio::probe_wav_file(path) {
        Err(e) => Verdict::Unreadable(e.to_string()),
        Ok(info) => {
            let violations = criteria.evaluate(&info);
            if violations.is_empty() {
                Verdict::Pass
            } else {
                Verdict::Violations(violations)
            }
        }
    }
}

/// Validate every non-hidden file under `root`, in sorted path order.
///
/// Only a missing or unlistable root is an error. A subdirectory or entry
/// that cannot be read below it is reported as an unreadable file and the
/// walk carries on.
pub fn validate_tree(root: &Path, criteria: &FormatCriteria) -> Result<ValidationReport, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::AssetRootNotFound(root.to_path_buf()));
    }

    let mut scan = Scan::default();
    discover(root, root, &mut scan)?;
    log::info!("Validating {} files under {}", scan.files.len(), root.display());

    let relative = |file: &Path| file.strip_prefix(root).ok().and_then(AssetPath::from_relative);
    let checked = scan.files.iter().filter_map(|file| {
        let path = relative(file)?;
        let verdict = validate_file(file, criteria);
        match &verdict {
            Verdict::Pass => log::debug!("{path}: ok"),
            Verdict::Violations(v) => log::warn!("{path}: {} violation(s)", v.len()),
            Verdict::Unreadable(reason) => log::warn!("{path}: {reason}"),
        }
        Some(FileCheck { path, verdict })
    });
    let unreadable = scan.unreadable.iter().filter_map(|(entry, reason)| {
        let path = relative(entry)?;
        log::warn!("{path}: {reason}");
        Some(FileCheck {
            path,
            verdict: Verdict::Unreadable(reason.clone()),
        })
    });

    let mut files: Vec<FileCheck> = checked.chain(unreadable).collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(ValidationReport { files })
}

/// What a walk of the asset root turned up.
#[derive(Default)]
struct Scan {
    files: Vec<PathBuf>,
    /// Entries below the root that could not be listed or inspected.
    unreadable: Vec<(PathBuf, String)>,
}

fn discover(root: &Path, dir: &Path, scan: &mut Scan) -> Result<(), ConfigError> {
    let record = |path: PathBuf, source: std::io::Error, scan: &mut Scan| {
        if path == root {
            Err(ConfigError::Read { path, source })
        } else {
            scan.unreadable.push((path, format!("unreadable entry: {source}")));
            Ok(())
        }
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return record(dir.to_path_buf(), e, &mut *scan),
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                record(dir.to_path_buf(), e, &mut *scan)?;
                continue;
            }
        };
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => discover(root, &path, scan)?,
            Ok(_) if path.is_file() => scan.files.push(path),
            Ok(_) => {}
            Err(e) => record(path, e, &mut *scan)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, bits: u16, secs: f64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: bits,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let frames = (secs * sample_rate as f64).round() as usize;
        for _ in 0..frames * channels as usize {
            writer.write_sample(0i32).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn check(sample_rate: u32, channels: u16, bits: u16, secs: f64) -> Verdict {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        write_wav(&path, sample_rate, channels, bits, secs);
        validate_file(&path, &FormatCriteria::default())
    }

    fn metrics(verdict: &Verdict) -> Vec<Metric> {
        match verdict {
            Verdict::Violations(v) => v.iter().map(|v| v.metric).collect(),
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn accepts_mono_16_bit_22050_hz() {
        assert_eq!(check(22050, 1, 16, 1.2), Verdict::Pass);
        assert_eq!(check(44100, 1, 16, 29.0), Verdict::Pass);
    }

    #[test]
    fn flags_unsupported_sample_rate() {
        let verdict = check(8000, 1, 16, 1.0);
        assert_eq!(metrics(&verdict), [Metric::SampleRate]);
        if let Verdict::Violations(v) = verdict {
            assert_eq!(v[0].observed, "8000 Hz");
            assert_eq!(v[0].expected, "22050 or 44100 Hz");
        }
    }

    #[test]
    fn flags_stereo() {
        assert_eq!(metrics(&check(22050, 2, 16, 1.0)), [Metric::Channels]);
    }

    #[test]
    fn flags_wrong_bit_depth() {
        assert_eq!(metrics(&check(22050, 1, 24, 1.0)), [Metric::BitDepth]);
    }

    #[test]
    fn flags_too_short_and_too_long() {
        assert_eq!(metrics(&check(22050, 1, 16, 0.02)), [Metric::TooShort]);
        assert_eq!(metrics(&check(22050, 1, 16, 45.0)), [Metric::TooLong]);
        assert_eq!(metrics(&check(22050, 1, 16, 0.0)), [Metric::TooShort]);
    }

    #[test]
    fn duration_bounds_are_exclusive() {
        let criteria = FormatCriteria::default();
        let info = |frames| WavInfo {
            sample_rate: 22050,
            channels: 1,
            bits_per_sample: 16,
            frames,
        };
        let flagged = |frames| -> Vec<Metric> {
            criteria.evaluate(&info(frames)).iter().map(|v| v.metric).collect()
        };

        // Exactly 0.1 s and exactly 30.0 s.
        assert_eq!(flagged(2205), [Metric::TooShort]);
        assert_eq!(flagged(661_500), [Metric::TooLong]);
        assert!(flagged(2206).is_empty());
        assert!(flagged(661_499).is_empty());
    }

    #[test]
    fn reports_every_failing_metric() {
        assert_eq!(
            metrics(&check(8000, 2, 24, 0.05)),
            [Metric::SampleRate, Metric::Channels, Metric::BitDepth, Metric::TooShort]
        );
    }

    #[test]
    fn unparseable_files_are_hard_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("cat.wav");
        fs::write(&mp3, b"ID3\x04\x00\x00\x00\x00\x00\x00frames").unwrap();
        let garbage = dir.path().join("dog.wav");
        fs::write(&garbage, b"").unwrap();
        let criteria = FormatCriteria::default();

        match validate_file(&mp3, &criteria) {
            Verdict::Unreadable(reason) => assert!(reason.contains("MP3"), "{reason}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(validate_file(&garbage, &criteria), Verdict::Unreadable(_)));
    }

    #[test]
    fn walks_the_whole_tree_including_strays() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_wav(&root.join("words/difficulty_1/cat.wav"), 22050, 1, 16, 1.0);
        write_wav(&root.join("words/difficulty_1/dog.wav"), 8000, 1, 16, 1.0);
        write_wav(&root.join("letters/a.wav"), 22050, 1, 16, 0.5);
        write_wav(&root.join("misc/cat.wav"), 22050, 1, 16, 1.0);
        fs::write(root.join("letters/.DS_Store"), b"junk").unwrap();

        let report = validate_tree(root, &FormatCriteria::default()).unwrap();
        assert_eq!(report.checked(), 4);
        assert_eq!(report.passed(), 3);
        assert!(!report.is_success());

        let issues: Vec<&str> = report.issues().map(|f| f.path.as_str()).collect();
        assert_eq!(issues, ["words/difficulty_1/dog.wav"]);

        assert_eq!(
            report.by_category(),
            vec![
                CategoryValidation { category: Some(AssetCategory::Words), checked: 2, passed: 1 },
                CategoryValidation { category: Some(AssetCategory::Letters), checked: 1, passed: 1 },
                CategoryValidation { category: None, checked: 1, passed: 1 },
            ]
        );
    }

    #[test]
    fn empty_tree_is_not_a_success() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate_tree(dir.path(), &FormatCriteria::default()).unwrap();
        assert_eq!(report.checked(), 0);
        assert!(!report.is_success());
    }

    #[test]
    fn unlistable_subdirectory_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let words = root.join("words");
        fs::create_dir_all(&words).unwrap();

        // A directory that vanishes between listing and reading fails the
        // same way an unreadable one does.
        let mut scan = Scan::default();
        fs::remove_dir(&words).unwrap();
        discover(root, &words, &mut scan).unwrap();
        assert!(scan.files.is_empty());
        assert_eq!(scan.unreadable.len(), 1);
        assert_eq!(scan.unreadable[0].0, words);

        // The same failure at the root is fatal.
        let gone = root.join("gone");
        let err = discover(&gone, &gone, &mut Scan::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn permission_denied_subdirectory_keeps_the_walk_going() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_wav(&root.join("letters/a.wav"), 22050, 1, 16, 0.5);
        write_wav(&root.join("words/difficulty_1/cat.wav"), 22050, 1, 16, 1.0);
        let locked = root.join("words/difficulty_1");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list it anyway; nothing to observe then.
        let listable = fs::read_dir(&locked).is_ok();
        let report = validate_tree(root, &FormatCriteria::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if listable {
            return;
        }

        let report = report.unwrap();
        assert_eq!(report.checked(), 2);
        assert_eq!(report.passed(), 1);
        assert!(!report.is_success());
        let issue = report.issues().next().unwrap();
        assert_eq!(issue.path.as_str(), "words/difficulty_1");
        assert!(matches!(issue.verdict, Verdict::Unreadable(_)));
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_tree(&dir.path().join("nope"), &FormatCriteria::default()).unwrap_err();
        assert!(matches!(err, ConfigError::AssetRootNotFound(_)));
    }
}
