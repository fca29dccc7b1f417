//! The generate, check and validate stages run back to back over one tree.

use std::path::Path;

use spellbee_audio::assets::{AssetLayout, AssetPath};
use spellbee_audio::completeness;
use spellbee_audio::engines::tone::ToneEngine;
use spellbee_audio::error::{SynthesisCause, SynthesisError};
use spellbee_audio::generator::{Generator, GeneratorOptions};
use spellbee_audio::phrases::PhraseTables;
use spellbee_audio::validate::{self, FormatCriteria};
use spellbee_audio::wordbank::WordBank;
use spellbee_audio::{SpeechStyle, SynthesisEngine, SynthesisResult};

/// Tone output, except for the texts it was told to fail on.
struct FlakyEngine {
    inner: ToneEngine,
    fail_on: Vec<String>,
}

impl SynthesisEngine for FlakyEngine {
    fn name(&self) -> &str {
        "flaky"
    }

    fn synthesize(
        &mut self,
        text: &str,
        style: SpeechStyle,
    ) -> Result<SynthesisResult, SynthesisError> {
        if self.fail_on.iter().any(|t| t == text) {
            return Err(SynthesisError::new(
                text,
                SynthesisCause::Failed {
                    code: Some(1),
                    stderr: "voice unavailable".to_string(),
                },
            ));
        }
        self.inner.synthesize(text, style)
    }
}

fn small_bank() -> WordBank {
    WordBank::from_levels([(1, vec!["cat", "dog"]), (2, vec!["jump", "cat"])]).unwrap()
}

#[test]
fn generate_check_and_validate_agree_on_one_tree() {
    let dir = tempfile::tempdir().unwrap();
    let bank = small_bank();
    let phrases = PhraseTables::default();
    let layout = AssetLayout::default();
    let mut engine = ToneEngine::new();

    let mut generator = Generator::new(&mut engine, &bank, &phrases, dir.path())
        .with_options(GeneratorOptions::default());
    let planned = generator.planned_paths();
    let report = generator.run();

    assert!(report.is_success());
    assert_eq!(report.succeeded(), 4 * 2 + 26 + 12 + 5);
    assert_eq!(report.mislabeled(), 0);

    let expected = completeness::expected_paths(&bank, &phrases, &layout);
    assert_eq!(planned, expected);

    let check = completeness::check(dir.path(), &bank, &phrases, &layout).unwrap();
    assert!(check.is_complete());
    assert_eq!(check.expected(), planned.len());

    let validation = validate::validate_tree(dir.path(), &FormatCriteria::default()).unwrap();
    assert!(validation.is_success(), "{validation}");

    let mut discovered: Vec<AssetPath> = validation.files.iter().map(|f| f.path.clone()).collect();
    let mut planned_sorted = planned;
    discovered.sort();
    planned_sorted.sort();
    assert_eq!(discovered, planned_sorted);
}

#[test]
fn one_failed_synthesis_shows_up_as_one_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let bank = WordBank::from_levels([(1, vec!["cat", "dog"])]).unwrap();
    let phrases = PhraseTables::default();
    let mut engine = FlakyEngine {
        inner: ToneEngine::new(),
        fail_on: vec!["dog".to_string()],
    };

    let report = Generator::new(&mut engine, &bank, &phrases, dir.path()).run();
    assert_eq!(report.failed(), 1);
    assert!(!report.is_success());

    let check =
        completeness::check(dir.path(), &bank, &phrases, &AssetLayout::default()).unwrap();
    let missing: Vec<&str> = check.missing().map(AssetPath::as_str).collect();
    assert_eq!(missing, vec!["words/difficulty_1/dog.wav"]);

    // Nothing that was written is malformed.
    let validation = validate::validate_tree(dir.path(), &FormatCriteria::default()).unwrap();
    assert!(validation.is_success());
}

#[test]
fn resumed_run_fills_only_the_gap() {
    let dir = tempfile::tempdir().unwrap();
    let bank = WordBank::from_levels([(1, vec!["cat", "dog"])]).unwrap();
    let phrases = PhraseTables::default();

    let mut flaky = FlakyEngine {
        inner: ToneEngine::new(),
        fail_on: vec!["dog".to_string()],
    };
    let first = Generator::new(&mut flaky, &bank, &phrases, dir.path()).run();
    assert_eq!(first.failed(), 1);

    let mut engine = ToneEngine::new();
    let options = GeneratorOptions {
        skip_existing: true,
        ..GeneratorOptions::default()
    };
    let second = Generator::new(&mut engine, &bank, &phrases, dir.path())
        .with_options(options)
        .run();
    assert_eq!(second.succeeded(), 1);
    assert_eq!(second.skipped(), first.succeeded());

    let check =
        completeness::check(dir.path(), &bank, &phrases, &AssetLayout::default()).unwrap();
    assert!(check.is_complete());
}

#[test]
fn a_word_at_two_levels_gets_an_asset_per_level() {
    let dir = tempfile::tempdir().unwrap();
    let bank = small_bank();
    let phrases = PhraseTables::default();
    let mut engine = ToneEngine::new();

    let report = Generator::new(&mut engine, &bank, &phrases, dir.path()).run();
    assert!(report.is_success());

    for level in [1, 2] {
        let words = dir.path().join(format!("words/difficulty_{level}/cat.wav"));
        let spelling = dir.path().join(format!("spelling/difficulty_{level}/cat_spelled.wav"));
        assert!(words.is_file(), "{}", words.display());
        assert!(spelling.is_file(), "{}", spelling.display());
    }
}

#[test]
fn check_and_validate_reject_a_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Audio");
    let bank = small_bank();

    assert!(completeness::check(
        &root,
        &bank,
        &PhraseTables::default(),
        &AssetLayout::default()
    )
    .is_err());
    assert!(validate::validate_tree(Path::new(&root), &FormatCriteria::default()).is_err());
}

#[test]
fn builtin_bank_survives_an_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("word_bank.json");
    let bank = WordBank::builtin();

    std::fs::write(&path, bank.to_json_pretty().unwrap()).unwrap();
    let loaded = WordBank::load(&path).unwrap();

    assert_eq!(loaded.level_count(), 12);
    assert_eq!(loaded.total_words(), 240);
    assert_eq!(
        completeness::expected_paths(&loaded, &PhraseTables::default(), &AssetLayout::default())
            .len(),
        240 * 2 + 26 + 12 + 5
    );
}
