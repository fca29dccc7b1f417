//! Asset kinds, the canonical file layout, and the per-phase asset plan.
//!
//! [`AssetLayout::resolve`] is the only place a relative asset path is
//! built. The generator, the completeness checker and the format validator all
//! go through it (or through [`AssetPath::from_relative`] for files found on
//! disk), so they cannot disagree about where an asset lives.
//!
//! ```text
//! words/difficulty_{difficulty}/{word}.{ext}
//! spelling/difficulty_{difficulty}/{word}_spelled.{ext}
//! letters/{letter}.{ext}
//! feedback/{category}/{key}.{ext}
//! instructions/{key}.{ext}
//! ```

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::audio::AudioFormat;
use crate::phrases::PhraseTables;
use crate::wordbank::{Difficulty, WordBank};
use crate::SpeechStyle;

/// The five asset families. Their declaration order is the generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetCategory {
    Words,
    SpelledWords,
    Letters,
    Feedback,
    Instructions,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 5] = [
        AssetCategory::Words,
        AssetCategory::SpelledWords,
        AssetCategory::Letters,
        AssetCategory::Feedback,
        AssetCategory::Instructions,
    ];

    /// Top-level directory holding this category.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetCategory::Words => "words",
            AssetCategory::SpelledWords => "spelling",
            AssetCategory::Letters => "letters",
            AssetCategory::Feedback => "feedback",
            AssetCategory::Instructions => "instructions",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            AssetCategory::Words => "Word pronunciations",
            AssetCategory::SpelledWords => "Letter-by-letter spelling",
            AssetCategory::Letters => "Individual letters",
            AssetCategory::Feedback => "Feedback messages",
            AssetCategory::Instructions => "Instruction prompts",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Everything needed to place one asset and to say it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Word { word: String, difficulty: Difficulty },
    SpelledWord { word: String, difficulty: Difficulty },
    Letter(char),
    Feedback { category: String, key: String, text: String },
    Instruction { key: String, text: String },
}

impl AssetKind {
    pub fn category(&self) -> AssetCategory {
        match self {
            AssetKind::Word { .. } => AssetCategory::Words,
            AssetKind::SpelledWord { .. } => AssetCategory::SpelledWords,
            AssetKind::Letter(_) => AssetCategory::Letters,
            AssetKind::Feedback { .. } => AssetCategory::Feedback,
            AssetKind::Instruction { .. } => AssetCategory::Instructions,
        }
    }

    /// The text handed to the synthesis backend.
    pub fn synthesis_text(&self) -> String {
        match self {
            AssetKind::Word { word, .. } => word.clone(),
            AssetKind::SpelledWord { word, .. } => spell_out(word),
            AssetKind::Letter(letter) => letter.to_ascii_uppercase().to_string(),
            AssetKind::Feedback { text, .. } | AssetKind::Instruction { text, .. } => text.clone(),
        }
    }

    pub fn style(&self) -> SpeechStyle {
        match self {
            AssetKind::SpelledWord { .. } => SpeechStyle::Slow,
            _ => SpeechStyle::Normal,
        }
    }
}

/// `"cat"` → `"C, A, T"`. The separators make backends pause between letters.
pub fn spell_out(word: &str) -> String {
    word.chars()
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A `/`-separated path relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath(String);

impl AssetPath {
    /// Convert a path found under the asset root. Returns `None` for empty
    /// paths and paths that are absolute or escape the root. Non-UTF-8
    /// segments are converted lossily.
    pub fn from_relative(path: &Path) -> Option<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(seg) => segments.push(seg.to_string_lossy()),
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Category named by the first segment, if it is one of the five.
    pub fn category(&self) -> Option<AssetCategory> {
        self.0
            .split('/')
            .next()
            .and_then(AssetCategory::from_dir_name)
    }

    /// The absolute location of this asset under `root`.
    pub fn on_disk(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixes the file extension for a deployment and maps kinds to paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    extension: String,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self::new("wav")
    }
}

impl AssetLayout {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The container the extension promises to consumers.
    pub fn declared_format(&self) -> AudioFormat {
        AudioFormat::from_extension(&self.extension)
    }

    pub fn resolve(&self, kind: &AssetKind) -> AssetPath {
        let ext = &self.extension;
        let path = match kind {
            AssetKind::Word { word, difficulty } => {
                format!("words/difficulty_{difficulty}/{word}.{ext}")
            }
            AssetKind::SpelledWord { word, difficulty } => {
                format!("spelling/difficulty_{difficulty}/{word}_spelled.{ext}")
            }
            AssetKind::Letter(letter) => {
                format!("letters/{}.{ext}", letter.to_ascii_lowercase())
            }
            AssetKind::Feedback { category, key, .. } => {
                format!("feedback/{category}/{key}.{ext}")
            }
            AssetKind::Instruction { key, .. } => format!("instructions/{key}.{ext}"),
        };
        AssetPath(path)
    }
}

/// Every asset one phase produces, in generation order.
pub fn plan(category: AssetCategory, bank: &WordBank, phrases: &PhraseTables) -> Vec<AssetKind> {
    match category {
        AssetCategory::Words => bank
            .entries()
            .map(|(difficulty, word)| AssetKind::Word {
                word: word.to_string(),
                difficulty,
            })
            .collect(),
        AssetCategory::SpelledWords => bank
            .entries()
            .map(|(difficulty, word)| AssetKind::SpelledWord {
                word: word.to_string(),
                difficulty,
            })
            .collect(),
        AssetCategory::Letters => ('a'..='z').map(AssetKind::Letter).collect(),
        AssetCategory::Feedback => phrases
            .feedback()
            .iter()
            .flat_map(|category| {
                category.phrases.iter().map(move |phrase| AssetKind::Feedback {
                    category: category.name.clone(),
                    key: phrase.key.clone(),
                    text: phrase.text.clone(),
                })
            })
            .collect(),
        AssetCategory::Instructions => phrases
            .instructions()
            .iter()
            .map(|phrase| AssetKind::Instruction {
                key: phrase.key.clone(),
                text: phrase.text.clone(),
            })
            .collect(),
    }
}

/// The full expected asset set, all five phases in order.
pub fn expected_assets(bank: &WordBank, phrases: &PhraseTables) -> Vec<AssetKind> {
    AssetCategory::ALL
        .into_iter()
        .flat_map(|category| plan(category, bank, phrases))
        .collect()
}
