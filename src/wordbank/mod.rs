//! The word bank: difficulty level → ordered word list.
//!
//! This is the single source of truth for every word and spelling asset. It is
//! validated once at the loading boundary and immutable afterwards. A word may
//! appear under several levels (each level yields its own assets), but never
//! twice within one level, since both entries would resolve to the same file.

mod builtin;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::num::NonZeroU32;
use std::path::Path;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::error::ConfigError;

/// A validated, positive difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(NonZeroU32);

impl Difficulty {
    pub fn new(level: u32) -> Option<Self> {
        NonZeroU32::new(level).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    /// Accepts only the canonical decimal rendering, so `"01"` and `"1"` can
    /// never name two different levels that share a directory.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidDifficulty(s.to_string());
        if s.is_empty() || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u32>()
            .ok()
            .and_then(Difficulty::new)
            .ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    levels: BTreeMap<Difficulty, Vec<String>>,
}

impl WordBank {
    /// Build a bank from `(level, words)` rows. Repeated levels append.
    pub fn from_levels<I, S>(rows: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (u32, Vec<S>)>,
        S: Into<String>,
    {
        let mut levels: BTreeMap<Difficulty, Vec<String>> = BTreeMap::new();
        for (level, words) in rows {
            let difficulty =
                Difficulty::new(level).ok_or_else(|| ConfigError::InvalidDifficulty(level.to_string()))?;
            levels
                .entry(difficulty)
                .or_default()
                .extend(words.into_iter().map(Into::into));
        }
        Self::validated(levels)
    }

    /// The bank bundled with the game.
    pub fn builtin() -> Self {
        let levels = builtin::LEVELS
            .iter()
            .filter_map(|&(level, words)| {
                let words = words.iter().map(|w| w.to_string()).collect();
                Difficulty::new(level).map(|d| (d, words))
            })
            .collect();
        Self { levels }
    }

    /// Load the canonical JSON document (`{"1": ["cat", ...], ...}`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::WordBankNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json_str(&text, path)?;
        log::info!(
            "Loaded word bank from {}: {} levels, {} words",
            path.display(),
            bank.level_count(),
            bank.total_words()
        );
        Ok(bank)
    }

    /// Parse the canonical JSON document. `origin` is only used in errors.
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let RawLevels(raw) = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: origin.to_path_buf(),
            source,
        })?;

        let mut levels = BTreeMap::new();
        for (key, words) in raw {
            let difficulty = key.parse::<Difficulty>()?;
            if levels.insert(difficulty, words).is_some() {
                return Err(ConfigError::DuplicateDifficulty(key));
            }
        }
        Self::validated(levels)
    }

    /// Parse the line-oriented authoring format.
    ///
    /// ```text
    /// # comments run to end of line
    /// 1: cat, dog, sun
    /// 2: ball tree
    /// 1: hat            # appends to level 1
    /// ```
    pub fn parse_authoring(text: &str) -> Result<Self, ConfigError> {
        let mut rows = Vec::new();
        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let (key, rest) = line.split_once(':').ok_or_else(|| ConfigError::Authoring {
                line: line_no,
                message: "expected `<difficulty>: <words>`".to_string(),
            })?;
            let difficulty = key.trim().parse::<Difficulty>().map_err(|e| ConfigError::Authoring {
                line: line_no,
                message: e.to_string(),
            })?;
            let words: Vec<String> = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect();
            for word in &words {
                if !is_valid_word(word) {
                    return Err(ConfigError::Authoring {
                        line: line_no,
                        message: ConfigError::InvalidWord {
                            word: word.clone(),
                            difficulty: difficulty.get(),
                        }
                        .to_string(),
                    });
                }
            }
            rows.push((difficulty.get(), words));
        }
        Self::from_levels(rows)
    }

    fn validated(levels: BTreeMap<Difficulty, Vec<String>>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyWordBank);
        }
        for (difficulty, words) in &levels {
            if words.is_empty() {
                log::warn!("Difficulty {difficulty} has no words");
            }
            let mut seen = HashSet::new();
            for word in words {
                if !is_valid_word(word) {
                    return Err(ConfigError::InvalidWord {
                        word: word.clone(),
                        difficulty: difficulty.get(),
                    });
                }
                if !seen.insert(word.as_str()) {
                    return Err(ConfigError::DuplicateWord {
                        word: word.clone(),
                        difficulty: difficulty.get(),
                    });
                }
            }
        }
        Ok(Self { levels })
    }

    /// Levels in ascending order with their words in list order.
    pub fn levels(&self) -> impl Iterator<Item = (Difficulty, &[String])> {
        self.levels.iter().map(|(d, words)| (*d, words.as_slice()))
    }

    /// Every `(difficulty, word)` pair, difficulty-ascending then list order.
    pub fn entries(&self) -> impl Iterator<Item = (Difficulty, &str)> {
        self.levels()
            .flat_map(|(d, words)| words.iter().map(move |w| (d, w.as_str())))
    }

    pub fn words(&self, difficulty: Difficulty) -> Option<&[String]> {
        self.levels.get(&difficulty).map(Vec::as_slice)
    }

    /// Levels a word is listed under.
    pub fn difficulties_of(&self, word: &str) -> Vec<Difficulty> {
        self.levels()
            .filter(|(_, words)| words.iter().any(|w| w == word))
            .map(|(d, _)| d)
            .collect()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total entries, counting a word once per level it appears in.
    pub fn total_words(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn unique_words(&self) -> usize {
        self.entries().map(|(_, w)| w).collect::<HashSet<_>>().len()
    }

    /// The canonical JSON document, keys in ascending numeric order.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for WordBank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.levels.iter().map(|(d, words)| (d.to_string(), words)))
    }
}

/// The JSON object as written, repeated keys included.
struct RawLevels(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for RawLevels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelsVisitor;

        impl<'de> Visitor<'de> for LevelsVisitor {
            type Value = RawLevels;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping difficulty levels to word lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawLevels, A::Error> {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(row) = map.next_entry::<String, Vec<String>>()? {
                    rows.push(row);
                }
                Ok(RawLevels(rows))
            }
        }

        deserializer.deserialize_map(LevelsVisitor)
    }
}

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase())
}
