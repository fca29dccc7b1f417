//! Feedback and instruction phrases.
//!
//! These tables are configuration: the generator and the completeness checker
//! take them as arguments, so tests and alternative products can swap in
//! their own.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One spoken phrase and the file key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    pub key: String,
}

impl Phrase {
    pub fn new(text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCategory {
    pub name: String,
    pub phrases: Vec<Phrase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseTables {
    feedback: Vec<FeedbackCategory>,
    instructions: Vec<Phrase>,
}

impl PhraseTables {
    /// Build validated tables. Category and instruction order is preserved.
    pub fn new(
        feedback: Vec<FeedbackCategory>,
        instructions: Vec<Phrase>,
    ) -> Result<Self, ConfigError> {
        let tables = Self {
            feedback,
            instructions,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Read replacement tables from JSON:
    /// `{"feedback": [{"name": ..., "phrases": [{"text": ..., "key": ...}]}], "instructions": [...]}`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tables: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tables.validate()?;
        log::info!(
            "Loaded phrase tables from {}: {} feedback, {} instructions",
            path.display(),
            tables.feedback_count(),
            tables.instructions.len()
        );
        Ok(tables)
    }

    pub fn feedback(&self) -> &[FeedbackCategory] {
        &self.feedback
    }

    pub fn instructions(&self) -> &[Phrase] {
        &self.instructions
    }

    pub fn feedback_count(&self) -> usize {
        self.feedback.iter().map(|c| c.phrases.len()).sum()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut categories = HashSet::new();
        for category in &self.feedback {
            check_key(&category.name)?;
            if !categories.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicatePhraseKey {
                    key: category.name.clone(),
                    scope: "feedback categories".to_string(),
                });
            }
            check_phrases(&category.phrases, &format!("feedback/{}", category.name))?;
        }
        check_phrases(&self.instructions, "instructions")
    }
}

impl Default for PhraseTables {
    fn default() -> Self {
        let category = |name: &str, phrases: &[(&str, &str)]| FeedbackCategory {
            name: name.to_string(),
            phrases: phrases.iter().map(|&(t, k)| Phrase::new(t, k)).collect(),
        };
        Self {
            feedback: vec![
                category(
                    "success",
                    &[
                        ("Great job!", "great_job"),
                        ("Excellent!", "excellent"),
                        ("You got it!", "you_got_it"),
                        ("Perfect!", "perfect"),
                        ("Amazing!", "amazing"),
                        ("Wonderful!", "wonderful"),
                    ],
                ),
                category(
                    "encouragement",
                    &[
                        ("Nice try!", "nice_try"),
                        ("Almost there!", "almost_there"),
                        ("Keep trying!", "keep_trying"),
                        ("Don't give up!", "dont_give_up"),
                    ],
                ),
                category(
                    "system",
                    &[
                        ("The correct spelling is", "correct_spelling_is"),
                        ("Congratulations! You completed the level!", "level_complete"),
                    ],
                ),
            ],
            instructions: vec![
                Phrase::new("Listen carefully!", "listen_carefully"),
                Phrase::new("Spell the word out loud", "spell_out_loud"),
                Phrase::new("Say each letter", "say_each_letter"),
                Phrase::new("Tap to speak", "tap_to_speak"),
                Phrase::new("Type the spelling", "type_spelling"),
            ],
        }
    }
}

fn check_phrases(phrases: &[Phrase], scope: &str) -> Result<(), ConfigError> {
    let mut keys = HashSet::new();
    for phrase in phrases {
        check_key(&phrase.key)?;
        if phrase.text.trim().is_empty() {
            return Err(ConfigError::EmptyPhraseText {
                key: phrase.key.clone(),
            });
        }
        if !keys.insert(phrase.key.as_str()) {
            return Err(ConfigError::DuplicatePhraseKey {
                key: phrase.key.clone(),
                scope: scope.to_string(),
            });
        }
    }
    Ok(())
}

// Keys become path segments.
fn check_key(key: &str) -> Result<(), ConfigError> {
    let ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidPhraseKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_match_the_shipped_set() {
        let tables = PhraseTables::default();
        tables.validate().unwrap();

        let names: Vec<&str> = tables.feedback().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["success", "encouragement", "system"]);
        assert_eq!(tables.feedback_count(), 12);
        assert_eq!(tables.instructions().len(), 5);
        assert_eq!(tables.feedback()[1].phrases[3].text, "Don't give up!");
    }

    #[test]
    fn rejects_keys_that_are_not_path_safe() {
        for key in ["", "Great", "great job", "../up", "a/b"] {
            let err = PhraseTables::new(vec![], vec![Phrase::new("Hi", key)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPhraseKey { .. }), "{key:?}");
        }
    }

    #[test]
    fn rejects_duplicate_keys_within_a_scope() {
        let err = PhraseTables::new(
            vec![],
            vec![Phrase::new("Hi", "hello"), Phrase::new("Hello", "hello")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePhraseKey { .. }));

        let same_key_elsewhere = PhraseTables::new(
            vec![FeedbackCategory {
                name: "success".to_string(),
                phrases: vec![Phrase::new("Hi", "hello")],
            }],
            vec![Phrase::new("Hello", "hello")],
        );
        assert!(same_key_elsewhere.is_ok());
    }

    #[test]
    fn rejects_blank_text() {
        let err = PhraseTables::new(vec![], vec![Phrase::new("  ", "blank")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPhraseText { .. }));
    }

    #[test]
    fn loads_tables_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phrases.json");
        std::fs::write(
            &path,
            r#"{
                "feedback": [{"name": "success", "phrases": [{"text": "Yay!", "key": "yay"}]}],
                "instructions": [{"text": "Listen", "key": "listen"}]
            }"#,
        )
        .unwrap();

        let tables = PhraseTables::load(&path).unwrap();
        assert_eq!(tables.feedback_count(), 1);
        assert_eq!(tables.instructions()[0], Phrase::new("Listen", "listen"));
    }
}
