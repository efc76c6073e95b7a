//! Bulk word import from Markdown bullet lists.
//!
//! Accepted line shapes are `- word: meaning` and `* word: meaning`. The word
//! ends at the first colon, so meanings may contain colons themselves.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::operations::words;

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s*(.+?)\s*:\s*(.+)$").expect("valid import entry regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedWord {
    pub word: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedImport {
    pub entries: Vec<ImportedWord>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub success: bool,
    pub added_count: usize,
    pub skipped_count: usize,
    pub added_words: Vec<ImportedWord>,
    pub skipped_lines: Vec<SkippedLine>,
}

pub fn parse_markdown(text: &str) -> ParsedImport {
    let mut parsed = ParsedImport::default();

    for (index, raw) in text.trim().lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = ENTRY_RE.captures(line) else {
            parsed.skipped.push(SkippedLine {
                line: index + 1,
                text: line.to_string(),
                reason: "invalid format",
            });
            continue;
        };

        let word = caps[1].trim();
        let meaning = caps[2].trim();
        if word.is_empty() || meaning.is_empty() {
            parsed.skipped.push(SkippedLine {
                line: index + 1,
                text: line.to_string(),
                reason: "empty word or meaning",
            });
            continue;
        }

        parsed.entries.push(ImportedWord {
            word: word.to_string(),
            meaning: meaning.to_string(),
        });
    }

    parsed
}

/// Parses `text` and inserts every valid entry into the notebook in one
/// transaction.
pub async fn import_into_notebook(
    pool: &SqlitePool,
    notebook_id: i64,
    text: &str,
) -> Result<ImportReport, sqlx::Error> {
    let parsed = parse_markdown(text);

    let mut tx = pool.begin().await?;
    for entry in &parsed.entries {
        words::insert_word(&mut *tx, notebook_id, &entry.word, &entry.meaning).await?;
    }
    tx.commit().await?;

    tracing::info!(
        notebook_id,
        added = parsed.entries.len(),
        skipped = parsed.skipped.len(),
        "markdown import finished"
    );

    Ok(ImportReport {
        success: true,
        added_count: parsed.entries.len(),
        skipped_count: parsed.skipped.len(),
        added_words: parsed.entries,
        skipped_lines: parsed.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_and_star_bullets() {
        let parsed = parse_markdown("- apple: りんご\n* run : 走る");
        assert_eq!(
            parsed.entries,
            vec![
                ImportedWord {
                    word: "apple".into(),
                    meaning: "りんご".into()
                },
                ImportedWord {
                    word: "run".into(),
                    meaning: "走る".into()
                },
            ]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_meaning_keeps_later_colons() {
        let parsed = parse_markdown("- ratio: 3:1 proportion");
        assert_eq!(parsed.entries[0].word, "ratio");
        assert_eq!(parsed.entries[0].meaning, "3:1 proportion");
    }

    #[test]
    fn test_blank_lines_ignored_and_bad_lines_reported() {
        let text = "\n- cat: 猫\n\nnot a bullet\n- dog 犬\n";
        let parsed = parse_markdown(text);
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.skipped.len(), 2);
        // Numbering starts after the outer text is trimmed.
        assert_eq!(parsed.skipped[0].line, 3);
        assert_eq!(parsed.skipped[0].text, "not a bullet");
        assert_eq!(parsed.skipped[0].reason, "invalid format");
        assert_eq!(parsed.skipped[1].line, 4);
    }

    #[test]
    fn test_missing_meaning_is_invalid() {
        let parsed = parse_markdown("- lonely:   ");
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse_markdown("   \n  "), ParsedImport::default());
    }
}
