//! Word bank parser.
//!
//! # Format
//! ```text
//! aunt [ɑ:nt]
//! n. 阿姨; 姑妈等
//!
//! card [kɑ:d]
//! n. 卡片; 名片; 纸牌
//! ```
//!
//! Each entry is a term line (letters, hyphens and spaces, optionally followed
//! by a bracketed phonetic) and a definition line. Malformed entries are
//! dropped, never reported: `parse` always succeeds.

use crate::types::WordRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Part-of-speech tags that mark a line as a definition rather than a term.
const DEFINITION_TAGS: &[&str] = &[
    "n", "v", "vt", "vi", "adj", "adv", "prep", "conj", "pron", "num", "art", "int", "aux",
];

/// Starter bank used when nothing has been saved yet.
pub const DEFAULT_WORD_BANK: &str = "aunt [ɑ:nt]
n. 阿姨; 姑妈等
card [kɑ:d]
n. 卡片; 名片; 纸牌
fold [fəuld]
v. 折叠; 折起来; 合拢 n. 褶;...
grandfather [ˈɡrændˌfɑ:ðə]
n. 祖父; 外祖父";

fn term_pattern() -> &'static Regex {
    static TERM_LINE: OnceLock<Regex> = OnceLock::new();
    TERM_LINE.get_or_init(|| {
        Regex::new(r"^([A-Za-z\- ]+?)(?:\s+(\[[^\]]+\]))?$").expect("term pattern is valid")
    })
}

/// Parse a word bank into records, in input order.
pub fn parse(text: &str) -> Vec<WordRecord> {
    let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let term_line = lines[i];
        if term_line.is_empty() || starts_with_definition_tag(term_line) {
            i += 1;
            continue;
        }

        let definition = lines.get(i + 1).copied().unwrap_or_default();
        if definition.is_empty() {
            i += 1;
            continue;
        }

        if let Some(record) = parse_entry(term_line, definition) {
            records.push(record);
        }
        i += 2;
    }

    records
}

fn parse_entry(term_line: &str, definition: &str) -> Option<WordRecord> {
    let captures = term_pattern().captures(term_line)?;
    let term = captures.get(1)?.as_str().trim();
    if term.is_empty() {
        return None;
    }
    let phonetic = captures.get(2).map_or("", |m| m.as_str());

    Some(WordRecord::new(term, phonetic, definition))
}

/// True when the line opens with something like `n.` or `adj.`.
fn starts_with_definition_tag(line: &str) -> bool {
    let Some((head, _)) = line.split_once('.') else {
        return false;
    };
    let head = head.to_ascii_lowercase();
    DEFINITION_TAGS.contains(&head.as_str())
}

/// Render records back into the two-line format, entries separated by a blank line.
pub fn render(records: &[WordRecord]) -> String {
    records
        .iter()
        .map(|record| {
            if record.phonetic.is_empty() {
                format!("{}\n{}", record.term, record.definition)
            } else {
                format!("{} {}\n{}", record.term, record.phonetic, record.definition)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
