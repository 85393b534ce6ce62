//! Tag management commands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use wordmemo_core::{render, SessionContext};
use wordmemo_storage::StorageFacade;

/// One line per tag with its word count. The current tag is starred.
pub fn list(context: &SessionContext, out: &mut impl Write) -> Result<()> {
    let active = context.active_tag();
    for (tag, records) in context.tagged.iter() {
        let marker = if tag == active { "*" } else { " " };
        writeln!(out, "{marker} {tag}\t{} words", records.len())?;
    }
    Ok(())
}

pub fn show(context: &SessionContext, tag: &str, out: &mut impl Write) -> Result<()> {
    let records = context
        .tagged
        .get(tag)
        .with_context(|| format!("unknown tag: {tag}"))?;
    if records.is_empty() {
        writeln!(out, "(no words)")?;
    } else {
        writeln!(out, "{}", render(records))?;
    }
    Ok(())
}

/// Load a word bank file, either as a new tag or as the current word bank.
pub async fn import(
    facade: &StorageFacade,
    context: &mut SessionContext,
    file: &Path,
    tag: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let (keys, target) = match tag {
        Some(name) => (context.add_tag(name, &text)?, name.trim().to_string()),
        None => {
            let target = context.active_tag().to_string();
            (context.save_word_bank(&text)?, target)
        }
    };
    let count = context.tagged.get(&target).map_or(0, <[_]>::len);
    writeln!(out, "Imported {count} words into {target}")?;

    super::save(facade, context, &keys, out).await
}

pub async fn remove(
    facade: &StorageFacade,
    context: &mut SessionContext,
    tag: &str,
    out: &mut impl Write,
) -> Result<()> {
    let keys = context.remove_tag(tag)?;
    writeln!(out, "Removed {tag}")?;
    super::save(facade, context, &keys, out).await
}
