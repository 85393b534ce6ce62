//! Missed-word listing.

use std::io::Write;

use anyhow::Result;
use wordmemo_core::SessionContext;
use wordmemo_storage::StorageFacade;

/// List missed words, most missed first, or forget them all with `clear`.
pub async fn execute(
    facade: &StorageFacade,
    context: &mut SessionContext,
    clear: bool,
    out: &mut impl Write,
) -> Result<()> {
    if clear {
        let count = context.mistakes.len();
        let keys = context.clear_mistakes();
        writeln!(out, "Cleared {count} mistakes")?;
        return super::save(facade, context, &keys, out).await;
    }

    if context.mistakes.is_empty() {
        writeln!(out, "No mistakes yet.")?;
        return Ok(());
    }

    let mut records: Vec<_> = context.mistakes.iter().collect();
    records.sort_by(|a, b| b.mistake_count.cmp(&a.mistake_count));
    for record in records {
        let word = if record.phonetic.is_empty() {
            record.term.clone()
        } else {
            format!("{} {}", record.term, record.phonetic)
        };
        writeln!(out, "{:>3}x  {word}  {}", record.mistake_count, record.definition)?;
    }
    Ok(())
}
