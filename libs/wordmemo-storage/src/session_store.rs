//! Loading and saving [`SessionContext`] through the facade.
//!
//! Storage failures never stop a session: unreadable data is logged and
//! replaced by defaults, and failed writes are logged and reported back.

use crate::error::Result;
use crate::facade::StorageFacade;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use wordmemo_core::{keys, SessionContext, DEFAULT_WORD_BANK, MISTAKES_TAG};

async fn read<T: DeserializeOwned>(facade: &StorageFacade, key: &str) -> Option<T> {
    match facade.load_json(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "stored data unavailable, using defaults");
            None
        }
    }
}

/// Rebuild the context from storage.
///
/// A missing word bank falls back to the built-in one. A missing tagged set
/// is seeded from the word bank and written back.
pub async fn load_context(facade: &StorageFacade) -> SessionContext {
    let text = match facade.load(keys::WORD_BANK).await {
        Ok(Some(text)) => text,
        Ok(None) => DEFAULT_WORD_BANK.to_string(),
        Err(e) => {
            warn!(key = keys::WORD_BANK, error = %e, "stored data unavailable, using defaults");
            DEFAULT_WORD_BANK.to_string()
        }
    };
    let mut context = SessionContext::with_word_bank(&text);

    match read(facade, keys::TAGGED_WORD_BANKS).await {
        Some(tagged) => context.tagged = tagged,
        None => {
            persist(facade, &context, &[keys::TAGGED_WORD_BANKS]).await;
        }
    }
    if let Some(stats) = read(facade, keys::STATS).await {
        context.stats = stats;
    }
    if let Some(exam_records) = read(facade, keys::EXAM_RECORDS).await {
        context.exam_records = exam_records;
    }
    if let Some(mistakes) = read(facade, keys::MISTAKES).await {
        context.mistakes = mistakes;
        context.tagged.insert(MISTAKES_TAG, context.mistakes.clone());
    }

    context
}

fn value_for(context: &SessionContext, key: &str) -> Result<Option<Value>> {
    let value = match key {
        keys::WORD_BANK => Value::String(context.word_bank_text.clone()),
        keys::TAGGED_WORD_BANKS => serde_json::to_value(&context.tagged)?,
        keys::STATS => serde_json::to_value(context.stats)?,
        keys::MISTAKES => serde_json::to_value(&context.mistakes)?,
        keys::EXAM_RECORDS => serde_json::to_value(&context.exam_records)?,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Write the listed keys. Returns the keys that could not be written.
pub async fn persist(facade: &StorageFacade, context: &SessionContext, keys: &[&str]) -> Vec<String> {
    let mut failed = Vec::new();
    for &key in keys {
        let result = match value_for(context, key) {
            Ok(Some(value)) => facade.save(key, value).await,
            Ok(None) => {
                warn!(key, "unknown storage key, skipped");
                failed.push(key.to_string());
                continue;
            }
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "failed to save");
            failed.push(key.to_string());
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LOCAL_QUOTA_BYTES;
    use crate::local::LocalBackend;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use wordmemo_core::{parse, Stats, DEFAULT_TAG};

    fn facade() -> StorageFacade {
        StorageFacade::with_backend(Arc::new(LocalBackend::in_memory(DEFAULT_LOCAL_QUOTA_BYTES)))
    }

    #[tokio::test]
    async fn empty_storage_yields_default_bank_and_seeds_tags() {
        let facade = facade();
        let context = load_context(&facade).await;

        assert_eq!(context.word_bank_text, DEFAULT_WORD_BANK);
        assert_eq!(context.word_bank, parse(DEFAULT_WORD_BANK));
        assert_eq!(context.tagged.get(MISTAKES_TAG), Some(&[][..]));
        assert_eq!(context.tagged.get(DEFAULT_TAG), Some(&context.word_bank[..]));
        assert!(facade.load(keys::TAGGED_WORD_BANKS).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn persisted_context_loads_back() {
        let facade = facade();
        let mut context = SessionContext::with_word_bank("card\nn. 卡片");
        context.stats = Stats { correct: 2, wrong: 1 };
        let missed = context.word_bank[0].clone();
        context.record_miss(&missed);

        let failed = persist(
            &facade,
            &context,
            &[
                keys::WORD_BANK,
                keys::TAGGED_WORD_BANKS,
                keys::STATS,
                keys::MISTAKES,
                keys::EXAM_RECORDS,
            ],
        )
        .await;
        assert!(failed.is_empty());

        let loaded = load_context(&facade).await;
        assert_eq!(loaded.word_bank_text, "card\nn. 卡片");
        assert_eq!(loaded.stats, Stats { correct: 2, wrong: 1 });
        assert_eq!(loaded.mistakes.len(), 1);
        assert_eq!(loaded.mistakes[0].mistake_count, 1);
        assert_eq!(loaded.tagged.get(MISTAKES_TAG), Some(&loaded.mistakes[..]));
    }

    #[tokio::test]
    async fn undecodable_values_fall_back_to_defaults() {
        let facade = facade();
        facade.save(keys::STATS, "not stats").await.unwrap();

        let context = load_context(&facade).await;
        assert_eq!(context.stats, Stats::default());
    }

    #[tokio::test]
    async fn unknown_keys_are_reported() {
        let facade = facade();
        let context = SessionContext::with_word_bank(DEFAULT_WORD_BANK);
        let failed = persist(&facade, &context, &["bogus", keys::STATS]).await;
        assert_eq!(failed, vec!["bogus".to_string()]);
    }

    #[tokio::test]
    async fn quota_failures_are_reported_not_raised() {
        let facade = StorageFacade::with_backend(Arc::new(LocalBackend::in_memory(8)));
        let context = SessionContext::with_word_bank(DEFAULT_WORD_BANK);
        let failed = persist(&facade, &context, &[keys::WORD_BANK, keys::STATS]).await;
        assert_eq!(failed, vec![keys::WORD_BANK.to_string(), keys::STATS.to_string()]);
    }
}
