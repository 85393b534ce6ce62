//! Session state survives a round trip through each backend.

mod common;

use chrono::{TimeZone, Utc};
use common::TestContext;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordmemo_core::{keys, QuizMode, QuizSession, SessionContext, DEFAULT_TAG, MISTAKES_TAG};
use wordmemo_storage::{load_context, persist, BackendKind};

const BANK: &str = "aunt [ɑ:nt]\nn. 阿姨\n\ncard [kɑ:d]\nn. 卡片";

/// Run one exam that misses every question.
fn miss_everything(context: &mut SessionContext) -> Vec<&'static str> {
    let mut rng = rand::rng();
    let mut changed = Vec::new();
    let mut session = QuizSession::start(context, DEFAULT_TAG, QuizMode::TermRecall).unwrap();
    while session.next_question(&mut rng).is_some() {
        let outcome = session.answer("zzz").unwrap();
        assert!(!outcome.is_correct());
        changed.extend(outcome.changed_keys);
    }
    let finished = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    session.finish(finished).unwrap();
    changed.push(keys::EXAM_RECORDS);
    changed.sort_unstable();
    changed.dedup();
    changed
}

#[tokio::test]
async fn document_backend_round_trip() {
    let ctx = TestContext::new(BackendKind::Document);
    let facade = ctx.facade();

    let mut context = load_context(&facade).await;
    let keys = context.save_word_bank(BANK).unwrap();
    assert!(persist(&facade, &context, &keys).await.is_empty());

    let changed = miss_everything(&mut context);
    assert!(persist(&facade, &context, &changed).await.is_empty());

    let reloaded = load_context(&ctx.facade()).await;
    assert_eq!(reloaded.word_bank_text, BANK);
    assert_eq!(reloaded.mistakes.len(), 2);
    assert!(reloaded.mistakes.iter().all(|m| m.mistake_count == 1));
    assert_eq!(reloaded.tagged.get(MISTAKES_TAG).map(<[_]>::len), Some(2));
    assert_eq!(reloaded.exam_records.len(), 1);
    assert_eq!(reloaded.exam_records[0].timestamp, "2024-03-01T09:30:00.000Z");
    assert_eq!(reloaded.exam_records[0].accuracy, 0);
}

#[tokio::test]
async fn remote_backend_serves_stored_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/load/wordBank"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": BANK })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/load/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {"correct": 5, "wrong": 2} })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_remote(Some(server.uri()), 2000);
    let context = load_context(&ctx.facade()).await;

    assert_eq!(context.word_bank_text, BANK);
    assert_eq!(context.stats.correct, 5);
    assert_eq!(context.stats.wrong, 2);
    assert_eq!(context.tagged.get(DEFAULT_TAG).map(<[_]>::len), Some(2));
}

#[tokio::test]
async fn remote_failures_degrade_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let ctx = TestContext::with_remote(Some(server.uri()), 2000);
    let facade = ctx.facade();
    let context = load_context(&facade).await;

    assert_eq!(context.word_bank_text, wordmemo_core::DEFAULT_WORD_BANK);
    let failed = persist(&facade, &context, &[keys::STATS]).await;
    assert_eq!(failed, vec![keys::STATS.to_string()]);
}
