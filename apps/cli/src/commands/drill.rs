//! Interactive exam loop.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use wordmemo_core::{keys, QuizMode, QuizSession, SessionContext, SessionError};
use wordmemo_storage::StorageFacade;

const QUIT: &str = ":q";
const SWITCH_MODE: &str = ":m";

pub async fn execute(
    facade: &StorageFacade,
    context: &mut SessionContext,
    tag: Option<&str>,
    mode: QuizMode,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let changed = {
        let mut rng = rand::rng();
        run_exam(context, tag, mode, input, out, &mut rng)?
    };
    super::save(facade, context, &changed, out).await
}

/// Ask every question once, reading answers line by line.
///
/// `:q` or end of input stops early, `:m` switches quiz direction. Returns
/// the storage keys the exam changed.
pub fn run_exam<R: Rng + ?Sized>(
    context: &mut SessionContext,
    tag: Option<&str>,
    mode: QuizMode,
    input: &mut impl BufRead,
    out: &mut impl Write,
    rng: &mut R,
) -> Result<Vec<&'static str>> {
    let tag = tag.unwrap_or(context.active_tag()).to_string();
    let mut session = QuizSession::start(context, &tag, mode)?;
    let mut changed = vec![keys::STATS];

    writeln!(
        out,
        "Drilling {tag} ({} words). Type {QUIT} to stop, {SWITCH_MODE} to switch direction.",
        session.progress().1
    )?;

    'questions: while let Some(question) = session.next_question(rng) {
        let (asked, total) = session.progress();
        writeln!(out, "\n[{asked}/{total}] {}", question.prompt)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break 'questions;
            }
            let answer = line.trim();
            match answer {
                QUIT => break 'questions,
                SWITCH_MODE => {
                    let next = match session.mode() {
                        QuizMode::TermRecall => QuizMode::DefinitionRecall,
                        QuizMode::DefinitionRecall => QuizMode::TermRecall,
                    };
                    session.set_mode(next);
                    writeln!(out, "Switched to {} mode.", next.as_str())?;
                    continue 'questions;
                }
                _ => {}
            }

            match session.answer(answer) {
                Ok(outcome) => {
                    if outcome.is_correct() {
                        writeln!(out, "correct")?;
                    } else {
                        writeln!(out, "wrong, expected: {}", outcome.expected)?;
                    }
                    for key in outcome.changed_keys {
                        if !changed.contains(&key) {
                            changed.push(key);
                        }
                    }
                    break;
                }
                Err(SessionError::EmptyAnswer) => writeln!(out, "please type an answer")?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    if let Some(record) = session.finish(Utc::now()) {
        writeln!(
            out,
            "\nDone: {} correct, {} wrong, {}% accuracy",
            record.correct, record.wrong, record.accuracy
        )?;
        changed.push(keys::EXAM_RECORDS);
    } else {
        writeln!(out, "\nNo questions answered.")?;
    }
    Ok(changed)
}
