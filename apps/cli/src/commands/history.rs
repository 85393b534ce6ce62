//! Exam history.

use std::io::Write;

use anyhow::Result;
use wordmemo_core::SessionContext;

pub fn execute(context: &SessionContext, out: &mut impl Write) -> Result<()> {
    let history = context.exam_history();
    if history.is_empty() {
        writeln!(out, "No exams yet.")?;
        return Ok(());
    }

    for record in history {
        writeln!(
            out,
            "{}  {:<12} {:>3}/{:<3} {:>3}%",
            record.timestamp,
            record.tag,
            record.correct,
            record.correct + record.wrong,
            record.accuracy
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::output;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use wordmemo_core::{ExamRecord, Stats};

    #[test]
    fn newest_exam_first() {
        let mut context = SessionContext::with_word_bank("aunt\nn. 阿姨");
        let day = |d| Utc.with_ymd_and_hms(2024, 3, d, 8, 0, 0).unwrap();
        context.exam_records = vec![
            ExamRecord::new("default", Stats { correct: 3, wrong: 1 }, day(1)),
            ExamRecord::new("travel", Stats { correct: 1, wrong: 1 }, day(2)),
        ];

        let mut out = Vec::new();
        execute(&context, &mut out).unwrap();

        assert_eq!(
            output(out),
            "2024-03-02T08:00:00.000Z  travel         1/2    50%\n\
             2024-03-01T08:00:00.000Z  default        3/4    75%\n"
        );
    }

    #[test]
    fn empty_history() {
        let context = SessionContext::default();
        let mut out = Vec::new();
        execute(&context, &mut out).unwrap();
        assert_eq!(output(out), "No exams yet.\n");
    }
}
