// ABOUTME: Norwegian coaching prompt assembled from an athlete's history and the plan
// ABOUTME: Covers completed sessions, today's session with notes and the next planned session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Athlete, CompletionRecord, CompletionSubmission, TrainingDay};

const NONE_TEXT: &str = "Ingen";
const NOT_SET_TEXT: &str = "Ikke satt";
const UNKNOWN_TEXT: &str = "Ukjent";

/// What the athlete reported about today's session
///
/// Every field is optional: a manual feedback request may omit them and the
/// prompt then says so.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNotes {
    /// Rate of perceived exertion
    pub rpe: Option<u8>,
    /// Pace actually run
    pub pace: Option<String>,
    /// The athlete's own comment
    pub user_comment: Option<String>,
}

impl From<&CompletionSubmission> for SessionNotes {
    fn from(submission: &CompletionSubmission) -> Self {
        Self {
            rpe: Some(submission.rpe),
            pace: Some(submission.actual_pace.clone()),
            user_comment: Some(submission.user_comment.clone()),
        }
    }
}

/// Builder for the coaching prompt
pub struct FeedbackPrompt;

impl FeedbackPrompt {
    /// Assemble the prompt for `athlete` who just finished the session on `date`
    ///
    /// `history` is every stored record; only the athlete's completed sessions
    /// are included, in chronological order.
    #[must_use]
    pub fn build(
        athlete: Athlete,
        date: NaiveDate,
        history: &[CompletionRecord],
        today: Option<&TrainingDay>,
        next: Option<&TrainingDay>,
        notes: &SessionNotes,
    ) -> String {
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "Du er en profesjonell, men folkelig og brutalt ærlig løpetrener."
        );
        let _ = writeln!(
            prompt,
            "Dette er et 8-ukers løpeprogram. Brukeren har nettopp fullført økten for {date}."
        );
        let _ = writeln!(prompt);
        let _ = write!(
            prompt,
            "Her er brukerens historikk og tidligere tilbakemeldinger:"
        );
        prompt.push_str(&Self::history_section(athlete, history));
        let _ = writeln!(prompt);
        let _ = writeln!(prompt);

        let _ = writeln!(prompt, "Dagens økt ({date}):");
        let _ = writeln!(
            prompt,
            "Fokus: {}",
            today.map_or(UNKNOWN_TEXT, |day| or_text(&day.focus, UNKNOWN_TEXT))
        );
        let _ = writeln!(
            prompt,
            "Beskrivelse: {}",
            today.map_or(UNKNOWN_TEXT, |day| or_text(&day.description, UNKNOWN_TEXT))
        );
        let _ = writeln!(
            prompt,
            "Din kommentar: {}",
            or_text(notes.user_comment.as_deref().unwrap_or_default(), NONE_TEXT)
        );
        let _ = writeln!(prompt, "RPE: {}", rpe_text(notes.rpe));
        let _ = writeln!(
            prompt,
            "Pace: {}",
            or_text(notes.pace.as_deref().unwrap_or_default(), NOT_SET_TEXT)
        );
        let _ = writeln!(prompt);

        match next {
            Some(day) => {
                let _ = writeln!(prompt, "Morgendagens økt ({}):", day.date);
                let _ = writeln!(prompt, "Fokus: {}", day.focus);
                let _ = writeln!(prompt, "Beskrivelse: {}", day.description);
            }
            None => {
                let _ = writeln!(prompt, "Ingen planlagt økt for i morgen.");
            }
        }
        let _ = writeln!(prompt);

        let _ = writeln!(
            prompt,
            "Gi en nyttig, ærlig, folkelig og **oppmuntrende** tilbakemelding på dagens økt, \
             og gjerne en kommentar om morgendagens økt."
        );
        let _ = writeln!(
            prompt,
            "Hold tilbakemeldingen relativt kort og konsis, maks 150 ord."
        );
        let _ = writeln!(
            prompt,
            "Vær motiverende, men også direkte og ærlig om prestasjonen."
        );
        let _ = write!(prompt, "Bruk gjerne litt humor og folkelige uttrykk.");

        prompt
    }

    fn history_section(athlete: Athlete, history: &[CompletionRecord]) -> String {
        let mut completed: Vec<&CompletionRecord> = history
            .iter()
            .filter(|record| record.is_completed(athlete))
            .collect();
        completed.sort_by_key(|record| record.date);

        let mut section = String::new();
        for record in completed {
            let cell = record.athlete(athlete);
            let _ = write!(section, "\n--- Økt {} ---", record.date);
            let _ = write!(
                section,
                "\nDin kommentar: {}",
                or_text(cell.user_comment.as_deref().unwrap_or_default(), NONE_TEXT)
            );
            let _ = write!(section, "\nRPE: {}", rpe_text(cell.rpe));
            let _ = write!(
                section,
                "\nPace: {}",
                or_text(cell.actual_pace.as_deref().unwrap_or_default(), NOT_SET_TEXT)
            );
            let _ = write!(
                section,
                "\nTrenerens tidligere tilbakemelding: {}",
                or_text(cell.coach_comment.as_deref().unwrap_or_default(), NONE_TEXT)
            );
        }
        section
    }
}

fn or_text<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn rpe_text(rpe: Option<u8>) -> String {
    rpe.map_or_else(|| NOT_SET_TEXT.to_owned(), |value| value.to_string())
}
