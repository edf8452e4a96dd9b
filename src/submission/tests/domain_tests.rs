//! Unit tests for submission phases and publication bookkeeping.

use crate::submission::domain::{
    PersistedSubmissionData, Submission, SubmissionDomainError, SubmissionId, SubmissionPhase,
};
use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone, Utc};
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Clock replaying fixed readings, holding the last one once exhausted.
struct ScriptedClock {
    readings: Mutex<VecDeque<DateTime<Utc>>>,
}

impl ScriptedClock {
    fn new(seconds: &[i64]) -> Self {
        let readings = seconds
            .iter()
            .map(|secs| Utc.timestamp_opt(*secs, 0).single().expect("valid timestamp"))
            .collect();
        Self {
            readings: Mutex::new(readings),
        }
    }
}

impl Clock for ScriptedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut readings = self.readings.lock().expect("clock lock");
        if readings.len() > 1 {
            readings.pop_front().expect("reading available")
        } else {
            *readings.front().expect("reading available")
        }
    }
}

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn persisted(phase: SubmissionPhase) -> Submission {
    let long_ago = Utc::now() - ChronoDuration::days(30);
    Submission::from_persisted(PersistedSubmissionData {
        id: SubmissionId::new(),
        manuscript_id: Some("PHY-0042".to_owned()),
        title: "Cardiac electrophysiology model".to_owned(),
        phase,
        publish_date: None,
        last_publish_date: None,
        created_at: long_ago,
        updated_at: long_ago,
    })
}

#[rstest]
#[case(SubmissionPhase::Draft, SubmissionPhase::Submitted, true)]
#[case(SubmissionPhase::Draft, SubmissionPhase::Published, false)]
#[case(SubmissionPhase::Submitted, SubmissionPhase::Review, true)]
#[case(SubmissionPhase::Submitted, SubmissionPhase::Published, true)]
#[case(SubmissionPhase::Review, SubmissionPhase::Draft, false)]
#[case(SubmissionPhase::Review, SubmissionPhase::Published, true)]
#[case(SubmissionPhase::Accepted, SubmissionPhase::Published, true)]
#[case(SubmissionPhase::Accepted, SubmissionPhase::Review, false)]
#[case(SubmissionPhase::Published, SubmissionPhase::Published, true)]
#[case(SubmissionPhase::Published, SubmissionPhase::Accepted, false)]
#[case(SubmissionPhase::Rejected, SubmissionPhase::Published, false)]
#[case(SubmissionPhase::Withdrawn, SubmissionPhase::Submitted, false)]
fn can_transition_to_returns_expected(
    #[case] from: SubmissionPhase,
    #[case] to: SubmissionPhase,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(SubmissionPhase::Draft, false)]
#[case(SubmissionPhase::Published, false)]
#[case(SubmissionPhase::Rejected, true)]
#[case(SubmissionPhase::Withdrawn, true)]
fn is_terminal_returns_expected(#[case] phase: SubmissionPhase, #[case] expected: bool) {
    assert_eq!(phase.is_terminal(), expected);
}

#[rstest]
#[case(" Published ", Ok(SubmissionPhase::Published))]
#[case("review", Ok(SubmissionPhase::Review))]
fn phase_parses_storage_form(
    #[case] raw: &str,
    #[case] expected: Result<SubmissionPhase, ()>,
) {
    assert_eq!(SubmissionPhase::try_from(raw).map_err(|_| ()), expected);
}

#[test]
fn unknown_phase_is_rejected() {
    let result = SubmissionPhase::try_from("archived");
    assert_eq!(
        result.map_err(|err| err.to_string()),
        Err("unknown submission phase: archived".to_owned())
    );
}

#[rstest]
fn new_submission_starts_as_trimmed_draft(clock: DefaultClock) -> eyre::Result<()> {
    let submission = Submission::new("  Bone remodelling  ", &clock)?;

    ensure!(submission.phase() == SubmissionPhase::Draft);
    ensure!(submission.title() == "Bone remodelling");
    ensure!(submission.publish_date().is_none());
    ensure!(submission.created_at() == submission.updated_at());
    Ok(())
}

#[rstest]
fn blank_title_is_rejected(clock: DefaultClock) {
    assert_eq!(
        Submission::new("   ", &clock),
        Err(SubmissionDomainError::EmptyTitle)
    );
}

#[rstest]
#[case("not-a-uuid")]
#[case("")]
fn malformed_identifier_is_rejected(#[case] raw: &str) {
    assert_eq!(
        SubmissionId::parse(raw),
        Err(SubmissionDomainError::InvalidSubmissionId(raw.to_owned()))
    );
}

#[rstest]
fn identifier_round_trips_through_display() -> eyre::Result<()> {
    let id = SubmissionId::new();
    ensure!(SubmissionId::parse(&id.to_string())? == id);
    Ok(())
}

#[rstest]
fn first_publication_sets_both_dates(clock: DefaultClock) -> eyre::Result<()> {
    let mut submission = persisted(SubmissionPhase::Accepted);
    let before = submission.updated_at();

    submission.record_publication(&clock)?;

    ensure!(submission.phase() == SubmissionPhase::Published);
    ensure!(submission.publish_date().is_some());
    ensure!(submission.publish_date() == submission.last_publish_date());
    ensure!(submission.updated_at() > before);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn republication_keeps_first_date_and_advances_last(clock: DefaultClock) -> eyre::Result<()> {
    let mut submission = persisted(SubmissionPhase::Review);

    submission.record_publication(&clock)?;
    let first = submission.publish_date();
    let first_last = submission.last_publish_date();
    tokio::time::sleep(Duration::from_millis(5)).await;
    submission.record_publication(&clock)?;

    ensure!(submission.publish_date() == first);
    ensure!(submission.last_publish_date() > first_last);
    Ok(())
}

#[rstest]
#[case::clock_steps_back(&[1_000, 900])]
#[case::clock_stands_still(&[1_000, 1_000])]
fn last_publish_date_advances_when_clock_does_not(#[case] readings: &[i64]) -> eyre::Result<()> {
    let clock = ScriptedClock::new(readings);
    let mut submission = persisted(SubmissionPhase::Accepted);

    submission.record_publication(&clock)?;
    let first = submission.last_publish_date();
    submission.record_publication(&clock)?;

    ensure!(submission.publish_date() == first);
    ensure!(
        submission.last_publish_date() > first,
        "last publish date went from {first:?} to {:?}",
        submission.last_publish_date()
    );
    ensure!(submission.last_publish_date() > submission.publish_date());
    ensure!(Some(submission.updated_at()) >= submission.last_publish_date());
    Ok(())
}

#[rstest]
fn draft_cannot_be_published(clock: DefaultClock) {
    let mut submission = persisted(SubmissionPhase::Draft);
    let id = submission.id();

    let result = submission.record_publication(&clock);

    assert_eq!(
        result,
        Err(SubmissionDomainError::InvalidPhaseTransition {
            submission_id: id,
            from: SubmissionPhase::Draft,
            to: SubmissionPhase::Published,
        })
    );
    assert!(submission.publish_date().is_none());
}

#[rstest]
fn submission_serializes_with_camel_case_fields() -> eyre::Result<()> {
    let submission = persisted(SubmissionPhase::Accepted);

    let value = serde_json::to_value(&submission)?;

    ensure!(value["manuscriptId"] == "PHY-0042");
    ensure!(value["phase"] == "accepted");
    ensure!(value.get("publishDate").is_none());
    let decoded: Submission = serde_json::from_value(value)?;
    ensure!(decoded == submission);
    Ok(())
}
