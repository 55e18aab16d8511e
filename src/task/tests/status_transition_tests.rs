//! Unit tests for task status transition validation.

use crate::task::domain::TaskStatus;
use rstest::rstest;

const ALL_STATUSES: [TaskStatus; 9] = [
    TaskStatus::Requested,
    TaskStatus::AwaitingClientApproval,
    TaskStatus::PendingPartner,
    TaskStatus::RejectedByPartner,
    TaskStatus::OnProgress,
    TaskStatus::InQA,
    TaskStatus::ClientReview,
    TaskStatus::Revision,
    TaskStatus::Completed,
];

/// The ten edges of the legal delegation graph.
const LEGAL_TRANSITIONS: [(TaskStatus, TaskStatus); 10] = [
    (TaskStatus::Requested, TaskStatus::AwaitingClientApproval),
    (TaskStatus::AwaitingClientApproval, TaskStatus::PendingPartner),
    (TaskStatus::PendingPartner, TaskStatus::OnProgress),
    (TaskStatus::PendingPartner, TaskStatus::RejectedByPartner),
    (TaskStatus::RejectedByPartner, TaskStatus::PendingPartner),
    (TaskStatus::OnProgress, TaskStatus::InQA),
    (TaskStatus::InQA, TaskStatus::ClientReview),
    (TaskStatus::ClientReview, TaskStatus::Revision),
    (TaskStatus::ClientReview, TaskStatus::Completed),
    (TaskStatus::Revision, TaskStatus::OnProgress),
];

#[test]
fn transition_table_matches_the_legal_graph() {
    for from in ALL_STATUSES {
        for to in ALL_STATUSES {
            let expected = LEGAL_TRANSITIONS.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "unexpected verdict for {from} -> {to}"
            );
        }
    }
}

#[test]
fn no_status_transitions_to_itself() {
    for status in ALL_STATUSES {
        assert!(!status.can_transition_to(status), "{status} loops");
    }
}

#[rstest]
#[case(TaskStatus::Requested, false)]
#[case(TaskStatus::AwaitingClientApproval, false)]
#[case(TaskStatus::PendingPartner, false)]
#[case(TaskStatus::RejectedByPartner, false)]
#[case(TaskStatus::OnProgress, false)]
#[case(TaskStatus::InQA, false)]
#[case(TaskStatus::ClientReview, false)]
#[case(TaskStatus::Revision, false)]
#[case(TaskStatus::Completed, true)]
fn is_terminal_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}

#[test]
fn completed_accepts_no_successor() {
    for target in ALL_STATUSES {
        assert!(!TaskStatus::Completed.can_transition_to(target));
    }
}

#[test]
fn status_round_trips_through_storage_form() {
    for status in ALL_STATUSES {
        assert_eq!(TaskStatus::try_from(status.as_str()), Ok(status));
    }
}

#[test]
fn unknown_status_text_fails_to_parse() {
    assert!(TaskStatus::try_from("Archived").is_err());
}
