use kyc_catalog::{JourneyKind, ValidationApiKind};
use kyc_onboarding::{
    Action, Advance, ConfigTarget, Cursor, InMemoryGateway, OnboardingConfig, OnboardingSession,
    Outcome, Retreat, SessionError, SessionStatus, Step, SubmissionError, Validator,
    SERVICES_FIELD,
};
use kyc_test_utils::{
    blank_draft, draft_with, session_with, setup_session, FlakyGateway, RecordingHooks,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn at(step: Step, sub: usize) -> Cursor {
    Cursor::new(step, sub)
}

async fn next_moves_to(session: &mut OnboardingSession, expected: Cursor) {
    assert_eq!(session.next().await.unwrap(), Advance::Moved(expected));
}

fn back_moves_to(session: &mut OnboardingSession, expected: Cursor) {
    assert_eq!(session.back().unwrap(), Retreat::Moved(expected));
}

#[tokio::test]
async fn test_walk_with_one_journey_and_one_validation_api() {
    let draft = draft_with(&[JourneyKind::Onboarding], &[ValidationApiKind::EidValidation]);
    let (mut session, _) = session_with(draft);
    assert_eq!(session.config_count(), 2);

    next_moves_to(&mut session, at(Step::ModuleConfiguration, 0)).await;
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 1)).await;
    assert_eq!(
        session.current_target(),
        Some(ConfigTarget::Journey(JourneyKind::Onboarding))
    );
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 2)).await;
    assert_eq!(
        session.current_target(),
        Some(ConfigTarget::ValidationApi(ValidationApiKind::EidValidation))
    );
    next_moves_to(&mut session, at(Step::PricingCredits, 0)).await;

    back_moves_to(&mut session, at(Step::ModuleConfiguration, 2));
    back_moves_to(&mut session, at(Step::ModuleConfiguration, 1));
    back_moves_to(&mut session, at(Step::ModuleConfiguration, 0));
    back_moves_to(&mut session, at(Step::OrganizationDetails, 0));
}

#[tokio::test]
async fn test_nothing_selected_blocks_overview_with_single_error() {
    let (mut session, _) = session_with(draft_with(&[], &[]));
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 0)).await;

    let Advance::Blocked(errors) = session.next().await.unwrap() else {
        panic!("empty selection must block");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors.contains(SERVICES_FIELD));
    assert_eq!(session.cursor(), at(Step::ModuleConfiguration, 0));

    // selecting anything clears the error
    session
        .toggle_validation_api(ValidationApiKind::PassportValidation)
        .unwrap();
    assert!(session.errors().is_empty());
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 1)).await;
}

#[tokio::test]
async fn test_back_from_pricing_reenters_last_substep() {
    let draft = draft_with(
        &[JourneyKind::Rekyc, JourneyKind::Authorise, JourneyKind::OneToMany],
        &[],
    );
    let (mut session, _) = session_with(draft);
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 0)).await;
    for sub in 1..=3 {
        next_moves_to(&mut session, at(Step::ModuleConfiguration, sub)).await;
    }
    next_moves_to(&mut session, at(Step::PricingCredits, 0)).await;
    back_moves_to(&mut session, at(Step::ModuleConfiguration, 3));
}

#[tokio::test]
async fn test_back_from_pricing_uses_current_count() {
    let (mut session, _) = session_with(draft_with(&[JourneyKind::Onboarding], &[]));
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 0)).await;
    next_moves_to(&mut session, at(Step::ModuleConfiguration, 1)).await;
    next_moves_to(&mut session, at(Step::PricingCredits, 0)).await;

    session.toggle_journey(JourneyKind::Rekyc).unwrap();
    session
        .toggle_validation_api(ValidationApiKind::EidValidation)
        .unwrap();
    back_moves_to(&mut session, at(Step::ModuleConfiguration, 3));
}

#[tokio::test]
async fn test_full_run_creates_organization_and_fires_hook() {
    let (mut session, gateway, hooks) = setup_session();
    while session.cursor().step() != Step::AdditionalFeatures {
        assert!(matches!(session.next().await.unwrap(), Advance::Moved(_)));
    }
    assert_eq!(session.progress(), 75);

    let Advance::Completed(record) = session.next().await.unwrap() else {
        panic!("step 4 must submit");
    };
    assert!(record.id.starts_with("pvt-"));
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(gateway.records().await, vec![record.clone()]);
    assert_eq!(hooks.completions(), vec![record]);
    assert_eq!(hooks.exits(), 0);
}

#[tokio::test]
async fn test_submission_failure_keeps_step_four_and_allows_resubmit() {
    let gateway = FlakyGateway::failing(1);
    let hooks = RecordingHooks::new();
    let mut session = OnboardingSession::with_draft(
        draft_with(&[], &[ValidationApiKind::EidValidation]),
        Validator::default(),
        gateway.clone(),
        hooks.clone(),
    );
    while session.cursor().step() != Step::AdditionalFeatures {
        session.next().await.unwrap();
    }

    let err = session.next().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Submission(SubmissionError::Unavailable(_))
    ));
    assert_eq!(session.cursor(), at(Step::AdditionalFeatures, 0));
    assert_eq!(session.status(), SessionStatus::Active);
    assert!(hooks.completions().is_empty());

    let Advance::Completed(record) = session.next().await.unwrap() else {
        panic!("second submit must succeed");
    };
    assert_eq!(gateway.calls(), 2);
    assert_eq!(record.organization.enabled_validation_apis(), vec![ValidationApiKind::EidValidation]);
}

#[tokio::test]
async fn test_repeated_submission_failures_keep_the_session_open() {
    let gateway = FlakyGateway::always_failing();
    let hooks = RecordingHooks::new();
    let mut session = OnboardingSession::with_draft(
        draft_with(&[JourneyKind::Authorise], &[]),
        Validator::default(),
        gateway.clone(),
        hooks.clone(),
    );
    while session.cursor().step() != Step::AdditionalFeatures {
        session.next().await.unwrap();
    }

    for _ in 0..3 {
        assert!(matches!(
            session.next().await,
            Err(SessionError::Submission(SubmissionError::Unavailable(_)))
        ));
    }
    assert_eq!(gateway.calls(), 3);
    assert!(!session.is_submitting());
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.cursor(), at(Step::AdditionalFeatures, 0));
    assert!(hooks.completions().is_empty());

    back_moves_to(&mut session, at(Step::PricingCredits, 0));
}

#[tokio::test]
async fn test_blank_draft_blocks_first_step() {
    let (mut session, _) = session_with(blank_draft());

    let Advance::Blocked(errors) = session.next().await.unwrap() else {
        panic!("blank draft must not pass step 1");
    };
    assert!(errors.contains("name"));
    assert!(errors.contains("phone"));
    assert_eq!(session.errors(), &errors);
    assert_eq!(session.cursor(), Cursor::start());
    assert_eq!(
        session.journal().entries()[0].outcome,
        Outcome::Blocked {
            fields: errors.fields().map(str::to_string).collect()
        }
    );
}

#[tokio::test]
async fn test_exit_hook_fires_once() {
    let (mut session, _, hooks) = setup_session();
    assert_eq!(session.back().unwrap(), Retreat::Exited);
    assert_eq!(hooks.exits(), 1);
    assert!(matches!(session.back(), Err(SessionError::Ended)));
    assert_eq!(hooks.exits(), 1);
}

#[tokio::test]
async fn test_dropped_submission_stays_in_flight() {
    let config = OnboardingConfig::default().with_gateway_delay(Duration::from_secs(5));
    let gateway = Arc::new(InMemoryGateway::from_config(&config.gateway));
    let mut session = OnboardingSession::with_draft(
        draft_with(&[JourneyKind::Onboarding], &[]),
        Validator::default(),
        gateway.clone(),
        RecordingHooks::new(),
    );
    while session.cursor().step() != Step::AdditionalFeatures {
        session.next().await.unwrap();
    }

    let pending = tokio::time::timeout(Duration::from_millis(10), session.next()).await;
    assert!(pending.is_err());
    assert!(session.is_submitting());
    assert!(matches!(
        session.next().await,
        Err(SessionError::SubmissionInFlight)
    ));
    assert!(gateway.is_empty().await);
}

#[tokio::test]
async fn test_journal_records_transitions_and_clamps() {
    let (mut session, _) = session_with(draft_with(
        &[JourneyKind::Onboarding, JourneyKind::Rekyc],
        &[],
    ));
    session.next().await.unwrap();
    session.next().await.unwrap();
    session.next().await.unwrap();
    session.toggle_journey(JourneyKind::Onboarding).unwrap();

    let entries = session.journal().entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].before, at(Step::OrganizationDetails, 0));
    assert_eq!(entries[2].after, at(Step::ModuleConfiguration, 2));
    assert_eq!(
        entries[3].action,
        Action::ToggleJourney(JourneyKind::Onboarding)
    );
    assert_eq!(entries[3].outcome, Outcome::Clamped);
    assert_eq!(entries[3].after, at(Step::ModuleConfiguration, 1));
    assert_eq!(
        session.current_target(),
        Some(ConfigTarget::Journey(JourneyKind::Rekyc))
    );
}
