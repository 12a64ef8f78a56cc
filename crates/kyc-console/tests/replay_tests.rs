use kyc_console::{load_draft, run_script, ConsoleError, Script, StepResult};
use kyc_onboarding::{Cursor, OnboardingConfig, SessionStatus, Step, Validator, SERVICES_FIELD};
use kyc_test_utils::valid_draft;
use pretty_assertions::assert_eq;
use std::io::Write;

fn instant_config() -> OnboardingConfig {
    let mut config = OnboardingConfig::default();
    config.gateway.delay_ms = 0;
    config
}

#[tokio::test]
async fn test_demo_script_creates_organization() {
    let script = Script::from_yaml_str(
        r"
steps:
  - action: next
  - action: toggle_validation_api
    api: eid_validation
  - action: next
  - action: next
  - action: next
  - action: next
  - action: next
",
    )
    .unwrap();

    let report = run_script(&script, &instant_config()).await.unwrap();

    assert!(report.completed());
    assert_eq!(report.status, SessionStatus::Completed);
    let cursors: Vec<Cursor> = report.steps.iter().map(|s| s.cursor).collect();
    assert_eq!(
        cursors,
        vec![
            Cursor::new(Step::ModuleConfiguration, 0),
            Cursor::new(Step::ModuleConfiguration, 0),
            Cursor::new(Step::ModuleConfiguration, 1),
            Cursor::new(Step::ModuleConfiguration, 2),
            Cursor::new(Step::PricingCredits, 0),
            Cursor::new(Step::AdditionalFeatures, 0),
            Cursor::new(Step::AdditionalFeatures, 0),
        ]
    );
    assert!(matches!(report.steps[6].result, StepResult::Completed { .. }));
    assert!(report.generate_text().contains("CREATED pvt-"));
}

#[tokio::test]
async fn test_blank_form_is_blocked_on_first_step() {
    let script = Script::from_yaml_str("demo_defaults: false\nsteps:\n  - action: next\n").unwrap();

    let report = run_script(&script, &instant_config()).await.unwrap();

    let StepResult::Blocked { errors } = &report.steps[0].result else {
        panic!("blank form must not pass step 1");
    };
    assert!(errors.contains("name"));
    assert_eq!(report.cursor, Cursor::start());
    assert_eq!(report.status, SessionStatus::Active);
    assert!(!report.completed());
}

#[tokio::test]
async fn test_rejected_edit_does_not_stop_replay() {
    let script = Script::from_yaml_str(
        r"
steps:
  - action: toggle_channel
    journey: rekyc
    channel: sdk
  - action: toggle_journey
    journey: onboarding
  - action: next
  - action: next
",
    )
    .unwrap();

    let report = run_script(&script, &instant_config()).await.unwrap();

    assert!(matches!(report.steps[0].result, StepResult::Rejected { .. }));
    assert_eq!(report.steps[1].result, StepResult::Edited);
    let StepResult::Blocked { errors } = &report.steps[3].result else {
        panic!("nothing selected must block the overview");
    };
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![SERVICES_FIELD]);
}

#[tokio::test]
async fn test_acting_after_exit_stops_replay() {
    let script =
        Script::from_yaml_str("steps:\n  - action: back\n  - action: next\n").unwrap();

    let err = run_script(&script, &instant_config()).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Session { index: 1, .. }));
}

#[tokio::test]
async fn test_script_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "steps:\n  - action: next\n  - action: back").unwrap();

    let script = Script::load(file.path()).unwrap();
    let report = run_script(&script, &instant_config()).await.unwrap();
    assert_eq!(report.cursor, Cursor::start());
    assert_eq!(report.journal.len(), 2);
}

#[test]
fn test_load_draft_validates_like_the_session() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&valid_draft()).unwrap()).unwrap();

    let draft = load_draft(file.path()).unwrap();
    let errors = Validator::default().validate(&draft, Cursor::start());
    assert!(errors.is_empty(), "{errors}");
}

#[test]
fn test_missing_script_is_io_error() {
    let err = Script::load("/no/such/script.yaml").unwrap_err();
    assert!(matches!(err, ConsoleError::Io { .. }));
}
