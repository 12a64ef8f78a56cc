//! Step/substep progression
//!
//! The wizard cursor is `(step, sub_step)`. `sub_step` only moves on step 2:
//! 0 is the service-selection overview, 1..=K index the configuration
//! sub-screens, where K is derived from the draft every time it is needed
//! (see [`config_count`]).
//!
//! The functions here are pure: they decide where the cursor goes and leave
//! validation and side effects to the session.
//!
//! Next and Back are deliberately asymmetric around step 3: Next from the
//! last sub-screen lands on `(3, 0)`, Back from step 3 re-enters the
//! configuration flow at `(2, K)` rather than at the overview.

use crate::draft::OrganizationDraft;
use kyc_catalog::services::{AUTHENTICATION_SERVICE, KYC_SERVICE, VALIDATION_SERVICE};
use kyc_catalog::{category, JourneyKind, StepInfo, ValidationApiKind, STEPS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    /// Company and root-user details
    OrganizationDetails = 1,
    /// Service selection and per-service configuration
    ModuleConfiguration = 2,
    /// Pricing and initial credits
    PricingCredits = 3,
    /// Organization feature flags; Next submits
    AdditionalFeatures = 4,
}

impl Step {
    /// All steps in order
    pub const ALL: [Step; 4] = [
        Step::OrganizationDetails,
        Step::ModuleConfiguration,
        Step::PricingCredits,
        Step::AdditionalFeatures,
    ];

    /// 1-based step number
    #[inline]
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Step for a 1-based number
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::OrganizationDetails),
            2 => Some(Self::ModuleConfiguration),
            3 => Some(Self::PricingCredits),
            4 => Some(Self::AdditionalFeatures),
            _ => None,
        }
    }

    /// Display metadata
    #[inline]
    #[must_use]
    pub fn info(self) -> &'static StepInfo {
        &STEPS[usize::from(self.number() - 1)]
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("step out of range: {value}"))
    }
}

/// Position of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCursor")]
pub struct Cursor {
    step: Step,
    sub_step: usize,
}

#[derive(Deserialize)]
struct RawCursor {
    step: Step,
    #[serde(default)]
    sub_step: usize,
}

impl From<RawCursor> for Cursor {
    fn from(raw: RawCursor) -> Self {
        Self::new(raw.step, raw.sub_step)
    }
}

impl Cursor {
    /// First screen of the wizard
    #[inline]
    #[must_use]
    pub const fn start() -> Self {
        Self {
            step: Step::OrganizationDetails,
            sub_step: 0,
        }
    }

    /// Cursor at `step`; `sub_step` is forced to 0 outside step 2
    #[inline]
    #[must_use]
    pub const fn new(step: Step, sub_step: usize) -> Self {
        let sub_step = match step {
            Step::ModuleConfiguration => sub_step,
            _ => 0,
        };
        Self { step, sub_step }
    }

    /// Current step
    #[inline]
    #[must_use]
    pub const fn step(self) -> Step {
        self.step
    }

    /// Current substep (0 outside step 2)
    #[inline]
    #[must_use]
    pub const fn sub_step(self) -> usize {
        self.sub_step
    }

    /// Whether the cursor is on a configuration sub-screen
    #[inline]
    #[must_use]
    pub const fn in_configuration(self) -> bool {
        matches!(self.step, Step::ModuleConfiguration) && self.sub_step > 0
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.step.number(), self.sub_step)
    }
}

/// One configuration sub-screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConfigTarget {
    /// Journey configuration screen
    Journey(JourneyKind),
    /// Validation API configuration screen
    ValidationApi(ValidationApiKind),
}

impl ConfigTarget {
    /// Wire id of the configured service
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Journey(j) => j.as_str(),
            Self::ValidationApi(v) => v.as_str(),
        }
    }

    /// Display label of the configured service
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Journey(j) => j.label(),
            Self::ValidationApi(v) => v.label(),
        }
    }
}

/// Ordered sub-screens walked by substeps 1..=K
///
/// Enabled journeys in toggle order, then enabled validation APIs in
/// catalog order.
#[must_use]
pub fn config_targets(draft: &OrganizationDraft) -> Vec<ConfigTarget> {
    draft
        .enabled_journeys
        .iter()
        .copied()
        .map(ConfigTarget::Journey)
        .chain(
            draft
                .enabled_validation_apis()
                .into_iter()
                .map(ConfigTarget::ValidationApi),
        )
        .collect()
}

/// K: number of configuration sub-screens for the draft as it is now
#[must_use]
pub fn config_count(draft: &OrganizationDraft) -> usize {
    draft.enabled_journeys.len()
        + draft
            .validation_config
            .values()
            .filter(|c| c.enabled)
            .count()
}

/// Sub-screen the cursor points at, if any
#[must_use]
pub fn current_target(cursor: Cursor, draft: &OrganizationDraft) -> Option<ConfigTarget> {
    if !cursor.in_configuration() {
        return None;
    }
    config_targets(draft).get(cursor.sub_step - 1).copied()
}

/// Where Next leads once the current screen has validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    /// Move the cursor
    To(Cursor),
    /// Last step: hand the draft to the organization gateway
    Submit,
}

/// Where Back leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backward {
    /// Move the cursor
    To(Cursor),
    /// First step: leave the wizard
    Exit,
}

/// Next transition for `cursor` given K = `config_count`
#[must_use]
pub fn forward(cursor: Cursor, config_count: usize) -> Forward {
    match cursor.step {
        Step::OrganizationDetails => Forward::To(Cursor::new(Step::ModuleConfiguration, 0)),
        Step::ModuleConfiguration => {
            let sub = cursor.sub_step;
            if sub == 0 && config_count > 0 {
                Forward::To(Cursor::new(Step::ModuleConfiguration, 1))
            } else if sub > 0 && sub < config_count {
                Forward::To(Cursor::new(Step::ModuleConfiguration, sub + 1))
            } else {
                Forward::To(Cursor::new(Step::PricingCredits, 0))
            }
        }
        Step::PricingCredits => Forward::To(Cursor::new(Step::AdditionalFeatures, 0)),
        Step::AdditionalFeatures => Forward::Submit,
    }
}

/// Back transition for `cursor` given K = `config_count`
#[must_use]
pub fn backward(cursor: Cursor, config_count: usize) -> Backward {
    match cursor.step {
        Step::OrganizationDetails => Backward::Exit,
        Step::ModuleConfiguration if cursor.sub_step > 0 => {
            Backward::To(Cursor::new(Step::ModuleConfiguration, cursor.sub_step - 1))
        }
        Step::ModuleConfiguration => Backward::To(Cursor::start()),
        Step::PricingCredits => Backward::To(Cursor::new(Step::ModuleConfiguration, config_count)),
        Step::AdditionalFeatures => Backward::To(Cursor::new(Step::PricingCredits, 0)),
    }
}

/// Pull an out-of-range substep back to the last valid sub-screen
///
/// Returns the cursor unchanged when `sub_step <= K`. With K = 0 this lands
/// on the overview.
#[must_use]
pub fn clamp(cursor: Cursor, config_count: usize) -> Cursor {
    if cursor.sub_step > config_count {
        Cursor::new(cursor.step, config_count)
    } else {
        cursor
    }
}

/// Completion state of a step relative to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Behind the cursor
    Completed,
    /// Under the cursor
    Active,
    /// Ahead of the cursor
    Pending,
}

/// Status of `step` for a cursor
#[must_use]
pub fn step_status(cursor: Cursor, step: Step) -> StepStatus {
    match cursor.step.cmp(&step) {
        std::cmp::Ordering::Greater => StepStatus::Completed,
        std::cmp::Ordering::Equal => StepStatus::Active,
        std::cmp::Ordering::Less => StepStatus::Pending,
    }
}

/// Share of completed steps, rounded to a whole percent
#[must_use]
pub fn progress_percent(cursor: Cursor) -> u8 {
    let done = u32::from(cursor.step.number() - 1);
    let total = Step::ALL.len() as u32;
    // round half up
    u8::try_from((done * 200 + total) / (2 * total)).unwrap_or(100)
}

/// Sidebar group of consecutive sub-screens belonging to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubStepGroup {
    /// Category key
    pub category: &'static str,
    /// Category label
    pub label: &'static str,
    /// Member service ids in walk order
    pub members: Vec<&'static str>,
    /// First substep of the group (1-based, inclusive)
    pub first: usize,
    /// Last substep of the group (inclusive)
    pub last: usize,
}

impl SubStepGroup {
    /// Whether `sub_step` falls inside this group
    #[inline]
    #[must_use]
    pub fn contains(&self, sub_step: usize) -> bool {
        (self.first..=self.last).contains(&sub_step)
    }
}

/// Sidebar grouping of the configuration sub-screens
///
/// KYC journeys, then authentication journeys, then validation APIs; empty
/// groups are omitted. Ranges are numbered in group order, which matches the
/// walk order only when journeys were enabled category by category.
#[must_use]
pub fn substep_groups(draft: &OrganizationDraft) -> Vec<SubStepGroup> {
    let mut groups = Vec::new();
    let mut next = 1;

    for key in [KYC_SERVICE, AUTHENTICATION_SERVICE, VALIDATION_SERVICE] {
        let Ok(cat) = category(key) else { continue };
        let members: Vec<&'static str> = if key == VALIDATION_SERVICE {
            draft
                .enabled_validation_apis()
                .into_iter()
                .map(ValidationApiKind::as_str)
                .collect()
        } else {
            draft
                .enabled_journeys
                .iter()
                .map(|j| j.as_str())
                .filter(|id| cat.contains(id))
                .collect()
        };
        if members.is_empty() {
            continue;
        }
        let first = next;
        let last = first + members.len() - 1;
        next = last + 1;
        groups.push(SubStepGroup {
            category: cat.key,
            label: cat.label,
            members,
            first,
            last,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FormStore;
    use proptest::prelude::*;

    fn draft_with(journeys: &[JourneyKind], apis: &[ValidationApiKind]) -> OrganizationDraft {
        let mut store = FormStore::new(OrganizationDraft::default());
        for j in journeys {
            store.toggle_journey(*j);
        }
        for a in apis {
            store.toggle_validation_api(*a);
        }
        store.into_draft()
    }

    fn walk_next(mut cursor: Cursor, k: usize, times: usize) -> Cursor {
        for _ in 0..times {
            match forward(cursor, k) {
                Forward::To(next) => cursor = next,
                Forward::Submit => panic!("unexpected submit from {cursor}"),
            }
        }
        cursor
    }

    #[test]
    fn cursor_outside_step_two_has_no_substep() {
        assert_eq!(Cursor::new(Step::PricingCredits, 5).sub_step(), 0);
        assert_eq!(Cursor::new(Step::ModuleConfiguration, 5).sub_step(), 5);
    }

    #[test]
    fn deserialized_cursor_drops_substep_outside_step_two() {
        let cursor: Cursor = serde_json::from_str(r#"{"step":3,"sub_step":5}"#).unwrap();
        assert_eq!(cursor, Cursor::new(Step::PricingCredits, 0));
        assert!(!cursor.in_configuration());

        let cursor: Cursor = serde_json::from_str(r#"{"step":2,"sub_step":5}"#).unwrap();
        assert_eq!(cursor.sub_step(), 5);

        let cursor: Cursor = serde_json::from_str(r#"{"step":1}"#).unwrap();
        assert_eq!(cursor, Cursor::start());
        assert!(serde_json::from_str::<Cursor>(r#"{"step":5,"sub_step":0}"#).is_err());
    }

    #[test]
    fn overview_with_nothing_enabled_skips_to_pricing() {
        let to = forward(Cursor::new(Step::ModuleConfiguration, 0), 0);
        assert_eq!(to, Forward::To(Cursor::new(Step::PricingCredits, 0)));
    }

    #[test]
    fn overview_with_one_journey_enters_configuration() {
        let draft = draft_with(&[JourneyKind::Onboarding], &[]);
        let to = forward(Cursor::new(Step::ModuleConfiguration, 0), config_count(&draft));
        assert_eq!(to, Forward::To(Cursor::new(Step::ModuleConfiguration, 1)));
    }

    #[test]
    fn last_step_submits() {
        assert_eq!(forward(Cursor::new(Step::AdditionalFeatures, 0), 3), Forward::Submit);
    }

    #[test]
    fn back_from_first_step_exits() {
        assert_eq!(backward(Cursor::start(), 0), Backward::Exit);
        assert_eq!(
            backward(Cursor::new(Step::AdditionalFeatures, 0), 2),
            Backward::To(Cursor::new(Step::PricingCredits, 0))
        );
    }

    #[test]
    fn targets_put_journeys_in_toggle_order_and_apis_in_catalog_order() {
        let draft = draft_with(
            &[JourneyKind::OneToMany, JourneyKind::Onboarding],
            &[ValidationApiKind::PassportValidation, ValidationApiKind::EidValidation],
        );

        assert_eq!(
            config_targets(&draft),
            vec![
                ConfigTarget::Journey(JourneyKind::OneToMany),
                ConfigTarget::Journey(JourneyKind::Onboarding),
                ConfigTarget::ValidationApi(ValidationApiKind::EidValidation),
                ConfigTarget::ValidationApi(ValidationApiKind::PassportValidation),
            ]
        );
        assert_eq!(config_count(&draft), 4);
        assert_eq!(
            current_target(Cursor::new(Step::ModuleConfiguration, 3), &draft),
            Some(ConfigTarget::ValidationApi(ValidationApiKind::EidValidation))
        );
        assert_eq!(current_target(Cursor::new(Step::ModuleConfiguration, 0), &draft), None);
    }

    #[test]
    fn clamp_only_touches_out_of_range_substeps() {
        let cursor = Cursor::new(Step::ModuleConfiguration, 3);
        assert_eq!(clamp(cursor, 5), cursor);
        assert_eq!(clamp(cursor, 2).sub_step(), 2);
        assert_eq!(clamp(cursor, 0).sub_step(), 0);
    }

    #[test]
    fn step_status_and_progress() {
        let cursor = Cursor::new(Step::PricingCredits, 0);
        assert_eq!(step_status(cursor, Step::OrganizationDetails), StepStatus::Completed);
        assert_eq!(step_status(cursor, Step::PricingCredits), StepStatus::Active);
        assert_eq!(step_status(cursor, Step::AdditionalFeatures), StepStatus::Pending);

        assert_eq!(progress_percent(Cursor::start()), 0);
        assert_eq!(progress_percent(Cursor::new(Step::ModuleConfiguration, 2)), 25);
        assert_eq!(progress_percent(cursor), 50);
        assert_eq!(progress_percent(Cursor::new(Step::AdditionalFeatures, 0)), 75);
    }

    #[test]
    fn substep_groups_follow_category_order() {
        let draft = draft_with(
            &[JourneyKind::Authorise, JourneyKind::Onboarding, JourneyKind::Rekyc],
            &[ValidationApiKind::EidValidation],
        );
        let groups = substep_groups(&draft);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].category, KYC_SERVICE);
        assert_eq!(groups[0].members, vec!["onboarding", "rekyc"]);
        assert_eq!((groups[0].first, groups[0].last), (1, 2));
        assert_eq!(groups[1].members, vec!["authorise"]);
        assert_eq!((groups[1].first, groups[1].last), (3, 3));
        assert_eq!(groups[2].category, VALIDATION_SERVICE);
        assert!(groups[2].contains(4));
    }

    #[test]
    fn step_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Step::PricingCredits).unwrap(), "3");
        let back: Step = serde_json::from_str("2").unwrap();
        assert_eq!(back, Step::ModuleConfiguration);
        assert!(serde_json::from_str::<Step>("9").is_err());
    }

    proptest! {
        #[test]
        fn prop_next_k_times_from_first_substep_reaches_pricing(k in 1usize..12) {
            let end = walk_next(Cursor::new(Step::ModuleConfiguration, 1), k, k);
            prop_assert_eq!(end, Cursor::new(Step::PricingCredits, 0));
        }

        #[test]
        fn prop_back_from_pricing_reenters_last_substep(k in 0usize..12) {
            let to = backward(Cursor::new(Step::PricingCredits, 0), k);
            prop_assert_eq!(to, Backward::To(Cursor::new(Step::ModuleConfiguration, k)));
        }

        #[test]
        fn prop_back_undoes_next_inside_configuration(k in 1usize..12, sub in 0usize..12) {
            prop_assume!(sub < k);
            let from = Cursor::new(Step::ModuleConfiguration, sub);
            let Forward::To(next) = forward(from, k) else { panic!("no submit on step 2") };
            prop_assert_eq!(backward(next, k), Backward::To(from));
        }

        #[test]
        fn prop_forward_never_leaves_substep_range(k in 0usize..12, sub in 0usize..12) {
            let cursor = clamp(Cursor::new(Step::ModuleConfiguration, sub), k);
            if let Forward::To(next) = forward(cursor, k) {
                prop_assert!(next.sub_step() <= k);
                prop_assert!(next.step() >= Step::ModuleConfiguration);
            }
        }
    }
}
