//! Wizard step metadata

use serde::Serialize;

/// Display metadata for one top-level wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    /// 1-based step number
    pub number: u8,
    /// Title shown in the stepper
    pub title: &'static str,
    /// One-line summary
    pub description: &'static str,
}

/// The four onboarding steps in order
pub const STEPS: [StepInfo; 4] = [
    StepInfo {
        number: 1,
        title: "Organization Details",
        description: "Company & admin info",
    },
    StepInfo {
        number: 2,
        title: "Module Configuration",
        description: "Journey & verification setup",
    },
    StepInfo {
        number: 3,
        title: "Pricing & Credits",
        description: "Pricing configuration",
    },
    StepInfo {
        number: 4,
        title: "Additional Features",
        description: "Extra configurations",
    },
];

/// Organization-level feature flags and their defaults
pub const ORG_CONFIG_DEFAULTS: [(&str, bool); 9] = [
    ("non_visitor_onboarding", false),
    ("require_onboarding", true),
    ("generate_certificate", true),
    ("proactive_monitoring", true),
    ("sandbox_mode", false),
    ("eligible_for_finance", false),
    ("watermark_noise_compression", true),
    ("active_liveness", true),
    ("passive_liveness", false),
];
