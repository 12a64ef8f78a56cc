//! Plain-text rendering for the console

use kyc_catalog::{categories, response_field_categories, Configurability, STEPS};
use kyc_onboarding::{progress_percent, step_status, Cursor, FieldErrors, Step, StepStatus};
use serde::Serialize;

/// Catalog as printed by `kyc-console catalog --json`
#[derive(Debug, Serialize)]
pub struct CatalogDump {
    /// Wizard steps
    pub steps: &'static [kyc_catalog::StepInfo],
    /// Service categories
    pub categories: &'static [kyc_catalog::Category],
    /// Response-template field categories
    pub response_fields: &'static [kyc_catalog::ResponseFieldCategory],
}

impl CatalogDump {
    /// Whole catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: &STEPS,
            categories: categories(),
            response_fields: response_field_categories(),
        }
    }
}

impl Default for CatalogDump {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog as an indented listing
#[must_use]
pub fn catalog_text() -> String {
    let mut out = String::new();

    out.push_str("=== Steps ===\n");
    for step in &STEPS {
        out.push_str(&format!("{}. {} - {}\n", step.number, step.title, step.description));
    }

    out.push_str("\n=== Services ===\n");
    for category in categories() {
        let kind = match category.configurable {
            Configurability::Journey => "journeys",
            Configurability::Validation => "validation APIs",
            Configurability::None => "switches",
        };
        out.push_str(&format!("{} [{}] ({kind})\n", category.label, category.key));
        for service in category.services {
            out.push_str(&format!("  - {:<28} {}\n", service.id, service.label));
            for sub in service.sub_options {
                out.push_str(&format!("      + {:<24} {}\n", sub.id, sub.label));
            }
        }
    }

    out
}

/// Stepper line for a cursor, e.g. `[x] 1  [>] 2  [ ] 3  [ ] 4  25%`
#[must_use]
pub fn stepper_line(cursor: Cursor) -> String {
    let mut out = String::new();
    for step in Step::ALL {
        let mark = match step_status(cursor, step) {
            StepStatus::Completed => "x",
            StepStatus::Active => ">",
            StepStatus::Pending => " ",
        };
        out.push_str(&format!("[{mark}] {}  ", step.number()));
    }
    out.push_str(&format!("{}%", progress_percent(cursor)));
    out
}

/// Field errors one per line, or `ok`
#[must_use]
pub fn errors_text(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return "ok\n".to_string();
    }
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}\n"))
        .collect()
}
