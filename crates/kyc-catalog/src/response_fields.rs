//! Response-template field catalog
//!
//! A journey's response template selects, per category, which of these
//! fields the verification result carries back to the client.

use crate::error::CatalogError;
use serde::Serialize;

/// A category of response fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseFieldCategory {
    /// Stable category key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Field names in display order
    pub fields: &'static [&'static str],
}

impl ResponseFieldCategory {
    /// Whether `field` belongs to this category
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

static RESPONSE_FIELD_CATEGORIES: [ResponseFieldCategory; 12] = [
    ResponseFieldCategory {
        key: "personal_info",
        label: "Personal Info",
        fields: &[
            "current_nationality", "full_name_ar", "full_name_en", "first_name_en",
            "first_name_ar", "second_name_en", "second_name_ar", "family_name_ar",
            "family_name_en", "mother_name_ar", "mother_name_en", "date_of_birth",
            "hijri_date_of_birth", "person_class", "gender_ar", "gender_en",
            "marital_status_ar", "marital_status_en", "place_of_birth_ar", "place_of_birth_en",
            "mobile_no", "title_en", "title_ar", "inside_uae", "immigration_status",
            "occupation_ar", "occupation_en", "uid_number",
        ],
    },
    ResponseFieldCategory {
        key: "active_passport",
        label: "Active Passport",
        fields: &[
            "document_type", "document_no", "document_nationality", "document_nationality_abbr",
            "document_issue_country", "document_issue_country_abbr", "issue_date", "expiry_date",
        ],
    },
    ResponseFieldCategory {
        key: "person_contact_details",
        label: "Person Contact Details",
        fields: &[
            "emirate_en", "emirate_ar", "city_ar", "city_en", "area_ar", "area_en", "street_ar",
            "street_en", "po_box", "mobile_no", "home_phone", "work_phone",
        ],
    },
    ResponseFieldCategory {
        key: "travel_detail",
        label: "Travel Detail",
        fields: &[
            "is_inside_uae", "travel_type", "travel_date", "travel_time", "travel_document_no",
            "travel_document_issue_date", "travel_document_expiry_date",
        ],
    },
    ResponseFieldCategory {
        key: "residence_info",
        label: "Residence Info",
        fields: &[
            "residence_class_en", "residence_class_ar", "residence_department_en",
            "residence_department_ar", "accompany_count", "sponsor_name_en", "sponsor_name_ar",
            "issue_date", "expiry_date", "emirates_id_number", "document_no",
        ],
    },
    ResponseFieldCategory {
        key: "family_book",
        label: "Family Book",
        fields: &[
            "khulasit_qaid_no", "family_book_no", "family_book_start_date", "family_book_relation",
        ],
    },
    ResponseFieldCategory {
        key: "sponsor_details",
        label: "Sponsor Details",
        fields: &[
            "name_en", "name_ar", "department_en", "department_ar", "sponsor_no",
            "sponsor_type_en", "sponsor_type_ar", "sponsor_idn", "sponsor_nationality",
            "sponsor_nationality_abbr",
        ],
    },
    ResponseFieldCategory {
        key: "trade_license",
        label: "Trade License",
        fields: &["trade_license"],
    },
    ResponseFieldCategory {
        key: "immigration_file",
        label: "Immigration File",
        fields: &[
            "status", "file_type_en", "file_type_ar", "file_number", "issue_place", "issue_date",
            "expiry_date",
        ],
    },
    ResponseFieldCategory {
        key: "sponsor_contact_details",
        label: "Sponsor Contact Details",
        fields: &[
            "emirate_ar", "emirate_en", "city_ar", "city_en", "area_ar", "area_en", "street_ar",
            "street_en", "po_box", "email", "mobile_no", "home_phone", "work_phone",
        ],
    },
    ResponseFieldCategory {
        key: "active_visa",
        label: "Active Visa",
        fields: &[
            "visa_type", "visa_department", "passport_no", "passport_expiry_date",
            "passport_issue_place", "visa_status", "issue_date", "created_date", "validity_date",
            "expiry_date",
        ],
    },
    ResponseFieldCategory {
        key: "documents",
        label: "Documents",
        fields: &[
            "passport_image", "gcc_id_image", "person_face", "digital_eid", "digital_signature",
            "active_visa",
        ],
    },
];

/// All response-field categories in display order
#[inline]
#[must_use]
pub fn response_field_categories() -> &'static [ResponseFieldCategory] {
    &RESPONSE_FIELD_CATEGORIES
}

/// Look up a response-field category
///
/// # Errors
/// Returns [`CatalogError::UnknownCategory`] for undeclared keys
pub fn response_field_category(key: &str) -> Result<&'static ResponseFieldCategory, CatalogError> {
    RESPONSE_FIELD_CATEGORIES
        .iter()
        .find(|c| c.key == key)
        .ok_or_else(|| CatalogError::UnknownCategory(key.to_string()))
}

/// Check that `field` is declared under `category`
///
/// # Errors
/// Unknown category, or a field the category does not declare
pub fn check_response_field(category: &str, field: &str) -> Result<(), CatalogError> {
    if response_field_category(category)?.contains(field) {
        Ok(())
    } else {
        Err(CatalogError::UnknownResponseField {
            category: category.to_string(),
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_keys_are_unique() {
        let mut keys: Vec<&str> = response_field_categories().iter().map(|c| c.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn fields_are_scoped_to_their_category() {
        assert!(check_response_field("personal_info", "uid_number").is_ok());
        assert!(matches!(
            check_response_field("trade_license", "uid_number"),
            Err(CatalogError::UnknownResponseField { .. })
        ));
        assert!(matches!(
            check_response_field("loyalty", "points"),
            Err(CatalogError::UnknownCategory(_))
        ));
    }

    #[test]
    fn shared_field_names_live_in_several_categories() {
        assert!(response_field_category("active_visa").unwrap().contains("expiry_date"));
        assert!(response_field_category("immigration_file").unwrap().contains("expiry_date"));
    }
}
