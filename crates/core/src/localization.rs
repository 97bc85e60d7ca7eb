//! Localized-content value model.
//!
//! Tours and transfers carry their translatable fields as an ordered list of
//! per-locale records stored in a single JSONB column. Locale filtering
//! happens in SQL (the repositories trim the list to the requested locale);
//! this module owns the record types themselves plus the in-memory reshaping
//! used by the API layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One per-locale record of a tour's translatable fields.
///
/// Locale values are unique within a tour's list by convention; storage does
/// not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TourLocalization {
    #[validate(length(min = 2, max = 5, message = "Locale must be 2-5 characters"))]
    pub locale: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// One per-locale record of a transfer's translatable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransferLocalization {
    #[validate(length(min = 2, max = 5, message = "Locale must be 2-5 characters"))]
    pub locale: String,
    #[validate(length(min = 1, message = "Start location is required"))]
    pub start_location: String,
    #[validate(length(min = 1, message = "End location is required"))]
    pub end_location: String,
}

/// Translatable tour fields without the locale key, as exposed in the
/// locale-keyed `translations` lookup of the tour detail response.
#[derive(Debug, Clone, Serialize)]
pub struct TourTranslation {
    pub name: String,
    pub destination: String,
    pub description: String,
}

/// Collect the localized `name` values of a tour, in list order.
///
/// Used by the create flow's cross-locale uniqueness check.
pub fn localized_names(localizations: &[TourLocalization]) -> Vec<String> {
    localizations.iter().map(|loc| loc.name.clone()).collect()
}

/// Reshape an ordered localization list into a locale-keyed lookup map.
///
/// Later entries win if a locale appears twice (lists are unique by
/// convention, so in practice this never triggers).
pub fn translations_map(localizations: &[TourLocalization]) -> BTreeMap<String, TourTranslation> {
    localizations
        .iter()
        .map(|loc| {
            (
                loc.locale.clone(),
                TourTranslation {
                    name: loc.name.clone(),
                    destination: loc.destination.clone(),
                    description: loc.description.clone(),
                },
            )
        })
        .collect()
}
