//! Read-time overlay of locale-specific text onto canonical listings.

use crate::models::{Listing, Locale, TranslationRecord};
use std::collections::HashMap;

/// True when a read in this locale should look for translation records
pub fn needs_overlay(locale: Option<Locale>) -> bool {
    locale.is_some_and(|locale| !locale.is_default())
}

/// Copy every non-empty override from `record` onto `listing`.
///
/// Mapping is one to one: title, description, category, city, location,
/// property_type and direction_face each overwrite the field of the same name.
pub fn overlay(listing: &mut Listing, record: &TranslationRecord) {
    let overrides = [
        (&mut listing.title, &record.title),
        (&mut listing.description, &record.description),
        (&mut listing.category, &record.category),
        (&mut listing.city, &record.city),
        (&mut listing.location, &record.location),
        (&mut listing.property_type, &record.property_type),
        (&mut listing.direction_face, &record.direction_face),
    ];
    for (target, value) in overrides {
        if !value.is_empty() {
            target.clone_from(value);
        }
    }
}

/// Localize one listing.
///
/// Returns `canonical` unchanged for the default locale, when there is no
/// record, or when the record belongs to another listing or locale.
pub fn apply(
    locale: Option<Locale>,
    mut canonical: Listing,
    translation: Option<&TranslationRecord>,
) -> Listing {
    let Some(locale) = locale.filter(|locale| !locale.is_default()) else {
        return canonical;
    };
    if let Some(record) = translation.filter(|record| record.belongs_to(&canonical.id, locale)) {
        overlay(&mut canonical, record);
    }
    canonical
}

/// Localize a batch of listings, pairing records to listings by identifier.
/// Order of the two sequences does not need to line up. Records in another
/// locale are ignored.
pub fn apply_many(
    locale: Option<Locale>,
    canonical: Vec<Listing>,
    translations: &[TranslationRecord],
) -> Vec<Listing> {
    let Some(locale) = locale.filter(|locale| !locale.is_default()) else {
        return canonical;
    };

    let mut by_listing: HashMap<&str, Vec<&TranslationRecord>> = HashMap::new();
    for record in translations.iter().filter(|record| record.locale == locale) {
        by_listing
            .entry(record.listing_id.as_str())
            .or_default()
            .push(record);
    }

    canonical
        .into_iter()
        .map(|mut listing| {
            if let Some(records) = by_listing.get(listing.id.as_str()) {
                for record in records {
                    overlay(&mut listing, record);
                }
            }
            listing
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: "Apartment in Erbil".to_string(),
            description: "Two bedrooms near the citadel".to_string(),
            category: "apartment".to_string(),
            city: "Erbil".to_string(),
            location: "Ankawa".to_string(),
            property_type: "residential".to_string(),
            direction_face: "north".to_string(),
            price: 95_000,
            ..Default::default()
        }
    }

    fn arabic(listing_id: &str) -> TranslationRecord {
        TranslationRecord {
            id: format!("t-{}", listing_id),
            listing_id: listing_id.to_string(),
            locale: Locale::Ar,
            title: "شقة في أربيل".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_locale_is_returned_unchanged() {
        let record = TranslationRecord {
            description: "وصف".to_string(),
            ..arabic("l1")
        };
        assert_eq!(apply(Some(Locale::En), canonical("l1"), Some(&record)), canonical("l1"));
        assert_eq!(apply(None, canonical("l1"), Some(&record)), canonical("l1"));
    }

    #[test]
    fn empty_override_keeps_canonical_value() {
        let mut record = arabic("l1");
        record.title = String::new();
        record.city = "أربيل".to_string();

        let localized = apply(Some(Locale::Ar), canonical("l1"), Some(&record));
        assert_eq!(localized.title, "Apartment in Erbil");
        assert_eq!(localized.city, "أربيل");
    }

    #[test]
    fn non_empty_override_replaces_and_other_fields_survive() {
        let localized = apply(Some(Locale::Ar), canonical("l1"), Some(&arabic("l1")));
        assert_eq!(localized.title, "شقة في أربيل");
        assert_eq!(localized.description, "Two bedrooms near the citadel");
        assert_eq!(localized.price, 95_000);
        assert_eq!(localized.id, "l1");
    }

    #[test]
    fn description_lands_in_description_not_city() {
        let record = TranslationRecord {
            description: "غرفتا نوم".to_string(),
            direction_face: "شمال".to_string(),
            ..arabic("l1")
        };
        let localized = apply(Some(Locale::Ar), canonical("l1"), Some(&record));
        assert_eq!(localized.description, "غرفتا نوم");
        assert_eq!(localized.city, "Erbil");
        assert_eq!(localized.direction_face, "شمال");
    }

    #[test]
    fn missing_or_foreign_record_leaves_listing_alone() {
        assert_eq!(apply(Some(Locale::Ar), canonical("l1"), None), canonical("l1"));
        assert_eq!(
            apply(Some(Locale::Ar), canonical("l1"), Some(&arabic("l2"))),
            canonical("l1")
        );
    }

    #[test]
    fn record_in_another_locale_is_not_overlaid() {
        let mut kurdish = arabic("l1");
        kurdish.locale = Locale::Kur;

        assert_eq!(
            apply(Some(Locale::Ar), canonical("l1"), Some(&kurdish)),
            canonical("l1")
        );
        assert_eq!(
            apply_many(Some(Locale::Ar), vec![canonical("l1")], &[kurdish]),
            vec![canonical("l1")]
        );
    }

    #[test]
    fn apply_many_pairs_by_identifier_regardless_of_order() {
        let listings = vec![canonical("l1"), canonical("l2"), canonical("l3")];
        let mut second = arabic("l2");
        second.title = "شقة ثانية".to_string();
        let records = vec![second, arabic("l1")];

        let localized = apply_many(Some(Locale::Ar), listings, &records);

        assert_eq!(localized[0].title, "شقة في أربيل");
        assert_eq!(localized[1].title, "شقة ثانية");
        assert_eq!(localized[2], canonical("l3"));
    }

    #[test]
    fn apply_many_skips_default_locale() {
        let localized = apply_many(Some(Locale::En), vec![canonical("l1")], &[arabic("l1")]);
        assert_eq!(localized, vec![canonical("l1")]);
    }
}
