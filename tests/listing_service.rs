mod helpers;

use helpers::{apartment, harness, listing, ScriptedStorage};
use listing_catalog::models::{ListingField, Locale, Status, TranslationRecord};
use listing_catalog::query::FilterSpec;
use listing_catalog::store::{DocumentStore, Sort};
use listing_catalog::CatalogError;

#[tokio::test]
async fn create_apartment_is_active() {
    let h = harness(ScriptedStorage::new());

    let created = h.service.create(apartment()).await.unwrap();

    assert_eq!(created.status, Status::Active);
    assert!(!created.id.is_empty());
    let stored = h.service.get(&created.id, None).await.unwrap();
    assert_eq!(stored.status, Status::Active);
    assert_eq!(stored.date_created, created.date_created);
}

#[tokio::test]
async fn create_castle_is_rejected_before_storing() {
    let h = harness(ScriptedStorage::new());

    let err = h
        .service
        .create(listing("Keep", "castle", "Duhok", 1))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(err.is_client_error());
    assert!(h.store.all_listings(&Sort::unsorted()).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_missing_listing_is_not_found() {
    let h = harness(ScriptedStorage::new());
    let err = h.service.get("missing", Some(Locale::Ar)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn translate_inserts_new_arabic_record() {
    let h = harness(ScriptedStorage::new());
    let canonical = h.service.create(apartment()).await.unwrap();

    let translated = h
        .service
        .translate(
            &canonical.id,
            TranslationRecord {
                title: "شقة".to_string(),
                ..Default::default()
            },
            Locale::Ar,
        )
        .await
        .unwrap();

    assert_eq!(translated.title, "شقة");
    assert_eq!(translated.description, canonical.description);
    assert_eq!(translated.city, canonical.city);
    assert_eq!(translated.category, canonical.category);
    assert_eq!(translated.price, canonical.price);
    assert_eq!(translated.id, canonical.id);

    let record = h
        .store
        .translation_for(&canonical.id, Locale::Ar)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.listing_id, canonical.id);
    assert_eq!(record.locale, Locale::Ar);
    assert_eq!(record.title, "شقة");
}

#[tokio::test]
async fn translate_again_rewrites_the_existing_record() {
    let h = harness(ScriptedStorage::new());
    let canonical = h.service.create(apartment()).await.unwrap();

    h.service
        .translate(
            &canonical.id,
            TranslationRecord {
                title: "شقة".to_string(),
                city: "أربيل".to_string(),
                ..Default::default()
            },
            Locale::Ar,
        )
        .await
        .unwrap();

    let translated = h
        .service
        .translate(
            &canonical.id,
            TranslationRecord {
                title: "شقة واسعة".to_string(),
                category: "شقة".to_string(),
                ..Default::default()
            },
            Locale::Ar,
        )
        .await
        .unwrap();

    assert_eq!(translated.title, "شقة واسعة");
    assert_eq!(translated.category, "شقة");
    // the rewrite cleared the earlier city override
    assert_eq!(translated.city, "Erbil");

    let records = h
        .store
        .translations_for(&[canonical.id.clone()], Locale::Ar)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].city.is_empty());
}

#[tokio::test]
async fn translate_missing_listing_is_not_found() {
    let h = harness(ScriptedStorage::new());
    let err = h
        .service
        .translate("missing", TranslationRecord::default(), Locale::Kur)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    assert!(h
        .store
        .translations_for(&["missing".to_string()], Locale::Kur)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn translate_never_touches_a_record_keyed_by_another_case_of_the_id() {
    let h = harness(ScriptedStorage::new());
    let id = h.service.create(apartment()).await.unwrap().id;
    let shouted = id.to_uppercase();
    assert_ne!(shouted, id);
    h.store
        .create_translation(&TranslationRecord {
            listing_id: shouted.clone(),
            locale: Locale::Ar,
            title: "ليس لي".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let translated = h
        .service
        .translate(
            &id,
            TranslationRecord {
                title: "لي".to_string(),
                ..Default::default()
            },
            Locale::Ar,
        )
        .await
        .unwrap();
    assert_eq!(translated.title, "لي");

    let own = h.store.translation_for(&id, Locale::Ar).await.unwrap().unwrap();
    assert_eq!(own.listing_id, id);
    assert_eq!(own.title, "لي");

    let foreign = h.store.translation_for(&shouted, Locale::Ar).await.unwrap().unwrap();
    assert_eq!(foreign.title, "ليس لي");
    assert_eq!(h.service.get(&id, Some(Locale::Ar)).await.unwrap().title, "لي");
}

#[tokio::test]
async fn reads_overlay_only_outside_the_default_locale() {
    let h = harness(ScriptedStorage::new());
    let id = h.service.create(apartment()).await.unwrap().id;
    h.service
        .translate(
            &id,
            TranslationRecord {
                title: "خانوو".to_string(),
                ..Default::default()
            },
            Locale::Kur,
        )
        .await
        .unwrap();

    assert_eq!(h.service.get(&id, None).await.unwrap().title, "Apartment near the citadel");
    assert_eq!(
        h.service.get(&id, Some(Locale::En)).await.unwrap().title,
        "Apartment near the citadel"
    );
    assert_eq!(h.service.get_translated(&id, Locale::Kur).await.unwrap().title, "خانوو");
    // no Arabic record: canonical comes back
    assert_eq!(
        h.service.get(&id, Some(Locale::Ar)).await.unwrap().title,
        "Apartment near the citadel"
    );
}

#[tokio::test]
async fn search_is_conjunctive_and_localized() {
    let h = harness(ScriptedStorage::new());
    let erbil_house = h
        .service
        .create(listing("Family house", "house", "Erbil", 150_000))
        .await
        .unwrap();
    h.service
        .create(listing("Small house", "house", "Duhok", 60_000))
        .await
        .unwrap();
    h.service
        .create(listing("Erbil flat", "apartment", "Erbil", 80_000))
        .await
        .unwrap();
    h.service
        .translate(
            &erbil_house.id,
            TranslationRecord {
                title: "بيت عائلي".to_string(),
                ..Default::default()
            },
            Locale::Ar,
        )
        .await
        .unwrap();

    let filter = FilterSpec::new()
        .equals("city", "Erbil")
        .equals("category", "house");
    let hits = h
        .service
        .search(&filter, &Sort::unsorted(), Some(Locale::Ar))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "بيت عائلي");

    let filter = FilterSpec::new().range("price", 60_000, 80_000);
    let hits = h
        .service
        .search(&filter, &Sort::by("price", false), None)
        .await
        .unwrap();
    let titles: Vec<_> = hits.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Erbil flat", "Small house"]);

    let everything = h
        .service
        .search(&FilterSpec::new(), &Sort::unsorted(), Some(Locale::Ar))
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);
    assert_eq!(everything[1].title, "Small house");
}

#[tokio::test]
async fn search_localizes_hits_among_many_translated_listings() {
    let h = harness(ScriptedStorage::new());
    let mut target = None;
    for n in 0..150 {
        let city = if n == 137 { "Zakho" } else { "Erbil" };
        let created = h
            .service
            .create(listing(&format!("House {}", n), "house", city, 50_000 + n))
            .await
            .unwrap();
        h.service
            .translate(
                &created.id,
                TranslationRecord {
                    title: format!("بيت {}", n),
                    ..Default::default()
                },
                Locale::Ar,
            )
            .await
            .unwrap();
        if n == 137 {
            target = Some(created.id);
        }
    }

    let hits = h
        .service
        .search(&FilterSpec::new().equals("city", "Zakho"), &Sort::unsorted(), Some(Locale::Ar))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(Some(hits[0].id.clone()), target);
    assert_eq!(hits[0].title, "بيت 137");
}

#[tokio::test]
async fn list_filters_by_status_and_localizes() {
    let h = harness(ScriptedStorage::new());
    let active = h.service.create(apartment()).await.unwrap();
    let retired = h
        .service
        .create(listing("Old farm", "farm", "Zakho", 40_000))
        .await
        .unwrap();
    h.service
        .update(&retired.id, vec![ListingField::Status(Status::Inactive)])
        .await
        .unwrap();
    h.service
        .translate(
            &active.id,
            TranslationRecord {
                title: "شقة".to_string(),
                ..Default::default()
            },
            Locale::Ar,
        )
        .await
        .unwrap();

    let all = h.service.list(None, &Sort::unsorted(), None).await.unwrap();
    assert_eq!(all.len(), 2);

    let inactive = h
        .service
        .list(Some(Status::Inactive), &Sort::unsorted(), Some(Locale::Ar))
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].title, "Old farm");

    let active_ar = h
        .service
        .list(Some(Status::Active), &Sort::unsorted(), Some(Locale::Ar))
        .await
        .unwrap();
    assert_eq!(active_ar.len(), 1);
    assert_eq!(active_ar[0].title, "شقة");
}

#[tokio::test]
async fn update_parsed_from_wire_rejects_bad_category() {
    let err = ListingField::parse("category", serde_json::json!("castle")).unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    let h = harness(ScriptedStorage::new());
    let id = h.service.create(apartment()).await.unwrap().id;
    let field = ListingField::parse("price", serde_json::json!(99_000)).unwrap();
    let updated = h.service.update(&id, vec![field]).await.unwrap();
    assert_eq!(updated.price, 99_000);
    assert_eq!(updated.title, "Apartment near the citadel");
}
