//! End-to-end queries over the Bangalore sample directory.

use nearcare_core::{
    DirectoryError, GeoPoint, MemoryRecordStore, NewProvider, ProviderRecord, QueryEngine,
    ValidationError,
    test_support::{bangalore_providers, provider_at},
};
use rstest::{fixture, rstest};

fn names(records: &[ProviderRecord]) -> Vec<&str> {
    records.iter().map(|record| record.name.as_str()).collect()
}

/// Search centre supplied by callers as latitude 12.9716, longitude 77.5946.
fn city_centre() -> GeoPoint {
    GeoPoint::new(77.5946, 12.9716).expect("valid centre")
}

#[fixture]
fn engine() -> QueryEngine<MemoryRecordStore> {
    let engine = QueryEngine::new(MemoryRecordStore::default()).expect("build engine");
    engine
        .create_many(bangalore_providers())
        .expect("seed sample providers");
    engine
}

#[rstest]
fn insert_then_get_populates_identity_and_timestamps() {
    let engine = QueryEngine::new(MemoryRecordStore::default()).expect("build engine");
    let created = engine
        .create(provider_at("Dr. A", "1 Residency Road", 77.6, 12.97))
        .expect("create");

    let fetched = engine.get(created.id).expect("get");
    assert_eq!(fetched, created);
    assert_eq!(fetched.created_at, fetched.updated_at);
    assert_eq!(fetched.address, "1 Residency Road");
}

#[rstest]
#[case(10_000.0, true)]
#[case(1_000.0, true)]
#[case(900.0, false)]
fn mg_road_clinic_is_found_by_radius(#[case] radius: f64, #[case] expected: bool) {
    let engine = QueryEngine::new(MemoryRecordStore::default()).expect("build engine");
    let mg_road = engine
        .create(provider_at(
            "Dr. Rajesh Kumar",
            "123 MG Road, Bangalore",
            77.6033,
            12.9716,
        ))
        .expect("create");

    let hits = engine.find_near(city_centre(), radius).expect("query");
    assert_eq!(hits.contains(&mg_road), expected);
}

#[rstest]
fn default_radius_covers_five_kilometres(engine: QueryEngine<MemoryRecordStore>) {
    let hits = engine.find_near_default(city_centre()).expect("query");
    assert_eq!(names(&hits), ["Dr. Rajesh Kumar", "Dr. Kavya Krishnan"]);
}

#[rstest]
fn wider_radius_is_sorted_nearest_first(engine: QueryEngine<MemoryRecordStore>) {
    let hits = engine
        .find_near_with_distance(city_centre(), 10_000.0)
        .expect("query");
    let found: Vec<_> = hits.iter().map(|hit| hit.record.name.as_str()).collect();
    assert_eq!(
        found,
        [
            "Dr. Rajesh Kumar",
            "Dr. Kavya Krishnan",
            "Dr. Meera Nair",
            "Dr. Sunita Reddy",
            "Dr. Amit Patel",
            "Dr. Priya Sharma",
            "Dr. Arjun Gupta",
        ]
    );
    assert!(
        hits.windows(2)
            .all(|pair| pair[0].distance_meters <= pair[1].distance_meters)
    );
}

#[rstest]
#[case("jp nagar", &["Dr. Priya Sharma"])]
#[case("KORAMANGALA", &["Dr. Amit Patel"])]
#[case("4th block", &["Dr. Amit Patel", "Dr. Meera Nair"])]
#[case("Bangalore, Karnataka 5600", &[
    "Dr. Rajesh Kumar",
    "Dr. Priya Sharma",
    "Dr. Amit Patel",
    "Dr. Sunita Reddy",
    "Dr. Vikram Singh",
    "Dr. Meera Nair",
    "Dr. Kavya Krishnan",
])]
#[case("Electronic City", &[])]
fn address_search_matches_substrings(
    engine: QueryEngine<MemoryRecordStore>,
    #[case] term: &str,
    #[case] expected: &[&str],
) {
    let hits = engine.find_by_address_substring(term).expect("query");
    assert_eq!(names(&hits), expected);
}

#[rstest]
fn regex_metacharacters_match_literally(engine: QueryEngine<MemoryRecordStore>) {
    engine
        .create(provider_at("Dr. Dot", "12 A.B Street", 77.6, 12.9))
        .expect("create");
    let hits = engine.find_by_address_substring("a.b").expect("query");
    assert_eq!(names(&hits), ["Dr. Dot"]);
    assert!(engine.find_by_address_substring("(").expect("query").is_empty());
}

#[rstest]
fn invalid_longitude_never_reaches_the_store() {
    let engine = QueryEngine::new(MemoryRecordStore::default()).expect("build engine");
    let rejected = GeoPoint::new(200.0, 12.9)
        .map_err(ValidationError::from)
        .and_then(|location| {
            NewProvider::new("Dr. X", "General", "Clinic", "Somewhere", location)
        });
    assert!(matches!(rejected, Err(ValidationError::InvalidLocation(_))));
    assert!(engine.list_all().expect("list").is_empty());
}

#[rstest]
fn deleted_providers_vanish_from_every_query(engine: QueryEngine<MemoryRecordStore>) {
    let mg_road = engine
        .find_by_address_substring("MG Road")
        .expect("query")
        .remove(0);

    assert!(engine.delete(mg_road.id).expect("delete"));
    assert!(!engine.delete(mg_road.id).expect("repeat delete"));

    assert!(!engine.list_all().expect("list").contains(&mg_road));
    assert!(
        !engine
            .find_near(mg_road.location, 1.0)
            .expect("query")
            .contains(&mg_road)
    );
    assert!(engine.find_by_address_substring("MG Road").expect("query").is_empty());
    assert!(matches!(
        engine.get(mg_road.id),
        Err(DirectoryError::NotFound { id }) if id == mg_road.id
    ));
}

#[rstest]
fn list_all_follows_insertion_order(engine: QueryEngine<MemoryRecordStore>) {
    let listed = engine.list_all().expect("list");
    assert_eq!(listed.len(), 8);
    assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert_eq!(listed.first().map(|record| record.name.as_str()), Some("Dr. Rajesh Kumar"));
}

#[cfg(feature = "store-sqlite")]
mod sqlite {
    use super::*;
    use nearcare_core::SqliteRecordStore;
    use tempfile::TempDir;

    #[rstest]
    fn engine_reindexes_persisted_providers() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("providers.db");

        let seeded = {
            let store = SqliteRecordStore::open(&path).expect("open store");
            let engine = QueryEngine::new(store).expect("build engine");
            engine
                .create_many(bangalore_providers())
                .expect("seed sample providers")
        };

        let store = SqliteRecordStore::open(&path).expect("reopen store");
        let engine = QueryEngine::new(store).expect("rebuild engine");
        assert_eq!(engine.list_all().expect("list"), seeded);

        let hits = engine.find_near_default(city_centre()).expect("query");
        assert_eq!(names(&hits), ["Dr. Rajesh Kumar", "Dr. Kavya Krishnan"]);
    }
}
