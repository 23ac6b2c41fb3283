//! Behavioural tests for `SqliteLocodeStore` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tempfile::TempDir;
use unlocode_core::{
    Country, Function, Locode, LocodeStore, LookupError, NewCountry, NewLocode, SqliteLocodeStore,
    SqliteLocodeStoreError,
};

/// Shared state for SQLite store scenarios.
#[derive(Debug)]
struct LocodeStoreWorld {
    temp_dir: TempDir,
    store_holder: RefCell<Option<SqliteLocodeStore>>,
    query_results: RefCell<Vec<Locode>>,
    lookups: RefCell<Vec<Option<Locode>>>,
    lookup_error: RefCell<Option<LookupError<SqliteLocodeStoreError>>>,
    rendered: RefCell<Option<Value>>,
}

impl LocodeStoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            store_holder: RefCell::new(None),
            query_results: RefCell::new(Vec::new()),
            lookups: RefCell::new(Vec::new()),
            lookup_error: RefCell::new(None),
            rendered: RefCell::new(None),
        }
    }

    fn with_store<T>(&self, query: impl FnOnce(&SqliteLocodeStore) -> T) -> T {
        let borrowed = self.store_holder.borrow();
        let store = borrowed
            .as_ref()
            .expect("store should be available for querying");
        query(store)
    }

    fn result_names(&self) -> Vec<String> {
        self.query_results
            .borrow()
            .iter()
            .map(|locode| locode.name.clone())
            .collect()
    }
}

#[fixture]
fn world() -> LocodeStoreWorld {
    LocodeStoreWorld::new()
}

fn open_store(world: &LocodeStoreWorld) -> SqliteLocodeStore {
    let path = world.temp_dir.path().join("unlocode.db");
    SqliteLocodeStore::open(path).expect("open store")
}

fn insert_country(store: &SqliteLocodeStore, code: &str, name: &str) -> Country {
    let country = NewCountry::new(code, name).expect("valid country code");
    store.insert_country(&country).expect("insert country")
}

fn insert(store: &SqliteLocodeStore, locode: NewLocode) {
    store.insert_locode(&locode).expect("insert locode");
}

fn run_query(
    world: &LocodeStoreWorld,
    query: impl FnOnce(&SqliteLocodeStore) -> Result<Vec<Locode>, SqliteLocodeStoreError>,
) {
    let results = world.with_store(query).expect("query succeeds");
    world.query_results.replace(results);
}

#[given("a SQLite locode database with Dutch and Belgian locations")]
fn given_benelux_dataset(world: &LocodeStoreWorld) {
    let store = open_store(world);
    let netherlands = insert_country(&store, "NL", "NETHERLANDS");
    let belgium = insert_country(&store, "BE", "Belgium");

    insert(
        &store,
        NewLocode::named("Eindhoven")
            .with_name_wo_diacritics("Eindhoven")
            .with_city_code("EIN")
            .in_country(&netherlands)
            .with_function(Function::RoadTerminal)
            .with_function(Function::Airport),
    );
    insert(
        &store,
        NewLocode::named("Venlo")
            .with_name_wo_diacritics("Venlo")
            .with_city_code("VEN")
            .in_country(&netherlands)
            .with_function(Function::RailTerminal)
            .with_function(Function::RoadTerminal),
    );
    insert(
        &store,
        NewLocode::named("Antwerpen")
            .with_name_wo_diacritics("Antwerpen")
            .with_alternative_name("Anvers")
            .with_alternative_name_wo_diacritics("Anvers")
            .with_city_code("ANR")
            .in_country(&belgium)
            .with_function(Function::Port)
            .with_function(Function::RailTerminal),
    );
    insert(
        &store,
        NewLocode::named("Liège")
            .with_name_wo_diacritics("Liege")
            .with_city_code("LGG")
            .in_country(&belgium)
            .with_function(Function::Port)
            .with_function(Function::Airport),
    );
    world.store_holder.replace(Some(store));
}

#[given("a SQLite locode database holding Eindhoven as a Belgian port")]
fn given_eindhoven_in_belgium(world: &LocodeStoreWorld) {
    let store = open_store(world);
    let belgium = insert_country(&store, "BE", "Belgium");
    insert(
        &store,
        NewLocode::named("Eindhoven")
            .in_country(&belgium)
            .with_function(Function::Port),
    );
    world.store_holder.replace(Some(store));
}

#[when("I search for names containing \"ndho\"")]
fn search_partial(world: &LocodeStoreWorld) {
    run_query(world, |store| store.find_by_fuzzy_name("ndho"));
}

#[when("I search for names containing \"VENLO\"")]
fn search_uppercase(world: &LocodeStoreWorld) {
    run_query(world, |store| store.find_by_fuzzy_name("VENLO"));
}

#[when("I search for names containing \"Liege\"")]
fn search_without_diacritics(world: &LocodeStoreWorld) {
    run_query(world, |store| store.find_by_fuzzy_name("Liege"));
}

#[when("I search for names containing \"Anvers\"")]
fn search_alternative(world: &LocodeStoreWorld) {
    run_query(world, |store| store.find_by_fuzzy_name("Anvers"));
}

#[when("I search for airports named \"Eindhoven\"")]
fn search_airports(world: &LocodeStoreWorld) {
    run_query(world, |store| {
        store.find_by_name_and_function("Eindhoven", Function::Airport)
    });
}

#[when("I search for rail terminals named \"Eindhoven\"")]
fn search_rail_terminals(world: &LocodeStoreWorld) {
    run_query(world, |store| {
        store.find_by_name_and_function("Eindhoven", Function::RailTerminal)
    });
}

#[when("I look up every port")]
fn lookup_ports(world: &LocodeStoreWorld) {
    run_query(world, |store| store.find_by_function(Function::Port));
}

#[when("I look up every airport")]
fn lookup_airports(world: &LocodeStoreWorld) {
    run_query(world, |store| store.find_by_function(Function::Airport));
}

#[when("I look up locations with the function \"derp\"")]
fn lookup_unsupported(world: &LocodeStoreWorld) {
    let result = world.with_store(|store| store.find_by_function_symbol("derp"));
    match result {
        Ok(results) => {
            world.query_results.replace(results);
        }
        Err(err) => {
            world.lookup_error.replace(Some(err));
        }
    }
}

#[when("I look up the locodes \"NL VEN\", \"NLVEN\" and \"NlVen\"")]
fn lookup_venlo_spellings(world: &LocodeStoreWorld) {
    let lookups: Vec<Option<Locode>> = world.with_store(|store| {
        ["NL VEN", "NLVEN", "NlVen"]
            .into_iter()
            .map(|code| store.find_by_locode(code).expect("lookup succeeds"))
            .collect()
    });
    world.lookups.replace(lookups);
}

#[when("I look up the locode \"BE VEN\"")]
fn lookup_unknown(world: &LocodeStoreWorld) {
    let lookup = world.with_store(|store| store.find_by_locode("BE VEN").expect("lookup succeeds"));
    world.lookups.replace(vec![lookup]);
}

#[when("I render the stored location as JSON")]
fn render_json(world: &LocodeStoreWorld) {
    let json = world.with_store(|store| {
        let found = store.find_by_fuzzy_name("Eindhoven").expect("lookup succeeds");
        let locode = found.first().expect("Eindhoven is stored");
        locode.as_json().expect("serialise view")
    });
    world.rendered.replace(Some(json));
}

#[then("only Eindhoven is returned from the SQLite store")]
fn then_only_eindhoven(world: &LocodeStoreWorld) {
    assert_eq!(world.result_names(), vec!["Eindhoven"]);
}

#[then("only Venlo is returned from the SQLite store")]
fn then_only_venlo(world: &LocodeStoreWorld) {
    assert_eq!(world.result_names(), vec!["Venlo"]);
}

#[then("only Liège is returned from the SQLite store")]
fn then_only_liege(world: &LocodeStoreWorld) {
    assert_eq!(world.result_names(), vec!["Liège"]);
}

#[then("only Antwerpen is returned from the SQLite store")]
fn then_only_antwerpen(world: &LocodeStoreWorld) {
    assert_eq!(world.result_names(), vec!["Antwerpen"]);
}

#[then("only Antwerpen and Liège are returned from the SQLite store")]
fn then_ports(world: &LocodeStoreWorld) {
    assert_eq!(world.result_names(), vec!["Antwerpen", "Liège"]);
}

#[then("only Eindhoven and Liège are returned from the SQLite store")]
fn then_airports(world: &LocodeStoreWorld) {
    assert_eq!(world.result_names(), vec!["Eindhoven", "Liège"]);
}

#[then("every returned location is an airport")]
fn then_all_airports(world: &LocodeStoreWorld) {
    let results = world.query_results.borrow();
    assert!(
        results.iter().all(|locode| locode.has_function(Function::Airport)),
        "every result should serve as an airport"
    );
}

#[then("no locations are returned from the SQLite store")]
fn then_no_results(world: &LocodeStoreWorld) {
    assert!(
        world.query_results.borrow().is_empty(),
        "expected no locations"
    );
}

#[then("the lookup fails with an unsupported function error")]
fn then_unsupported(world: &LocodeStoreWorld) {
    let binding = world.lookup_error.borrow();
    let error = binding.as_ref().expect("an error should be recorded");
    match error {
        LookupError::UnsupportedFunction(err) => assert_eq!(err.symbol, "derp"),
        other => panic!("expected UnsupportedFunction, found {other:?}"),
    }
}

#[then("each lookup returns Venlo in the Netherlands")]
fn then_venlo_each_time(world: &LocodeStoreWorld) {
    let lookups = world.lookups.borrow();
    assert_eq!(lookups.len(), 3);
    let first = lookups
        .first()
        .and_then(Option::as_ref)
        .expect("NL VEN resolves");
    assert_eq!(first.city_code, "VEN");
    assert_eq!(
        first.country.as_ref().map(|country| country.code.as_str()),
        Some("NL")
    );
    for lookup in lookups.iter() {
        assert_eq!(lookup.as_ref(), Some(first));
    }
}

#[then("no locode is found")]
fn then_no_locode(world: &LocodeStoreWorld) {
    assert_eq!(*world.lookups.borrow(), vec![None]);
}

#[then("the JSON country is Belgium")]
fn then_country_is_belgium(world: &LocodeStoreWorld) {
    let rendered = world.rendered.borrow();
    let json = rendered.as_ref().expect("JSON should be rendered");
    assert_eq!(json["country"], json!({"code": "BE", "name": "Belgium"}));
    assert_eq!(json["port"], json!(true));
}

#[then("the JSON omits internal identifiers")]
fn then_no_identifiers(world: &LocodeStoreWorld) {
    let rendered = world.rendered.borrow();
    let json = rendered.as_ref().expect("JSON should be rendered");
    assert!(json.get("id").is_none(), "view must not expose id");
    assert!(
        json.get("country_id").is_none(),
        "view must not expose country_id"
    );
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 0)]
fn partial_name(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 1)]
fn case_insensitive_name(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 2)]
fn diacritic_free_name(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 3)]
fn alternative_name(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 4)]
fn name_and_function(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 5)]
fn supported_function_without_matches(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 6)]
fn function_only(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 7)]
fn unsupported_function(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 8)]
fn locode_spellings(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 9)]
fn unknown_locode(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 10)]
fn external_view(world: LocodeStoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_locode_store.feature", index = 11)]
fn airports_only(world: LocodeStoreWorld) {
    let _ = world;
}
