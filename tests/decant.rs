use chrono::NaiveDate;
use decanter::parser::ParserError;
use decanter::schema::{AssociationOptions, Schema};
use decanter::{Catalog, DecantError, Map, Settings, TypeTag, UnhandledKeys, Value};
use serde_json::json;

fn map(json: serde_json::Value) -> Map {
    match Value::from(json) {
        Value::Map(map) => map,
        other => panic!("expected a map, got {other}"),
    }
}

fn date_format(fmt: &str) -> Map {
    [("parse_format", fmt)].into_iter().collect()
}

fn trip_catalog(settings: Settings) -> Catalog {
    let trip = Schema::builder("trip")
        .input("name", TypeTag::String, Map::new())
        .input("start_date", TypeTag::Date, date_format("%m/%d/%Y"))
        .has_one("address", AssociationOptions::new())
        .has_many("destinations", AssociationOptions::new())
        .with_context("admin", |scope| {
            scope
                .input("approved", TypeTag::Boolean, Map::new())
                .has_many("destinations", AssociationOptions::new())
        })
        .unwrap()
        .build();

    let destination = Schema::builder("destinations")
        .input("nights", TypeTag::Integer, Map::new())
        .with_context("admin", |scope| scope.input("cost", TypeTag::Float, Map::new()))
        .unwrap()
        .build();

    Catalog::builder()
        .with_settings(settings)
        .with_schemas([trip, destination, Schema::builder("address").build()])
        .build()
        .unwrap()
}

#[test]
fn date_scenario() {
    let catalog = trip_catalog(Settings::default());

    let decanted = catalog
        .decant("trip", &map(json!({"start_date": "01/15/2015"})), None)
        .unwrap();
    assert_eq!(
        decanted["start_date"],
        Value::Date(NaiveDate::from_ymd_opt(2015, 1, 15).unwrap())
    );

    let err = catalog
        .decant("trip", &map(json!({"start_date": "bad"})), None)
        .unwrap_err();
    assert!(matches!(
        err,
        DecantError::Parser(ParserError::Parse(ref e)) if e.field == "start_date"
    ));
}

#[test]
fn nested_has_one_without_inputs_is_identity() {
    let catalog = trip_catalog(Settings::default());

    let decanted = catalog
        .decant("trip", &map(json!({"address_attributes": {"city": "X"}})), None)
        .unwrap();
    assert_eq!(decanted, map(json!({"address_attributes": {"city": "X"}})));
}

#[test]
fn has_many_decants_each_item_in_order() {
    let catalog = trip_catalog(Settings::default());

    let decanted = catalog
        .decant(
            "trip",
            &map(json!({
                "name": "Coast",
                "destinations_attributes": [
                    {"nights": "3", "note": "first"},
                    {"nights": "1,000"},
                ],
            })),
            None,
        )
        .unwrap();

    assert_eq!(
        decanted,
        map(json!({
            "name": "Coast",
            "destinations_attributes": [
                {"nights": 3, "note": "first"},
                {"nights": 1000},
            ],
        }))
    );
}

#[test]
fn output_preserves_raw_key_order() {
    let catalog = trip_catalog(Settings::default());

    let decanted = catalog
        .decant(
            "trip",
            &map(json!({"zeta": 1, "start_date": "02/01/2020", "name": "n", "alpha": 2})),
            None,
        )
        .unwrap();

    let keys: Vec<_> = decanted.keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "start_date", "name", "alpha"]);
}

#[test]
fn wide_mapping_decants_every_key_in_order() {
    let catalog = trip_catalog(Settings::default());
    let raw: Map = (0..50_000)
        .map(|i| (format!("field_{i}"), Value::from(i)))
        .chain([("name".to_string(), Value::from(7))])
        .collect();

    let decanted = catalog.decant("trip", &raw, None).unwrap();

    assert_eq!(decanted.len(), 50_001);
    assert_eq!(decanted["name"], Value::from("7"));
    assert_eq!(decanted["field_25000"], Value::Integer(25_000));
    assert!(decanted.keys().eq(raw.keys()));
}

#[test]
fn explicit_context_strips_unmatched_keys() {
    let catalog = trip_catalog(Settings::default());

    let decanted = catalog
        .decant(
            "trip",
            &map(json!({
                "approved": "yes",
                "name": "only in default",
                "destinations_attributes": [{"cost": "12.5", "nights": "2"}],
            })),
            Some("admin"),
        )
        .unwrap();

    assert_eq!(
        decanted,
        map(json!({
            "approved": true,
            "destinations_attributes": [{"cost": 12.5}],
        }))
    );
}

#[test]
fn admin_rules_do_not_leak_into_other_contexts() {
    let catalog = trip_catalog(Settings::default());
    let raw = map(json!({"approved": "yes"}));

    let default = catalog.decant("trip", &raw, None).unwrap();
    assert_eq!(default["approved"], Value::from("yes"));

    let other = catalog.decant("trip", &raw, Some("public")).unwrap();
    assert!(other.is_empty());
}

#[test]
fn reject_mode_reports_unmatched_keys() {
    let catalog = trip_catalog(Settings {
        unhandled_keys: UnhandledKeys::Reject,
        ..Settings::default()
    });

    let err = catalog
        .decant(
            "trip",
            &map(json!({"approved": "no", "foo": 1, "bar": 2})),
            Some("admin"),
        )
        .unwrap_err();
    match err {
        DecantError::UnhandledKeys { keys } => assert_eq!(keys, vec!["foo", "bar"]),
        other => panic!("unexpected error: {other}"),
    }

    // Without a context unmatched keys still pass through.
    let passed = catalog
        .decant("trip", &map(json!({"foo": 1})), None)
        .unwrap();
    assert_eq!(passed["foo"], Value::Integer(1));
}

#[test]
fn association_shape_errors() {
    let catalog = trip_catalog(Settings::default());

    let err = catalog
        .decant("trip", &map(json!({"address_attributes": "Main St"})), None)
        .unwrap_err();
    assert!(matches!(err, DecantError::ExpectedMap { ref key, found: "string" } if key == "address_attributes"));

    let err = catalog
        .decant("trip", &map(json!({"destinations_attributes": {"nights": 1}})), None)
        .unwrap_err();
    assert!(matches!(err, DecantError::ExpectedArray { found: "map", .. }));

    let err = catalog
        .decant(
            "trip",
            &map(json!({"destinations_attributes": [{"nights": 1}, 7]})),
            None,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        DecantError::ExpectedMap { ref key, .. } if key == "destinations_attributes[1]"
    ));
}

#[test]
fn nested_parse_failure_aborts_whole_call() {
    let catalog = trip_catalog(Settings::default());

    let result = catalog.decant(
        "trip",
        &map(json!({
            "name": "ok",
            "destinations_attributes": [{"nights": "2"}, {"nights": "lots"}],
        })),
        None,
    );
    assert!(matches!(
        result,
        Err(DecantError::Parser(ParserError::Parse(ref e))) if e.field == "nights"
    ));
}

#[test]
fn custom_key_and_schema_names() {
    let catalog = Catalog::builder()
        .with_schema(
            Schema::builder("order")
                .has_many(
                    "line_items",
                    AssociationOptions::new().key("lines").schema("line"),
                )
                .build(),
        )
        .with_schema(
            Schema::builder("line")
                .input("qty", TypeTag::Integer, Map::new())
                .build(),
        )
        .build()
        .unwrap();

    let decanted = catalog
        .decant(
            "order",
            &map(json!({"lines": [{"qty": "2"}], "line_items_attributes": []})),
            None,
        )
        .unwrap();

    assert_eq!(decanted["lines"], Value::Array(vec![Value::Map(map(json!({"qty": 2})))]));
    // The association name is not a raw key, so this passes through untouched.
    assert_eq!(decanted["line_items_attributes"], Value::Array(vec![]));
}

#[test]
fn has_one_wins_over_has_many_on_a_shared_key() {
    let trip = Schema::builder("trip")
        .has_many("stops", AssociationOptions::new().key("legs").schema("leg"))
        .has_one("stop", AssociationOptions::new().key("legs").schema("leg"))
        .build();
    let leg = Schema::builder("leg")
        .input("nights", TypeTag::Integer, Map::new())
        .build();
    let catalog = Catalog::builder()
        .with_schemas([trip, leg])
        .build()
        .unwrap();

    let decanted = catalog
        .decant("trip", &map(json!({"legs": {"nights": "2"}})), None)
        .unwrap();
    assert_eq!(decanted, map(json!({"legs": {"nights": 2}})));

    // The has_one rule claims the key, so an array is a shape error.
    let err = catalog
        .decant("trip", &map(json!({"legs": [{"nights": "2"}]})), None)
        .unwrap_err();
    assert!(matches!(err, DecantError::ExpectedMap { ref key, found: "array" } if key == "legs"));
}

#[test]
fn required_inputs() {
    let required: Map = [("required", true)].into_iter().collect();
    let catalog = Catalog::builder()
        .with_schema(
            Schema::builder("signup")
                .input("email", TypeTag::String, required)
                .input("nickname", TypeTag::String, Map::new())
                .build(),
        )
        .build()
        .unwrap();

    for raw in [json!({"nickname": "z"}), json!({"email": "  "}), json!({"email": null})] {
        let err = catalog.decant("signup", &map(raw), None).unwrap_err();
        assert!(matches!(
            err,
            DecantError::MissingRequiredInput { ref field } if field == "email"
        ));
    }

    // Required rules live in their own context like any other declaration.
    assert!(catalog.decant("signup", &Map::new(), Some("admin")).is_ok());
    assert!(catalog
        .decant("signup", &map(json!({"email": "a@b.c"})), None)
        .is_ok());
}

fn nested(levels: usize) -> Map {
    let mut raw = Map::new();
    for _ in 0..levels {
        let mut parent = Map::new();
        parent.insert("child_attributes", raw);
        raw = parent;
    }
    raw
}

fn tree_catalog(max_depth: usize) -> Catalog {
    Catalog::builder()
        .with_settings(Settings {
            max_depth,
            ..Settings::default()
        })
        .with_schema(
            Schema::builder("node")
                .has_one("child", AssociationOptions::new().schema("node"))
                .build(),
        )
        .build()
        .unwrap()
}

#[test]
fn depth_guard() {
    let catalog = tree_catalog(2);

    assert!(catalog.decant("node", &nested(2), None).is_ok());
    let err = catalog.decant("node", &nested(3), None).unwrap_err();
    assert!(matches!(err, DecantError::DepthExceeded { limit: 2 }));
}

#[test]
fn pathologically_deep_input_fails_cleanly() {
    let catalog = tree_catalog(Settings::default().max_depth);

    let err = catalog.decant("node", &nested(1_000), None).unwrap_err();
    assert!(matches!(err, DecantError::DepthExceeded { .. }));
}

#[test]
fn decant_json_requires_an_object() {
    let catalog = trip_catalog(Settings::default());
    let decanter = catalog.decanter("trip").unwrap();

    let decanted = decanter.decant_json(json!({"name": 5}), None).unwrap();
    assert_eq!(decanted["name"], Value::from("5"));

    let err = decanter.decant_json(json!([1, 2]), None).unwrap_err();
    assert!(matches!(err, DecantError::ExpectedMap { found: "array", .. }));
}

#[test]
fn decanted_output_serializes_to_json() {
    let catalog = trip_catalog(Settings::default());

    let decanted = catalog
        .decant(
            "trip",
            &map(json!({"start_date": "01/15/2015", "destinations_attributes": [{"nights": "2"}]})),
            None,
        )
        .unwrap();

    assert_eq!(
        serde_json::to_value(&decanted).unwrap(),
        json!({"start_date": "2015-01-15", "destinations_attributes": [{"nights": 2}]})
    );
}
