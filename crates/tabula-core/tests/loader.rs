// File: crates/tabula-core/tests/loader.rs
// Purpose: Typed loading: coercion rules, lenient failures, header resolution and record ids.

use tabula_core::{load, ChartError, Coercion, DataContext, LoadError, Loader, RecordId, Schema, Value};

const POKEMON: &str = "\
Name,Type_1,Generation,Total,isLegendary
Bulbasaur,Grass,1,318,False
Charmander,Fire,1,309,False
Mewtwo,Psychic,1,680,True
Treecko,Grass,3,n/a,False
";

fn schema() -> Schema {
    Schema::new().number("Generation").number("Total").boolean("isLegendary")
}

#[test]
fn coerces_declared_fields_and_passes_others_through() {
    let set = load(POKEMON, &schema()).expect("load");
    assert_eq!(set.len(), 4);

    let name = set.column("Name").unwrap();
    let total = set.column("Total").unwrap();
    let legendary = set.column("isLegendary").unwrap();
    let first = set.get(RecordId(0)).unwrap();
    assert_eq!(name.value(first), Some(&Value::Text("Bulbasaur".into())));
    assert_eq!(total.number(first), 318.0);
    assert!(!legendary.boolean(first));

    let mewtwo = set.get(RecordId(2)).unwrap();
    assert!(legendary.boolean(mewtwo));
    assert_eq!(set.schema().coercion("Type_1"), Some(&Coercion::Category));
}

#[test]
fn malformed_numbers_become_nan_and_are_counted() {
    let set = load(POKEMON, &schema()).unwrap();
    let total = set.column("Total").unwrap();
    let treecko = set.get(RecordId(3)).unwrap();
    assert!(total.number(treecko).is_nan());
    assert_eq!(set.shape_warnings(), 1);
}

#[test]
fn boolean_matches_the_literal_exactly() {
    let text = "flag\nTrue\ntrue\nTRUE\nyes\n";
    let set = load(text, &Schema::new().boolean("flag")).unwrap();
    let flag = set.column("flag").unwrap();
    let values: Vec<bool> = set.iter().map(|r| flag.boolean(r)).collect();
    assert_eq!(values, vec![true, false, false, false]);

    let custom = load(text, &Schema::new().with("flag", Coercion::boolean_with("yes"))).unwrap();
    let flag = custom.column("flag").unwrap();
    assert_eq!(custom.iter().filter(|r| flag.boolean(r)).count(), 1);
}

#[test]
fn recoercion_is_idempotent() {
    let text = "a,b,c\n1.5,True,x\n2,False,y\n";
    let set = load(text, &Schema::new().number("a").boolean("b")).unwrap();
    let once = set.recoerced();
    let original: Vec<Vec<Value>> = set.iter().map(|r| r.values().to_vec()).collect();
    assert_eq!(once, original);

    for field in set.schema().fields() {
        for row in &once {
            let idx = set.schema().index_of(&field.name).unwrap();
            let again = field.coercion.recoerce(&row[idx]);
            assert_eq!(again, row[idx]);
        }
    }
}

#[test]
fn missing_schema_column_is_an_error() {
    let err = load(POKEMON, &Schema::new().number("Attack")).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(ref f) if f == "Attack"), "{err}");
}

#[test]
fn ragged_rows_are_a_structure_error() {
    let err = load("a,b\n1,2\n3\n", &Schema::new()).unwrap_err();
    assert!(matches!(err, LoadError::Csv(_)), "{err}");
}

#[test]
fn empty_source_has_no_header() {
    let err = load("", &Schema::new()).unwrap_err();
    assert!(matches!(err, LoadError::EmptyHeader), "{err}");
}

#[test]
fn unknown_column_lookup_fails() {
    let set = load(POKEMON, &schema()).unwrap();
    let err = set.column("Speed").unwrap_err();
    assert!(matches!(err, ChartError::UnknownField(ref f) if f == "Speed"));
}

#[test]
fn semicolon_delimiter_and_trimming() {
    let set = Loader::new(Schema::new().number("x")).delimiter(b';').load_str("x ; y\n 4 ; a \n").unwrap();
    let x = set.column("x").unwrap();
    let y = set.column("y").unwrap();
    let r = set.get(RecordId(0)).unwrap();
    assert_eq!(x.number(r), 4.0);
    assert_eq!(y.text(r), "a");
}

#[test]
fn missing_file_reports_the_path() {
    let err = DataContext::load(&Loader::new(Schema::new()), "does/not/exist.csv").unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert!(path.ends_with("exist.csv")),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn record_ids_follow_row_order_and_survive_filtering() {
    let set = load(POKEMON, &schema()).unwrap();
    let grass = set.column("Type_1").unwrap();
    let ids: Vec<RecordId> = set.subset(|r| grass.text(r) == "Grass").into_iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![RecordId(0), RecordId(3)]);
}
