//! Integration tests for active-record entities

mod common;

use common::memory_db;
use tabula::{fields, Criteria, Entity, Key, KeyStrategy, Load, Params, Row, Saved, Table, Value};
use uuid::Uuid;

struct TestRecord;

impl Table for TestRecord {
    const NAME: &'static str = "test_table";
    const KEY: &'static str = "id";
}

struct TokenV4;

impl Table for TokenV4 {
    const NAME: &'static str = "tokens";
    const KEY: &'static str = "id";

    fn key_strategy() -> KeyStrategy {
        KeyStrategy::UuidV4
    }
}

struct TokenV7;

impl Table for TokenV7 {
    const NAME: &'static str = "tokens";
    const KEY: &'static str = "id";

    fn key_strategy() -> KeyStrategy {
        KeyStrategy::UuidV7
    }
}

fn uuid_version(key: &Value) -> Option<usize> {
    Uuid::parse_str(key.as_str()?).ok().map(|u| u.get_version_num())
}

#[test]
fn test_save_then_load_by_id() {
    let db = memory_db();
    let mut entity = Entity::<TestRecord>::new();
    entity
        .set(
            &db,
            fields! {
                "datetime_col" => "2017-05-01 22:00:00",
                "varchar_col" => "Yoda the great",
                "text_col" => "Fear is the path to the dark side.",
            },
            None,
        )
        .unwrap();

    let key = entity.save(&db).unwrap().inserted_key().cloned().unwrap();
    assert!(!key.is_null());
    assert_eq!(key, Value::Integer(db.last_insert_id()));

    let loaded = Entity::<TestRecord>::from_id(&db, key).unwrap();
    assert!(loaded.exists());
    assert_eq!(
        loaded.get("text_col").unwrap(),
        Some(&Value::from("Fear is the path to the dark side."))
    );
    assert_eq!(loaded.get("varchar_col").unwrap(), entity.get("varchar_col").unwrap());
}

#[test]
fn test_insert_keeps_awkward_text_intact() {
    let db = memory_db();
    let varchar = "Danes are --' wierd æøå!#<";
    let text = "At this point I should really start considering going to bed.. it's way past 22:00";

    let mut entity = Entity::<TestRecord>::with_data(
        &db,
        fields! { "varchar_col" => varchar, "text_col" => text },
        None,
    )
    .unwrap();
    entity.save(&db).unwrap();

    let loaded = Entity::<TestRecord>::find(&db, entity.key().cloned().unwrap())
        .unwrap()
        .expect("saved entity should be found");
    assert_eq!(loaded.get("varchar_col").unwrap(), Some(&Value::from(varchar)));
    assert_eq!(loaded.get("text_col").unwrap(), Some(&Value::from(text)));
    let safe = loaded.safe("varchar_col").unwrap();
    assert!(safe.starts_with("Danes are --&"));
    assert!(safe.ends_with("wierd æøå!#&lt;"));
    assert!(!safe.contains('\''));
}

#[test]
fn test_from_unknown_id_is_new_and_prefilled() {
    let db = memory_db();
    let entity = Entity::<TestRecord>::from_id(&db, 404).unwrap();

    assert!(entity.is_new());
    assert_eq!(entity.data().get("id"), Some(&Value::Integer(404)));
    assert!(Entity::<TestRecord>::find(&db, 404).unwrap().is_none());
}

#[test]
fn test_from_unknown_id_saves_under_that_id() {
    let db = memory_db();
    let mut entity = Entity::<TestRecord>::from_id(&db, 404).unwrap();
    entity.set_field("varchar_col", "prepared");

    assert_eq!(entity.save(&db).unwrap(), Saved::Inserted(Value::Integer(404)));
    assert!(Entity::<TestRecord>::find(&db, 404).unwrap().is_some());
}

#[test]
fn test_set_with_existing_key_snaps_to_row() {
    let db = memory_db();
    let id = db
        .insert(
            "test_table",
            &fields! { "varchar_col" => "stored", "text_col" => "kept" },
        )
        .unwrap();

    let mut entity = Entity::<TestRecord>::new();
    assert!(entity.is_new());

    entity
        .set(&db, fields! { "id" => id, "varchar_col" => "changed" }, None)
        .unwrap();

    assert!(entity.exists());
    assert_eq!(entity.key(), Some(&Value::Integer(id)));
    assert_eq!(entity.get("text_col").unwrap(), Some(&Value::from("kept")));
    assert_eq!(entity.get("varchar_col").unwrap(), Some(&Value::from("changed")));

    match entity.save(&db).unwrap() {
        Saved::Updated(_) => {}
        other => panic!("expected an update, got {other:?}"),
    }
    assert_eq!(
        db.fetch_cell("test_table", "varchar_col", &Criteria::by("id", id)).unwrap(),
        Some(Value::from("changed"))
    );
    assert_eq!(db.count("test_table", &Criteria::all()).unwrap(), 1);
}

#[test]
fn test_insert_and_delete() {
    let db = memory_db();
    let mut entity = Entity::<TestRecord>::new();
    entity
        .set(&db, fields! { "varchar_col" => "Lorem ipsum dolor sit amet" }, None)
        .unwrap()
        .save(&db)
        .unwrap();

    let id = entity.id().expect("saved entity has an id");
    let Key::Int(raw) = id.clone() else {
        panic!("autoincrement ids are integers, got {:?}", id);
    };

    let loaded = Entity::<TestRecord>::from_id(&db, raw).unwrap();
    assert!(loaded.exists());
    assert_eq!(loaded.delete(&db).unwrap(), 1);
    assert!(Entity::<TestRecord>::find(&db, raw).unwrap().is_none());
}

#[test]
fn test_uuid_v4_key_generated_once() {
    let db = memory_db();
    let mut token = Entity::<TokenV4>::new();
    token.set_field("label", "first");

    let key = token.save(&db).unwrap().inserted_key().cloned().unwrap();
    assert_eq!(uuid_version(&key), Some(4));

    token.set_field("label", "second");
    token.save(&db).unwrap();

    assert_eq!(token.key(), Some(&key));
    assert_eq!(db.count("tokens", &Criteria::all()).unwrap(), 1);
    assert_eq!(
        db.fetch_cell("tokens", "label", &Criteria::by("id", key)).unwrap(),
        Some(Value::from("second"))
    );
}

#[test]
fn test_uuid_v7_key_generated_once() {
    let db = memory_db();
    let mut token = Entity::<TokenV7>::new();
    token.set_field("label", "first");

    let key = token.save(&db).unwrap().inserted_key().cloned().unwrap();
    assert_eq!(uuid_version(&key), Some(7));

    token.save(&db).unwrap();
    assert_eq!(token.key(), Some(&key));
    assert_eq!(
        token.id(),
        Some(Key::Str(key.as_str().unwrap().to_string()))
    );
}

#[test]
fn test_uuid_strategy_keeps_supplied_key() {
    let db = memory_db();
    let mut token = Entity::<TokenV4>::new();
    token.set_field("id", "custom-key").set_field("label", "mine");

    assert_eq!(token.save(&db).unwrap(), Saved::Inserted(Value::from("custom-key")));
}

#[test]
fn test_load_rows_and_ids() {
    let db = memory_db();
    let first = db.insert("test_table", &fields! { "varchar_col" => "a" }).unwrap();
    let second = db.insert("test_table", &fields! { "varchar_col" => "b" }).unwrap();

    let row = db
        .fetch_row("test_table", &Criteria::by("varchar_col", "a"))
        .unwrap()
        .unwrap();
    let from_rows = Entity::<TestRecord>::load(&db, Load::Rows(vec![row]), true)
        .unwrap()
        .into_many()
        .unwrap();
    assert_eq!(from_rows.len(), 1);
    assert!(from_rows.get(&Key::Int(first)).is_some_and(|e| e.exists()));

    let by_ids = Entity::<TestRecord>::load(
        &db,
        Load::Many(vec![Value::Integer(second), Value::Integer(first)]),
        true,
    )
    .unwrap()
    .into_many()
    .unwrap();
    assert_eq!(by_ids.keys().cloned().collect::<Vec<_>>(), vec![Key::Int(second), Key::Int(first)]);

    let by_position = Entity::<TestRecord>::load(
        &db,
        Load::Many(vec![Value::Integer(second), Value::Integer(first)]),
        false,
    )
    .unwrap()
    .into_many()
    .unwrap();
    assert_eq!(by_position.keys().cloned().collect::<Vec<_>>(), vec![Key::Int(0), Key::Int(1)]);

    let one = Entity::<TestRecord>::load(&db, Load::One(Value::from(first.to_string())), true)
        .unwrap()
        .into_one()
        .unwrap();
    assert!(one.exists());
}

#[test]
fn test_search_returns_entities_keyed_by_id() {
    let db = memory_db();
    for i in 0..5 {
        let mut entity = Entity::<TestRecord>::new();
        entity
            .set(
                &db,
                fields! { "varchar_col" => format!("fixture_{i}"), "text_col" => "some other value" },
                None,
            )
            .unwrap()
            .save(&db)
            .unwrap();
    }
    db.insert("test_table", &fields! { "varchar_col" => "unrelated" }).unwrap();

    let result = Entity::<TestRecord>::search(
        &db,
        ["varchar_col LIKE :randomValue"],
        &Params::new().bind("randomValue", "fixture_%"),
    )
    .unwrap();

    assert_eq!(result.count(), 5);
    let first = result.first().unwrap();
    assert!(first.exists());
    assert!(result.contains_key(&first.id().unwrap()));
    assert_eq!(result.get_column("varchar_col").len(), 5);
    assert_eq!(result.get_column("id").len(), 5);
}

#[test]
fn test_upsert_entity() {
    let db = memory_db();
    let mut entity = Entity::<TestRecord>::new();
    entity.set_field("varchar_col", "before");
    entity.save(&db).unwrap();

    entity.set_field("varchar_col", "after");
    entity.upsert(&db).unwrap();

    assert_eq!(db.count("test_table", &Criteria::all()).unwrap(), 1);
    assert_eq!(
        db.fetch_cell("test_table", "varchar_col", &entity.key_filter()).unwrap(),
        Some(Value::from("after"))
    );
}

#[test]
fn test_hydrate_trusts_row() {
    let entity = Entity::<TestRecord>::hydrate(Row::from(fields! { "id" => 3, "varchar_col" => "x" }));
    assert!(entity.exists());
    assert_eq!(entity.id(), Some(Key::Int(3)));

    let keyless = Entity::<TestRecord>::hydrate(Row::from(fields! { "varchar_col" => "x" }));
    assert!(keyless.is_new());
}
