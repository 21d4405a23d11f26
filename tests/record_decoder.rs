use gfdata::{
    ClassTable, ColumnKind, EnumVocabulary, FlagVocabulary, GfError, Item, Record, Row, Schema,
    SchemaOutcome, Value,
};

fn item_schema() -> Schema {
    Schema::from_tags([
        (0, "Id", "int"),
        (1, "IconFilename", "str"),
        (2, "Name", "trans"),
        (3, "ItemType", "enum:ItemType"),
        (4, "SysPrice", "int"),
        (5, "MaxStack", "int"),
        (6, "Restrict", "flags:RestrictFlags"),
        (7, "Classes", "flags:Classes"),
        (8, "Tip", "trans_multiline"),
    ])
    .unwrap()
}

fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| f.to_string()).collect()
}

fn potion() -> Row {
    row(&[
        "1002",
        "potion.dds",
        "Potion",
        "3",
        "5",
        "99",
        "384",
        "36",
        "Restores health.\nStacks up to 99.",
    ])
}

fn item_types() -> EnumVocabulary {
    EnumVocabulary::new([(1, "Weapon"), (2, "Armor"), (3, "Consumable")])
}

fn restrict_flags() -> FlagVocabulary {
    FlagVocabulary::new(
        "RestrictFlags",
        [
            ("NoTrade", 1u64),
            ("RideCombineIK", 128),
            ("RideCombineGK", 256),
            ("ISRideCombine", 384),
        ],
    )
}

fn class_table() -> ClassTable {
    ClassTable::new([("Warrior", 1u32), ("Mage", 2), ("Priest", 5)]).unwrap()
}

#[test]
fn numeric_columns_decode_to_integers() {
    let schema = item_schema();
    let record = Record::from_row(&schema, &potion()).unwrap();

    assert_eq!(record.id(), Some(1002));
    assert_eq!(record.get_int("SysPrice"), Some(5));
    assert_eq!(record.get("ItemType"), Some(&Value::Integer(3)));
    assert_eq!(record.get_text("Name"), Some("Potion"));
    assert_eq!(record.get("Missing"), None);
}

#[test]
fn non_canonical_numbers_stay_text_and_round_trip() {
    let schema = item_schema();
    let mut fields = potion();
    fields[4] = "007".to_string();
    fields[5] = "+3".to_string();
    fields[3] = String::new();

    let record = Record::from_row(&schema, &fields).unwrap();

    assert_eq!(record.get("SysPrice"), Some(&Value::Text("007".to_string())));
    assert_eq!(record.get_int("MaxStack"), None);
    assert_eq!(record.get("ItemType"), Some(&Value::Empty));
    assert_eq!(record.to_row(), fields);
}

#[test]
fn text_columns_never_coerce() {
    let schema = item_schema();
    let mut fields = potion();
    fields[1] = "42".to_string();

    let record = Record::from_row(&schema, &fields).unwrap();

    assert_eq!(record.get("IconFilename"), Some(&Value::Text("42".to_string())));
}

#[test]
fn width_mismatch_is_a_schema_error() {
    let schema = item_schema();
    let short = row(&["1002", "potion.dds"]);

    assert!(matches!(
        Record::from_row(&schema, &short),
        Err(GfError::Schema(_))
    ));
}

#[test]
fn vocabulary_accessors() {
    let schema = item_schema();
    let record = Record::from_row(&schema, &potion()).unwrap();

    assert_eq!(record.enum_name("ItemType", &item_types()), Some("Consumable"));
    assert_eq!(
        record.flags("Restrict", &restrict_flags()).unwrap(),
        vec!["RideCombineIK", "RideCombineGK"]
    );
    // 36 = bits 2 and 5
    assert_eq!(
        record.classes("Classes", &class_table()).unwrap(),
        vec!["Mage", "Priest"]
    );
}

#[test]
fn empty_mask_decodes_to_nothing_and_garbage_is_an_error() {
    let schema = item_schema();
    let mut fields = potion();
    fields[6] = String::new();
    fields[7] = "lots".to_string();

    let record = Record::from_row(&schema, &fields).unwrap();

    assert!(record.flags("Restrict", &restrict_flags()).unwrap().is_empty());
    assert!(matches!(
        record.classes("Classes", &class_table()),
        Err(GfError::InvalidFormat(_))
    ));
    assert!(matches!(
        record.flags("Nope", &restrict_flags()),
        Err(GfError::Schema(_))
    ));
}

#[test]
fn setters_encode_back_into_the_row() {
    let schema = item_schema();
    let mut record = Record::from_row(&schema, &potion()).unwrap();

    record.set_int("SysPrice", 12).unwrap();
    record.set_text("Name", "Greater Potion").unwrap();
    record.set_flags("Restrict", &restrict_flags(), ["NoTrade"]).unwrap();
    record
        .set_classes("Classes", &class_table(), ["Warrior", "Priest"])
        .unwrap();

    let out = record.to_row();
    assert_eq!(out[2], "Greater Potion");
    assert_eq!(out[4], "12");
    assert_eq!(out[6], "1");
    assert_eq!(out[7], "34");
    assert_eq!(out[8], "Restores health.\nStacks up to 99.");

    assert!(record.set_int("Nope", 1).is_err());
    assert!(record
        .set_flags("Restrict", &restrict_flags(), ["Bogus"])
        .is_err());
}

#[test]
fn item_view() {
    let schema = item_schema();
    let record = Record::from_row(&schema, &potion()).unwrap();

    let item = Item::from_record(&record);

    assert_eq!(item.id, Some(1002));
    assert_eq!(item.name.as_deref(), Some("Potion"));
    assert_eq!(item.icon_filename.as_deref(), Some("potion.dds"));
    assert_eq!(item.item_type, Some(3));
    assert_eq!(item.sys_price, Some(5));
    assert_eq!(item.max_stack, Some(99));
    assert_eq!(item.tip.as_deref(), Some("Restores health.\nStacks up to 99."));
    assert_eq!(item.model_id, None);
}

#[test]
fn column_names_iterate_in_order() {
    let schema = item_schema();
    let record = Record::from_row(&schema, &potion()).unwrap();

    let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
    assert_eq!(names, schema.names().collect::<Vec<_>>());
    assert_eq!(record.values().len(), 9);
}

#[test]
fn schema_rejects_gaps_and_duplicates() {
    let gap = Schema::new([(0, "Id", ColumnKind::Integer), (2, "Name", ColumnKind::Text)]);
    assert!(matches!(gap, Err(GfError::Schema(_))));

    let dup = Schema::new([(0, "Id", ColumnKind::Integer), (1, "Id", ColumnKind::Text)]);
    assert!(matches!(dup, Err(GfError::Schema(_))));

    let unordered = Schema::new([(1, "Name", ColumnKind::Text), (0, "Id", ColumnKind::Integer)])
        .unwrap();
    assert_eq!(unordered.index_of("Name"), Some(1));
    assert_eq!(unordered.width(), 2);
}

#[test]
fn kind_tags() {
    assert_eq!("int".parse::<ColumnKind>().unwrap(), ColumnKind::Integer);
    assert_eq!(
        "flags:Restrict".parse::<ColumnKind>().unwrap(),
        ColumnKind::Bitmask("Restrict".to_string())
    );
    assert_eq!(
        "enum:Quality".parse::<ColumnKind>().unwrap(),
        ColumnKind::Enumerated("Quality".to_string())
    );
    assert!("float".parse::<ColumnKind>().is_err());
    assert!(Schema::from_tags([(0, "Id", "bogus")]).is_err());
}

#[test]
fn header_resolution_outcomes() {
    let schema = Schema::from_names(["Id", "Name", "Tip"]).unwrap();

    let matched = schema.resolve_header(&row(&["Id", "Name", "Tip"]));
    assert!(matches!(matched, SchemaOutcome::Matched(_)));

    let data = schema.resolve_header(&row(&["1001", "Sword"]));
    assert!(matches!(data, SchemaOutcome::DataLine(_)));

    let wrong = schema.resolve_header(&row(&["Id", "Name", "Tip", "Extra"]));
    assert!(wrong.is_mismatch());
    match &wrong {
        SchemaOutcome::Mismatch { detected_width, fallback } => {
            assert_eq!(*detected_width, 4);
            assert_eq!(fallback, &schema);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(wrong.schema(), &schema);
}

#[test]
fn enum_vocabulary_lookups() {
    let types = item_types();

    assert_eq!(types.name_of(2), Some("Armor"));
    assert_eq!(types.value_of("Weapon"), Some(1));
    assert_eq!(types.name_of(9), None);
    assert_eq!(types.len(), 3);
}
