use encoding_rs::{UTF_8, WINDOWS_1252};
use gfdata::gfdata::translation::{
    get_translation, sanitize, set_translation, translation_path,
};
use gfdata::TranslationStore;
use std::fs;
use std::path::{Path, PathBuf};

const SAMPLE: &str = "; T_Item\n\
1001|Short Sword|A plain blade.|\n\
1002|Potion|Restores health.\n\
$12$Cannot be used in battle.\n\
Stacks up to 99.|\n\
1003|Arrow||\n";

fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("T_Item.ini");
    fs::write(&path, SAMPLE).unwrap();
    path
}

fn ids(store: &TranslationStore) -> Vec<u64> {
    store.iter().map(|r| r.id).collect()
}

#[test]
fn parses_header_records_and_continuations() {
    let dir = tempfile::tempdir().unwrap();
    let store = TranslationStore::load(write_sample(dir.path()), UTF_8).unwrap();

    assert_eq!(store.header_lines(), ["; T_Item"]);
    assert_eq!(ids(&store), vec![1001, 1002, 1003]);
    assert_eq!(
        store.raw(1002).unwrap().description,
        vec![
            "Restores health.",
            "$12$Cannot be used in battle.",
            "Stacks up to 99.",
        ]
    );
    assert!(store.raw(1003).unwrap().description.is_empty());
}

#[test]
fn get_returns_sanitized_text_without_touching_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = TranslationStore::load(write_sample(dir.path()), UTF_8).unwrap();

    let (name, description) = store.get(1002).unwrap();

    assert_eq!(name, "Potion");
    assert_eq!(
        description,
        "Restores health.\nCannot be used in battle.\nStacks up to 99."
    );
    assert_eq!(
        store.raw(1002).unwrap().description[1],
        "$12$Cannot be used in battle."
    );
    assert_eq!(store.get(1003), Some(("Arrow".to_string(), String::new())));
    assert_eq!(store.get(9999), None);
}

#[test]
fn load_and_save_without_edits_keeps_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());

    TranslationStore::load(&path, UTF_8).unwrap().save().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn missing_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = TranslationStore::load(dir.path().join("T_Item.ini"), UTF_8).unwrap();

    assert!(store.is_empty());
    assert!(store.header_lines().is_empty());
}

#[test]
fn upsert_appends_new_ids_and_keeps_existing_positions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Translate").join("T_Item.ini");

    let mut store = TranslationStore::load(&path, UTF_8).unwrap();
    assert_eq!(store.set(42, "Sword", "Sharp blade.", None), 0);
    store.save().unwrap();

    let mut store = TranslationStore::load(&path, UTF_8).unwrap();
    assert_eq!(ids(&store), vec![42]);
    assert_eq!(store.set(43, "Shield", "Sturdy.", None), 1);
    store.save().unwrap();

    let store = TranslationStore::load(&path, UTF_8).unwrap();
    assert_eq!(ids(&store), vec![42, 43]);
    assert_eq!(
        store.get(42),
        Some(("Sword".to_string(), "Sharp blade.".to_string()))
    );
    assert_eq!(store.find_index(42), Some(0));
    assert_eq!(store.find_index(43), Some(1));
}

#[test]
fn editing_an_existing_id_keeps_its_position() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = TranslationStore::load(write_sample(dir.path()), UTF_8).unwrap();

    let index = store.set(1002, "Elixir", "Restores everything.", Some(0));

    assert_eq!(index, 1);
    assert_eq!(ids(&store), vec![1001, 1002, 1003]);
    assert_eq!(store.raw(1002).unwrap().name, "Elixir");
}

#[test]
fn insert_at_places_new_ids_and_clamps_past_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = TranslationStore::load(write_sample(dir.path()), UTF_8).unwrap();

    assert_eq!(store.set(5, "First", "", Some(0)), 0);
    assert_eq!(store.set(6, "Last", "", Some(99)), 4);

    assert_eq!(ids(&store), vec![5, 1001, 1002, 1003, 6]);
}

#[test]
fn render_layouts() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = TranslationStore::load(dir.path().join("T_Item.ini"), UTF_8).unwrap();

    store.set(1, "Arrow", "", None);
    store.set(2, "Sword", "A blade.", None);
    store.set(3, "Potion", "Restores health.\r\nStacks up to 99.", None);
    store.set(4, "Bow", "   ", None);

    assert_eq!(
        store.render(),
        "1|Arrow||\n\
         2|Sword|A blade.|\n\
         3|Potion|Restores health.\nStacks up to 99.|\n\
         4|Bow||\n"
    );
}

#[test]
fn saved_multi_line_description_reloads_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("T_Item.ini");

    let mut store = TranslationStore::load(&path, UTF_8).unwrap();
    store.set(7, "Potion", "Line one.\nLine two.\nLine three.", None);
    store.save().unwrap();

    let store = TranslationStore::load(&path, UTF_8).unwrap();
    assert_eq!(
        store.get(7).unwrap().1,
        "Line one.\nLine two.\nLine three."
    );
    assert_eq!(store.to_map().len(), 1);
}

#[test]
fn legacy_encoding_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("T_Item.ini");

    let mut store = TranslationStore::load(&path, WINDOWS_1252).unwrap();
    store.set(1, "Épée", "Lame légère.", None);
    store.save().unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"1|\xC9p\xE9e|Lame l\xE9g\xE8re.|\n");
    let store = TranslationStore::load(&path, WINDOWS_1252).unwrap();
    assert_eq!(store.raw(1).unwrap().name, "Épée");
}

#[test]
fn ids_are_written_back_as_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("T_Item.ini");
    fs::write(&path, "0042|Sword|Sharp.|\n  7|Bow||\n").unwrap();

    let mut store = TranslationStore::load(&path, UTF_8).unwrap();
    assert_eq!(ids(&store), vec![42, 7]);
    assert_eq!(store.raw(42).unwrap().id_text, "0042");
    assert_eq!(store.set(42, "Long Sword", "Sharper.", None), 0);
    store.save().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "0042|Long Sword|Sharper.|\n  7|Bow||\n"
    );
}

#[test]
fn out_of_range_id_is_kept_as_description_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("T_Item.ini");
    let text = "1|Arrow|Pointy.\n99999999999999999999999|Ghost|Boo.|\n";
    fs::write(&path, text).unwrap();

    let store = TranslationStore::load(&path, UTF_8).unwrap();

    assert_eq!(ids(&store), vec![1]);
    assert_eq!(
        store.raw(1).unwrap().description,
        vec!["Pointy.", "99999999999999999999999|Ghost|Boo."]
    );
    store.save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn sanitize_strips_tokens_separators_and_quotes() {
    assert_eq!(sanitize("\"Hello\"|", '|'), "Hello");
    assert_eq!(sanitize("$3$Line one|\n 'Line two' ||", '|'), "Line one\nLine two");
    assert_eq!(sanitize("   ", '|'), "");
}

#[test]
fn one_shot_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());

    let index = set_translation(&path, UTF_8, 2001, "Helmet", "Protects the head.", None).unwrap();
    assert_eq!(index, 3);

    assert_eq!(
        get_translation(&path, UTF_8, 2001).unwrap(),
        Some(("Helmet".to_string(), "Protects the head.".to_string()))
    );
    assert_eq!(get_translation(&path, UTF_8, 1).unwrap(), None);
}

#[test]
fn translation_file_names() {
    let base = Path::new("game").join("lib");

    assert_eq!(
        translation_path(&base, "C_ItemMall.ini"),
        base.join("Translate").join("T_ItemMall.ini")
    );
    assert_eq!(
        translation_path(&base, "S_Item.ini"),
        base.join("Translate").join("T_Item.ini")
    );
}
