/*!
 * Tests for catalog parsing, writing and compilation
 */

use anyhow::Result;
use potranslate::catalog::{Catalog, CatalogEntry};
use crate::common;

#[test]
fn test_parse_withBasicCatalog_shouldReadHeaderAndEntries() -> Result<()> {
    let catalog = Catalog::parse(common::sample_catalog_content())?;

    assert_eq!(catalog.metadata_value("Project-Id-Version"), Some("sample 1.0"));
    assert_eq!(catalog.metadata_value("Language"), Some("fr"));
    assert_eq!(catalog.header_comments, vec!["# Test catalog."]);

    assert_eq!(catalog.entries.len(), 3);
    assert_eq!(catalog.entries[0].msgid, "Hello, world!");
    assert_eq!(catalog.entries[0].comments, vec!["#: src/main.c:10"]);
    assert_eq!(catalog.entries[1].msgid, "Save the file");
    assert_eq!(catalog.entries[2].msgid, "Quit");
    Ok(())
}

#[test]
fn test_parse_withMultilineStrings_shouldConcatenateSegments() -> Result<()> {
    let content = r#"msgid ""
msgstr ""
"Language: de\n"

msgid ""
"First line\n"
"second line"
msgstr ""
"erste Zeile\n"
"zweite Zeile"
"#;
    let catalog = Catalog::parse(content)?;

    assert_eq!(catalog.entries.len(), 1);
    assert_eq!(catalog.entries[0].msgid, "First line\nsecond line");
    assert_eq!(catalog.entries[0].msgstr, "erste Zeile\nzweite Zeile");
    Ok(())
}

#[test]
fn test_parse_withEscapes_shouldUnescapeQuotesAndTabs() -> Result<()> {
    let content = r#"msgid "Say \"hi\"\tnow\\here"
msgstr ""
"#;
    let catalog = Catalog::parse(content)?;

    assert_eq!(catalog.entries.len(), 1);
    assert_eq!(catalog.entries[0].msgid, "Say \"hi\"\tnow\\here");
    Ok(())
}

#[test]
fn test_parse_withPluralAndObsoleteEntries_shouldPreserveButNotSelectThem() -> Result<()> {
    let content = r#"msgid ""
msgstr ""
"Language: fr\n"

msgid "One file"
msgid_plural "Many files"
msgstr[0] ""
msgstr[1] ""

#~ msgid "Old text"
#~ msgstr "Ancien texte"

msgctxt "menu"
msgid "Open"
msgstr ""
"#;
    let catalog = Catalog::parse(content)?;

    assert_eq!(catalog.entries.len(), 3);
    assert_eq!(catalog.entries[0].msgid_plural.as_deref(), Some("Many files"));
    assert_eq!(catalog.entries[0].plural_msgstrs.len(), 2);
    assert!(catalog.entries[1].obsolete);
    assert_eq!(catalog.entries[1].msgstr, "Ancien texte");
    assert_eq!(catalog.entries[2].msgctxt.as_deref(), Some("menu"));

    // Only the plain untranslated entry qualifies for submission.
    assert_eq!(catalog.untranslated_indices(), vec![2]);
    Ok(())
}

#[test]
fn test_untranslated_indices_withMixedEntries_shouldSkipTranslatedOnes() -> Result<()> {
    let mut catalog = Catalog::parse(common::sample_catalog_content())?;
    catalog.entries[1].msgstr = "Enregistrer le fichier".to_string();

    assert_eq!(catalog.untranslated_indices(), vec![0, 2]);
    Ok(())
}

#[test]
fn test_roundtrip_withWriteAndReparse_shouldPreserveEntries() -> Result<()> {
    let original = Catalog::parse(common::sample_catalog_content())?;
    let rewritten = Catalog::parse(&original.to_po_string())?;

    assert_eq!(original.metadata, rewritten.metadata);
    assert_eq!(original.header_comments, rewritten.header_comments);
    assert_eq!(original.entries, rewritten.entries);
    Ok(())
}

#[test]
fn test_roundtrip_withSpecialCharacters_shouldSurviveEscaping() -> Result<()> {
    let mut catalog = Catalog::parse(common::sample_catalog_content())?;
    catalog.entries[0].msgstr = "Ligne\nsuivante \"quoted\" \\ fin\t.".to_string();

    let rewritten = Catalog::parse(&catalog.to_po_string())?;
    assert_eq!(rewritten.entries[0].msgstr, catalog.entries[0].msgstr);
    Ok(())
}

#[test]
fn test_apply_translations_withMatchingCounts_shouldFillEntries() -> Result<()> {
    let mut catalog = Catalog::parse(common::sample_catalog_content())?;
    let indices = catalog.untranslated_indices();
    let texts = vec![
        "Bonjour, le monde !".to_string(),
        "Enregistrer le fichier".to_string(),
        "Quitter".to_string(),
    ];

    catalog.apply_translations(&indices, &texts)?;

    assert_eq!(catalog.entries[0].msgstr, "Bonjour, le monde !");
    assert_eq!(catalog.entries[2].msgstr, "Quitter");
    assert!(catalog.untranslated_indices().is_empty());
    Ok(())
}

#[test]
fn test_apply_translations_withCountMismatch_shouldFail() -> Result<()> {
    let mut catalog = Catalog::parse(common::sample_catalog_content())?;
    let indices = catalog.untranslated_indices();

    let result = catalog.apply_translations(&indices, &["only one".to_string()]);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_stamp_translation_shouldUpdateHeaderFields() -> Result<()> {
    let mut catalog = Catalog::parse(common::sample_catalog_content())?;

    catalog.stamp_translation("es");

    assert_eq!(catalog.metadata_value("Language"), Some("es"));
    assert!(catalog.metadata_value("PO-Revision-Date").is_some());
    let translator = catalog.metadata_value("Translated-By").unwrap();
    assert!(translator.starts_with("potranslate "));
    // Existing fields keep their position, new ones are appended.
    assert_eq!(catalog.metadata[0].0, "Project-Id-Version");
    Ok(())
}

#[test]
fn test_save_and_load_withTempDir_shouldRoundtrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "messages.po",
        common::sample_catalog_content(),
    )?;

    let mut catalog = Catalog::load(&path)?;
    catalog.entries[0].msgstr = "Bonjour".to_string();
    catalog.save()?;

    let reloaded = Catalog::load(&path)?;
    assert_eq!(reloaded.entries[0].msgstr, "Bonjour");
    assert_eq!(reloaded.path, path);
    Ok(())
}

#[test]
fn test_to_mo_bytes_withTranslatedEntries_shouldEmitValidHeader() -> Result<()> {
    let mut catalog = Catalog::parse(common::sample_catalog_content())?;
    catalog.entries[0].msgstr = "Bonjour, le monde !".to_string();
    catalog.entries[1].msgstr = "Enregistrer le fichier".to_string();

    let bytes = catalog.to_mo_bytes();

    // Little-endian magic, revision 0, header entry plus two translations.
    assert_eq!(&bytes[0..4], &0x950412deu32.to_le_bytes());
    assert_eq!(&bytes[4..8], &0u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &3u32.to_le_bytes());

    // The first original string is the empty header key, sorted first.
    let originals_offset = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
    let first_len = u32::from_le_bytes(bytes[originals_offset..originals_offset + 4].try_into().unwrap());
    assert_eq!(first_len, 0);
    Ok(())
}

#[test]
fn test_catalog_entry_display_withContext_shouldRenderPoBlock() {
    let mut entry = CatalogEntry::new("Open", "Ouvrir");
    entry.msgctxt = Some("menu".to_string());
    entry.comments.push("#: ui/menu.c:4".to_string());

    let block = entry.to_string();

    assert!(block.contains("#: ui/menu.c:4"));
    assert!(block.contains("msgctxt \"menu\""));
    assert!(block.contains("msgid \"Open\""));
    assert!(block.contains("msgstr \"Ouvrir\""));
}
