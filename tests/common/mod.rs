/*!
 * Common test utilities for the potranslate test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

// Re-export the mock backend module
pub mod mock_providers;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small untranslated catalog with a header, for single-file tests
pub fn sample_catalog_content() -> &'static str {
    r#"# Test catalog.
msgid ""
msgstr ""
"Project-Id-Version: sample 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Language: fr\n"

#: src/main.c:10
msgid "Hello, world!"
msgstr ""

msgid "Save the file"
msgstr ""

msgid "Quit"
msgstr ""
"#
}

/// An extracted template (.pot) with an empty Language header
pub fn sample_template_content() -> &'static str {
    r#"# Extracted template.
msgid ""
msgstr ""
"Project-Id-Version: sample 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Language: \n"

#: docs/index.rst:1
msgid "Welcome"
msgstr ""

#: docs/index.rst:4
msgid "Read the manual"
msgstr ""
"#
}
