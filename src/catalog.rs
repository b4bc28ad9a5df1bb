use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Gettext catalog parsing and writing

// @const: Quoted string segment of a catalog line
static STRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)""#).unwrap()
});

// @const: Indexed plural keyword, e.g. msgstr[2]
static PLURAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^msgstr\[(\d+)\]").unwrap()
});

/// One message entry of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    // @field: Raw comment lines, including the leading '#'
    pub comments: Vec<String>,

    // @field: Disambiguation context
    pub msgctxt: Option<String>,

    // @field: Untranslated singular text
    pub msgid: String,

    // @field: Untranslated plural text
    pub msgid_plural: Option<String>,

    // @field: Translated singular text, empty when untranslated
    pub msgstr: String,

    // @field: Translated plural forms, in index order
    pub plural_msgstrs: Vec<String>,

    // @field: Whether the entry is commented out (#~)
    pub obsolete: bool,
}

impl CatalogEntry {
    /// Create an entry from a msgid/msgstr pair
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        CatalogEntry {
            msgid: msgid.into(),
            msgstr: msgstr.into(),
            ..Default::default()
        }
    }

    // @checks: Entry should be sent for translation
    // Plural entries are preserved but never submitted.
    pub fn is_untranslated(&self) -> bool {
        !self.obsolete
            && !self.msgid.is_empty()
            && self.msgid_plural.is_none()
            && self.msgstr.is_empty()
    }

    /// The translation stored on this entry, singular or joined plural forms
    pub fn translation(&self) -> String {
        if self.msgid_plural.is_some() {
            self.plural_msgstrs.join("\u{0}")
        } else {
            self.msgstr.clone()
        }
    }

    fn has_translation(&self) -> bool {
        if self.msgid_plural.is_some() {
            self.plural_msgstrs.iter().any(|s| !s.is_empty())
        } else {
            !self.msgstr.is_empty()
        }
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = if self.obsolete { "#~ " } else { "" };
        for comment in &self.comments {
            writeln!(f, "{}", comment)?;
        }
        if let Some(ctxt) = &self.msgctxt {
            writeln!(f, "{}msgctxt \"{}\"", prefix, escape(ctxt))?;
        }
        writeln!(f, "{}msgid \"{}\"", prefix, escape(&self.msgid))?;
        if let Some(plural) = &self.msgid_plural {
            writeln!(f, "{}msgid_plural \"{}\"", prefix, escape(plural))?;
            for (index, form) in self.plural_msgstrs.iter().enumerate() {
                writeln!(f, "{}msgstr[{}] \"{}\"", prefix, index, escape(form))?;
            }
        } else {
            writeln!(f, "{}msgstr \"{}\"", prefix, escape(&self.msgstr))?;
        }
        Ok(())
    }
}

/// A parsed catalog file with its header metadata and message entries
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Path the catalog was loaded from
    pub path: PathBuf,

    /// Comment lines above the header entry
    pub header_comments: Vec<String>,

    /// Header fields in file order, so unknown keys round-trip
    pub metadata: Vec<(String, String)>,

    /// Message entries in file order, header excluded
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load and parse a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let mut catalog = Self::parse(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
        catalog.path = path.to_path_buf();
        Ok(catalog)
    }

    /// Parse catalog content
    pub fn parse(content: &str) -> Result<Self> {
        let mut parser = Parser::default();
        for (number, line) in content.lines().enumerate() {
            parser.feed(number + 1, line)?;
        }
        parser.finish()
    }

    /// Look up a header field
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace a header field, appending it when absent
    pub fn set_metadata(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.metadata.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.metadata.push((key.to_string(), value)),
        }
    }

    /// Indices of the entries that should be sent for translation, in file order
    pub fn untranslated_indices(&self) -> Vec<usize> {
        self.entries.iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_untranslated())
            .map(|(index, _)| index)
            .collect()
    }

    /// Write translated strings back into the entries at `indices`, positionally
    pub fn apply_translations(&mut self, indices: &[usize], texts: &[String]) -> Result<()> {
        if indices.len() != texts.len() {
            return Err(anyhow!(
                "translation count mismatch: {} entries, {} texts",
                indices.len(), texts.len()
            ));
        }
        for (&index, text) in indices.iter().zip(texts) {
            self.entries[index].msgstr = text.clone();
        }
        Ok(())
    }

    /// Stamp the header after a successful translation run
    pub fn stamp_translation(&mut self, target_language: &str) {
        let stamp = format!("potranslate {}", env!("CARGO_PKG_VERSION"));
        let revision = chrono::Local::now().format("%Y-%m-%d %H:%M%z").to_string();
        self.set_metadata("Translated-By", stamp.clone());
        self.set_metadata("Last-Translator", stamp);
        self.set_metadata("Language", target_language);
        self.set_metadata("PO-Revision-Date", revision);
    }

    /// Render the catalog back to PO format
    pub fn to_po_string(&self) -> String {
        let mut out = String::new();
        for comment in &self.header_comments {
            out.push_str(comment);
            out.push('\n');
        }
        out.push_str("msgid \"\"\nmsgstr \"\"\n");
        for (key, value) in &self.metadata {
            out.push_str(&format!("\"{}: {}\\n\"\n", escape(key), escape(value)));
        }
        for entry in &self.entries {
            out.push('\n');
            out.push_str(&entry.to_string());
        }
        out
    }

    /// Save the catalog to the path it was loaded from
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    /// Save the catalog to an explicit path, creating parent directories
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.to_po_string())
            .with_context(|| format!("Failed to write catalog file: {}", path.display()))?;
        Ok(())
    }

    /// Compile the catalog to the binary MO format
    ///
    /// Emits the header plus every translated, non-obsolete entry. The
    /// original-string table is sorted bytewise as the format requires; no
    /// hash table is written, readers fall back to binary search.
    pub fn to_mo_bytes(&self) -> Vec<u8> {
        let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();

        let header: String = self.metadata.iter()
            .map(|(k, v)| format!("{}: {}\n", k, v))
            .collect();
        pairs.push((Vec::new(), header.into_bytes()));

        for entry in &self.entries {
            if entry.obsolete || entry.msgid.is_empty() || !entry.has_translation() {
                continue;
            }
            let mut key = Vec::new();
            if let Some(ctxt) = &entry.msgctxt {
                key.extend_from_slice(ctxt.as_bytes());
                key.push(0x04);
            }
            key.extend_from_slice(entry.msgid.as_bytes());
            if let Some(plural) = &entry.msgid_plural {
                key.push(0);
                key.extend_from_slice(plural.as_bytes());
            }
            pairs.push((key, entry.translation().into_bytes()));
        }

        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let count = pairs.len() as u32;
        let originals_offset = 28u32;
        let translations_offset = originals_offset + 8 * count;
        let mut strings_offset = translations_offset + 8 * count;

        let mut header = Vec::with_capacity(28);
        header.extend_from_slice(&0x950412deu32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&count.to_le_bytes());
        header.extend_from_slice(&originals_offset.to_le_bytes());
        header.extend_from_slice(&translations_offset.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());

        let mut originals = Vec::new();
        let mut translations = Vec::new();
        let mut strings = Vec::new();

        for (key, _) in &pairs {
            originals.extend_from_slice(&(key.len() as u32).to_le_bytes());
            originals.extend_from_slice(&strings_offset.to_le_bytes());
            strings.extend_from_slice(key);
            strings.push(0);
            strings_offset += key.len() as u32 + 1;
        }
        for (_, value) in &pairs {
            translations.extend_from_slice(&(value.len() as u32).to_le_bytes());
            translations.extend_from_slice(&strings_offset.to_le_bytes());
            strings.extend_from_slice(value);
            strings.push(0);
            strings_offset += value.len() as u32 + 1;
        }

        let mut out = header;
        out.extend_from_slice(&originals);
        out.extend_from_slice(&translations);
        out.extend_from_slice(&strings);
        out
    }

    /// Compile and save the MO file next to the given path
    pub fn save_mo<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.to_mo_bytes())
            .with_context(|| format!("Failed to write compiled catalog: {}", path.display()))?;
        Ok(())
    }
}

/// Field a continuation line appends to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    PluralMsgstr(usize),
}

#[derive(Default)]
struct EntryBuilder {
    comments: Vec<String>,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    plural_msgstrs: Vec<(usize, String)>,
    obsolete: bool,
}

impl EntryBuilder {
    fn has_strings(&self) -> bool {
        self.msgctxt.is_some() || self.msgid.is_some()
    }

    fn append(&mut self, target: Target, text: &str) {
        match target {
            Target::Msgctxt => self.msgctxt.get_or_insert_with(String::new).push_str(text),
            Target::Msgid => self.msgid.get_or_insert_with(String::new).push_str(text),
            Target::MsgidPlural => self.msgid_plural.get_or_insert_with(String::new).push_str(text),
            Target::Msgstr => self.msgstr.get_or_insert_with(String::new).push_str(text),
            Target::PluralMsgstr(index) => {
                match self.plural_msgstrs.iter_mut().find(|(i, _)| *i == index) {
                    Some((_, slot)) => slot.push_str(text),
                    None => self.plural_msgstrs.push((index, text.to_string())),
                }
            }
        }
    }
}

#[derive(Default)]
struct Parser {
    catalog: Catalog,
    builder: EntryBuilder,
    target: Option<Target>,
    header_seen: bool,
}

impl Parser {
    fn feed(&mut self, number: usize, raw: &str) -> Result<()> {
        let line = raw.trim_end();
        if line.is_empty() {
            self.flush();
            return Ok(());
        }

        // Obsolete entries carry their directives behind a '#~' prefix.
        let (line, obsolete) = match line.strip_prefix("#~") {
            Some(rest) => (rest.trim_start(), true),
            None => (line, false),
        };

        if line.starts_with('#') {
            // Comments introduce the next entry; a comment after strings
            // means the previous entry just ended without a blank line.
            if self.builder.has_strings() {
                self.flush();
            }
            self.builder.comments.push(line.to_string());
            return Ok(());
        }

        let target = if line.starts_with("msgctxt") {
            if self.builder.has_strings() {
                self.flush();
            }
            Target::Msgctxt
        } else if line.starts_with("msgid_plural") {
            Target::MsgidPlural
        } else if line.starts_with("msgid") {
            if self.builder.msgid.is_some() {
                self.flush();
            }
            Target::Msgid
        } else if let Some(captures) = PLURAL_RE.captures(line) {
            let index: usize = captures[1].parse()
                .map_err(|_| anyhow!("line {}: invalid plural index", number))?;
            Target::PluralMsgstr(index)
        } else if line.starts_with("msgstr") {
            Target::Msgstr
        } else if line.starts_with('"') {
            // Bare string: continuation of the previous keyword.
            let target = self.target
                .ok_or_else(|| anyhow!("line {}: string with no preceding keyword", number))?;
            let text = quoted_value(line)
                .ok_or_else(|| anyhow!("line {}: malformed string", number))?;
            self.builder.obsolete |= obsolete;
            self.builder.append(target, &text);
            return Ok(());
        } else {
            return Err(anyhow!("line {}: unrecognized catalog line: {}", number, line));
        };

        let text = quoted_value(line)
            .ok_or_else(|| anyhow!("line {}: keyword without a quoted string", number))?;
        self.builder.obsolete |= obsolete;
        self.builder.append(target, &text);
        self.target = Some(target);
        Ok(())
    }

    fn flush(&mut self) {
        let builder = std::mem::take(&mut self.builder);
        self.target = None;
        if !builder.has_strings() {
            // Dangling comments with no entry; keep them with the header.
            if !builder.comments.is_empty() && !self.header_seen {
                self.catalog.header_comments.extend(builder.comments);
            }
            return;
        }

        let msgid = builder.msgid.unwrap_or_default();
        if msgid.is_empty() && !self.header_seen && builder.msgctxt.is_none() && !builder.obsolete {
            self.header_seen = true;
            self.catalog.header_comments.extend(builder.comments);
            let header = builder.msgstr.unwrap_or_default();
            for field in header.split('\n').filter(|l| !l.trim().is_empty()) {
                match field.split_once(':') {
                    Some((key, value)) => self.catalog.metadata
                        .push((key.trim().to_string(), value.trim().to_string())),
                    None => self.catalog.metadata.push((field.trim().to_string(), String::new())),
                }
            }
            return;
        }

        let mut plural_msgstrs = builder.plural_msgstrs;
        plural_msgstrs.sort_by_key(|(index, _)| *index);

        self.catalog.entries.push(CatalogEntry {
            comments: builder.comments,
            msgctxt: builder.msgctxt,
            msgid,
            msgid_plural: builder.msgid_plural,
            msgstr: builder.msgstr.unwrap_or_default(),
            plural_msgstrs: plural_msgstrs.into_iter().map(|(_, s)| s).collect(),
            obsolete: builder.obsolete,
        });
    }

    fn finish(mut self) -> Result<Catalog> {
        self.flush();
        Ok(self.catalog)
    }
}

/// Extract and unescape the quoted part of a catalog line
fn quoted_value(line: &str) -> Option<String> {
    STRING_RE.captures(line).map(|captures| unescape(&captures[1]))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}
