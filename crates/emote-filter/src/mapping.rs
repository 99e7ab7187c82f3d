//! Notation-to-image mapping table.
//!
//! The table is read from an XML document with one record per emoticon:
//!
//! ```xml
//! <Mappings>
//!   <Mapping>
//!     <Notation>{:)}</Notation>
//!     <Image>/Plugins/EmoticonsPlugin/Images/smile.png</Image>
//!   </Mapping>
//! </Mappings>
//! ```
//!
//! Record and root element names are free; only the `Notation` and `Image`
//! children are read. Notations may be written with or without braces.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{LookupError, MappingError};
use crate::notation::{is_notation, strip_braces};

/// One notation and the image it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Notation without braces, e.g. `:)`.
    pub notation: String,
    /// Image reference, emitted verbatim as the `src` attribute.
    pub image: String,
}

/// Ordered notation-to-image table.
///
/// When a notation appears more than once the first entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
}

impl MappingTable {
    /// Build a table from `(notation, image)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidNotation`] for a notation outside the
    /// emoticon grammar.
    pub fn from_entries<I, N, M>(entries: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (N, M)>,
        N: AsRef<str>,
        M: Into<String>,
    {
        let mut table = Self::default();
        for (index, (notation, image)) in entries.into_iter().enumerate() {
            table.push(index, notation.as_ref(), image.into())?;
        }
        Ok(table)
    }

    /// Parse a table from an XML mapping document.
    ///
    /// Root children without a `Notation` element are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed, a record with a `Notation`
    /// lacks `Image`, or a notation is outside the emoticon grammar.
    pub fn from_xml(xml: &str) -> Result<Self, MappingError> {
        let mut table = Self::default();
        for (index, record) in parse_records(xml)?.into_iter().enumerate() {
            let Some(notation) = record.notation else {
                tracing::debug!(index, "Skipping mapping element without <Notation>");
                continue;
            };
            let image = record.image.ok_or(MappingError::MissingField {
                index,
                field: "Image",
            })?;
            table.push(index, &notation, image)?;
        }
        Ok(table)
    }

    /// Read and parse a mapping file.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NotFound`] if the file is missing, otherwise
    /// any read or parse error.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let xml = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => MappingError::NotFound(path.to_path_buf()),
            _ => MappingError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let table = Self::from_xml(&xml)?;

        let duplicates = table.duplicates();
        if !duplicates.is_empty() {
            tracing::warn!(
                path = %path.display(),
                ?duplicates,
                "Duplicate emoticon notations, first entry wins"
            );
        }
        tracing::debug!(
            path = %path.display(),
            entries = table.len(),
            "Loaded emoticon mappings"
        );
        Ok(table)
    }

    fn push(&mut self, index: usize, notation: &str, image: String) -> Result<(), MappingError> {
        let bare = strip_braces(notation.trim());
        if !is_notation(bare) {
            return Err(MappingError::InvalidNotation {
                index,
                notation: notation.to_owned(),
            });
        }
        self.index
            .entry(bare.to_owned())
            .or_insert(self.entries.len());
        self.entries.push(MappingEntry {
            notation: bare.to_owned(),
            image,
        });
        Ok(())
    }

    /// Image for a notation, braced (`{:)}`) or bare (`:)`).
    ///
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub fn lookup(&self, notation: &str) -> Option<&str> {
        self.index
            .get(strip_braces(notation))
            .map(|&i| self.entries[i].image.as_str())
    }

    /// Like [`lookup`](Self::lookup), but reports a miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownNotation`] if no entry matches.
    pub fn image_for(&self, notation: &str) -> Result<&str, LookupError> {
        self.lookup(notation)
            .ok_or_else(|| LookupError::UnknownNotation(notation.to_owned()))
    }

    /// All entries in document order, duplicates included.
    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Notations that appear more than once, in order of their first shadowed entry.
    #[must_use]
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let first = self.index.get(&entry.notation).copied();
            if first != Some(i) && !seen.contains(&entry.notation.as_str()) {
                seen.push(entry.notation.as_str());
            }
        }
        seen
    }
}

#[derive(Debug, Default)]
struct RawRecord {
    notation: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Notation,
    Image,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"Notation" => Some(Self::Notation),
            b"Image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl RawRecord {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Notation => &mut self.notation,
            Field::Image => &mut self.image,
        }
    }

    /// Start collecting `field`; false if an earlier occurrence already did.
    fn open(&mut self, field: Field) -> bool {
        let slot = self.slot(field);
        if slot.is_some() {
            return false;
        }
        *slot = Some(String::new());
        true
    }

    fn append(&mut self, field: Field, text: &str) {
        self.slot(field).get_or_insert_with(String::new).push_str(text);
    }
}

/// Collect `Notation`/`Image` text of every child of the root element.
///
/// Only the first occurrence of each field in a record is read.
/// Depth 1 is the root, depth 2 a record, depth 3 a field.
fn parse_records(xml: &str) -> Result<Vec<RawRecord>, MappingError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;
    let mut field: Option<Field> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    2 => current = Some(RawRecord::default()),
                    3 => {
                        field = match (current.as_mut(), Field::from_name(e.local_name().as_ref())) {
                            (Some(record), Some(f)) => record.open(f).then_some(f),
                            _ => None,
                        };
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match depth {
                1 => records.push(RawRecord::default()),
                2 => {
                    if let (Some(record), Some(f)) =
                        (current.as_mut(), Field::from_name(e.local_name().as_ref()))
                    {
                        record.open(f);
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if let (Some(record), Some(f)) = (current.as_mut(), field) {
                    let text = reader.decoder().decode(&e)?;
                    record.append(f, &text);
                }
            }
            Event::GeneralRef(e) => {
                if let (Some(record), Some(f)) = (current.as_mut(), field) {
                    let entity = reader.decoder().decode(&e)?;
                    record.append(f, &decode_entity(&entity));
                }
            }
            Event::CData(e) => {
                if let (Some(record), Some(f)) = (current.as_mut(), field) {
                    record.append(f, &String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                match depth {
                    2 => records.extend(current.take()),
                    3 => field = None,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(MappingError::UnexpectedEof);
                }
                return Ok(records);
            }
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }
}

/// Resolve a predefined or numeric XML entity; unknown entities stay verbatim.
fn decode_entity(entity: &str) -> String {
    let resolved = match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        s => s.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };
    resolved.map_or_else(|| format!("&{entity};"), String::from)
}
