//! INI file config store, compatible with `Dolphin.ini`.
//!
//! The file is kept as an ordered list of sections and lines so that a
//! rewrite only changes the values that were set: comments, blank lines,
//! unknown sections and key order all survive.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::StoreError;
use crate::store::{ConfigStore, parse_int};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Blank line or comment, kept verbatim.
    Raw(String),
    Entry { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// `None` for lines that precede the first header.
    name: Option<String>,
    lines: Vec<Line>,
}

impl Section {
    fn entry(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut String> {
        self.lines.iter_mut().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    /// Appends an entry after the last non-blank line, so a blank line
    /// separating this section from the next stays in place.
    fn append(&mut self, key: &str, value: &str) {
        let at = self
            .lines
            .iter()
            .rposition(|line| !matches!(line, Line::Raw(raw) if raw.trim().is_empty()))
            .map_or(0, |idx| idx + 1);
        self.lines.insert(
            at,
            Line::Entry {
                key: key.to_string(),
                value: value.to_string(),
            },
        );
    }
}

/// Parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniFile {
    sections: Vec<Section>,
}

impl IniFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key` in `section`. The first occurrence wins.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.named(section).find_map(|s| s.entry(key))
    }

    /// Sets `key` in `section`, replacing the first occurrence in place or
    /// appending to the section. A missing section is created at the end.
    ///
    /// Values containing a line break cannot be represented and are
    /// rejected without touching the document.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        if value.contains(['\n', '\r']) {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
                reason: "line breaks are not allowed",
            });
        }

        if let Some(existing) = self
            .sections
            .iter_mut()
            .filter(|s| s.name.as_deref() == Some(section))
            .find_map(|s| s.entry_mut(key))
        {
            *existing = value.to_string();
            return Ok(());
        }

        match self
            .sections
            .iter_mut()
            .find(|s| s.name.as_deref() == Some(section))
        {
            Some(s) => s.append(key, value),
            None => {
                let mut s = Section {
                    name: Some(section.to_string()),
                    lines: Vec::new(),
                };
                s.append(key, value);
                self.sections.push(s);
            }
        }
        Ok(())
    }

    /// Names of all sections, in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|s| s.name.as_deref())
    }

    /// Keys of `section`, in file order.
    pub fn keys<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a str> {
        self.named(section).flat_map(|s| {
            s.lines.iter().filter_map(|line| match line {
                Line::Entry { key, .. } => Some(key.as_str()),
                Line::Raw(_) => None,
            })
        })
    }

    fn named<'a, 's>(
        &'a self,
        section: &'s str,
    ) -> impl Iterator<Item = &'a Section> + use<'a, 's> {
        self.sections
            .iter()
            .filter(move |s| s.name.as_deref() == Some(section))
    }
}

impl FromStr for IniFile {
    type Err = StoreError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut sections = vec![Section {
            name: None,
            lines: Vec::new(),
        }];

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                push_line(&mut sections, Line::Raw(raw.to_string()));
            } else if let Some(header) = trimmed.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| StoreError::Parse {
                    line: line_no,
                    message: "unterminated section header".into(),
                })?;
                sections.push(Section {
                    name: Some(name.trim().to_string()),
                    lines: Vec::new(),
                });
            } else if let Some((key, value)) = raw.trim_start().split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    return Err(StoreError::Parse {
                        line: line_no,
                        message: "missing key before '='".into(),
                    });
                }
                push_line(
                    &mut sections,
                    Line::Entry {
                        key: key.to_string(),
                        value: value.strip_prefix(' ').unwrap_or(value).to_string(),
                    },
                );
            } else {
                return Err(StoreError::Parse {
                    line: line_no,
                    message: format!("expected `key = value`, got '{trimmed}'"),
                });
            }
        }

        if sections[0].lines.is_empty() {
            sections.remove(0);
        }
        Ok(Self { sections })
    }
}

fn push_line(sections: &mut [Section], line: Line) {
    if let Some(last) = sections.last_mut() {
        last.lines.push(line);
    }
}

impl fmt::Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            if let Some(name) = &section.name {
                writeln!(f, "[{name}]")?;
            }
            for line in &section.lines {
                match line {
                    Line::Raw(raw) => writeln!(f, "{raw}")?,
                    Line::Entry { key, value } => writeln!(f, "{key} = {value}")?,
                }
            }
        }
        Ok(())
    }
}

/// [`ConfigStore`] backed by an INI file.
///
/// Every set writes the whole file back to disk.
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    file: IniFile,
}

impl IniStore {
    /// Opens the INI file at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            let file: IniFile = text.parse()?;
            debug!(path = %path.display(), sections = file.sections.len(), "loaded ini file");
            file
        } else {
            IniFile::new()
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed document as last written.
    pub fn file(&self) -> &IniFile {
        &self.file
    }

    /// Writes the current document to disk.
    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.file.to_string())?;
        debug!(path = %self.path.display(), "ini file saved");
        Ok(())
    }
}

impl ConfigStore for IniStore {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.file
            .get(section, key)
            .and_then(parse_int)
            .unwrap_or(default)
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.file.get(section, key).unwrap_or(default).to_string()
    }

    fn set_int(&mut self, section: &str, key: &str, value: i64) -> Result<(), StoreError> {
        self.file.set(section, key, &value.to_string())?;
        self.persist()
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.file.set(section, key, value)?;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOLPHIN_INI: &str = "\
; written by hand
[General]
LastFilename = /sdcard/dolphin-emu/Games/melee.iso
GCMPathes = 1
GCMPath0 = /sdcard/dolphin-emu/Games

[Core]
CPUThread = True
";

    #[test]
    fn parse_reads_values() {
        let ini: IniFile = DOLPHIN_INI.parse().unwrap();
        assert_eq!(ini.get("General", "GCMPathes"), Some("1"));
        assert_eq!(ini.get("General", "GCMPath0"), Some("/sdcard/dolphin-emu/Games"));
        assert_eq!(ini.get("Core", "CPUThread"), Some("True"));
        assert_eq!(ini.get("Core", "GCMPathes"), None);
        assert_eq!(ini.get("General", "gcmpathes"), None);
        assert_eq!(ini.sections().collect::<Vec<_>>(), vec!["General", "Core"]);
    }

    #[test]
    fn unchanged_document_round_trips() {
        let ini: IniFile = DOLPHIN_INI.parse().unwrap();
        assert_eq!(ini.to_string(), DOLPHIN_INI);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut ini: IniFile = DOLPHIN_INI.parse().unwrap();
        ini.set("General", "GCMPathes", "2").unwrap();

        let keys: Vec<&str> = ini.keys("General").collect();
        assert_eq!(keys, vec!["LastFilename", "GCMPathes", "GCMPath0"]);
        assert!(ini.to_string().contains("GCMPathes = 2\nGCMPath0"));
    }

    #[test]
    fn set_appends_before_section_gap() {
        let mut ini: IniFile = DOLPHIN_INI.parse().unwrap();
        ini.set("General", "GCMPath1", "/media/usb").unwrap();

        let text = ini.to_string();
        assert!(text.contains("GCMPath0 = /sdcard/dolphin-emu/Games\nGCMPath1 = /media/usb\n\n[Core]"));
    }

    #[test]
    fn set_creates_missing_section() {
        let mut ini = IniFile::new();
        ini.set("General", "GCMPathes", "0").unwrap();
        assert_eq!(ini.to_string(), "[General]\nGCMPathes = 0\n");
    }

    #[test]
    fn surrounding_whitespace_in_values_round_trips() {
        let mut ini = IniFile::new();
        ini.set("General", "GCMPath0", "/media/my games ").unwrap();
        ini.set("General", "GCMPath1", " /media/lead").unwrap();

        let reparsed: IniFile = ini.to_string().parse().unwrap();
        assert_eq!(reparsed.get("General", "GCMPath0"), Some("/media/my games "));
        assert_eq!(reparsed.get("General", "GCMPath1"), Some(" /media/lead"));
    }

    #[test]
    fn hand_written_entries_without_spaces_parse() {
        let ini: IniFile = "[General]\nGCMPathes=1\n  GCMPath0 = /roms\n".parse().unwrap();
        assert_eq!(ini.get("General", "GCMPathes"), Some("1"));
        assert_eq!(ini.get("General", "GCMPath0"), Some("/roms"));
    }

    #[test]
    fn line_breaks_in_values_are_rejected() {
        let mut ini: IniFile = DOLPHIN_INI.parse().unwrap();
        let before = ini.clone();

        let err = ini.set("General", "GCMPath1", "/tmp/a\nb").unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { .. }));
        assert!(ini.set("General", "GCMPath0", "/tmp/a\rb").is_err());
        assert_eq!(ini, before);
    }

    #[test]
    fn store_keeps_file_readable_after_rejected_value() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Dolphin.ini");

        let mut store = IniStore::open(&path).unwrap();
        store.set_string("General", "GCMPath0", "/media/usb").unwrap();
        assert!(store.set_string("General", "GCMPath1", "/tmp/a\nb").is_err());

        let reopened = IniStore::open(&path).unwrap();
        assert_eq!(reopened.get_string("General", "GCMPath0", ""), "/media/usb");
        assert_eq!(reopened.get_string("General", "GCMPath1", ""), "");
    }

    #[test]
    fn value_may_contain_equals() {
        let ini: IniFile = "[General]\nGCMPath0 = /media/a=b\n".parse().unwrap();
        assert_eq!(ini.get("General", "GCMPath0"), Some("/media/a=b"));
    }

    #[test]
    fn first_occurrence_wins() {
        let ini: IniFile = "[General]\nKey = a\n[General]\nKey = b\n".parse().unwrap();
        assert_eq!(ini.get("General", "Key"), Some("a"));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = "[General]\nKey = a\nnot an entry\n"
            .parse::<IniFile>()
            .unwrap_err();
        match err {
            StoreError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }

        let err = "[General\n".parse::<IniFile>().unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 1, .. }));
    }

    #[test]
    fn open_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = IniStore::open(tmp.path().join("Dolphin.ini")).unwrap();
        assert_eq!(store.get_int("General", "GCMPathes", 0), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn set_persists_to_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Config").join("Dolphin.ini");

        let mut store = IniStore::open(&path).unwrap();
        store.set_string("General", "GCMPath0", "/media/usb").unwrap();
        store.set_int("General", "GCMPathes", 1).unwrap();

        let reopened = IniStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("General", "GCMPathes", 0), 1);
        assert_eq!(reopened.get_string("General", "GCMPath0", ""), "/media/usb");
    }

    #[test]
    fn existing_content_survives_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Dolphin.ini");
        std::fs::write(&path, DOLPHIN_INI).unwrap();

        let mut store = IniStore::open(&path).unwrap();
        store.set_int("General", "GCMPathes", 1).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), DOLPHIN_INI);
    }

    #[test]
    fn malformed_int_reads_as_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Dolphin.ini");
        std::fs::write(&path, "[General]\nGCMPathes = lots\n").unwrap();

        let store = IniStore::open(&path).unwrap();
        assert_eq!(store.get_int("General", "GCMPathes", 0), 0);
    }

    #[test]
    fn open_unparsable_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Dolphin.ini");
        std::fs::write(&path, "garbage\n").unwrap();

        assert!(matches!(
            IniStore::open(&path),
            Err(StoreError::Parse { line: 1, .. })
        ));
    }
}
