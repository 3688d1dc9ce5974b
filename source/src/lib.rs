use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// Index of a registered source file. Copied freely; every location
/// referencing the same path shares one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

/// A single input unit, identified by its path. Immutable once
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Registry of every source file seen by one interpreter instance.
/// Paths are interned, so registering the same path twice hands back the
/// original id.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    ids: HashMap<PathBuf, FileId>,
}

impl SourceMap {
    pub fn new() -> SourceMap {
        SourceMap::default()
    }

    pub fn add(&mut self, path: impl Into<PathBuf>) -> FileId {
        let path = path.into();
        if let Some(id) = self.ids.get(&path) {
            return *id;
        }
        let id = FileId(self.files.len());
        self.ids.insert(path.clone(), id);
        self.files.push(SourceFile { path });
        id
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A point in a source file. Compared by content; lines and columns are
/// non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: FileId,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: FileId, line: u32, column: u32) -> SourceLocation {
        SourceLocation { file, line, column }
    }

    /// Renders as `<path>:<line>:<column>` against the map that owns the
    /// file.
    pub fn display<'a>(&self, sources: &'a SourceMap) -> LocationDisplay<'a> {
        LocationDisplay {
            path: sources.get(self.file).path(),
            line: self.line,
            column: self.column,
        }
    }
}

pub struct LocationDisplay<'a> {
    path: &'a Path,
    line: u32,
    column: u32,
}

impl Display for LocationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

#[test]
fn paths_are_interned() {
    let mut sources = SourceMap::new();
    let a = sources.add("main.src");
    let b = sources.add("lib.src");
    let c = sources.add("main.src");
    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(sources.len(), 2);
    assert_eq!(sources.get(b).path(), Path::new("lib.src"));
}

#[test]
fn locations_render_with_path_line_and_column() {
    let mut sources = SourceMap::new();
    let file = sources.add("main.src");
    let location = SourceLocation::new(file, 10, 4);
    assert_eq!(format!("{}", location.display(&sources)), "main.src:10:4");
    assert_eq!(location, SourceLocation::new(file, 10, 4));
}
