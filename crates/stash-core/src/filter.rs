//! Path filters applied before any file is hashed

/// Predicate over a folder-relative path deciding whether a file takes part
/// in a scan.
pub trait FileFilter: Send + Sync {
    fn include(&self, path: &str) -> bool;
}

/// Includes every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl FileFilter for NoFilter {
    fn include(&self, _path: &str) -> bool {
        true
    }
}

/// Excludes files whose name ends with `.<ext>` for any configured
/// extension.
///
/// Matching is an exact, case-sensitive suffix test: `"txt"` excludes
/// `notes.txt` but not `NOTES.TXT`.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: extensions
                .into_iter()
                .map(|ext| format!(".{}", ext.as_ref()))
                .collect(),
        }
    }
}

impl FileFilter for ExtensionFilter {
    fn include(&self, path: &str) -> bool {
        let name = path.rsplit('/').next().unwrap_or(path);
        !self.suffixes.iter().any(|suffix| name.ends_with(suffix))
    }
}

/// Includes a path only if every member filter does.
#[derive(Default)]
pub struct AllOf {
    filters: Vec<Box<dyn FileFilter>>,
}

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl FileFilter for AllOf {
    fn include(&self, path: &str) -> bool {
        self.filters.iter().all(|filter| filter.include(path))
    }
}

impl<F> FileFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn include(&self, path: &str) -> bool {
        self(path)
    }
}
