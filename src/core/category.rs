//! File categories and the extension-based classifier.
//!
//! Every file inside a package lands in exactly one [`Category`]. The
//! [`PathClassifier`] resolves most of them from the file name alone; plugin
//! description files need an identity check against the manifest and are
//! handled by the scanner.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Semantic category of a file inside a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Python and C++ sources
    Source,
    /// Runtime configuration (yaml, rviz)
    Config,
    /// Meshes and images
    Data,
    /// Robot descriptions
    Model,
    Launch,
    Msg,
    Srv,
    Action,
    Cfg,
    /// Root build-description files (`package.xml`, `CMakeLists.txt`)
    Build,
    /// Plugin description files declared in the manifest
    Plugins,
    /// Anything else
    Unclassified,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 12] = [
        Category::Source,
        Category::Config,
        Category::Data,
        Category::Model,
        Category::Launch,
        Category::Msg,
        Category::Srv,
        Category::Action,
        Category::Cfg,
        Category::Build,
        Category::Plugins,
        Category::Unclassified,
    ];

    /// The category key as used in listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Source => "source",
            Category::Config => "config",
            Category::Data => "data",
            Category::Model => "model",
            Category::Launch => "launch",
            Category::Msg => "msg",
            Category::Srv => "srv",
            Category::Action => "action",
            Category::Cfg => "cfg",
            Category::Build => "build",
            Category::Plugins => "plugins",
            Category::Unclassified => "unclassified",
        }
    }

    /// Map a "simple" extension to the category of the same name.
    pub fn from_simple_extension(ext: &str) -> Option<Category> {
        match ext {
            "launch" => Some(Category::Launch),
            "msg" => Some(Category::Msg),
            "srv" => Some(Category::Srv),
            "action" => Some(Category::Action),
            "cfg" => Some(Category::Cfg),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SOURCE_EXTENSIONS: &[&str] = &["py", "cpp", "h"];
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "rviz"];
pub const DATA_EXTENSIONS: &[&str] = &["dae", "jpg", "stl", "png"];
pub const MODEL_EXTENSIONS: &[&str] = &["urdf", "xacro", "srdf"];

/// File names of the root build-description files.
pub const BASIC_FILES: &[&str] = &["package.xml", "CMakeLists.txt"];

/// Maps file names to categories.
///
/// Extension matching is case-sensitive and uses the suffix after the last
/// dot, without the dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClassifier {
    groups: Vec<(Category, Vec<String>)>,
    basic: Vec<String>,
}

impl Default for PathClassifier {
    fn default() -> Self {
        let owned = |exts: &[&str]| exts.iter().map(|e| e.to_string()).collect::<Vec<_>>();
        PathClassifier {
            groups: vec![
                (Category::Source, owned(SOURCE_EXTENSIONS)),
                (Category::Config, owned(CONFIG_EXTENSIONS)),
                (Category::Data, owned(DATA_EXTENSIONS)),
                (Category::Model, owned(MODEL_EXTENSIONS)),
            ],
            basic: owned(BASIC_FILES),
        }
    }
}

impl PathClassifier {
    /// Create a classifier with the built-in tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add extensions to one of the four extension groups.
    ///
    /// Leading dots are stripped. Categories outside the groups are ignored.
    pub fn with_extensions<I, S>(mut self, category: Category, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some((_, group)) = self.groups.iter_mut().find(|(c, _)| *c == category) {
            for ext in exts {
                let ext = ext.as_ref().trim_start_matches('.').to_string();
                if !group.contains(&ext) {
                    group.push(ext);
                }
            }
        }
        self
    }

    /// Add root build-description file names.
    pub fn with_basic_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().to_string();
            if !self.basic.contains(&name) {
                self.basic.push(name);
            }
        }
        self
    }

    /// Classify a file by its name.
    ///
    /// Returns `None` when the name alone is not enough; the caller then
    /// tries plugin matching before falling back to [`Category::Unclassified`].
    pub fn classify(&self, file_name: &str) -> Option<Category> {
        let ext = Path::new(file_name).extension().and_then(|e| e.to_str());

        if let Some(ext) = ext {
            for (category, group) in &self.groups {
                if group.iter().any(|g| g == ext) {
                    return Some(*category);
                }
            }
            if let Some(category) = Category::from_simple_extension(ext) {
                return Some(category);
            }
        }

        if self.is_basic(file_name) {
            return Some(Category::Build);
        }

        None
    }

    /// Check whether a file name is a root build-description file.
    pub fn is_basic(&self, file_name: &str) -> bool {
        self.basic.iter().any(|b| b == file_name)
    }
}
