//! Python and C++ source files.
//!
//! Dependencies are the packages a source imports or includes from; plugin
//! bindings come from pluginlib export macros.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::dependency::{DependencySet, PackageIndex, PluginBinding};
use crate::util::fs;

// Each item of an import list may carry an `as` alias.
static PY_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*import[ \t]+([A-Za-z_][\w.]*(?:[ \t]+as[ \t]+\w+)?(?:[ \t]*,[ \t]*[A-Za-z_][\w.]*(?:[ \t]+as[ \t]+\w+)?)*)",
    )
    .unwrap()
});

static PY_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*from\s+([A-Za-z_][\w.]*)\s+import\b").unwrap());

static CPP_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*#\s*include\s*[<"]([A-Za-z0-9_]+)/"#).unwrap());

static PLUGIN_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PLUGINLIB_EXPORT_CLASS\s*\(\s*([\w:]+)\s*,\s*([\w:]+)\s*\)").unwrap()
});

static PLUGIN_DECLARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PLUGINLIB_DECLARE_CLASS\s*\(\s*\w+\s*,\s*\w+\s*,\s*([\w:]+)\s*,\s*([\w:]+)\s*\)")
        .unwrap()
});

/// A source file loaded into memory.
#[derive(Debug, Clone)]
pub struct Source {
    path: PathBuf,
    contents: String,
    python: bool,
}

impl Source {
    /// Read a source file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_lossy(path)?;
        Ok(Self::from_contents(path, contents))
    }

    /// Build a source from already-read contents.
    pub fn from_contents(path: &Path, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let python = is_python(path, &contents);
        Source {
            path: path.to_path_buf(),
            contents,
            python,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name, or an empty string for odd paths.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Whether this is a python script (by extension or shebang).
    pub fn is_python(&self) -> bool {
        self.python
    }

    /// Packages this source imports or includes from.
    pub fn dependencies(&self, index: Option<&PackageIndex>) -> DependencySet {
        let mut deps = DependencySet::new();
        if self.python {
            let contents = strip_python_comments(&self.contents);
            for cap in PY_IMPORT.captures_iter(&contents) {
                for module in cap[1].split(',') {
                    deps.insert(root_module(module));
                }
            }
            for cap in PY_FROM.captures_iter(&contents) {
                deps.insert(root_module(&cap[1]));
            }
        } else {
            for cap in CPP_INCLUDE.captures_iter(&self.contents) {
                deps.insert(cap[1].to_string());
            }
        }
        deps.filtered(index)
    }

    /// Plugin bindings exported from this source.
    pub fn plugins(&self) -> Vec<PluginBinding> {
        if self.python {
            return Vec::new();
        }
        PLUGIN_EXPORT
            .captures_iter(&self.contents)
            .chain(PLUGIN_DECLARE.captures_iter(&self.contents))
            .filter_map(|cap| {
                let binding = PluginBinding::from_qualified(&cap[1], &cap[2]);
                if binding.is_none() {
                    tracing::warn!(
                        "{}: ignoring unqualified plugin export `{}`",
                        self.path.display(),
                        &cap[0]
                    );
                }
                binding
            })
            .collect()
    }
}

fn is_python(path: &Path, contents: &str) -> bool {
    if path.extension().is_some_and(|e| e == "py") {
        return true;
    }
    contents
        .lines()
        .next()
        .is_some_and(|first| first.starts_with("#!") && first.contains("python"))
}

fn root_module(module: &str) -> String {
    let module = module.trim();
    let module = module.split_whitespace().next().unwrap_or(module);
    module.split('.').next().unwrap_or(module).to_string()
}

fn strip_python_comments(contents: &str) -> String {
    contents
        .lines()
        .map(|line| match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, contents: &str) -> Source {
        Source::from_contents(Path::new(name), contents)
    }

    #[test]
    fn test_python_imports() {
        let src = source(
            "scripts/talker.py",
            "#!/usr/bin/env python\n\
             import rospy\n\
             import os, sys\n\
             from std_msgs.msg import String\n\
             from geometry_msgs.msg import (Pose,\n    Twist)\n\
             # import commented_out\n\
             x = 1  # from nowhere import thing\n",
        );

        assert!(src.is_python());
        assert_eq!(
            src.dependencies(None).into_sorted_vec(),
            vec!["geometry_msgs", "os", "rospy", "std_msgs", "sys"]
        );
    }

    #[test]
    fn test_python_imports_filtered_by_index() {
        let src = source("node.py", "import rospy\nimport os\nimport numpy as np\n");
        let index: PackageIndex = ["rospy"].into_iter().collect();

        assert_eq!(src.dependencies(Some(&index)).into_sorted_vec(), vec!["rospy"]);
    }

    #[test]
    fn test_python_aliased_imports() {
        let src = source(
            "node.py",
            "import numpy as np, rospy\nimport tf2_ros as tf, os.path as osp, yaml\n",
        );

        assert_eq!(
            src.dependencies(None).into_sorted_vec(),
            vec!["numpy", "os", "rospy", "tf2_ros", "yaml"]
        );
    }

    #[test]
    fn test_shebang_script_is_python() {
        let src = source("scripts/run", "#!/usr/bin/python3\nimport rospy\n");
        assert!(src.is_python());
        assert!(!source("src/node.cpp", "int main() {}").is_python());
    }

    #[test]
    fn test_cpp_includes() {
        let src = source(
            "src/node.cpp",
            "#include <ros/ros.h>\n\
             #include \"sensor_msgs/Image.h\"\n\
             #include <vector>\n\
             #  include <tf2_ros/buffer.h>\n",
        );

        assert_eq!(
            src.dependencies(None).into_sorted_vec(),
            vec!["ros", "sensor_msgs", "tf2_ros"]
        );
    }

    #[test]
    fn test_plugin_exports() {
        let src = source(
            "src/plugin.cpp",
            "#include <pluginlib/class_list_macros.h>\n\
             PLUGINLIB_EXPORT_CLASS(foo::FooNode, bar::Controller)\n\
             PLUGINLIB_EXPORT_CLASS( foo::detail::Other ,nodelet::Nodelet );\n\
             PLUGINLIB_DECLARE_CLASS(foo, Legacy, foo::Legacy, bar::Controller)\n",
        );

        let plugins = src.plugins();
        assert_eq!(plugins.len(), 3);
        assert_eq!(plugins[0], PluginBinding::new("foo", "FooNode", "bar", "Controller"));
        assert_eq!(plugins[1].implementation(), "foo::detail::Other");
        assert_eq!(plugins[1].interface(), "nodelet::Nodelet");
        assert_eq!(plugins[2].symbol, "Legacy");
    }

    #[test]
    fn test_unqualified_plugin_export_is_skipped() {
        let src = source("src/plugin.cpp", "PLUGINLIB_EXPORT_CLASS(FooNode, Controller)\n");
        assert!(src.plugins().is_empty());
    }

    #[test]
    fn test_empty_source() {
        let src = source("src/empty.h", "");
        assert!(src.dependencies(None).is_empty());
        assert!(src.plugins().is_empty());
    }
}
