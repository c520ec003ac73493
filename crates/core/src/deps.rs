//! Detection of the external tools a run needs.

use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;
use crate::request::TargetFormat;

/// An external program driven by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Flac,
    Lame,
    Sox,
    Ctorrent,
}

impl Tool {
    /// Every tool, in report order.
    pub const ALL: [Tool; 4] = [Tool::Flac, Tool::Lame, Tool::Sox, Tool::Ctorrent];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Lame => "lame",
            Self::Sox => "sox",
            Self::Ctorrent => "ctorrent",
        }
    }

    /// The configured path or command name of this tool.
    pub fn configured_path<'a>(&self, config: &'a Config) -> &'a Path {
        match self {
            Self::Flac => &config.encoder.flac_path,
            Self::Lame => &config.encoder.lame_path,
            Self::Sox => &config.encoder.sox_path,
            Self::Ctorrent => &config.packager.ctorrent_path,
        }
    }

    /// The tools needed to produce `formats`, plus ctorrent when packaging.
    pub fn required_for(formats: &[TargetFormat], packaging: bool) -> Vec<Tool> {
        let mut tools = Vec::new();
        if formats.iter().any(TargetFormat::is_mp3) {
            tools.extend([Tool::Flac, Tool::Lame]);
        }
        if formats
            .iter()
            .any(|f| matches!(f, TargetFormat::FlacResample { .. }))
        {
            tools.push(Tool::Sox);
        }
        if packaging {
            tools.push(Tool::Ctorrent);
        }
        tools
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Availability of one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub tool: Tool,
    /// What was looked up, as configured.
    pub configured: PathBuf,
    /// Where the executable was found.
    pub resolved: Option<PathBuf>,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.resolved.is_some()
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolved {
            Some(path) => write!(f, "{}: found at {}", self.tool, path.display()),
            None => write!(
                f,
                "{}: NOT FOUND ({})",
                self.tool,
                self.configured.display()
            ),
        }
    }
}

/// Result of a dependency check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub tools: Vec<ToolStatus>,
}

impl DependencyReport {
    pub fn all_available(&self) -> bool {
        self.tools.iter().all(ToolStatus::is_available)
    }

    /// The tools that could not be found.
    pub fn missing(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .filter(|status| !status.is_available())
            .map(|status| status.tool)
            .collect()
    }
}

/// Looks up `tools` on the current `PATH`.
pub fn check_dependencies(config: &Config, tools: &[Tool]) -> DependencyReport {
    let search_path = std::env::var_os("PATH");
    check_dependencies_in(config, tools, search_path.as_deref())
}

/// Looks up `tools` using an explicit search path.
pub fn check_dependencies_in(
    config: &Config,
    tools: &[Tool],
    search_path: Option<&OsStr>,
) -> DependencyReport {
    let tools = tools
        .iter()
        .map(|&tool| {
            let configured = tool.configured_path(config).to_path_buf();
            let resolved = resolve_executable(&configured, search_path);
            ToolStatus {
                tool,
                configured,
                resolved,
            }
        })
        .collect();
    DependencyReport { tools }
}

/// Resolves a program the way a shell would.
///
/// Paths with a separator are checked as given, bare names are searched in
/// every directory of `search_path`.
pub fn resolve_executable(program: &Path, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_default();
    match which::which_in(program, search_path, cwd) {
        Ok(path) => {
            debug!("{} resolved to {}", program.display(), path.display());
            Some(path)
        }
        Err(e) => {
            debug!("{} not found: {}", program.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_required_for() {
        assert_eq!(
            Tool::required_for(&[TargetFormat::Vbr0, TargetFormat::Cbr320], false),
            [Tool::Flac, Tool::Lame]
        );
        assert_eq!(
            Tool::required_for(
                &[TargetFormat::FlacResample {
                    sample_rate: 48_000
                }],
                true
            ),
            [Tool::Sox, Tool::Ctorrent]
        );
        assert!(Tool::required_for(&[], false).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_check_dependencies_on_search_path() {
        let bin = TempDir::new().unwrap();
        fixtures::write_script(bin.path(), "flac", "exit 0");
        fixtures::write_script(bin.path(), "lame", "exit 0");
        // Present but not executable
        std::fs::write(bin.path().join("sox"), "#!/bin/sh\n").unwrap();

        let search_path = std::env::join_paths([bin.path()]).unwrap();
        let report =
            check_dependencies_in(&Config::default(), &Tool::ALL, Some(search_path.as_os_str()));

        assert!(!report.all_available());
        assert_eq!(report.missing(), [Tool::Sox, Tool::Ctorrent]);
        assert_eq!(report.tools[0].resolved, Some(bin.path().join("flac")));
        assert_eq!(
            report.tools[3].to_string(),
            "ctorrent: NOT FOUND (ctorrent)"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_absolute_path() {
        let bin = TempDir::new().unwrap();
        let ctorrent = fixtures::write_script(bin.path(), "ctorrent-1.3", "exit 0");

        let mut config = Config::default();
        config.packager.ctorrent_path = ctorrent.clone();

        let report = check_dependencies_in(&config, &[Tool::Ctorrent], None);
        assert!(report.all_available());
        assert_eq!(report.tools[0].resolved, Some(ctorrent));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_match_on_search_path_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fixtures::write_script(second.path(), "lame", "exit 0");
        let expected = fixtures::write_script(first.path(), "lame", "exit 0");
        // Not executable, skipped in favour of the next directory
        std::fs::write(first.path().join("sox"), "#!/bin/sh\n").unwrap();
        let sox = fixtures::write_script(second.path(), "sox", "exit 0");

        let search_path = std::env::join_paths([first.path(), second.path()]).unwrap();
        let search_path = Some(search_path.as_os_str());

        assert_eq!(resolve_executable(Path::new("lame"), search_path), Some(expected));
        assert_eq!(resolve_executable(Path::new("sox"), search_path), Some(sox));
    }

    #[test]
    fn test_bare_name_without_search_path() {
        assert_eq!(resolve_executable(Path::new("flac"), None), None);
    }
}
