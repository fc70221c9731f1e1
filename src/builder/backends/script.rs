//! Interpreter-backed runners.

use std::path::Path;

use crate::builder::backend::{BackendError, Runner};
use crate::core::descriptor::BackendDescriptor;
use crate::util::process::{locate_tool, ToolCommand};

use super::{require_tool, run_interactive};

/// A runner that hands sources to an interpreter.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    name: &'static str,
    interpreters: &'static [&'static str],
    extensions: &'static [&'static str],
    categories: &'static [&'static str],
    /// Arguments placed before the source to start the interpreter's debugger
    debug_args: Option<&'static [&'static str]>,
}

impl ScriptRunner {
    pub fn python() -> Self {
        ScriptRunner {
            name: "python",
            interpreters: &["python3", "python"],
            extensions: &[".py"],
            categories: &["runtime", "pure"],
            debug_args: Some(&["-m", "pdb"]),
        }
    }

    pub fn lua() -> Self {
        ScriptRunner {
            name: "lua",
            interpreters: &["lua", "luajit"],
            extensions: &[".lua"],
            categories: &["runtime"],
            debug_args: None,
        }
    }

    pub fn node() -> Self {
        ScriptRunner {
            name: "node",
            interpreters: &["node"],
            extensions: &[".js", ".mjs"],
            categories: &["runtime", "npm"],
            debug_args: Some(&["inspect"]),
        }
    }

    fn interpreter(&self) -> Result<std::path::PathBuf, BackendError> {
        require_tool(locate_tool(None, self.interpreters), self.interpreters[0])
    }
}

impl Runner for ScriptRunner {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor::new(self.name)
            .with_extensions(self.extensions.iter().copied())
            .with_categories(self.categories.iter().copied())
    }

    fn run(
        &self,
        project: &Path,
        source: &Path,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        let cmd = ToolCommand::new(self.interpreter()?)
            .arg(source)
            .args(args)
            .current_dir(project)
            .input(stdin);
        run_interactive(&cmd)
    }

    fn debug(
        &self,
        project: &Path,
        source: &Path,
        stdin: Option<&[u8]>,
    ) -> Result<bool, BackendError> {
        let Some(debug_args) = self.debug_args else {
            return Err(BackendError::Unsupported {
                backend: self.name.to_string(),
                operation: "debugging".to_string(),
            });
        };

        let cmd = ToolCommand::new(self.interpreter()?)
            .args(debug_args)
            .arg(source)
            .current_dir(project)
            .input(stdin);
        run_interactive(&cmd)
    }
}
