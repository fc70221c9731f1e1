//! External tool invocation.
//!
//! Backends describe a tool call as a [`ToolCommand`]. The same value is
//! used to spawn the process and to render the command line shown in
//! `--verbose` output and failure messages, so the two never drift apart.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};

/// One invocation of an external tool.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    dir: Option<PathBuf>,
    input: Option<Vec<u8>>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            input: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run the tool from `dir`. Backends pass the project root so that
    /// project-relative source and artifact paths resolve.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Bytes written to the tool's stdin. `None` leaves stdin untouched.
    pub fn input(mut self, data: Option<&[u8]>) -> Self {
        self.input = data.map(<[u8]>::to_vec);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Shell-like rendering; arguments containing whitespace are quoted.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| {
                let part = part.to_string_lossy();
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("\"{}\"", part)
                } else {
                    part.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion with stdout and stderr captured.
    pub fn output(&self) -> io::Result<Output> {
        self.spawn(true)?.wait_with_output()
    }

    /// Run attached to the terminal.
    pub fn status(&self) -> io::Result<ExitStatus> {
        self.spawn(false)?.wait()
    }

    fn spawn(&self, capture: bool) -> io::Result<Child> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.dir {
            cmd.current_dir(dir);
        }
        if self.input.is_some() {
            cmd.stdin(Stdio::piped());
        }
        if capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let mut child = cmd.spawn()?;
        if let (Some(data), Some(mut stdin)) = (self.input.as_ref(), child.stdin.take()) {
            // The pipe closes when `stdin` drops, so the tool sees EOF.
            stdin.write_all(data)?;
        }
        Ok(child)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Locate a tool. A program named by `env_override` wins when it resolves;
/// otherwise the first of `candidates` found on PATH.
pub fn locate_tool(env_override: Option<&str>, candidates: &[&str]) -> Option<PathBuf> {
    env_override
        .and_then(|var| std::env::var_os(var))
        .and_then(|program| which::which(program).ok())
        .or_else(|| candidates.iter().find_map(|name| which::which(name).ok()))
}

/// gdb, falling back to lldb.
pub fn locate_debugger() -> Option<PathBuf> {
    locate_tool(None, &["gdb", "lldb"])
}
