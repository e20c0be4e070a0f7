// Hand over to the target: `<python> <root>/main.py <args...>`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::{env, fs};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

use crate::environment::Environment;
use crate::error::LaunchError;

pub const TARGET_SCRIPT: &str = "main.py";

// Overrides the interpreter used to run the target script.
pub const PYTHON_VAR: &str = "SCUDA_LAUNCH_PYTHON";
const DEFAULT_PYTHON: &str = "python3";

// The directory holding the launcher executable, which is also where the
// configuration file and the target script live.
pub fn launch_root() -> Result<PathBuf, LaunchError> {
    let exe = env::current_exe().map_err(LaunchError::CurrentExe)?;
    let exe = fs::canonicalize(&exe).map_err(LaunchError::CurrentExe)?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/")))
}

pub fn interpreter(env: &Environment) -> PathBuf {
    match env.get(OsStr::new(PYTHON_VAR)) {
        Some(python) if !python.is_empty() => PathBuf::from(python),
        _ => PathBuf::from(DEFAULT_PYTHON),
    }
}

pub fn locate_target(root: &Path) -> Result<PathBuf, LaunchError> {
    let target = root.join(TARGET_SCRIPT);
    if !target.exists() {
        return Err(LaunchError::TargetMissing(target));
    }
    Ok(target)
}

#[derive(Debug)]
pub struct Launch {
    pub interpreter: PathBuf,
    pub target: PathBuf,
    pub args: Vec<OsString>,
}

impl Launch {
    pub fn new(interpreter: PathBuf, target: PathBuf, args: Vec<OsString>) -> Self {
        Self {
            interpreter,
            target,
            args,
        }
    }

    // The child sees exactly ENV, nothing else is inherited.
    pub fn command(&self, env: &Environment) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&self.target).args(&self.args).env_clear().envs(env);
        cmd
    }

    // Replaces the current process image, so it only returns on failure.
    #[cfg(unix)]
    pub fn exec(&self, env: &Environment) -> Result<i32, LaunchError> {
        let source = self.command(env).exec();
        Err(LaunchError::Exec {
            program: self.interpreter.clone(),
            source,
        })
    }

    // No exec on this platform: run the target and report its exit status.
    #[cfg(not(unix))]
    pub fn exec(&self, env: &Environment) -> Result<i32, LaunchError> {
        match self.command(env).status() {
            Ok(status) => Ok(status.code().unwrap_or(1)),
            Err(source) => Err(LaunchError::Exec {
                program: self.interpreter.clone(),
                source,
            }),
        }
    }
}
