// Environment handed to the target process.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::{env, fmt};

use crate::config::ScudaConfig;
use crate::ld_preload;

pub const SCUDA_SERVER: &str = "SCUDA_SERVER";

pub type Environment = BTreeMap<OsString, OsString>;

pub fn inherited() -> Environment {
    env::vars_os().collect()
}

// Why the shim is not injected.
#[derive(Debug, PartialEq, Clone)]
pub enum Bypass {
    Disabled,
    MissingFields,
    LibraryNotFound(PathBuf),
}

impl fmt::Display for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bypass::Disabled => {
                write!(f, "'enabled' is false, starting ComfyUI without SCUDA.")
            }
            Bypass::MissingFields => write!(
                f,
                "'server' or 'lib_path' missing in config, starting without SCUDA."
            ),
            Bypass::LibraryNotFound(path) => write!(
                f,
                "libscuda not found at {}, starting without SCUDA.",
                path.display()
            ),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Outcome {
    Injected,
    Bypassed(Bypass),
}

#[derive(Debug)]
pub struct Derived {
    pub env: Environment,
    pub outcome: Outcome,
}

impl Derived {
    fn bypassed(env: Environment, reason: Bypass) -> Self {
        Self {
            env,
            outcome: Outcome::Bypassed(reason),
        }
    }
}

// Apply CONFIG on top of the INHERITED environment.  Variables are only added
// or replaced, LD_PRELOAD keeps any prior value after the SCUDA library.
pub fn derive_environment(config: &ScudaConfig, inherited: Environment) -> Derived {
    if !config.enabled {
        return Derived::bypassed(inherited, Bypass::Disabled);
    }

    let (server, lib_path) = match (&config.server, &config.lib_path) {
        (Some(server), Some(lib_path))
            if !server.is_empty() && !lib_path.as_os_str().is_empty() =>
        {
            (server, lib_path)
        }
        _ => return Derived::bypassed(inherited, Bypass::MissingFields),
    };

    if !lib_path.exists() {
        return Derived::bypassed(inherited, Bypass::LibraryNotFound(lib_path.clone()));
    }

    let mut env = inherited;
    env.insert(SCUDA_SERVER.into(), server.into());

    let preload = ld_preload::prepend(
        lib_path,
        env.get(&OsString::from(ld_preload::LD_PRELOAD))
            .map(OsString::as_os_str),
    );
    env.insert(ld_preload::LD_PRELOAD.into(), preload);

    for (key, value) in &config.extra_env {
        env.insert(key.into(), value.into());
    }

    Derived {
        env,
        outcome: Outcome::Injected,
    }
}
