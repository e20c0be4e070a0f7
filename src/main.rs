use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::{env, process};

mod config;
mod elf;
mod environment;
mod error;
mod launch;
mod ld_preload;
mod printer;
mod pystr;

use environment::{Derived, Environment, Outcome};
use error::LaunchError;
use launch::Launch;
use printer::Printer;

// Advisory checks on an injected library, none of them stop the launch.
fn check_injection(printer: &Printer, lib_path: &Path, prior: Option<&OsStr>) {
    if let Some(prior) = prior {
        if ld_preload::contains(prior, lib_path) {
            printer.warning(format!(
                "{} is already in LD_PRELOAD, it will be listed twice.",
                lib_path.display()
            ));
        }
    }

    if let Some(problem) = elf::check_library(&lib_path) {
        printer.warning(format!("{}, SCUDA may not be loaded.", problem));
    }
}

fn print_outcome(printer: &Printer, derived: &Derived) {
    match &derived.outcome {
        Outcome::Bypassed(reason) => printer.info(reason.to_string()),
        Outcome::Injected => {
            printer.info("Launching ComfyUI with SCUDA:");
            for name in [environment::SCUDA_SERVER, ld_preload::LD_PRELOAD] {
                if let Some(value) = derived.env.get(OsStr::new(name)) {
                    printer.detail(name, value.to_string_lossy());
                }
            }
        }
    }
}

// Everything before the hand over: configuration, environment and target
// lookup under ROOT.  The interpreter is taken from the INHERITED environment
// only, extra_env can not change what gets executed.
fn prepare(
    printer: &Printer,
    root: &Path,
    inherited: Environment,
    args: Vec<OsString>,
) -> Result<(Launch, Environment), LaunchError> {
    let config = config::load_config(&root.join(config::CONFIG_FILE), printer);

    let interpreter = launch::interpreter(&inherited);
    let prior_preload = inherited.get(OsStr::new(ld_preload::LD_PRELOAD)).cloned();
    let derived = environment::derive_environment(&config, inherited);
    print_outcome(printer, &derived);

    if derived.outcome == Outcome::Injected {
        if let Some(lib_path) = &config.lib_path {
            check_injection(printer, lib_path, prior_preload.as_deref());
        }
    }

    let target = launch::locate_target(root)?;
    Ok((Launch::new(interpreter, target, args), derived.env))
}

fn run(printer: &Printer) -> Result<i32, LaunchError> {
    let root = launch::launch_root()?;
    let args: Vec<OsString> = env::args_os().skip(1).collect();
    let (launch, env) = prepare(printer, &root, environment::inherited(), args)?;
    launch.exec(&env)
}

fn main() {
    let printer = printer::create();

    match run(&printer) {
        Ok(code) => process::exit(code),
        Err(err) => {
            printer.error(err.to_string());
            process::exit(1);
        }
    }
}
