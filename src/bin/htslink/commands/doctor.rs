//! `htslink doctor` command
//!
//! Reports the inputs the resolver would see: generator and compiler
//! availability, and the environment variables that steer provisioning.

use anyhow::Result;

use crate::cli::DoctorArgs;
use htslink::resolver::{CONFIGURE_OPTIONS_VAR, INCLUDE_DIR_VAR, LIBRARY_DIR_VAR};
use htslink::util::env::{EnvSource, SystemEnv};
use htslink::util::process::find_c_compiler;
use htslink::GeneratorProbe;

pub fn execute(_args: DoctorArgs) -> Result<()> {
    match GeneratorProbe::detect() {
        GeneratorProbe::Available(path) => {
            println!("generator: {} (generated binding sources)", path.display())
        }
        GeneratorProbe::Unavailable => {
            println!("generator: not found (pre-generated binding sources)")
        }
    }

    match find_c_compiler() {
        Some(path) => println!("c compiler: {}", path.display()),
        None => println!("c compiler: not found"),
    }

    let env = SystemEnv;
    for var in [LIBRARY_DIR_VAR, INCLUDE_DIR_VAR, CONFIGURE_OPTIONS_VAR] {
        match env.var(var) {
            Some(value) => println!("{} = {}", var, value),
            None => println!("{} is unset", var),
        }
    }

    Ok(())
}
