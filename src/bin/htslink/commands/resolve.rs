//! `htslink resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use htslink::resolver::{resolve, ResolveOptions};
use htslink::util::env::SystemEnv;
use htslink::{GeneratorProbe, RuntimeAbi};

pub fn execute(args: ResolveArgs) -> Result<()> {
    let options = ResolveOptions {
        vendored_root: args.htslib,
        requested_mode: args.mode,
        abi: RuntimeAbi::host(args.abi_tag),
        bindings_dir: args.bindings,
        generator: GeneratorProbe::detect(),
    };

    let resolution = resolve(&SystemEnv, &options)?;
    let artifact = resolution.write_artifacts(&args.out)?;

    println!("mode: {}", resolution.mode);
    println!("source pattern: {}", resolution.source_pattern);
    match resolution.chosen_option() {
        Some(option) if option.is_empty() => println!("configure: succeeded (no options)"),
        Some(option) => println!("configure: succeeded with `{}`", option),
        None if resolution.used_fallback() => println!("configure: fallback (no option succeeded)"),
        None => println!("configure: skipped"),
    }
    for (name, value) in resolution.descriptor.features.iter() {
        println!("  {} = {}", name, value);
    }
    println!("wrote {}", artifact.display());

    if args.emit_json {
        println!("{}", resolution.descriptor_json()?);
    }

    Ok(())
}
