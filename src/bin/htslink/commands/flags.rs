//! `htslink flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use htslink::FeatureFlags;

pub fn execute(args: FlagsArgs) -> Result<()> {
    let flags = FeatureFlags::extract(&args.header)?;

    for (name, value) in flags.iter() {
        println!("{} = {}", name, value);
    }

    Ok(())
}
