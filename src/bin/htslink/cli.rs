//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use htslink::ProvisioningMode;

/// htslink - build-configuration resolver for htslib binding builds
#[derive(Parser)]
#[command(name = "htslink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the build configuration and write the artifacts
    Resolve(ResolveArgs),

    /// Extract and print the feature flags from a configuration header
    Flags(FlagsArgs),

    /// Check generator/compiler availability and environment inputs
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Root of the vendored htslib sources
    #[arg(long, default_value = "htslib")]
    pub htslib: PathBuf,

    /// Provisioning mode: external, separate, or shared
    #[arg(long, env = "HTSLIB_MODE")]
    pub mode: Option<ProvisioningMode>,

    /// ABI tag of the consuming runtime
    #[arg(long, default_value = "cp312")]
    pub abi_tag: String,

    /// Directory holding pre-generated binding sources to verify
    #[arg(long)]
    pub bindings: Option<PathBuf>,

    /// Directory for the generated configuration-values file
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Print the build descriptor as JSON
    #[arg(long)]
    pub emit_json: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Path to the generated configuration header
    pub header: PathBuf,
}

#[derive(Args)]
pub struct DoctorArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
