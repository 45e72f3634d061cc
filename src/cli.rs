//! CLI argument parsing for environment generation.
//!
//! The zero-argument form is the normal invocation; flags only adjust logging
//! and where the rendered document goes.
use clap::Parser;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "reqs2env",
    version,
    about = "Convert requirements.txt into a conda environment.yml at the repository root",
    after_help = "The command does nothing on the `main` branch.\n\nExamples:\n  reqs2env\n  reqs2env --stdout\n  RUST_LOG=reqs_to_env=trace reqs2env"
)]
pub struct RootArgs {
    /// Print the rendered environment.yml instead of writing it
    #[arg(long)]
    pub stdout: bool,

    /// Emit debug logging (git invocations, resolved paths)
    #[arg(short, long)]
    pub verbose: bool,
}
