use anyhow::{Context, Result};
use clap::Parser;
use reqs_to_env::cli::RootArgs;
use reqs_to_env::git::GitCli;
use reqs_to_env::logging::init_tracing;
use reqs_to_env::workflow::{self, Emit, Outcome, RunOptions};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let cwd = std::env::current_dir().context("resolve current directory")?;
    let git = GitCli::discover()?;
    let options = RunOptions {
        emit: if args.stdout { Emit::Stdout } else { Emit::File },
        ..RunOptions::default()
    };

    match workflow::run(&git, &cwd, &options)? {
        Outcome::SkippedMainBranch { branch } => {
            println!("Not generating environment.yml on the {branch} branch.");
        }
        Outcome::Written { path, requirements } => {
            println!(
                "Wrote {} ({requirements} pip requirements)",
                path.display()
            );
        }
        Outcome::Rendered { yaml, .. } => {
            print!("{yaml}");
        }
    }
    Ok(())
}
