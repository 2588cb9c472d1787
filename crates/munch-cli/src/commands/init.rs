use anyhow::{Context, Result};
use munch_store::Repository;
use std::env;

pub fn run() -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    Repository::init(&cwd).context("failed to initialize repository")?;
    println!("Initialized empty munch repository in {}", cwd.join(".munch").display());
    Ok(())
}
