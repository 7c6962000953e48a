//! Progress command: print the local learning state.

use anyhow::Result;

use crate::config::Paths;
use crate::state;

pub fn run(paths: &Paths) -> Result<()> {
    let state = state::load(&paths.state);
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
