use anyhow::Result;

use veld_engine::{cli, runtime};

fn main() -> Result<()> {
    env_logger::init();
    let args = cli::parse()?;
    runtime::execute(args)
}
