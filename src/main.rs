//! unify-config: merge layered YAML run configurations into one file

use anyhow::Result;

fn main() -> Result<()> {
    unify_config::cli::run()
}
