use std::fs;

use anyhow::{Context, Result};
use seedgc_garble::GarblingConfig;

use crate::cli::AlgorithmArgs;

/// Loads the config file, if any, and applies flag overrides on top.
pub(crate) fn load(args: &AlgorithmArgs) -> Result<GarblingConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str::<GarblingConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GarblingConfig::default(),
    };

    if let Some(prg) = args.prg {
        config.prg = prg;
    }
    if let Some(prf) = args.prf {
        config.prf = prf;
    }
    if let Some(hash) = args.hash {
        config.hash = hash;
    }
    Ok(config)
}
