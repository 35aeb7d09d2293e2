//! This is a load-generation binary which can run simulated user
//! [`Workload`]s against a ChecklistBank-style dataset service.
//!
//! Workloads are declared in a YAML configuration file: a *browsing*
//! profile issuing a weighted mix of dataset, taxon and image lookups, and
//! a *matching* profile issuing back-to-back scientific-name queries
//! against the names index.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::path::PathBuf;

use anyhow::Context;
use argh::FromArgs;

use loadtest::Workload;
use loadtest::http::HttpRemote;

use crate::config::Config;

mod config;

/// Load generator for a ChecklistBank-style dataset service
#[derive(Debug, FromArgs)]
pub struct Args {
    /// path to the yaml configuration file
    #[argh(option, short = 'c')]
    pub config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let config_file = std::fs::File::open(args.config).context("failed to open config file")?;
    let config: Config =
        serde_yaml::from_reader(config_file).context("failed to parse config YAML")?;

    let remote = HttpRemote::new(config.remote);
    let workloads = config
        .workloads
        .into_iter()
        .map(|w| {
            let mut builder = Workload::builder(w.name, w.profile.into());
            if let Some(concurrency) = w.concurrency {
                builder = builder.concurrency(concurrency);
            }
            if let Some(seed) = w.seed {
                builder = builder.seed(seed);
            }
            builder.build()
        })
        .collect();

    loadtest::run(remote, workloads, config.duration).await?;

    Ok(())
}
