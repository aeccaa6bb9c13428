// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! fixscale CLI
//!
//! Inspects fixed-point encodings from the command line.
//!
//! # Usage
//! ```text
//! fixscale [--profile NAME] [--config-dir DIR] encode <VALUE> [options]
//! fixscale context
//! fixscale profile save <NAME> --family decimal --precision 6
//! fixscale profile show <NAME>
//! ```
//!
//! Exits with code `0` on success and non-zero on error.

#![deny(rust_2018_idioms)]
// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod report;

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use fixscale::config::{ConfigService, ContextProfile, ContextSettings};
use fixscale::{
    current_context, Family, FixedPoint, Format, Numeric, Overflow, Params, MAX_LITERAL_SCALE,
};
use fixscale_config_fs::FsConfigStore;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::report::{context_table, ContextReport, EncodeReport};

/// Widest word the CLI will build.
const MAX_WORDLENGTH: i64 = 65_536;

#[derive(Parser, Debug)]
#[command(name = "fixscale", author, version, about, long_about = None)]
struct Args {
    /// Context profile to apply before running the command
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Directory holding profiles (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a value and show its stored representation
    Encode {
        /// Integer or decimal literal, e.g. -2, 5.125, 1e-3
        #[arg(allow_negative_numbers = true)]
        value: String,
        /// Scaling family
        #[arg(long, default_value = "decimal")]
        family: Family,
        /// Use an unsigned word
        #[arg(long)]
        unsigned: bool,
        /// Wordlength in bits (defaults to the context)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_WORDLENGTH))]
        wordlength: Option<u32>,
        /// Fractional digits (defaults to the context)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_LITERAL_SCALE)))]
        precision: Option<u32>,
        /// Overflow policy (defaults to the context)
        #[arg(long)]
        overflow: Option<Overflow>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the contexts construction would use
    Context {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Manage stored context profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Create or update one family's overrides in a profile
    Save {
        /// Profile name
        name: String,
        /// Family whose overrides are updated
        #[arg(long)]
        family: Family,
        /// Wordlength override
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_WORDLENGTH))]
        wordlength: Option<u32>,
        /// Precision override
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_LITERAL_SCALE)))]
        precision: Option<u32>,
        /// Overflow policy override
        #[arg(long)]
        overflow: Option<Overflow>,
    },
    /// Print a stored profile as JSON
    Show {
        /// Profile name
        name: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(name) = &args.profile {
        let profile = config_service(args.config_dir.as_ref())?
            .load_profile(name)
            .with_context(|| format!("failed to load profile '{name}'"))?;
        let Some(profile) = profile else {
            bail!("profile '{name}' not found");
        };
        profile.apply()?;
        info!(profile = %name, "applied context profile");
    }

    match args.cmd {
        Command::Encode {
            value,
            family,
            unsigned,
            wordlength,
            precision,
            overflow,
            json,
        } => {
            let input: Numeric = value.parse()?;
            let params = Params {
                wordlength,
                precision,
                overflow,
            };
            let x = FixedPoint::with_params(Format::new(family, !unsigned), input, params)
                .with_context(|| format!("cannot encode {value}"))?;
            debug!(value = %x, "encoded");
            let report = EncodeReport::new(&x)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.table());
            }
        }
        Command::Context { json } => {
            let reports: Vec<ContextReport> = Family::ALL
                .iter()
                .map(|family| ContextReport::from(&current_context(*family)))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                println!("{}", context_table(&reports));
            }
        }
        Command::Profile(ProfileCommand::Save {
            name,
            family,
            wordlength,
            precision,
            overflow,
        }) => {
            let service = config_service(args.config_dir.as_ref())?;
            let mut profile = service
                .load_profile(&name)
                .with_context(|| format!("failed to load profile '{name}'"))?
                .unwrap_or_default();
            let update = ContextSettings {
                wordlength,
                precision,
                overflow,
            };
            let merged = profile
                .settings(family)
                .copied()
                .unwrap_or_default()
                .overlay(update);
            match family {
                Family::Binary => profile.binary = Some(merged),
                Family::Decimal => profile.decimal = Some(merged),
            }
            service
                .save_profile(&name, &profile)
                .with_context(|| format!("failed to save profile '{name}'"))?;
            info!(profile = %name, %family, "saved context profile");
        }
        Command::Profile(ProfileCommand::Show { name }) => {
            let profile: Option<ContextProfile> = config_service(args.config_dir.as_ref())?
                .load_profile(&name)
                .with_context(|| format!("failed to load profile '{name}'"))?;
            let Some(profile) = profile else {
                bail!("profile '{name}' not found");
            };
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }

    Ok(())
}

fn config_service(dir: Option<&PathBuf>) -> Result<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("failed to open config store")?;
    Ok(ConfigService::new(store))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
