//! Command-line interface parsing for distmatrix
//!
//! Option values are parsed straight into the request option enums, so an
//! unknown mode or unit is rejected by clap before any client is built.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::data::{
    Avoid, DepartureTime, Language, RequestOptions, TrafficModel, TravelMode, Units,
};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// An address argument was blank
    #[error("Empty {0} address; every --{0} needs a value")]
    EmptyAddress(&'static str),
}

/// distmatrix - travel distances and times from the Google Distance Matrix API
#[derive(Parser, Debug)]
#[command(name = "distmatrix")]
#[command(about = "Travel distance and time between addresses via the Google Distance Matrix API")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate distances between every origin and destination
    ///
    /// Example:
    ///   distmatrix calculate -o "Vancouver, BC" -o "Burnaby, BC" -d "Seattle, WA" --mode driving
    #[command(visible_alias = "calc")]
    Calculate(CalculateArgs),

    /// Delete cached responses
    ClearCache {
        /// Delete only this cache key instead of every cached response
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    /// Origin address (repeat for several)
    #[arg(short = 'o', long = "origin", value_name = "ADDRESS", required = true)]
    pub origins: Vec<String>,

    /// Destination address (repeat for several)
    #[arg(short = 'd', long = "destination", value_name = "ADDRESS", required = true)]
    pub destinations: Vec<String>,

    /// driving, walking, bicycling or transit
    #[arg(long)]
    pub mode: Option<TravelMode>,

    /// metric or imperial
    #[arg(long)]
    pub units: Option<Units>,

    /// Locale code for the returned text, e.g. en or fr-CA
    #[arg(long)]
    pub language: Option<Language>,

    /// tolls, highways or ferries
    #[arg(long)]
    pub avoid: Option<Avoid>,

    /// best_guess, pessimistic or optimistic
    #[arg(long)]
    pub traffic_model: Option<TrafficModel>,

    /// "now" or a unix timestamp
    #[arg(long)]
    pub departure_time: Option<DepartureTime>,

    /// Skip the response cache for this call
    #[arg(long)]
    pub no_cache: bool,

    /// Print the raw JSON payload instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CalculateArgs {
    /// Per-call options taken from the flags that were given
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            mode: self.mode,
            units: self.units,
            language: self.language.clone(),
            avoid: self.avoid,
            traffic_model: self.traffic_model,
            departure_time: self.departure_time,
        }
    }

    /// Trimmed origins and destinations, rejecting blank entries
    pub fn addresses(&self) -> Result<(Vec<String>, Vec<String>), CliError> {
        Ok((
            clean_addresses(&self.origins, "origin")?,
            clean_addresses(&self.destinations, "destination")?,
        ))
    }
}

fn clean_addresses(addresses: &[String], kind: &'static str) -> Result<Vec<String>, CliError> {
    addresses
        .iter()
        .map(|address| {
            let address = address.trim();
            if address.is_empty() {
                Err(CliError::EmptyAddress(kind))
            } else {
                Ok(address.to_string())
            }
        })
        .collect()
}
