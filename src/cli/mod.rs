// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the catalog-search command-line interface.
//!
//! Three subcommands: `serve` runs the HTTP API, `setup` prepares the index
//! and syncs the catalog once, and `search` runs a single query from the
//! shell, optionally printing how the query text was compiled.

pub mod display;

use catalog_search::Config;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "catalog-search",
    about = "Product catalog search: query compiler and index pipeline",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the search API over HTTP
    ///
    /// Index setup and catalog sync run in the background at startup. If they
    /// fail the server keeps running and searches fail until the backend recovers.
    Serve,

    /// Create the index if missing, sync the catalog into it, and exit
    Setup {
        /// Delete the index first and recreate it from the current schema
        ///
        /// Use after the analyzer or mappings change; an existing index is
        /// otherwise never migrated.
        #[arg(long)]
        recreate: bool,
    },

    /// Run one search and print the result page
    Search {
        /// Free-text query, e.g. "phone under 20000"
        query: String,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(short, long, default_value = "8")]
        limit: usize,

        /// Restrict to one category id
        #[arg(long)]
        catid: Option<i64>,

        /// relevance, price_low or price_high
        #[arg(long, default_value = "relevance")]
        sort: String,

        /// Print the compiled query (normalized text, intents, DSL)
        #[arg(long)]
        explain: bool,

        /// Print the result page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
