//! Command-line surface: a single `serve` subcommand that loads the static
//! schema store and starts the HTTP service.
//!
//! Grounded on the teacher's `cli/src/main.rs` `Cli`/`Commands` derive, and
//! on `cmd/pass-schema-service/serve.go` for flag names, environment
//! variables, and defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "schemas")]
#[command(about = "Assemble, dereference, sort, and merge PASS metadata schemas")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (sets log level to debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load schema files/directories and serve the assembly HTTP endpoint.
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Public base URI resources are addressed by.
    #[arg(short = 'e', long, env = "PASS_EXTERNAL_FEDORA_BASEURL", default_value = "")]
    pub external: String,

    /// Internal base URI used to actually reach the repository.
    #[arg(short = 'i', long, env = "PASS_FEDORA_BASEURL", default_value = "")]
    pub internal: String,

    /// Basic auth username for the internal repository, if required.
    #[arg(short = 'u', long, env = "PASS_FEDORA_USER", default_value = "")]
    pub username: String,

    /// Basic auth password for the internal repository, if required.
    #[arg(short = 'p', long, env = "PASS_FEDORA_PASSWORD", default_value = "")]
    pub password: String,

    /// Port to listen on.
    #[arg(long, env = "SCHEMA_SERVICE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Schema files or directories to load into the static store.
    pub paths: Vec<PathBuf>,
}
