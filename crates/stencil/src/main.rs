//! Stencil CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(version)]
#[command(about = "Rewrite template expressions against a render context", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite a single expression and print the result
    Rewrite {
        /// Expression text
        expression: String,

        /// Treat NAME as a local binding (repeatable)
        #[arg(short, long = "bind", value_name = "NAME")]
        bind: Vec<String>,

        /// Process the text as a parameter list instead of an expression
        #[arg(long)]
        params: bool,

        /// TOML file with transform options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Leave identifiers unprefixed
        #[arg(long)]
        no_prefix: bool,

        /// Print the expression node as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite every expression in a JSON template tree
    Compile {
        /// Template tree as JSON
        input: PathBuf,

        /// TOML file with transform options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Rewrite {
            expression,
            bind,
            params,
            config,
            no_prefix,
            json,
        } => commands::rewrite::execute(commands::rewrite::RewriteArgs {
            expression,
            bind,
            params,
            config,
            no_prefix,
            json,
        }),
        Commands::Compile { input, config } => {
            commands::compile::execute(commands::compile::CompileArgs { input, config })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rewrite_args() {
        let cli = Cli::try_parse_from([
            "stencil", "rewrite", "a + b", "--bind", "a", "-b", "c", "--json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Rewrite {
            expression,
            bind,
            params,
            json,
            ..
        } = cli.command
        else {
            panic!("expected rewrite");
        };
        assert_eq!(expression, "a + b");
        assert_eq!(bind, vec!["a", "c"]);
        assert!(!params);
        assert!(json);
    }

    #[test]
    fn test_parse_compile_args() {
        let cli = Cli::try_parse_from(["stencil", "compile", "tree.json", "--config", "stencil.toml"])
            .unwrap();
        let Commands::Compile { input, config } = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(input, PathBuf::from("tree.json"));
        assert_eq!(config, Some(PathBuf::from("stencil.toml")));
    }
}
