use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use astgen_compiler::{compile_ast, compile_visitor, parse_schema, verifier::verify_schema};
use astgen_compiler::{GenError, GenOptions, Schema};
use astgen_schema::js_ast;

#[derive(Parser)]
#[command(name = "astgen")]
#[command(about = "Generate AST node definitions and a default visitor from a node schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SchemaArgs {
    /// Raw declaration list as JSON (defaults to the built-in JavaScript AST schema)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// JSON file overriding generation options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Source lifetime name, without the quote (overrides the options file)
    #[arg(long)]
    lifetime: Option<String>,

    /// Path `Span` is imported from (overrides the options file)
    #[arg(long)]
    span_import: Option<String>,

    /// Module the visitor glob-imports the nodes from (overrides the options file)
    #[arg(long)]
    ast_module: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the node definitions (`ast.rs`)
    Ast {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the `Visitor` trait and walk functions (`visitor.rs`)
    Visitor {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output `.rs` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify the schema without generating anything
    Check {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Print the parsed schema model as JSON
        #[arg(long)]
        dump: bool,
    },
}

fn load(args: &SchemaArgs) -> Result<(Schema, GenOptions), GenError> {
    let schema = match &args.schema {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let raw: serde_json::Value = serde_json::from_str(&text)?;
            debug!(path = %path.display(), "loaded schema");
            parse_schema(&raw)?
        }
        None => js_ast()?,
    };
    let mut options = match &args.options {
        Some(path) => GenOptions::from_json(&fs::read_to_string(path)?)?,
        None => GenOptions::default(),
    };
    if let Some(lifetime) = &args.lifetime {
        options.lifetime = lifetime.clone();
    }
    if let Some(span_import) = &args.span_import {
        options.span_import = span_import.clone();
    }
    if let Some(ast_module) = &args.ast_module {
        options.ast_module = ast_module.clone();
    }
    Ok((schema, options))
}

fn emit(code: &str, output: &Option<PathBuf>) -> Result<(), GenError> {
    match output {
        Some(out_path) => {
            fs::write(out_path, code)?;
            info!("generated code written to {}", out_path.display());
        }
        None => print!("{}", code),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), GenError> {
    match &cli.command {
        Commands::Ast { schema, output } => {
            let (schema, options) = load(schema)?;
            let code = compile_ast(&schema, &options)?;
            emit(&code, output)
        }

        Commands::Visitor { schema, output } => {
            let (schema, options) = load(schema)?;
            let code = compile_visitor(&schema, &options)?;
            emit(&code, output)
        }

        Commands::Check { schema, dump } => {
            let (schema, options) = load(schema)?;
            verify_schema(&schema, &options)?;
            if *dump {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            info!(
                declarations = schema.declarations.len(),
                nodes = schema.nodes().count(),
                "schema is valid"
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    // stdout carries the generated code, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astgen=info,astgen_compiler=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
