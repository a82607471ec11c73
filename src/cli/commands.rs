use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::header::{HeaderName, HeaderValue};
use http::Method;

use crate::config::RouteTable;
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::ids::RequestId;
use crate::middleware::{BoxedMiddleware, TracingMiddleware};

/// Command-line interface for radixmux
///
/// Loads a TOML route table and inspects or exercises the resulting router.
#[derive(Parser, Debug)]
#[command(name = "radixmux")]
#[command(about = "Inspect and exercise radixmux route tables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the routing tree built from a route table
    Dump {
        /// Path to the TOML route table
        #[arg(short, long, env = "RADIXMUX_ROUTES")]
        config: PathBuf,
    },
    /// Show which pattern answers each path
    Resolve {
        /// Path to the TOML route table
        #[arg(short, long, env = "RADIXMUX_ROUTES")]
        config: PathBuf,

        /// Request paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Dispatch synthetic requests and print the responses
    Dispatch {
        /// Path to the TOML route table
        #[arg(short, long, env = "RADIXMUX_ROUTES")]
        config: PathBuf,

        /// HTTP method of the synthetic requests
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Extra request header as `name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Wrap routed handlers with request tracing
        #[arg(long, default_value_t = false)]
        trace: bool,

        /// Request paths to dispatch
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header {raw:?} is not in `name: value` form"))?;
    let name = HeaderName::try_from(name.trim())
        .with_context(|| format!("invalid header name in {raw:?}"))?;
    let value = HeaderValue::try_from(value.trim())
        .with_context(|| format!("invalid header value in {raw:?}"))?;
    Ok((name, value))
}

/// Execute a parsed command, writing results to `out`
pub fn run_cli(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Dump { config } => {
            let router = RouteTable::load(&config)?.build_router(Vec::new())?;
            writeln!(out, "{} route(s)", router.len())?;
            write!(out, "{}", router.dump())?;
        }
        Commands::Resolve { config, paths } => {
            let router = RouteTable::load(&config)?.build_router(Vec::new())?;
            for path in &paths {
                match router.route(path) {
                    Some(m) => writeln!(out, "{path} -> {}", m.pattern)?,
                    None => writeln!(out, "{path} -> <not found>")?,
                }
            }
        }
        Commands::Dispatch {
            config,
            method,
            headers,
            trace,
            paths,
        } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("invalid method {method:?}"))?;
            let headers = headers
                .iter()
                .map(|h| parse_header(h))
                .collect::<Result<Vec<_>>>()?;

            let middleware: Vec<BoxedMiddleware> = if trace {
                vec![std::sync::Arc::new(TracingMiddleware)]
            } else {
                Vec::new()
            };
            let router = RouteTable::load(&config)?.build_router(middleware)?;

            for path in &paths {
                let mut req = HandlerRequest::new(method.clone(), path.as_str());
                for (name, value) in &headers {
                    req.headers.append(name.clone(), value.clone());
                }
                req.request_id = RequestId::from_header_or_new(req.header("x-request-id"));

                let mut res = HandlerResponse::new();
                router.dispatch(&mut req, &mut res);
                writeln!(out, "{path} -> {} {}", res.status.as_u16(), res.body_text())?;
            }
        }
    }
    Ok(())
}
