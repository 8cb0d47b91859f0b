//! routerunner command line tool.
//!
//! Compiles, inspects and queries route definition files without starting a
//! server:
//!
//! ```text
//! routerunner check
//! routerunner --routes conf/routes.txt match GET /users/42
//! routerunner --config routerunner.toml cache status
//! ```

use std::path::PathBuf;
use std::time::UNIX_EPOCH;
use clap::{Parser, Subcommand};
use serde_json::json;

use routerunner::config::loader::{build_cache, build_loader, load_config};
use routerunner::config::RouterConfig;
use routerunner::observability::logging;
use routerunner::routing::{loader, RouteLoader};
use routerunner::Router;

#[derive(Parser)]
#[command(name = "routerunner")]
#[command(about = "Compile, inspect and query route definition files", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route definition file, overrides `routes.file`
    #[arg(short, long)]
    routes: Option<PathBuf>,

    /// Parse the route file directly, ignoring the cache
    #[arg(long)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the route file and report the first error
    Check,
    /// Print the compiled route table
    Routes,
    /// Show which route a request resolves to
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request URI, e.g. /users/42
        uri: String,
    },
    /// Inspect or clear the route cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report whether the cache holds a current entry
    Status,
    /// Remove the cached entry
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(routes) = &cli.routes {
        config.routes.file = routes.clone();
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }

    logging::init(&config.observability.log_level);

    let routes_file = config.routes.file.clone();

    match cli.command {
        Commands::Check => {
            let routes = loader::parse_file(&routes_file)?;
            println!("{}: {} routes OK", routes_file.display(), routes.len());
        }
        Commands::Routes => {
            let loaded = build_loader(&config.cache).load(&routes_file)?;
            for (index, route) in loaded.routes.iter().enumerate() {
                println!("{:>4}  {}", index + 1, route);
            }
            eprintln!("{} routes ({})", loaded.routes.len(), loaded.origin.as_str());
        }
        Commands::Match { method, uri } => {
            let loader: RouteLoader = build_loader(&config.cache);
            let router = Router::builder()
                .settings(config.dispatch.clone())
                .load_routes(&loader, &routes_file)?
                .build();

            let found = router.locate(&method, &uri)?;
            let target = found.route.target();
            let report = json!({
                "route": found.route.to_string(),
                "controller": target.qualified(&config.dispatch.namespace),
                "action": target.action(),
                "anchor": found.route.anchor(),
                "params": found.params(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Cache { action } => {
            let cache = build_cache(&config.cache);
            match action {
                CacheAction::Status => {
                    let mut report = json!({
                        "enabled": config.cache.enabled,
                        "useable": cache.useable(),
                        "filled": cache.filled(),
                    });
                    if cache.filled() {
                        match cache.read() {
                            Ok(entry) => {
                                let fresh = loader::modified_at(&routes_file)
                                    .map(|modified| entry.is_fresh(modified))
                                    .unwrap_or(false);
                                let timestamp = entry
                                    .timestamp
                                    .duration_since(UNIX_EPOCH)
                                    .unwrap_or_default()
                                    .as_secs_f64();
                                report["timestamp"] = json!(timestamp);
                                report["routes"] = json!(entry.routes.len());
                                report["fresh"] = json!(fresh);
                            }
                            Err(e) => report["error"] = json!(e.to_string()),
                        }
                    }
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                CacheAction::Clear => {
                    cache.clear()?;
                    println!("cache cleared");
                }
            }
        }
    }

    Ok(())
}
