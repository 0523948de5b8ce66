//! apiscout CLI - backend endpoint discovery and connectivity resolver

use apiscout::cache::now_ms;
use apiscout::{
    build_candidates, build_url, CacheStore, CandidateTier, ConfigFile, EndpointResolver,
    FileCache, HealthProbe, HttpProber, ResolverConfig, CACHE_KEY, HEALTH_PATHS,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "apiscout")]
#[command(
    version,
    about = "Backend endpoint discovery and connectivity resolver"
)]
#[command(after_help = r#"EXAMPLES:
    # Resolve the backend base URL (probe, then cache for 5 minutes)
    apiscout resolve

    # Trust the configured host, skip probing
    apiscout resolve --manual --host 192.168.1.100

    # Force a re-probe with bounded fan-out
    apiscout resolve --fresh --strategy fan-out

    # Show the ranked candidate list without probing
    apiscout candidates

    # Diagnose a single base URL against the health paths
    apiscout probe http://192.168.1.100:5000

ENVIRONMENT VARIABLES:
    APISCOUT_BASE_URL      Bypass resolution and use this URL as-is
    APISCOUT_CONFIG_DIR    Override the config directory
    APISCOUT_CACHE_DIR     Override the cache directory

CONFIG FILE:
    Default: ~/.config/apiscout/config.toml
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Config-file overrides shared by resolving commands
#[derive(Args)]
struct ConfigArgs {
    /// Manually configured backend host
    #[arg(long)]
    host: Option<String>,

    /// Backend port
    #[arg(long)]
    port: Option<u16>,

    /// API path prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Platform candidate list (android, ios, desktop)
    #[arg(long)]
    platform: Option<String>,

    /// Subnet sweep prefix (e.g. 192.168.1)
    #[arg(long)]
    sweep_prefix: Option<String>,

    /// Probe strategy (sequential, fan-out)
    #[arg(long)]
    strategy: Option<String>,

    /// Per-probe timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Cache TTL in seconds
    #[arg(long)]
    ttl_secs: Option<u64>,
}

impl ConfigArgs {
    /// Start from the config file (if any) and apply CLI overrides.
    fn resolver_config(&self) -> anyhow::Result<ResolverConfig> {
        let mut config = ConfigFile::load_default()?
            .map(|f| f.resolver)
            .unwrap_or_default();

        if let Some(host) = &self.host {
            config.manual_host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(prefix) = &self.prefix {
            config.api_prefix = prefix.clone();
        }
        if let Some(platform) = &self.platform {
            config.platform = platform.parse()?;
        }
        if let Some(prefix) = &self.sweep_prefix {
            config.sweep_prefix = Some(prefix.clone());
        }
        if let Some(strategy) = &self.strategy {
            config.strategy = strategy.parse()?;
        }
        if let Some(ms) = self.timeout_ms {
            config.probe_timeout_ms = ms;
        }
        if let Some(secs) = self.ttl_secs {
            config.cache_ttl_secs = secs;
        }

        Ok(config)
    }
}

#[derive(Args)]
struct ResolveArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Trust the manual host and skip all probing
    #[arg(long)]
    manual: bool,

    /// Ignore the cached entry (the result is still cached)
    #[arg(long)]
    fresh: bool,

    /// Bypass resolution entirely and print this URL as-is
    #[arg(long, env = "APISCOUT_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the backend base URL
    Resolve(ResolveArgs),

    /// Show the ranked candidate list without probing
    Candidates {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Probe one base URL against the health paths
    Probe {
        /// Base URL to probe (e.g. http://192.168.1.100:5000)
        url: String,

        /// Per-probe timeout in milliseconds
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,
    },

    /// Inspect the resolution cache
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Join a base URL and an endpoint path
    Url {
        /// Resolved base URL
        base: String,

        /// Endpoint path
        endpoint: String,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show the cached entry
    Show,

    /// Remove the cached entry
    Clear,

    /// Show the cache file path
    Path,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show config file path
    Path,

    /// Show current config
    Show,

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    match &cli.command {
        Commands::Resolve(args) => handle_resolve(args, cli.quiet).await,
        Commands::Candidates { config } => handle_candidates(config),
        Commands::Probe { url, timeout_ms } => handle_probe(url, *timeout_ms).await,
        Commands::Cache { action } => handle_cache(action),
        Commands::Config { action } => handle_config(action),
        Commands::Url { base, endpoint } => {
            println!("{}", build_url(base, endpoint)?);
            Ok(())
        }
    }
}

async fn handle_resolve(args: &ResolveArgs, quiet: bool) -> anyhow::Result<()> {
    if let Some(url) = &args.base_url {
        let url = url.trim();
        if !url.is_empty() {
            println!("{}", url.trim_end_matches('/'));
            return Ok(());
        }
    }

    let mut config = args.config.resolver_config()?;
    if args.manual {
        config.manual_override = true;
    }

    let probing = !config.manual_override;
    let resolver = EndpointResolver::from_config(config)?;

    let pb = if !quiet && probing {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("probing candidates...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let url = if args.fresh {
        resolver.resolve_fresh().await
    } else {
        resolver.resolve().await
    };

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    println!("{}", url);
    Ok(())
}

fn handle_candidates(config: &ConfigArgs) -> anyhow::Result<()> {
    let config = config.resolver_config()?;
    let candidates = build_candidates(&config);

    println!(
        "CANDIDATES for {} ({} total)\n",
        config.platform.display_name(),
        candidates.len()
    );

    // the list is already in tier order
    let mut current: Option<CandidateTier> = None;
    for candidate in &candidates {
        if current != Some(candidate.tier) {
            if current.is_some() {
                println!();
            }
            println!("{}:", candidate.tier.display_name());
            current = Some(candidate.tier);
        }
        println!("  {}", candidate.probe_root());
    }

    Ok(())
}

async fn handle_probe(url: &str, timeout_ms: u64) -> anyhow::Result<()> {
    println!("Probing {}\n", url);

    let prober = HttpProber::new(Duration::from_millis(timeout_ms))?;
    let total = HEALTH_PATHS.len();
    let mut live = false;

    for (i, path) in HEALTH_PATHS.iter().enumerate() {
        let label = if path.is_empty() { "(root)" } else { *path };
        print!("[{}/{}] {:.<24} ", i + 1, total, label);
        std::io::Write::flush(&mut std::io::stdout())?;

        match prober.check(url, path).await {
            Ok(()) => {
                println!("✓ live");
                live = true;
                break;
            }
            Err(e) => println!("✗ {}", e),
        }
    }

    if live {
        println!("\nHost is answering.");
    } else {
        println!("\nNo response below 500 on any path.");
    }

    Ok(())
}

fn handle_cache(action: &CacheCommands) -> anyhow::Result<()> {
    let cache = FileCache::open_default();

    match action {
        CacheCommands::Show => match cache.load(CACHE_KEY)? {
            Some(entry) => {
                println!("{}", entry.base_url);
                println!("resolved {}s ago", entry.age(now_ms()).as_secs());
            }
            None => println!("No cached endpoint."),
        },

        CacheCommands::Clear => {
            cache.clear(CACHE_KEY)?;
            println!("Cache cleared.");
        }

        CacheCommands::Path => {
            println!("{}", cache.entry_path(CACHE_KEY).display());
        }
    }

    Ok(())
}

fn handle_config(action: &ConfigCommands) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Path => {
            println!("{}", ConfigFile::default_path().display());
        }

        ConfigCommands::Show => {
            let path = ConfigFile::default_path();
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                println!("# {}\n", path.display());
                println!("{}", content);
            } else {
                println!("No config file found at: {}", path.display());
                println!("\nCreate one with:");
                println!("  apiscout config init");
            }
        }

        ConfigCommands::Init => {
            let path = ConfigFile::default_path();
            if path.exists() {
                println!("Config file already exists at: {}", path.display());
            } else {
                ConfigFile::default().save(&path)?;
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}
