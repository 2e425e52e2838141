use anyhow::Result;
use clap::Parser;
use sdkup::config::{Config, Overrides};
use sdkup::installer::Installer;
use sdkup::runtime::RealRuntime;
use std::path::PathBuf;
use std::process::ExitCode;

/// sdkup - install a released tool into a versioned cache
///
/// Resolves a version specification against the tool's GitHub releases,
/// downloads the binary built for this machine and caches it.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
///
/// Examples:
///   sdkup install 1.9.0       # Install exactly 1.9.0
///   sdkup install '^1.8.0'    # Install the newest 1.x release at or above 1.8.0
///   sdkup resolve '~1.3'      # Show which release would be installed
#[derive(Parser, Debug)]
#[command(author, version = env!("SDKUP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Repository publishing the releases
    #[arg(long, value_name = "OWNER/REPO", global = true)]
    repo: Option<String>,

    /// Tool name, used as the cached file name
    #[arg(long, value_name = "NAME", global = true)]
    tool: Option<String>,

    /// Tool cache root (defaults to RUNNER_TOOL_CACHE, then the user cache dir)
    #[arg(long = "cache-dir", value_name = "PATH", global = true)]
    cache_dir: Option<PathBuf>,

    /// Asset name pattern with {platform} and {arch} placeholders
    #[arg(long = "asset-template", value_name = "TEMPLATE", global = true)]
    asset_template: Option<String>,

    /// Accept informal pre-release tags such as "1.10beta1"
    #[arg(long = "legacy-prerelease", global = true)]
    legacy_prerelease: bool,

    /// Keep searching older releases when a match has no asset for this host
    #[arg(long = "skip-empty-assets", global = true)]
    skip_empty_assets: bool,

    /// Target operating system (defaults to the running host)
    #[arg(long, env = "SDKUP_OS", value_name = "OS", global = true)]
    os: Option<String>,

    /// Target architecture (defaults to the running host)
    #[arg(long, env = "SDKUP_ARCH", value_name = "ARCH", global = true)]
    arch: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download and cache the newest release matching a version specification
    Install(SpecArgs),

    /// Print the release a version specification resolves to
    Resolve(SpecArgs),
}

#[derive(clap::Args, Debug)]
struct SpecArgs {
    /// Exact version ("1.9.0") or range ("^1.8.0", "1.x", ">=1.2 <2")
    #[arg(value_name = "VERSION_SPEC")]
    spec: String,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            repo: self.repo.clone(),
            tool: self.tool.clone(),
            cache_dir: self.cache_dir.clone(),
            asset_template: self.asset_template.clone(),
            legacy_prerelease: self.legacy_prerelease,
            skip_empty_assets: self.skip_empty_assets,
            arch: self.arch.clone(),
            os: self.os.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let config = Config::new(&runtime, cli.overrides())?;
    let tool = config.tool.clone();
    let installer = Installer::from_config(runtime, config);

    match cli.command {
        Commands::Install(args) => match installer.install(&args.spec).await? {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("no release of {} matches {}", tool, args.spec);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Resolve(args) => match installer.resolve(&args.spec).await? {
            Some(found) => {
                println!("{} {}", found.release.tag, found.version);
                for asset in &found.release.assets {
                    println!("  {}", asset.name);
                }
            }
            None => {
                eprintln!("no release of {} matches {}", tool, args.spec);
                return Ok(ExitCode::FAILURE);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}
