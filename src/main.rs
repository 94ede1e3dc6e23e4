//! CLI entry point for headless-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use headless_blog::{commands, server, Blog};

#[derive(Parser)]
#[command(name = "headless-blog")]
#[command(version)]
#[command(about = "A static blog generator that renders posts from a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Content ref of a preview release
        #[arg(long = "ref")]
        content_ref: Option<String>,

        /// Read posts from a JSON file instead of the CMS
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Read posts from a JSON file instead of the CMS
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Clean the public folder
    Clean,

    /// List every post in the content repository
    List {
        /// Read posts from a JSON file instead of the CMS
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "headless_blog=debug,info"
    } else {
        "headless_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Generate {
            content_ref,
            fixtures,
        } => {
            let blog = Blog::new(&base_dir)?;
            let source = blog.content_source(fixtures.as_deref())?;
            tracing::info!("Generating static files...");

            let report =
                commands::generate::run(&blog, source.as_ref(), content_ref.as_deref()).await?;
            println!(
                "Generated listing with {} posts and {} post pages",
                report.listed_posts,
                report.post_pages.len()
            );
        }

        Commands::Server { port, ip, fixtures } => {
            let blog = Blog::new(&base_dir)?;
            let source = blog.content_source(fixtures.as_deref())?;

            // Generate first
            tracing::info!("Generating static files...");
            commands::generate::run(&blog, source.as_ref(), None).await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&blog, source, None, &ip, port).await?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { fixtures } => {
            let blog = Blog::new(&base_dir)?;
            let source = blog.content_source(fixtures.as_deref())?;
            commands::list::run(&blog, source.as_ref()).await?;
        }

        Commands::Version => {
            println!("headless-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
