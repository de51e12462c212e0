use std::path::Path;

use clap::{Parser, Subcommand};

use pageserve::config::{load_config, ServerConfig};
use pageserve::content::PageScaffold;
use pageserve::export::export_site;

#[derive(Parser)]
#[command(name = "pageserve-cli")]
#[command(about = "Management CLI for the page server", long_about = None)]
struct Cli {
    /// Server config file.
    #[arg(short, long, default_value = "pageserve.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new page (HTML + config artifacts)
    CreatePage {
        /// Page url, e.g. /docs/intro
        url: String,

        #[arg(short, long, default_value = "New Page")]
        title: String,
    },
    /// Flatten the site into a deployable export
    Export {
        #[arg(short, long, default_value = "dist")]
        out: String,
    },
    /// Load and validate the config file
    CheckConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = if Path::new(&cli.config).exists() {
        load_config(Path::new(&cli.config))?
    } else {
        ServerConfig::default()
    };
    let site_root = Path::new(&config.content.root);

    match cli.command {
        Commands::CreatePage { url, title } => {
            let scaffold = PageScaffold::create(site_root, &url, &title)?;
            println!("Created {}", scaffold.html_path().display());
        }
        Commands::Export { out } => {
            let summary = export_site(site_root, &config.routes, Path::new(&out))?;
            println!(
                "Exported {} pages, {} templates to {}",
                summary.pages, summary.templates, out
            );
        }
        Commands::CheckConfig => {
            // load_config already validated; reaching here means it passed.
            println!(
                "OK: {} routes, content root `{}`",
                config.routes.len(),
                config.content.root
            );
        }
    }

    Ok(())
}
