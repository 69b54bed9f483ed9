use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon::config::SalonConfig;
use salon::models::Service;
use salon::{persist, render, seed, Salon};

#[derive(Parser)]
#[command(name = "salon")]
#[command(about = "Beauty salon object graph with enforced association integrity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sample salon and print its extents and mentorship tree
    Demo {
        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Save the sample salon's services to a file
    Export {
        /// Target file (defaults to the configured snapshot path)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Load a services file into an empty salon and list them
    Import {
        path: PathBuf,
    },
}

/// Initialize tracing with output to stderr so stdout carries only results
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "salon=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = SalonConfig::load();

    match cli.command {
        Commands::Demo { json } => {
            let salon = seed::sample_salon(config)?;
            let summary = salon.summary();
            let tree = salon.mentorship_tree();

            if json {
                let output = serde_json::json!({
                    "summary": summary,
                    "mentorship": tree,
                    "problems": salon.integrity_report(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                println!();
                print!("{}", render::render_tree(&tree));
                for problem in salon.integrity_report() {
                    println!("! {}", problem);
                }
            }
        }
        Commands::Export { out } => {
            let path = match out {
                Some(path) => path,
                None => config.snapshot_path()?,
            };
            let salon = seed::sample_salon(config)?;
            let snapshot = salon.export_services();
            persist::save_to_file(&snapshot, &path)?;
            println!("{} services written to {}", snapshot.records.len(), path.display());
        }
        Commands::Import { path } => {
            let snapshot = persist::load_from_file::<Service>(&path)?;
            let mut salon = Salon::new(config);
            let imported = salon.import_services(snapshot)?;
            println!("Imported {} services", imported);
            for service in salon.services() {
                println!(
                    "  {} {} ({} min, {}.{:02})",
                    service.id,
                    service.name,
                    service.duration_minutes,
                    service.price / 100,
                    service.price % 100
                );
            }
        }
    }

    Ok(())
}
