use clap::{Parser, Subcommand};
use image_factory::config::{self, DEFAULT_CONFIG_FILE, FactoryConfig};
use image_factory::imaging::rust_backend::supported_extensions;
use image_factory::{ImageFactory, SourceImage, output, types};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-factory")]
#[command(about = "Generate named image derivatives from type-scoped instructions")]
#[command(long_about = "\
Generate named image derivatives from type-scoped instructions

Instructions live in factory.toml, grouped by image type:

  [[instructions]]
  type = \"product\"
  label = \"thumbnail\"
  width = 60
  height = 40
  crop = true

Each derivative is written next to its source as <stem>-<label>.<ext>:

  photos/kitty.jpg  →  photos/kitty-thumbnail.jpg

Set RUST_LOG=debug to see every sizing decision.

Run 'image-factory gen-config' to generate a documented factory.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./factory.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate derivatives for a batch of images
    Process {
        /// Image type whose instructions apply
        #[arg(long = "type", value_name = "TYPE")]
        type_name: String,

        /// JSON file with one image object or an array of them
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Print the batch result as JSON instead of progress and summary
        #[arg(long)]
        json: bool,

        /// Source image paths
        images: Vec<PathBuf>,
    },
    /// Validate the config and list registered instructions
    Check,
    /// Print a stock factory.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            type_name,
            manifest,
            json,
            images,
        } => {
            let factory = load_factory(cli.config.as_deref())?;
            let images = collect_images(manifest.as_deref(), images)?;

            if json {
                let result = factory.process(&type_name, &images)?;
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_process_event(&event);
                }
            });
            let result = factory.process_with_progress(&type_name, &images, tx);
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let result = result?;
            println!();
            output::print_summary(&result);
        }
        Command::Check => {
            let path = config_path(cli.config.as_deref());
            match &path {
                Some(p) => println!("==> Checking {}", p.display()),
                None => println!("==> No {} found, using stock defaults", DEFAULT_CONFIG_FILE),
            }
            let factory = load_factory(path.as_deref())?;
            let registry = factory.instructions();
            for type_name in registry.types() {
                println!("{}", type_name);
                for instruction in registry.get(type_name).unwrap_or_default() {
                    println!(
                        "    {}: {}x{}{}{}",
                        instruction.label,
                        instruction.width,
                        instruction.height,
                        if instruction.crop { " crop" } else { "" },
                        if instruction.force { "" } else { " no-force" },
                    );
                }
            }
            println!("Formats: {}", supported_extensions().join(", "));
            println!(
                "==> Config is valid ({} instructions)",
                factory.count()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// The explicit `--config` path, or `./factory.toml` if it exists.
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

fn load_factory(explicit: Option<&Path>) -> Result<ImageFactory, config::ConfigError> {
    let config = match config_path(explicit) {
        Some(path) => config::load_config(&path)?,
        None => FactoryConfig::default(),
    };
    config.into_factory()
}

/// Images from the manifest file first, then positional paths.
fn collect_images(
    manifest: Option<&Path>,
    paths: Vec<PathBuf>,
) -> Result<Vec<SourceImage>, Box<dyn std::error::Error>> {
    let mut images = match manifest {
        Some(path) => types::parse_images(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    images.extend(paths.into_iter().map(SourceImage::new));
    Ok(images)
}
