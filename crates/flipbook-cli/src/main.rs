use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use flipbook_core::policy::{DEFAULT_CONSTRAINED_RADIUS, DEFAULT_RADIUS};
use flipbook_core::{
    AnyResolver, CatalogConfig, DeviceClass, ExistenceCheck, PageCatalog, PageTemplate,
    ViewerOptions, WindowPolicy, WindowStrategy,
};
use std::path::PathBuf;

mod simulate;

use simulate::{Simulation, Step, StepReport};

#[derive(Parser)]
#[command(name = "flipbook", about = "Flipbook catalog and page window tools", version)]
struct Cli {
    /// Viewer options JSON file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages found under a directory or URL
    Discover {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Replay navigation steps against the page window and print what stays loaded
    Simulate {
        /// Number of pages in the simulated catalog
        #[arg(long)]
        pages: usize,

        /// Windowing strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Pages kept on each side of the current page
        #[arg(long)]
        radius: Option<usize>,

        /// Radius used on constrained devices
        #[arg(long)]
        constrained_radius: Option<usize>,

        /// Simulate a constrained (low memory) device
        #[arg(long)]
        constrained: bool,

        /// Allow deferred preloading of adjacent spreads
        #[arg(long)]
        preload: bool,

        /// Never evict the cover
        #[arg(long)]
        keep_cover: bool,

        /// Keep every visited page loaded
        #[arg(long)]
        no_eviction: bool,

        /// Location hash the viewer is opened at, e.g. "#page=12"
        #[arg(long)]
        start: Option<String>,

        /// Steps: left, right, goto:N, hash:H, preload, all
        steps: Vec<Step>,
    },

    /// Print page markup for every discovered page
    Markup {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// HTML template containing {{imageUrl}} and optionally {{pageNumber}}
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// Directory or http(s) URL holding the page images
    base: String,

    /// File name prefix
    #[arg(long)]
    prefix: Option<String>,

    /// File extension including the dot
    #[arg(long)]
    extension: Option<String>,

    /// Zero padding width of the page number
    #[arg(long)]
    padding: Option<usize>,

    /// Stop looking after this many pages
    #[arg(long)]
    max_pages: Option<usize>,

    /// Accept any successful response, whatever its content type
    #[arg(long)]
    status_only: bool,
}

impl CatalogArgs {
    fn apply(self, mut config: CatalogConfig) -> CatalogConfig {
        config.base_path = self.base;
        if let Some(prefix) = self.prefix {
            config.file_prefix = prefix;
        }
        if let Some(extension) = self.extension {
            config.file_extension = extension;
        }
        if let Some(padding) = self.padding {
            config.number_padding = padding;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if self.status_only {
            config.existence_check = ExistenceCheck::StatusOnly;
        }
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Fixed radius around the current page
    Fixed,
    /// Visible spread only
    Spread,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => ViewerOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ViewerOptions::default(),
    };

    match cli.command {
        Commands::Discover { catalog } => {
            let catalog = discover(catalog.apply(options.catalog)).await?;
            for page in &catalog {
                println!("{}", page);
            }
            log::info!("Found {} pages", catalog.len());
        }

        Commands::Simulate {
            pages,
            strategy,
            radius,
            constrained_radius,
            constrained,
            preload,
            keep_cover,
            no_eviction,
            start,
            steps,
        } => {
            let spread = match strategy {
                Some(StrategyArg::Spread) => true,
                Some(StrategyArg::Fixed) => false,
                None => matches!(options.strategy, WindowStrategy::SpreadPair { .. }),
            };
            let strategy = match (spread, options.strategy) {
                (
                    true,
                    WindowStrategy::SpreadPair {
                        keep_cover: cover,
                        preload_adjacent: adjacent,
                    },
                ) => WindowStrategy::SpreadPair {
                    keep_cover: keep_cover || cover,
                    preload_adjacent: preload || adjacent,
                },
                (true, _) => WindowStrategy::SpreadPair {
                    keep_cover,
                    preload_adjacent: preload,
                },
                (
                    false,
                    WindowStrategy::FixedRadius {
                        radius: configured,
                        constrained_radius: configured_constrained,
                    },
                ) => WindowStrategy::FixedRadius {
                    radius: radius.unwrap_or(configured),
                    constrained_radius: constrained_radius.unwrap_or(configured_constrained),
                },
                (false, _) => WindowStrategy::FixedRadius {
                    radius: radius.unwrap_or(DEFAULT_RADIUS),
                    constrained_radius: constrained_radius.unwrap_or(DEFAULT_CONSTRAINED_RADIUS),
                },
            };

            let options = ViewerOptions {
                strategy,
                device_class: if constrained {
                    DeviceClass::Constrained
                } else {
                    options.device_class
                },
                evict_pages: options.evict_pages && !no_eviction,
                ..options
            };
            options.validate()?;

            let catalog = PageCatalog::from_pages(
                (0..pages).map(|index| options.catalog.page_id(index)).collect(),
            );
            let mut sim = Simulation::new(
                catalog,
                WindowPolicy::new(options.strategy),
                options.device_class,
                options.deep_linking,
            )
            .with_eviction(options.evict_pages);

            print_report("mount", &sim.mount(start));
            for step in &steps {
                print_report(&step.to_string(), &sim.step(step));
            }
            println!("Hash writes: {}", sim.hashes_written());
        }

        Commands::Markup { catalog, template } => {
            let template = match template {
                Some(path) => PageTemplate::load(&path)
                    .await
                    .with_context(|| format!("Failed to load template {}", path.display()))?,
                None => PageTemplate::default(),
            };
            let catalog = discover(catalog.apply(options.catalog)).await?;
            println!("{}", template.render_catalog(&catalog));
        }
    }

    Ok(())
}

async fn discover(config: CatalogConfig) -> Result<PageCatalog> {
    config.validate()?;
    let resolver = AnyResolver::for_base(&config.base_path)?;
    let catalog = PageCatalog::discover(&config, &resolver)
        .await
        .with_context(|| format!("No pages under '{}'", config.base_path))?;
    Ok(catalog)
}

fn print_report(label: &str, report: &StepReport) {
    println!(
        "{:<12} page {:>4}  {:<12} +{:<3} -{:<3} loaded {} ({})",
        label,
        report.page,
        report.hash.as_deref().unwrap_or("-"),
        report.added,
        report.removed,
        report.loaded,
        report.loaded_count
    );
}
