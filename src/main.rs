use clap::{Parser, Subcommand};
use oliverbinns::config::{self, SiteConfig};
use oliverbinns::context::PublishingContext;
use oliverbinns::pipeline::{Pipeline, PublishingStep, default_steps};
use oliverbinns::plugins::Plugin;
use oliverbinns::{output, redirect};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oliverbinns")]
#[command(about = "Static site generator for oliverbinns.co.uk")]
#[command(long_about = "\
Static site generator for oliverbinns.co.uk

Markdown with front matter goes in, a static site comes out: HTML pages,
a JSON API for the app, and an RSS feed.

Project structure:

  .
  ├── config.toml                  # Site config (optional, layered over defaults)
  ├── Content/
  │   ├── index.md                 # Index page description
  │   ├── about.md                 # Freeform page → /about
  │   ├── posts/                   # Blog posts → /posts/<slug>
  │   │   ├── index.md             # Section title and description
  │   │   └── tube-status-widget.md
  │   ├── things/                  # Things built
  │   └── times/                   # Timeline entries (icon: fa-*)
  └── Resources/
      ├── Theme/styles.css         # Copied to the output root
      ├── Theme/images/            # Copied to images/
      └── images/                  # Copied to images/ (merged)

Front matter:
  ---
  title: Create a Tube Status home screen widget
  date: 2020-06-27 10:00
  tags: iOS, Widgets
  color: #E32017
  ---

Run 'oliverbinns gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root containing Content/ and Resources/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (defaults to <root>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (defaults to paths.output from config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log build steps at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline and write the site
    Build,
    /// Ingest content and list it without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Resolve a legacy URL path against the redirect table
    Redirect {
        /// Request path, e.g. /2020/06/27/create-a-tube-status-home-screen-widget-for-ios-14/
        path: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build => {
            let mut context =
                build_context(&cli.root, cli.config.as_deref(), cli.output.as_deref())?;
            let steps = default_steps(&context.config);

            println!("==> Building {}", cli.root.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_step_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = Pipeline::new(steps).with_events(tx).run(&mut context);
            printer
                .join()
                .map_err(|_| "output printer thread panicked")?;
            let report = result?;

            output::print_build_summary(&report, context.output_dir());
            println!("==> Build complete: {}", context.output_dir().display());
        }
        Command::Check => {
            let mut context =
                build_context(&cli.root, cli.config.as_deref(), cli.output.as_deref())?;
            let config = &context.config;
            let steps = vec![
                PublishingStep::InstallPlugin(Plugin::syntax_highlight(&config.highlight.class_prefix)),
                PublishingStep::InstallPlugin(Plugin::VideoEmbed),
                PublishingStep::InstallPlugin(Plugin::link_preview()),
                PublishingStep::AddMarkdownFiles,
                PublishingStep::InstallPlugin(Plugin::reading_time()),
            ];

            println!("==> Checking {}", context.content_dir().display());
            Pipeline::new(steps)
                .without_output_reset()
                .run(&mut context)?;
            output::print_check_output(&context);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Redirect { path } => {
            output::print_redirect(&path, &redirect::resolve(&path));
        }
    }

    Ok(())
}

/// Load config and set up the build context for a project root.
fn build_context(
    root: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<PublishingContext, config::ConfigError> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join("config.toml"));
    let config: SiteConfig = config::load_config(&config_path)?;
    let context = PublishingContext::new(config, root);
    Ok(match output {
        Some(dir) => context.with_output_dir(dir),
        None => context,
    })
}
