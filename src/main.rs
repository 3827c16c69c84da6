use clap::{Parser, Subcommand};
use meinstatic::avatar::{self, HttpFetcher};
use meinstatic::config::{self, SiteConfig};
use meinstatic::{generate, output, resources, scan, template};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meinstatic")]
#[command(about = "Static site generator for a markdown homepage with a blog")]
#[command(long_about = "\
Static site generator for a markdown homepage with a blog

Every markdown file becomes an HTML page wrapped in one template. Files whose
path matches the post pattern are also listed in posts.html.

Site layout (paths configurable in config.toml):

  mysite/
  ├── config.toml                  # Site config (optional)
  ├── pages-md/                    # Markdown sources
  │   ├── index.md                 # → html/index.html
  │   ├── 20240101-hello.md        # Post → html/20240101-hello.html + listing
  │   ├── 20240101-hello.meta.json # Optional: {\"posted\": \"2024-01-01T09:30:00Z\"}
  │   └── about/index.md           # → html/about/index.html
  ├── templates/template.html      # {{ SiteName }}, {{ Body }}, {{ RelRoot }}
  └── res/                         # Copied to html/res/

Run 'meinstatic gen-config' for a documented config.toml and
'meinstatic gen-template' for a starter template.")]
#[command(version = env!("MEINSTATIC_VERSION"))]
struct Cli {
    /// Directory holding config.toml; relative paths resolve against it
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render pages, the post listing, resources and the avatar
    Build,
    /// Render pages and the post listing only
    Pages,
    /// Copy the resource directory into the destination
    Resources,
    /// Download the Gravatar profile picture if missing
    Avatar,
    /// Validate config, template and sources without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print a starter page template
    GenTemplate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.config_dir)?;

            println!(
                "==> Step 1: Rendering {} \u{2192} {}",
                config.source_path.display(),
                config.destination_path.display()
            );
            run_pages(&config)?;

            println!("==> Step 2: Copying resources");
            run_resources(&config)?;

            println!("==> Step 3: Fetching avatar");
            run_avatar(&config)?;

            println!("==> Build complete: {}", config.destination_path.display());
        }
        Command::Pages => {
            let config = config::load_config(&cli.config_dir)?;
            run_pages(&config)?;
        }
        Command::Resources => {
            let config = config::load_config(&cli.config_dir)?;
            run_resources(&config)?;
        }
        Command::Avatar => {
            let config = config::load_config(&cli.config_dir)?;
            run_avatar(&config)?;
        }
        Command::Check => {
            let config = config::load_config(&cli.config_dir)?;
            println!("==> Checking {}", cli.config_dir.display());
            let matcher = config.post_matcher()?;
            template::PageTemplate::load(&config.page_template_file)?;
            let documents = scan::scan(&config.source_path)?;
            output::print_check_output(&documents, &matcher);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenTemplate => {
            print!("{}", template::stock_template());
        }
    }

    Ok(())
}

fn run_pages(config: &SiteConfig) -> Result<(), generate::GenerateError> {
    let report = generate::generate(config)?;
    output::print_render_output(&report);
    Ok(())
}

fn run_resources(config: &SiteConfig) -> Result<(), resources::ResourceError> {
    let report = resources::copy_resources(&config.resource_path, &config.destination_path)?;
    output::print_copy_output(&config.resource_path, &report);
    Ok(())
}

fn run_avatar(config: &SiteConfig) -> Result<(), avatar::AvatarError> {
    let fetcher = HttpFetcher::new()?;
    let outcome = avatar::fetch_avatar(&config.avatar, &config.avatar_path(), &fetcher)?;
    output::print_avatar_outcome(&outcome);
    Ok(())
}
