use clap::{Args, Parser, Subcommand};
use postfolio::locale::Locale;
use postfolio::scan::BodyRef;
use postfolio::types::{PostFilter, SortOrder};
use postfolio::{artifacts, config, manifest, output, routing, scan, store, watch};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "postfolio")]
#[command(about = "Content manifest builder for a bilingual MDX blog")]
#[command(long_about = "\
Content manifest builder for a bilingual MDX blog

Every post lives in its own directory with one file per locale. Both locales
are required; a missing or malformed file fails the whole build.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  └── posts/
      ├── joining-rockfi/
      │   ├── en.mdx               # YAML frontmatter between --- fences
      │   └── fr.mdx
      └── postgresql-unique-nulls/
          ├── en.mdx
          └── fr.md                # TOML frontmatter between +++ fences works too

Frontmatter fields:
  title, subtitle, summary     non-empty strings
  publishedAt, updatedAt       YYYY-MM-DD (updatedAt optional, not before publishedAt)
  readTimeMinutes              positive integer
  tags                         non-empty list of non-empty strings
  seriesId, seriesOrder        optional series membership
  draft                        optional, hides the post from listings and feeds

Run 'postfolio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for sitemap.xml, rss.xml, robots.txt
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest.json)
    #[arg(long, default_value = ".postfolio-temp", global = true)]
    temp_dir: PathBuf,

    /// Absolute site URL, overrides site.url from config.toml
    #[arg(long, env = "SITE_URL", global = true)]
    site_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Locale selector shared by query commands.
#[derive(Args, Clone)]
struct LocaleArgs {
    /// Locale to query (en or fr)
    #[arg(long, short, default_value = "en")]
    locale: Locale,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content and print the post inventory
    Check,
    /// Validate content and write manifest.json to the temp directory
    Scan,
    /// Write sitemap.xml, rss.xml and robots.txt
    Artifacts,
    /// Run the full pipeline: scan → artifacts
    Build,
    /// List published posts, newest first
    List {
        #[command(flatten)]
        locale: LocaleArgs,
        /// Case-insensitive text filter over title, subtitle, summary and tags
        #[arg(long, short, default_value = "")]
        query: String,
        /// Only posts carrying this exact tag
        #[arg(long, short)]
        tag: Option<String>,
        /// Oldest first
        #[arg(long)]
        oldest: bool,
    },
    /// List tags of published posts
    Tags {
        #[command(flatten)]
        locale: LocaleArgs,
    },
    /// Posts sharing tags with SLUG, best match first
    Related {
        #[command(flatten)]
        locale: LocaleArgs,
        slug: String,
        /// Maximum number of posts (default: feeds.related_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Previous (older) and next (newer) posts around SLUG
    Adjacent {
        #[command(flatten)]
        locale: LocaleArgs,
        slug: String,
    },
    /// Posts of a series, in reading order
    Series {
        #[command(flatten)]
        locale: LocaleArgs,
        series_id: String,
    },
    /// Show where a site URL leads, following legacy ?post= redirects
    Resolve {
        url: String,
        /// Visitor language used when the URL carries no locale
        #[arg(long, short, default_value = "en")]
        locale: Locale,
    },
    /// Rebuild the manifest whenever posts change
    Watch,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::load_manifest(&cli.source)?;
            output::print_check_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Scan => {
            run_scan(&cli)?;
        }
        Command::Artifacts => {
            let site = load_config(&cli)?;
            let manifest = scan::load_manifest(&cli.source)?;
            run_artifacts(&manifest, &site, &cli.output)?;
        }
        Command::Build => {
            let site = load_config(&cli)?;
            let manifest = run_scan(&cli)?;
            run_artifacts(&manifest, &site, &cli.output)?;
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::List {
            locale,
            query,
            tag,
            oldest,
        } => {
            let manifest = scan::load_manifest(&cli.source)?;
            let filter = PostFilter {
                query: query.clone(),
                tag: tag.clone(),
                order: if *oldest {
                    SortOrder::Oldest
                } else {
                    SortOrder::Newest
                },
            };
            output::print_summaries(&manifest.search(locale.locale, &filter));
        }
        Command::Tags { locale } => {
            let manifest = scan::load_manifest(&cli.source)?;
            output::print_tags(&manifest.available_tags(locale.locale));
        }
        Command::Related {
            locale,
            slug,
            limit,
        } => {
            let site = load_config(&cli)?;
            let manifest = scan::load_manifest(&cli.source)?;
            let limit = limit.unwrap_or(site.feeds.related_limit);
            output::print_summaries(&manifest.related_posts(locale.locale, slug, limit));
        }
        Command::Adjacent { locale, slug } => {
            let manifest = scan::load_manifest(&cli.source)?;
            output::print_adjacent(&manifest.adjacent_posts(locale.locale, slug));
        }
        Command::Series { locale, series_id } => {
            let manifest = scan::load_manifest(&cli.source)?;
            output::print_summaries(&manifest.series(locale.locale, series_id));
        }
        Command::Resolve { url, locale } => {
            let manifest = scan::load_manifest(&cli.source)?;
            println!(
                "{}",
                output::format_route(&routing::resolve(url, *locale, &manifest))
            );
        }
        Command::Watch => {
            let manifest = scan::load_manifest(&cli.source)?;
            println!(
                "==> Watching {} ({} posts)",
                cli.source.join(manifest::POSTS_DIR).display(),
                manifest.len()
            );
            let store = store::ManifestStore::new(manifest);
            watch::watch(&cli.source, &store, |event| {
                println!("{}", output::format_watch_event(event));
            })?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `config.toml` from the content root, with `--site-url` applied.
fn load_config(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    let site = config::load_config(&cli.source)?;
    match &cli.site_url {
        Some(url) => site.with_site_url(url),
        None => Ok(site),
    }
}

/// Build the manifest and write it to `<temp-dir>/manifest.json`.
fn run_scan(cli: &Cli) -> Result<manifest::Manifest<BodyRef>, Box<dyn std::error::Error>> {
    println!("==> Scanning {}", cli.source.display());
    let manifest = scan::load_manifest(&cli.source)?;
    std::fs::create_dir_all(&cli.temp_dir)?;
    let manifest_path = cli.temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(&manifest_path, json)?;
    output::print_check_output(&manifest, &cli.source);
    println!("==> Manifest written to {}", manifest_path.display());
    Ok(manifest)
}

fn run_artifacts(
    manifest: &manifest::Manifest<BodyRef>,
    site: &config::SiteConfig,
    out_dir: &Path,
) -> Result<(), artifacts::ArtifactError> {
    println!("==> Writing artifacts to {}", out_dir.display());
    let report = artifacts::write_artifacts(manifest, site, out_dir)?;
    output::print_artifacts_output(&report, out_dir);
    Ok(())
}
