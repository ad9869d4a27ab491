use std::fs;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use tracing::Level;

use webarchiver::core::{format_output_path, ArchiveOptions, Archiver};
use webarchiver::env::EnvConfig;

const DEFAULT_OUTPUT_PATH: &str = "%title%.%extension%";

#[derive(Parser, Debug)]
#[command(
    name = "webarchiver",
    version,
    about = "Save a web page and its images, scripts and stylesheets as a single .webarchive file"
)]
struct Cli {
    /// URL of the page to archive
    target: String,

    /// Write the archive to this path, `-` for stdout
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_PATH)]
    output: String,

    /// Leave images out of the archive
    #[arg(short = 'I', long)]
    no_images: bool,

    /// Leave JavaScript out of the archive
    #[arg(short = 'j', long)]
    no_js: bool,

    /// Leave stylesheets out of the archive
    #[arg(short = 'c', long)]
    no_css: bool,

    /// Per-request timeout in seconds, 0 for none
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Custom User-Agent string
    #[arg(short = 'u', long)]
    user_agent: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Maximum simultaneous resource fetches, 0 for no limit
    #[arg(short = 'n', long)]
    max_concurrent_fetches: Option<usize>,

    /// Only log errors
    #[arg(short = 's', long, conflicts_with = "verbose")]
    silent: bool,

    /// Log every archiving stage
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn options(&self, env_config: &EnvConfig) -> ArchiveOptions {
        let mut options = ArchiveOptions::default();
        env_config.apply_to(&mut options);

        options.no_images = self.no_images;
        options.no_js = self.no_js;
        options.no_css = self.no_css;
        options.insecure |= self.insecure;
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = Some(user_agent.clone());
        }
        if let Some(max_concurrent_fetches) = self.max_concurrent_fetches {
            options.max_concurrent_fetches = max_concurrent_fetches;
        }

        options
    }

    fn log_level(&self, env_config: &EnvConfig) -> Level {
        if self.verbose {
            return Level::DEBUG;
        }
        if self.silent {
            return Level::ERROR;
        }
        env_config.log_level.parse().unwrap_or(Level::WARN)
    }
}

fn main() {
    let cli = Cli::parse();

    let env_config = match EnvConfig::from_env() {
        Ok(env_config) => env_config,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level(&env_config))
        .with_writer(io::stderr)
        .init();

    let options = cli.options(&env_config);

    let archiver = match Archiver::new(options) {
        Ok(archiver) => archiver,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    let page = match archiver.archive_page_blocking(&cli.target) {
        Ok(page) => page,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    let title = page.metadata.title.as_deref();

    if cli.output == "-" {
        let mut stdout = io::stdout().lock();
        if let Err(error) = stdout.write_all(&page.data).and_then(|_| stdout.flush()) {
            eprintln!("Error: failed to write to stdout: {}", error);
            process::exit(1);
        }
        if !cli.silent {
            eprintln!("{}", title.unwrap_or("Untitled"));
        }
        return;
    }

    let destination = format_output_path(&cli.output, title.or(Some("Untitled")));
    if let Err(error) = fs::write(&destination, &page.data) {
        eprintln!("Error: failed to write {}: {}", destination, error);
        process::exit(1);
    }

    if !cli.silent {
        println!("{}", title.unwrap_or("Untitled"));
    }
}
