#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![cfg_attr(not(test), warn(clippy::expect_used))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};
use snafu::prelude::*;
use snpeye::{
    config::{self, Config},
    io::{self, Fetcher},
    personal, pipeline, report,
    utils::error::show_snafu_error,
};

#[derive(Debug, Snafu)]
enum Error {
    Config {
        #[snafu(backtrace)]
        source: config::Error,
    },
    Io {
        #[snafu(backtrace)]
        source: io::Error,
    },
    Personal {
        #[snafu(backtrace)]
        source: personal::Error,
    },
    Pipeline {
        source: pipeline::Error,
    },
    #[snafu(display("cannot render report as JSON"))]
    Json { source: serde_json::Error },
}
type Result<T> = std::result::Result<T, Error>;

fn main() {
    if let Err(e) = main_entry() {
        show_snafu_error(e);
        std::process::exit(-1);
    }
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report the eye colors of reference subjects sharing your genotype
    #[command(after_help = concat!(
        "Example: \n",
        "\tsnpeye report --genome genome_Jane_Doe_v5_Full.txt\n",
        "\tGENOME_ACCESS_TOKEN=... snpeye report --download-url https://.../genome.txt\n",
    ))]
    Report {
        /// Personal raw genotype file (tab-delimited)
        #[arg(short = 'g', long, group = "personal_input")]
        genome: Option<PathBuf>,

        /// Download the personal file from this URL, authenticating with the
        /// token found in the configured environment variable
        #[arg(short = 'u', long, group = "personal_input")]
        download_url: Option<String>,

        /// Where to look for a genome*.txt file when neither --genome nor
        /// --download-url is set
        #[arg(short = 's', long, default_value = ".")]
        search_dir: PathBuf,

        /// TOML configuration; see the default-config subcommand
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(short = 'j', long, default_value_t = false)]
        json: bool,

        /// Only log warnings and errors
        #[arg(short = 'q', long, default_value_t = false)]
        quiet: bool,
    },

    /// List every genotype in the reference data with its subject count
    Index {
        /// TOML configuration; see the default-config subcommand
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Only log warnings and errors
        #[arg(short = 'q', long, default_value_t = false)]
        quiet: bool,
    },

    /// Print the default configuration as TOML
    DefaultConfig,
}

fn init_logger(quiet: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter(None, level)
        .format_module_path(false)
        .init();
}

fn load_config(p: Option<&PathBuf>) -> Result<Config> {
    match p {
        Some(p) => Config::from_toml_file(p).context(ConfigSnafu),
        None => Ok(Config::default()),
    }
}

const NO_GENOME_HELP: &str = "\
No personal genotype file was found.

Download your raw data from your genetic testing service and either:
  - place it in the current directory under a name like genome_<name>.txt,
  - pass it with --genome <FILE>, or
  - pass --download-url <URL> with your access token exported in the
    variable named by `token_env` in the configuration.";

fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Report {
            genome,
            download_url,
            search_dir,
            config,
            json,
            quiet,
        } => {
            init_logger(quiet);
            let cfg = load_config(config.as_ref())?;
            let reference = Fetcher::new(cfg.timeout()).context(IoSnafu)?;

            let (personal_source, location) = match (genome, download_url) {
                (_, Some(url)) => {
                    let token = cfg.token();
                    if token.is_none() {
                        warn!("{} is not set; downloading without a token", cfg.token_env);
                    }
                    let f = Fetcher::new(cfg.timeout())
                        .context(IoSnafu)?
                        .with_token(token);
                    (f, url)
                }
                (Some(p), None) => (
                    Fetcher::new(cfg.timeout()).context(IoSnafu)?,
                    p.to_string_lossy().into_owned(),
                ),
                (None, None) => {
                    match personal::find_genome_file(&search_dir).context(PersonalSnafu)? {
                        Some(p) => {
                            info!("found {}", p.display());
                            (
                                Fetcher::new(cfg.timeout()).context(IoSnafu)?,
                                p.to_string_lossy().into_owned(),
                            )
                        }
                        None => {
                            println!("{NO_GENOME_HELP}");
                            return Ok(());
                        }
                    }
                }
            };

            let rpt = pipeline::run(&personal_source, &location, &reference, &cfg)
                .context(PipelineSnafu)?;
            if json {
                let s = report::render_json(&rpt.personal, &rpt.distribution)
                    .context(JsonSnafu)?;
                println!("{s}");
            } else {
                print!("{}", report::render_text(&rpt.personal, &rpt.distribution));
            }
        }
        Commands::Index { config, quiet } => {
            init_logger(quiet);
            let cfg = load_config(config.as_ref())?;
            let reference = Fetcher::new(cfg.timeout()).context(IoSnafu)?;
            let index = pipeline::build_index(&reference, &cfg).context(PipelineSnafu)?;
            println!(
                "{} subjects, {} genotypes",
                index.nsubjects(),
                index.ngenotypes()
            );
            for (tuple, n) in index.summary() {
                println!("{tuple}\t{n}");
            }
        }
        Commands::DefaultConfig => {
            let s = Config::default().to_toml_string().context(ConfigSnafu)?;
            print!("{s}");
        }
    }
    Ok(())
}
