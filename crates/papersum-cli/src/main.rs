use std::io::{IsTerminal, Write};

use clap::{Parser, Subcommand};

mod logging;
mod output;

use output::ColorMode;

/// papersum - Summarize an academic paper and open it as a Scrapbox page
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the PDF, summarize it with OpenAI and open a pre-filled Scrapbox page
    Summarize {
        /// URL of the paper's landing page
        page_url: String,

        /// Scrapbox project name (falls back to `scrapbox.project` in the config file)
        project: Option<String>,

        /// Direct PDF URL, for pages where the link cannot be found automatically
        #[arg(long)]
        pdf_url: Option<String>,

        /// OpenAI model name
        #[arg(long)]
        model: Option<String>,

        /// Build the Scrapbox URL but do not open a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Print the direct PDF URL for a landing page
    Resolve {
        /// URL of the paper's landing page
        page_url: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = dispatch(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());

    match cli.command {
        Command::Resolve { page_url } => resolve(&page_url).await,
        Command::Summarize {
            page_url,
            project,
            pdf_url,
            model,
            no_browser,
        } => summarize(page_url, project, pdf_url, model, no_browser, color).await,
    }
}

async fn resolve(page_url: &str) -> anyhow::Result<()> {
    let config = papersum_core::Config::load();
    let fetcher =
        papersum_resolve::HttpFetcher::new(papersum_core::build_client(), config.page_timeout());
    let resolution = papersum_resolve::PdfResolver::new(fetcher)
        .resolve(page_url)
        .await?;
    println!("{}", resolution.url);
    Ok(())
}

async fn summarize(
    page_url: String,
    project: Option<String>,
    pdf_url: Option<String>,
    model: Option<String>,
    no_browser: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = papersum_core::Config::load();
    if let Some(model) = model {
        config.openai_model = model;
    }
    if no_browser {
        config.skip_browser = true;
    }

    let Some(project) = project.or_else(|| config.scrapbox_project.clone()) else {
        anyhow::bail!(
            "No Scrapbox project given. Pass it as the second argument or set scrapbox.project in {}",
            papersum_core::config_file::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".papersum.toml".to_string())
        );
    };

    let request = papersum_core::Request {
        page_url,
        pdf_url,
        project,
    };

    let progress = |event: papersum_core::ProgressEvent| {
        let mut out = std::io::stdout();
        let _ = output::print_progress(&mut out, &event, color);
        let _ = out.flush();
    };

    let outcome = papersum_core::run(request, &config, progress).await?;

    if !outcome.opened {
        println!("{}", outcome.scrapbox_url);
    }
    Ok(())
}
