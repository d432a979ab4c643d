use anyhow::Result;
use askpipe_local::config::Settings;
use clap::Parser;

mod answer;
mod render;

#[derive(Parser, Debug)]
#[command(name = "askpipe")]
#[command(about = "Web-grounded Q&A: search, extract, and ask an LLM", long_about = None)]
struct Cli {
    /// Your question.
    query: String,
    /// Number of search results to request.
    #[arg(short = 'n', long)]
    num_results: Option<usize>,
    /// Skip web search and answer from the model alone.
    #[arg(long)]
    no_web: bool,
    /// Emit a JSON document instead of terminal panels.
    #[arg(long)]
    json: bool,
    /// Print the search/extraction report and propagate raw failures.
    #[arg(long)]
    debug: bool,
    /// Use the Gemini backend (the default).
    #[arg(long)]
    gemini: bool,
    /// Use the Groq backend.
    #[arg(long, conflicts_with = "gemini")]
    groq: bool,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let provider_override = if cli.groq {
        Some("groq")
    } else if cli.gemini {
        Some("gemini")
    } else {
        None
    };

    let settings = Settings::load()?;
    // The header names the backend that will actually answer: the flag
    // override when given, else the configured provider.
    let effective_provider = provider_override.unwrap_or(settings.llm.provider.as_str());

    if !cli.json {
        println!("{}", render::header(effective_provider, !cli.no_web));
        println!();
    }

    let request = answer::QueryRequest {
        query: &cli.query,
        num_results: cli.num_results,
        use_web: !cli.no_web,
        debug: cli.debug,
        as_json: cli.json,
        llm_provider: provider_override,
    };

    let out = answer::handle_query(&request, &settings).await?;
    println!("{out}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => Ok(()),
        // Debug mode propagates the raw failure with full detail.
        Err(e) if cli.debug => Err(e),
        Err(e) => {
            eprintln!("{}", render::error_line(&e));
            std::process::exit(1);
        }
    }
}
