use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use docsift::config::{self, Settings};
use docsift::embedder::Embedder;
use docsift::search::{DEFAULT_MATCH_COUNT, DEFAULT_MATCH_THRESHOLD};
use docsift::{
    ChunkStore, Chunker, Document, EmbeddingClient, Gpt2Tokenizer, HttpPageSource, ScrapeOutput,
    TokenCounter, WhitespaceTokenizer, build_prompt, crawl, embed_documents, sanitize,
};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(about = "Scrape documentation into token-bounded chunks, embed and search them", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON settings file (crawl seeds, chunking, embedding)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Token counter used for chunk budgets
    #[arg(long, global = true, value_enum, default_value_t = TokenizerKind::Gpt2)]
    tokenizer: TokenizerKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TokenizerKind {
    /// GPT-2/GPT-3 BPE (r50k_base)
    Gpt2,
    /// One token per word
    Whitespace,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the configured seeds and write chunked documents as JSON
    Scrape {
        #[arg(short, long, default_value = "scripts/pg.json")]
        out: PathBuf,
    },

    /// Chunk a local text file and print the result as JSON
    Chunk {
        file: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Embed every chunk of a scrape output and store it
    Embed {
        #[arg(short, long, default_value = "scripts/pg.json")]
        input: PathBuf,
        #[arg(long, default_value = "docsift.db")]
        db: String,
    },

    /// Find the stored chunks closest to a query
    Search {
        query: String,
        #[arg(long, default_value = "docsift.db")]
        db: String,
        #[arg(short = 'n', long, default_value_t = DEFAULT_MATCH_COUNT)]
        count: usize,
        #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
        threshold: f32,
        /// Print the completion prompt built from the matches
        #[arg(long)]
        prompt: bool,
    },

    /// Show store statistics
    Stats {
        #[arg(long, default_value = "docsift.db")]
        db: String,
    },
}

fn build_tokenizer(kind: TokenizerKind) -> Result<Box<dyn TokenCounter>> {
    Ok(match kind {
        TokenizerKind::Gpt2 => Box::new(Gpt2Tokenizer::new()?),
        TokenizerKind::Whitespace => Box::new(WhitespaceTokenizer),
    })
}

fn embedding_client(settings: &Settings) -> Result<EmbeddingClient> {
    let api_key = config::api_key();
    if api_key.is_none() {
        tracing::warn!("{} is not set, sending unauthenticated requests", config::API_KEY_VAR);
    }
    Ok(EmbeddingClient::new(
        &settings.embedding.base_url,
        api_key,
        settings.embedding.model_info(),
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config::load_dotenv();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scrape { out } => {
            let start = Instant::now();
            let chunker = Chunker::new(build_tokenizer(cli.tokenizer)?, settings.chunking.clone());
            let source = HttpPageSource::new()?;

            let mut visited = HashSet::new();
            let output = crawl(&source, &settings.crawl, &chunker, &mut visited).await;

            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create {}", parent.display()))?;
            }
            let json = serde_json::to_string(&output).context("Failed to serialize output")?;
            fs::write(&out, json).context(format!("Failed to write {}", out.display()))?;

            info!(
                path = %out.display(),
                essays = output.total_essays,
                chunks = output.chunk_count(),
                tokens = output.total_tokens,
                elapsed = ?start.elapsed(),
                "scrape written"
            );
        }

        Commands::Chunk { file, title, url } => {
            let raw = fs::read_to_string(&file)
                .context(format!("Failed to read {}", file.display()))?;
            let chunker = Chunker::new(build_tokenizer(cli.tokenizer)?, settings.chunking.clone());

            let content = sanitize(&raw);
            let tokens = chunker.count_tokens(&content);
            let document = Document::new(title, url, content, tokens);

            match chunker.chunk(document) {
                Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
                None => bail!("{} contains only the dead-page placeholder", file.display()),
            }
        }

        Commands::Embed { input, db } => {
            let raw = fs::read_to_string(&input)
                .context(format!("Failed to read {}", input.display()))?;
            let output: ScrapeOutput = serde_json::from_str(&raw)
                .context(format!("Failed to parse {}", input.display()))?;

            let store = ChunkStore::open(&db)?;
            let client = embedding_client(&settings)?;

            info!(
                essays = output.total_essays,
                chunks = output.chunk_count(),
                model = client.model_name(),
                "embedding"
            );
            let stats =
                embed_documents(&output.essays, &client, &store, settings.embedding.delay())
                    .await?;
            info!(
                embedded = stats.embedded,
                saved = stats.saved,
                failed = stats.failed,
                "embedding complete"
            );
        }

        Commands::Search {
            query,
            db,
            count,
            threshold,
            prompt,
        } => {
            let store = ChunkStore::open(&db)?;
            let client = embedding_client(&settings)?;

            let query_vector = client.embed(&query).await?;
            let matches = store.search(&query_vector, count, threshold)?;

            if prompt {
                let passages: Vec<&str> = matches.iter().map(|m| m.chunk.content.as_str()).collect();
                println!("{}", build_prompt(&query, &passages));
            } else {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            }
        }

        Commands::Stats { db } => {
            let store = ChunkStore::open(&db)?;
            let stats = store.get_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
