mod config;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use bd_cms::{SanityClient, SanityConfig, SanityStore};
use bd_core::{ArticleGenerator, DraftStore, FeedSource, Result};
use bd_feed::RssFeed;
use bd_inference::GeminiModel;
use bd_pipeline::{DraftPipeline, DraftRequest, PipelineOutcome};
use config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Generative model to use
    #[arg(long, default_value = bd_inference::DEFAULT_MODEL)]
    model: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new draft, manually or from the news feed
    Draft {
        /// Draft title; switches to manual mode when --content is also given
        #[arg(long)]
        title: Option<String>,
        /// Draft body in Markdown
        #[arg(long)]
        content: Option<String>,
        /// Feed to scan in automated mode
        #[arg(long, default_value = config::DEFAULT_FEED_URL)]
        feed_url: String,
    },
    /// Append an AI summary and opinion to an existing post
    Enrich {
        /// Id of the target document
        document_id: String,
    },
    /// Print a post as JSON, looked up by exact title
    Show {
        #[arg(long)]
        title: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // every failure kind is reported the same way: logged, uniform exit code
    if let Err(e) = run().await {
        error!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    let model = cli.model.clone();

    let sanity = SanityClient::new(SanityConfig {
        project_id: config.project_id.clone(),
        dataset: config.dataset.clone(),
        token: config.sanity_token.clone(),
        ..SanityConfig::default()
    })?;

    match cli.command {
        Commands::Draft {
            title,
            content,
            feed_url,
        } => {
            let request = DraftRequest::from_args(title, content);
            if matches!(request, DraftRequest::Automated) {
                // fatal precondition, checked before any network activity
                config.require_gemini_key()?;
            }

            let pipeline = build_pipeline(&model, &config, sanity, &feed_url)?;
            match pipeline.run(request).await? {
                PipelineOutcome::Drafted(saved) => {
                    info!("✅ Draft created: {}", saved.id);
                    info!("👀 View it at: {}", saved.url);
                }
                PipelineOutcome::NothingToDo => {
                    info!("⏭️ No matching feed item, no draft created");
                }
            }
        }
        Commands::Enrich { document_id } => {
            config.require_gemini_key()?;
            let pipeline = build_pipeline(&model, &config, sanity, config::DEFAULT_FEED_URL)?;
            let saved = pipeline.enrich(&document_id).await?;
            info!("✅ Post updated: {}", saved.id);
            info!("👀 View it at: {}", saved.url);
        }
        Commands::Show { title } => {
            let query =
                r#"*[_type == "post" && title == $title][0]{_id, "slug": slug.current, title, body}"#;
            let result = sanity
                .fetch(query, &[("title", serde_json::json!(title))])
                .await?;
            if result.is_null() {
                info!("Post with title \"{}\" not found", title);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
    }

    Ok(())
}

fn build_pipeline(
    model: &str,
    config: &Config,
    sanity: SanityClient,
    feed_url: &str,
) -> Result<DraftPipeline> {
    let generator: Arc<dyn ArticleGenerator> = Arc::new(GeminiModel::new(
        config.gemini_api_key.clone(),
        model,
    )?);
    info!("🧠 Generative model ready (using {})", generator.name());

    let store: Arc<dyn DraftStore> = Arc::new(SanityStore::new(sanity));
    let feed: Arc<dyn FeedSource> = Arc::new(RssFeed::new()?);

    Ok(DraftPipeline::new(feed, generator, store, feed_url))
}
