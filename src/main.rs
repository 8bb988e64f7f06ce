mod chat;
mod config;
mod error;
mod fallback;
mod llm_client;
mod logging;
mod models;
mod pricing;
mod providers;
mod request_id;
mod usage;

use chat::{ChatService, ImageOptions};
use clap::Parser;
use config::Config;
use llm_client::LlmClient;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(name = "asset-chat")]
#[command(about = "Chat with Gemini or OpenAI about game assets and generate images with cost reports")]
struct Args {
    /// Prompt to send; without one an interactive session starts
    prompt: Option<String>,

    /// Path to config file
    #[arg(short, long, default_value = "asset-chat.yaml")]
    config: String,

    /// trace, debug, info, warn, error (overrides the config file)
    #[arg(short, long)]
    log_level: Option<String>,

    /// socks and http proxy, example: socks5://192.168.0.2:10080
    #[arg(long)]
    proxy: Option<String>,

    /// Generate an image from the prompt instead of a text reply
    #[arg(long)]
    image: bool,

    /// Image size, e.g. 1024x1024, 1536x1024 or 2K
    #[arg(long)]
    size: Option<String>,

    /// Image quality, e.g. low, medium, high, standard, hd
    #[arg(long)]
    quality: Option<String>,

    /// Image model override
    #[arg(long)]
    model: Option<String>,

    /// Number of images
    #[arg(short, long)]
    n: Option<u32>,
}

impl Args {
    fn image_options(&self) -> ImageOptions {
        ImageOptions {
            size: self.size.clone(),
            quality: self.quality.clone(),
            model: self.model.clone(),
            n: self.n,
            images: Vec::new(),
        }
    }
}

async fn run_image(chat: &mut ChatService, prompt: &str, options: ImageOptions) -> anyhow::Result<()> {
    let response = chat.generate_image(prompt, options).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn run_text(chat: &mut ChatService, prompt: &str) -> anyhow::Result<()> {
    let reply = chat.generate_response(prompt, Vec::new()).await;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Quit,
    Clear,
    History,
    Image(&'a str),
    Text(&'a str),
}

/// Parse one interactive line; `Err` carries a usage hint.
fn parse_command(line: &str) -> Result<Command<'_>, &'static str> {
    match line {
        "/quit" | "/exit" => Ok(Command::Quit),
        "/clear" => Ok(Command::Clear),
        "/history" => Ok(Command::History),
        "/image" => Err("usage: /image <prompt>"),
        _ => match line.strip_prefix("/image ").map(str::trim) {
            Some("") => Err("usage: /image <prompt>"),
            Some(prompt) => Ok(Command::Image(prompt)),
            None => Ok(Command::Text(line)),
        },
    }
}

async fn interactive(chat: &mut ChatService, args: &Args) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Commands: /image <prompt>, /history, /clear, /quit");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let result = match parse_command(line) {
            Err(usage) => {
                eprintln!("{}", usage);
                continue;
            }
            Ok(Command::Quit) => break,
            Ok(Command::Clear) => {
                chat.clear_history();
                eprintln!("History cleared");
                continue;
            }
            Ok(Command::History) => {
                println!("{}", serde_json::to_string_pretty(chat.history())?);
                continue;
            }
            Ok(Command::Image(prompt)) => run_image(chat, prompt, args.image_options()).await,
            Ok(Command::Text(prompt)) => run_text(chat, prompt).await,
        };
        // keep the session alive on a failed image request
        if let Err(e) = result {
            error!("{}", e);
            eprintln!("error: {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)?;

    let log_level = match &args.log_level {
        Some(level) => Level::from_str(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level: {}. Using INFO level.", level);
            Level::INFO
        }),
        None => config.logging.level()?,
    };
    logging::init_logging(log_level, config.logging.file.as_deref(), config.logging.max_file_bytes);
    info!("Configuration loaded from: {}", args.config);

    let client_builder = reqwest::Client::builder();
    let client_builder = match &args.proxy {
        Some(proxy) => client_builder.proxy(reqwest::Proxy::all(proxy)?),
        None => client_builder,
    };
    let llm_client = LlmClient::new(Arc::new(client_builder.build()?));

    let provider = providers::create_provider(&config, llm_client);
    let mut chat = ChatService::new(provider, config.system_prompt.clone());
    match chat.provider_name() {
        Some(name) => info!("Active provider: {}", name),
        None => info!("No provider configured; text replies will be canned"),
    }

    match &args.prompt {
        Some(prompt) if args.image => run_image(&mut chat, prompt, args.image_options()).await,
        Some(prompt) => run_text(&mut chat, prompt).await,
        None => interactive(&mut chat, &args).await,
    }
}
