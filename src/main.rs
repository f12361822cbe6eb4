use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use eyre::{Result, eyre};
use log::{debug, info, warn};

use ytqa::config::{Config, DEFAULT_LANG, DEFAULT_MODEL, Settings};
use ytqa::generate::{Generator, HttpGenerator, Provider};
use ytqa::output::{Report, render_json, render_text};
use ytqa::prompt::{Dispatcher, Prompts};
use ytqa::session::Session;
use ytqa::youtube::{CaptionSource, YouTubeCaptions};

mod cli;

use cli::{Cli, Command, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytqa.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytqa")
        .join("logs")
}

fn credential_line(provider: Provider) -> String {
    let var = provider.env_var();
    let set = std::env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false);
    if set {
        format!("  \x1b[32m✅\x1b[0m {var:<18} ({provider})")
    } else {
        format!("  \x1b[31m❌\x1b[0m {var:<18} ({provider}, not set)")
    }
}

fn build_after_help() -> String {
    let credentials = [Provider::Gemini, Provider::Anthropic, Provider::OpenAi]
        .into_iter()
        .map(credential_line)
        .collect::<Vec<_>>()
        .join("\n");

    let log_path = log_dir().join("ytqa.log");

    format!(
        "\nAPI KEYS:\n{credentials}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytqa::config::config_path().display(),
        log_path.display()
    )
}

fn output_format(cli: &Cli, config: &Config) -> OutputFormat {
    if let Some(format) = cli.format {
        return format;
    }
    match config.default_format.as_deref() {
        Some("json") => OutputFormat::Json,
        Some("text") | None => OutputFormat::Text,
        Some(other) => {
            warn!("Unknown default_format {other:?} in config, using text");
            OutputFormat::Text
        }
    }
}

fn render(report: &Report, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
    }
}

fn emit(cli: &Cli, report: &Report, format: OutputFormat) -> Result<()> {
    let rendered = render(report, format);
    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }
    Ok(())
}

async fn load<C: CaptionSource, G: Generator>(
    session: &mut Session<C, G>,
    url: &str,
    verbose: bool,
) -> Result<ytqa::VideoRef> {
    let transcript = session.load(url).await?;
    let (fragments, language) = (transcript.fragment_count, transcript.language.clone());
    let video = session
        .video()
        .cloned()
        .ok_or_else(|| eyre!("no video loaded from: {url}"))?;

    if verbose {
        eprintln!(
            "Video: {}\nThumbnail: {}\nCaption track: {language}\nFragments: {fragments}",
            video.video_id(),
            video.thumbnail_url()
        );
    }
    Ok(video)
}

/// One line typed into the interactive loop
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Summary,
    Load(Option<&'a str>),
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Input::Empty,
        ":quit" | ":q" | "exit" | "quit" if rest.is_empty() => Input::Quit,
        ":summary" | ":s" if rest.is_empty() => Input::Summary,
        ":url" => Input::Load((!rest.is_empty()).then_some(rest)),
        _ => Input::Question(line),
    }
}

fn prompt_line(label: &str) -> Result<Option<String>> {
    print!("{label} ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

async fn run_interactive<C: CaptionSource, G: Generator>(
    session: &mut Session<C, G>,
    initial_url: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    println!("Commands: :url <URL> loads a video, :summary summarizes it, :quit exits.");
    println!("Anything else is asked as a question about the loaded video.\n");

    let mut pending = initial_url;
    if pending.is_none() {
        pending = prompt_line("Video URL:")?;
    }

    loop {
        if let Some(url) = pending.take().filter(|u| !u.is_empty()) {
            println!("Fetching video transcript...");
            match session.load(&url).await {
                Ok(transcript) if transcript.is_empty() => {
                    println!("This video has no caption text; summary and questions are disabled.")
                }
                Ok(transcript) => println!(
                    "Transcript ready ({} fragments, {} captions).",
                    transcript.fragment_count, transcript.language
                ),
                Err(e) => eprintln!("Error: {e}"),
            }
            if let Some(video) = session.video() {
                println!("Thumbnail: {}", video.thumbnail_url());
            }
        }

        let Some(line) = prompt_line(">")? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Summary => {
                if !session.can_summarize() {
                    eprintln!("Generate Summary is disabled: load a video with captions first.");
                    continue;
                }
                println!("Generating summary...");
                match session.summarize().await {
                    Ok(summary) => match session.video() {
                        Some(video) => println!("{}\n", render(&Report::summary(video, summary), format)),
                        None => println!("{summary}\n"),
                    },
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Input::Load(Some(url)) => pending = Some(url.to_string()),
            Input::Load(None) => eprintln!("Usage: :url <URL>"),
            Input::Question(question) => {
                if !session.can_answer(question) {
                    eprintln!("Get Answer is disabled: load a video with captions first.");
                    continue;
                }
                println!("Generating answer...");
                let question = question.to_string();
                match session.answer(&question).await {
                    Ok(answer) => match session.video() {
                        Some(video) => println!("{}\n", render(&Report::answer(video, &question, answer), format)),
                        None => println!("{answer}\n"),
                    },
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG, so it must be loaded before the logger
    let dotenv_path = dotenv::dotenv().ok();
    setup_logging()?;
    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {}", path.display());
    }

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring invalid config file: {e:#}");
        eprintln!("Warning: ignoring invalid config file {}: {e}", ytqa::config::config_path().display());
        Config::default()
    });

    // CLI flags take priority over config defaults
    let model = cli
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let lang = cli
        .lang
        .clone()
        .or_else(|| config.default_lang.clone())
        .unwrap_or_else(|| DEFAULT_LANG.to_string());
    let format = output_format(&cli, &config);

    // A missing credential stops the process before any request is made
    let settings = Settings::from_env(&model)?;

    if cli.verbose {
        let config_path = ytqa::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Model: {} ({})\nCaption language: {lang}", settings.model, settings.provider);
    }

    let client = reqwest::Client::new();
    let captions = YouTubeCaptions::new(client.clone(), lang);
    let generator = HttpGenerator::new(client, &settings);
    let dispatcher = Dispatcher::new(generator, Prompts::from_config(&config));
    let mut session = Session::new(captions, dispatcher);

    match &cli.command {
        Command::Summarize { url } => {
            let video = load(&mut session, url, cli.verbose).await?;
            let summary = session.summarize().await?;
            emit(&cli, &Report::summary(&video, summary), format)?;
        }
        Command::Ask { url, question } => {
            let video = load(&mut session, url, cli.verbose).await?;
            let answer = session.answer(question).await?;
            emit(&cli, &Report::answer(&video, question, answer), format)?;
        }
        Command::Transcript { url } => {
            let video = load(&mut session, url, cli.verbose).await?;
            let report = match session.transcript() {
                Some(transcript) => Report::transcript(&video, transcript),
                None => return Err(eyre!("video {} has no caption text", video.video_id())),
            };
            emit(&cli, &report, format)?;
        }
        Command::Interactive { url } => {
            run_interactive(&mut session, url.clone(), format).await?;
        }
    }

    Ok(())
}
