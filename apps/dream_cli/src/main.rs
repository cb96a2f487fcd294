use std::{
    io::{self, Write},
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    filter_dreams, load_dream_detail, load_history, CredentialStore, DreamApi,
    DreamInterpretationFlow, EmotionFilter, FlowSettings, HttpDreamApi, MemoryCredentialStore,
    Notifier, SubmitOutcome,
};
use shared::domain::{DreamId, InterpretationResult};
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "dream_cli", about = "Dream journal client with AI interpretation")]
struct Args {
    #[arg(long, default_value = "dream.toml")]
    config: PathBuf,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the access token.
    Login,
    /// Submit a dream and print its interpretation.
    Interpret { text: Vec<String> },
    /// List stored dreams, newest first.
    History {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        emotion: EmotionFilter,
    },
    /// Show one stored dream.
    Show { id: i64 },
}

/// Prints each notice once to the wrapped sink (stderr in the binary).
struct ConsoleNotifier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn show_error(&self, message: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "오류: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    if let Some(base_url) = &args.base_url {
        settings.api_base_url = config::normalize_base_url(base_url)?;
    }
    if let Some(token) = &args.token {
        settings.access_token = Some(token.clone());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();
    tracing::debug!(api_base_url = %settings.api_base_url, "settings loaded");

    let api = Arc::new(HttpDreamApi::new(settings.api_base_url.clone()));
    let credentials = Arc::new(MemoryCredentialStore::new());
    if let Some(token) = settings.access_token.clone() {
        credentials.store_token(token).await;
    }
    let notifier = Arc::new(ConsoleNotifier::new(io::stderr()));

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        let token = api.login(email, password).await?;
        credentials.store_token(token).await;
    }

    match args.command {
        Command::Login => {
            let token = credentials
                .token()
                .await
                .ok_or_else(|| anyhow!("login requires --email and --password"))?;
            println!("{token}");
        }
        Command::Interpret { text } => {
            let flow = DreamInterpretationFlow::with_settings(
                api,
                credentials,
                notifier,
                FlowSettings {
                    dream_title: settings.dream_title.clone(),
                },
            );
            match flow.submit(&text.join(" ")).await {
                SubmitOutcome::Completed => {
                    let result = flow
                        .result()
                        .await
                        .ok_or_else(|| anyhow!("interpretation finished without a result"))?;
                    print_interpretation(&result);
                }
                SubmitOutcome::Ignored => bail!("dream text must not be empty"),
                SubmitOutcome::Failed(err) => return Err(err.into()),
                SubmitOutcome::Stale => bail!("interpretation was superseded"),
            }
        }
        Command::History { query, emotion } => {
            let dreams = load_history(&*api, &*credentials, &*notifier).await?;
            for dream in filter_dreams(&dreams, &query, &emotion) {
                println!(
                    "{:>5}  {}  [{}] {}  {}",
                    dream.id, dream.date, dream.emotion, dream.title, dream.image
                );
            }
        }
        Command::Show { id } => {
            let detail = load_dream_detail(
                &*api,
                &*credentials,
                &*notifier,
                DreamId(id),
            )
            .await?;
            println!("{} ({})", detail.entry.title, detail.entry.created_at);
            println!("{}", detail.entry.content);
            if let Some(result) = &detail.result {
                println!();
                print_interpretation(result);
            }
        }
    }

    Ok(())
}

fn print_interpretation(result: &InterpretationResult) {
    println!("해석: {}", result.interpretation_text);
    println!(
        "감정: {} / {}",
        result.emotion.primary, result.emotion.secondary
    );
    println!("{}", result.emotion.description);
    for song in &result.recommendations {
        println!("추천 음악: {} - {}", song.title, song.artist);
        println!("  {}", song.source_url);
        println!("  {}", song.thumbnail_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_notifier_writes_each_notice_once() {
        let notifier = ConsoleNotifier::new(Vec::new());
        notifier.show_error("꿈 해석 결과를 불러오지 못했습니다.");
        notifier.show_error("로그인이 필요합니다.");

        let printed = String::from_utf8(notifier.into_inner()).expect("utf8");
        assert_eq!(
            printed,
            "오류: 꿈 해석 결과를 불러오지 못했습니다.\n오류: 로그인이 필요합니다.\n"
        );
    }
}
