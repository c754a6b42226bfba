//! Submit prompts from the command line and print each completion as it arrives
//!
//! ```text
//! OPENAI_API_KEY=sk-... cargo run --example complete -- "First prompt" "Second prompt"
//! ```

use anyhow::Context;
use kotoba::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

enum Outcome {
    Text(String),
    Failed(RequestId, Error),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kotoba=info")),
        )
        .init();

    let mut prompts: Vec<String> = std::env::args().skip(1).collect();
    if prompts.is_empty() {
        prompts.push("Say hello in Japanese.".to_string());
    }

    let dispatcher = Dispatcher::from_env().context("failed to configure the dispatcher")?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    for prompt in &prompts {
        let on_text = tx.clone();
        let on_error = tx.clone();
        let id = dispatcher.submit_with(
            prompt.as_str(),
            move |text| {
                let _ = on_text.send(Outcome::Text(text));
            },
            move |id, error| {
                let _ = on_error.send(Outcome::Failed(id, error));
            },
        );
        tracing::info!(%id, "submitted");
    }
    drop(tx);

    while let Some(outcome) = rx.recv().await {
        match outcome {
            Outcome::Text(text) => println!("{}\n---", text),
            Outcome::Failed(id, error) => eprintln!("request {} failed: {}", id, error),
        }
    }

    Ok(())
}
