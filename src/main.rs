//! Terminal shell for the healthcoach orchestrator.
//!
//! Thin presentation layer: reads one message per line, prints the
//! assembled markdown reply. Everything with control-flow weight lives in
//! the library — the shell only wires send / clear / export and the two
//! display toggles, and runs turns serially (one in flight at a time).

use std::io::Write;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;

use healthcoach::backend::BackendConfig;
use healthcoach::orchestrator::{ChatSession, Orchestrator, RenderOptions};

/// Initialize the tracing subscriber — structured logs on stderr so they
/// never interleave with chat output on stdout.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("healthcoach=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = BackendConfig::load().context("loading configuration")?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        "healthcoach starting"
    );

    let orchestrator = Orchestrator::new(&config).context("building backend client")?;
    let mut session = ChatSession::new(orchestrator);
    let mut options = RenderOptions::default();

    println!("Coach Preventivo — Orquestador (RAG + ML)");
    println!("Comandos: /health, /kb <tema> · Shell: :clear, :export, :drivers, :citas, :quit");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };

        match line.trim() {
            ":quit" => break,
            ":clear" => {
                session.clear();
                println!("(conversación reiniciada)");
            }
            ":export" => match session.export_pdf().await {
                Some(path) => println!("PDF listo: {path}"),
                None => println!("(sin PDF disponible)"),
            },
            ":drivers" => {
                options.show_drivers = !options.show_drivers;
                println!("drivers: {}", options.show_drivers);
            }
            ":citas" => {
                options.include_citations = !options.include_citations;
                println!("citas: {}", options.include_citations);
            }
            message => {
                if let Some(turn) = session.send(message, &options).await {
                    println!("{}\n", turn.reply);
                }
            }
        }
    }

    Ok(())
}
