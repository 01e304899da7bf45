//! Cashflow shell

use clap::Parser;
use ledger_core::{spawn_ledger_actor, Ledger, Metrics};
use settlement::SettlementEngine;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufRead, BufReader};

mod cli;
mod commands;
mod input;
mod render;

use cli::{Cli, OutputFormat};
use commands::{parse_line, Response, Shell};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with shell output
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let ledger_config = match &cli.config {
        Some(path) => ledger_core::Config::from_file(path)?,
        None => ledger_core::Config::from_env()?,
    };
    let settlement_config = match &cli.settlement_config {
        Some(path) => settlement::Config::from_file(path)?,
        None => settlement::Config::from_env()?,
    };

    let metrics = if cli.metrics || ledger_config.metrics_enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    tracing::info!(
        self_transactions = ?ledger_config.self_transactions,
        tie_break = ?settlement_config.netting.tie_break,
        "Starting cashflow shell"
    );

    let mut ledger = Ledger::new(ledger_config);
    if let Some(metrics) = &metrics {
        ledger = ledger.with_metrics(metrics.clone());
    }
    let handle = spawn_ledger_actor(ledger);
    let shell = Shell::new(handle.clone(), SettlementEngine::new(handle.clone(), settlement_config));

    let interactive = cli.script.is_none() && std::io::stdin().is_terminal();
    let mut reader: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.script {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut buf = Vec::new();

    if interactive && cli.format == OutputFormat::Text {
        println!("Cash Flow Minimizer (type 'help' for commands)");
    }

    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = input::next_line(&mut reader, &mut buf).await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                emit(&Response::Rejected { message }, &cli)?;
                continue;
            }
        };

        let response = shell.execute(command).await?;
        emit(&response, &cli)?;
        if let Response::Quit = response {
            break;
        }
    }

    handle.shutdown().await?;

    if let Some(metrics) = &metrics {
        print!("{}", metrics.render());
    }

    Ok(())
}

fn emit(response: &Response, cli: &Cli) -> anyhow::Result<()> {
    match cli.format {
        OutputFormat::Text => {
            for (tone, line) in render::text_lines(response, &cli.currency) {
                println!("{}", render::paint(tone, &line));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(response)?);
        }
    }
    Ok(())
}
