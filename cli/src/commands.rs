use ledger_core::{BalanceSheet, DebtEdge, HistoryView, LedgerHandle};
use serde::Serialize;
use settlement::{SettlementEngine, SettlementPlan};

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Transaction { from: String, to: String, amount: String },
    Undo,
    Redo,
    Settle,
    Balances,
    Chart,
    History,
    Help,
    Quit,
}

pub const USAGE: &str = "\
Commands:
  add <name>                 register a person
  tx <from> <to> <amount>    <from> owes <to> <amount>
  undo | redo                step through transaction history
  settle                     minimise cash flow
  balances                   show net balances
  chart                      bar chart of net balances
  history                    applied and undone transactions
  help | quit
Names containing spaces can be quoted: tx \"Mary Ann\" Bob 100";

/// Parse a line; `Ok(None)` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = tokenize(trimmed)?;
    let (head, args) = match tokens.split_first() {
        Some((head, args)) => (head.to_ascii_lowercase(), args),
        None => return Ok(None),
    };

    let command = match (head.as_str(), args) {
        ("add", [_, ..]) => ShellCommand::Add(args.join(" ")),
        ("tx" | "transaction", [from, to, amount]) => ShellCommand::Transaction {
            from: from.clone(),
            to: to.clone(),
            amount: amount.clone(),
        },
        ("undo", []) => ShellCommand::Undo,
        ("redo", []) => ShellCommand::Redo,
        ("settle" | "minimize", []) => ShellCommand::Settle,
        ("balances", []) => ShellCommand::Balances,
        ("chart", []) => ShellCommand::Chart,
        ("history", []) => ShellCommand::History,
        ("help" | "?", []) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        ("add", []) => return Err("usage: add <name>".to_string()),
        ("tx" | "transaction", _) => return Err("usage: tx <from> <to> <amount>".to_string()),
        (other, _) => {
            return Err(format!("unknown command '{}' (try 'help')", other));
        }
    };

    Ok(Some(command))
}

/// Split on whitespace, keeping double-quoted runs together
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if quoted {
        return Err("unterminated quote".to_string());
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Result of executing a command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Added { name: String, added: bool },
    Recorded { edge: DebtEdge },
    Undone { edge: DebtEdge },
    Redone { edge: DebtEdge },
    Rejected { message: String },
    Plan { plan: SettlementPlan },
    Balances { balances: BalanceSheet },
    Chart { balances: BalanceSheet },
    History { history: HistoryView },
    Help,
    Quit,
}

/// Thin caller over the ledger actor and the settlement engine
#[derive(Debug)]
pub struct Shell {
    ledger: LedgerHandle,
    engine: SettlementEngine,
}

impl Shell {
    pub fn new(ledger: LedgerHandle, engine: SettlementEngine) -> Self {
        Self { ledger, engine }
    }

    /// Run one command
    ///
    /// Recoverable ledger failures come back as [`Response::Rejected`];
    /// anything else (e.g. a dead actor) is an error.
    pub async fn execute(&self, command: ShellCommand) -> anyhow::Result<Response> {
        let response = match command {
            ShellCommand::Add(name) => {
                let added = self.ledger.add_participant(name.as_str()).await?;
                Response::Added {
                    name: name.trim().to_string(),
                    added,
                }
            }
            ShellCommand::Transaction { from, to, amount } => {
                match self.ledger.record_transaction_text(from, to, amount).await {
                    Ok(edge) => Response::Recorded { edge },
                    Err(e) => rejected(e)?,
                }
            }
            ShellCommand::Undo => match self.ledger.undo().await {
                Ok(edge) => Response::Undone { edge },
                Err(e) => rejected(e)?,
            },
            ShellCommand::Redo => match self.ledger.redo().await {
                Ok(edge) => Response::Redone { edge },
                Err(e) => rejected(e)?,
            },
            ShellCommand::Settle => Response::Plan {
                plan: self.engine.run_settlement().await?,
            },
            ShellCommand::Balances => Response::Balances {
                balances: self.ledger.balances().await?,
            },
            ShellCommand::Chart => Response::Chart {
                balances: self.ledger.balances().await?,
            },
            ShellCommand::History => Response::History {
                history: self.ledger.history().await?,
            },
            ShellCommand::Help => Response::Help,
            ShellCommand::Quit => Response::Quit,
        };

        Ok(response)
    }
}

fn rejected(err: ledger_core::Error) -> anyhow::Result<Response> {
    if err.is_recoverable() {
        Ok(Response::Rejected {
            message: err.to_string(),
        })
    } else {
        Err(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{spawn_ledger_actor, Ledger};

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("add Alice").unwrap(), Some(ShellCommand::Add("Alice".into())));
        assert_eq!(
            parse_line("add Mary Ann").unwrap(),
            Some(ShellCommand::Add("Mary Ann".into()))
        );
        assert_eq!(
            parse_line("TX a b 10").unwrap(),
            Some(ShellCommand::Transaction {
                from: "a".into(),
                to: "b".into(),
                amount: "10".into()
            })
        );
        assert_eq!(parse_line("  undo ").unwrap(), Some(ShellCommand::Undo));
        assert_eq!(parse_line("minimize").unwrap(), Some(ShellCommand::Settle));
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_quoted_names() {
        assert_eq!(
            parse_line("tx \"Mary Ann\" Bob 100").unwrap(),
            Some(ShellCommand::Transaction {
                from: "Mary Ann".into(),
                to: "Bob".into(),
                amount: "100".into()
            })
        );
        assert!(parse_line("tx \"Mary Bob 100").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("add").is_err());
        assert!(parse_line("tx a b").is_err());
        assert!(parse_line("undo now").is_err());
        assert!(parse_line("launch").is_err());
    }

    #[tokio::test]
    async fn test_shell_session() {
        let handle = spawn_ledger_actor(Ledger::default());
        let engine = SettlementEngine::new(handle.clone(), settlement::Config::default());
        let shell = Shell::new(handle.clone(), engine);

        for line in ["add A", "add B", "add C", "tx A B 100", "tx B C 50"] {
            let command = parse_line(line).unwrap().unwrap();
            shell.execute(command).await.unwrap();
        }

        let response = shell.execute(ShellCommand::Settle).await.unwrap();
        match response {
            Response::Plan { plan } => assert_eq!(plan.payments.len(), 2),
            other => panic!("unexpected response: {:?}", other),
        }

        let response = shell
            .execute(parse_line("tx A B abc").unwrap().unwrap())
            .await
            .unwrap();
        assert!(matches!(response, Response::Rejected { .. }));

        shell.execute(ShellCommand::Undo).await.unwrap();
        shell.execute(ShellCommand::Undo).await.unwrap();
        let response = shell.execute(ShellCommand::Undo).await.unwrap();
        match response {
            Response::Rejected { message } => assert_eq!(message, "Nothing to undo"),
            other => panic!("unexpected response: {:?}", other),
        }

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_dead_actor_is_an_error() {
        let handle = spawn_ledger_actor(Ledger::default());
        let engine = SettlementEngine::new(handle.clone(), settlement::Config::default());
        let shell = Shell::new(handle.clone(), engine);

        handle.shutdown().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(shell.execute(ShellCommand::Undo).await.is_err());
    }
}
