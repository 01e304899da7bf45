use crate::commands::{Response, USAGE};
use colored::{ColoredString, Colorize};
use ledger_core::{BalanceSheet, DebtEdge};

const CHART_WIDTH: u128 = 40;

/// Style of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Success,
    Warning,
    Heading,
}

/// Plain-text lines for a response, tagged with how to colour them
pub fn text_lines(response: &Response, currency: &str) -> Vec<(Tone, String)> {
    match response {
        Response::Added { name, added: true } => {
            vec![(Tone::Success, format!("Added person: {}", name))]
        }
        Response::Added { added: false, .. } => vec![],
        Response::Recorded { edge } => vec![(Tone::Success, edge_line(edge, currency))],
        Response::Undone { edge } => vec![(
            Tone::Plain,
            format!("Undid transaction: {}", edge_line(edge, currency)),
        )],
        Response::Redone { edge } => vec![(
            Tone::Plain,
            format!("Redid transaction: {}", edge_line(edge, currency)),
        )],
        Response::Rejected { message } => vec![(Tone::Warning, format!("{}.", message))],
        Response::Plan { plan } => {
            let mut lines = vec![(Tone::Heading, "--- Optimized Transactions ---".to_string())];
            for payment in &plan.payments {
                lines.push((
                    Tone::Plain,
                    format!(
                        "{} pays {}{} to {}",
                        payment.payer, currency, payment.amount, payment.payee
                    ),
                ));
            }
            if plan.is_settled() {
                lines.push((Tone::Plain, "Everyone is settled.".to_string()));
            } else {
                lines.push((
                    Tone::Plain,
                    format!(
                        "{} payments instead of {} ({:.1}% less money moved)",
                        plan.stats.net_transfer_count,
                        plan.stats.gross_edge_count,
                        plan.stats.efficiency * 100.0
                    ),
                ));
            }
            lines.push((Tone::Heading, "-".repeat(31)));
            lines
        }
        Response::Balances { balances } => balances
            .iter()
            .map(|(id, balance)| (Tone::Plain, format!("{}: {}{}", id, currency, balance)))
            .collect(),
        Response::Chart { balances } => chart_lines(balances, currency),
        Response::History { history } => {
            let mut lines = vec![(Tone::Heading, "Applied:".to_string())];
            lines.extend(
                history
                    .applied
                    .iter()
                    .map(|e| (Tone::Plain, format!("  {} {}", e.id, edge_line(e, currency)))),
            );
            lines.push((Tone::Heading, "Undone:".to_string()));
            lines.extend(
                history
                    .undone
                    .iter()
                    .map(|e| (Tone::Plain, format!("  {} {}", e.id, edge_line(e, currency)))),
            );
            lines
        }
        Response::Help => USAGE.lines().map(|l| (Tone::Plain, l.to_string())).collect(),
        Response::Quit => vec![],
    }
}

/// Apply terminal colours
pub fn paint(tone: Tone, line: &str) -> ColoredString {
    match tone {
        Tone::Plain => line.normal(),
        Tone::Success => line.green(),
        Tone::Warning => line.yellow(),
        Tone::Heading => line.bold(),
    }
}

fn edge_line(edge: &DebtEdge, currency: &str) -> String {
    format!("{} → {} : {}{}", edge.from, edge.to, currency, edge.amount)
}

/// Horizontal bar per participant, scaled to the largest |balance|
fn chart_lines(balances: &BalanceSheet, currency: &str) -> Vec<(Tone, String)> {
    let mut lines = vec![(Tone::Heading, "Net Balances per Person".to_string())];

    let max = balances
        .iter()
        .map(|(_, b)| b.unsigned_abs() as u128)
        .max()
        .unwrap_or(0);
    let label_width = balances.iter().map(|(id, _)| id.as_str().chars().count()).max().unwrap_or(0);

    for (id, balance) in balances.iter() {
        let magnitude = balance.unsigned_abs() as u128;
        let len = if magnitude == 0 {
            0
        } else {
            ((magnitude * CHART_WIDTH) / max).max(1) as usize
        };
        let (bar, tone) = if *balance < 0 {
            ("░".repeat(len), Tone::Warning)
        } else {
            ("█".repeat(len), Tone::Success)
        };
        lines.push((
            tone,
            format!(
                "{:<width$} | {} {}{}",
                id.as_str(),
                bar,
                currency,
                balance,
                width = label_width
            ),
        ));
    }

    lines
}
