use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read one line of shell input
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read,
/// so a garbled line reaches the parser and gets rejected like any other bad
/// command. Returns `None` at end of input.
pub async fn next_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{parse_line, Response, Shell};
    use ledger_core::{spawn_ledger_actor, Ledger};
    use settlement::SettlementEngine;

    #[tokio::test]
    async fn test_lines_and_eof() {
        let mut reader: &[u8] = b"add A\r\nadd B\nbalances";
        let mut buf = Vec::new();

        assert_eq!(next_line(&mut reader, &mut buf).await.unwrap().as_deref(), Some("add A"));
        assert_eq!(next_line(&mut reader, &mut buf).await.unwrap().as_deref(), Some("add B"));
        assert_eq!(next_line(&mut reader, &mut buf).await.unwrap().as_deref(), Some("balances"));
        assert_eq!(next_line(&mut reader, &mut buf).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_rejected_and_session_continues() {
        let handle = spawn_ledger_actor(Ledger::default());
        let engine = SettlementEngine::new(handle.clone(), settlement::Config::default());
        let shell = Shell::new(handle.clone(), engine);

        let mut reader: &[u8] = b"add A\nadd B\ntx A B \xff\xfe\nbalances\n";
        let mut buf = Vec::new();
        let mut responses = Vec::new();

        while let Some(line) = next_line(&mut reader, &mut buf).await.unwrap() {
            let response = match parse_line(&line) {
                Ok(Some(command)) => shell.execute(command).await.unwrap(),
                Ok(None) => continue,
                Err(message) => Response::Rejected { message },
            };
            responses.push(response);
        }

        assert_eq!(responses.len(), 4);
        assert!(matches!(responses[2], Response::Rejected { .. }));
        match &responses[3] {
            Response::Balances { balances } => {
                assert_eq!(balances.len(), 2);
                assert!(balances.iter().all(|(_, b)| *b == 0));
            }
            other => panic!("unexpected response: {:?}", other),
        }

        handle.shutdown().await.unwrap();
    }
}
