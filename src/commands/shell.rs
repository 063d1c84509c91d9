use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{execute, Command, Reply};
use crate::persistence::Storage;
use crate::state::Session;

const PROMPT: &str = "text> ";

/// Reads commands line by line until `quit` or end of input.
pub async fn run_shell<S, R, W>(session: &mut Session<S>, input: R, mut output: W) -> Result<()>
where
    S: Storage,
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    output.write_all(b"TextUtils. Type 'help' for commands.\n").await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output.write_all(format!("{}\n", e).as_bytes()).await?;
                continue;
            }
        };

        let reply = execute(session, command).await;
        write_reply(&mut output, &reply).await?;
        if reply.quit {
            break;
        }
    }

    output.flush().await?;
    tracing::info!("Shell closed");
    Ok(())
}

async fn write_reply<W: AsyncWrite + Unpin>(output: &mut W, reply: &Reply) -> Result<()> {
    for line in &reply.output {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    if let Some(note) = &reply.notification {
        output.write_all(format!("{}\n", note).as_bytes()).await?;
    }
    Ok(())
}
