use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::TcpStream;

use crate::client::ClientSession;
use crate::error::handlers::error_to_response;
use crate::error::{FtpServerError, ParseError};
use crate::middleware::logging::{log_command, log_connection, log_disconnect};
use crate::protocol::responses::{READY, UNKNOWN_COMMAND};
use crate::protocol::{CommandStatus, Response, handle_command, parse_command, send_response};
use crate::server::ServerContext;

/// One read from the control connection
#[derive(Debug, PartialEq, Eq)]
enum ControlLine {
    /// Peer closed the connection
    Closed,
    /// A complete line, or the unterminated tail before EOF
    Line,
    /// The line was longer than the limit and has been discarded
    TooLong,
}

/// Handles one control connection from greeting to close.
///
/// Commands are processed strictly in the order they arrive. The session,
/// and with it any open data connection, is dropped when this returns.
/// An `Err` means the control connection itself failed.
pub async fn handle_client(
    cmd_stream: TcpStream,
    client_addr: SocketAddr,
    ctx: Arc<ServerContext>,
) -> io::Result<()> {
    log_connection(&client_addr);

    let (read_half, mut write_half) = cmd_stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    let mut session = ClientSession::new(Arc::clone(&ctx.policy));

    send_response(
        &mut write_half,
        &Response::new(READY, "Service ready for new user."),
    )
    .await?;

    let result = loop {
        let read = match read_control_line(&mut reader, ctx.max_command_length, &mut buf).await {
            Ok(read) => read,
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break Err(e);
            }
        };

        let response = match read {
            ControlLine::Closed => {
                info!("Connection closed by client {}", client_addr);
                break Ok(());
            }
            ControlLine::TooLong => Some(Response::new(UNKNOWN_COMMAND, "Command line too long.")),
            ControlLine::Line => match std::str::from_utf8(&buf) {
                Ok(line) => {
                    log_command(&client_addr, line);
                    let command = parse_command(line);

                    match handle_command(&mut session, &command, &ctx, &mut write_half).await {
                        Ok(CommandStatus::Continue) => None,
                        Ok(CommandStatus::CloseConnection) => {
                            info!("Client {} requested to quit", client_addr);
                            break Ok(());
                        }
                        Err(e) => {
                            error!("Failed to write to {}: {}", client_addr, e);
                            break Err(e);
                        }
                    }
                }
                Err(_) => {
                    warn!("Non UTF-8 command line from {}", client_addr);
                    Some(error_to_response(&FtpServerError::from(
                        ParseError::InvalidEncoding,
                    )))
                }
            },
        };

        if let Some(response) = response {
            if let Err(e) = send_response(&mut write_half, &response).await {
                error!("Failed to write to {}: {}", client_addr, e);
                break Err(e);
            }
        }
    };

    session.close_data_connection();
    log_disconnect(&client_addr);
    result
}

/// Reads one line into `buf`, holding at most `max_len + 1` bytes of it.
///
/// A longer line is consumed up to its newline and reported as
/// `TooLong`.
async fn read_control_line<R>(
    reader: &mut R,
    max_len: usize,
    buf: &mut Vec<u8>,
) -> io::Result<ControlLine>
where
    R: AsyncBufRead + Unpin,
{
    let limit = max_len as u64 + 1;

    buf.clear();
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(ControlLine::Closed);
    }

    if buf.len() <= max_len {
        return Ok(ControlLine::Line);
    }

    // Discard the rest of the overlong line in bounded chunks
    while !buf.ends_with(b"\n") {
        buf.clear();
        if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
            break;
        }
    }
    buf.clear();
    Ok(ControlLine::TooLong)
}
