//! Command handlers module
//!
//! Dispatches parsed commands to the session, writes the replies on the
//! control connection and drives LIST over the data connection.

use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::client::ClientSession;
use crate::error::handlers::error_to_response;
use crate::error::{AuthError, ConnectError, FtpServerError};
use crate::protocol::responses::{
    AUTH_FAILED, DATA_CONNECTION_OPEN, GOODBYE, OK, Response, SYSTEM_TYPE, TRANSFER_COMPLETE,
    UNKNOWN_COMMAND,
};
use crate::protocol::{Command, CommandStatus};
use crate::server::ServerContext;
use crate::storage::format_listing;

/// Writes one reply line to the control connection
pub async fn send_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    debug!("sent: {}", response);
    writer.write_all(&response.encode()).await?;
    writer.flush().await
}

/// Dispatches a received FTP command to its corresponding handler.
///
/// Errors returned here are control connection failures only; everything
/// else is answered with a reply code.
pub async fn handle_command<W>(
    session: &mut ClientSession,
    command: &Command,
    ctx: &ServerContext,
    writer: &mut W,
) -> io::Result<CommandStatus>
where
    W: AsyncWrite + Unpin,
{
    match command {
        Command::User(username) => {
            let response = session.handle_user(username);
            send_response(writer, &response).await?;
        }
        Command::Pass(password) => return handle_cmd_pass(session, password, writer).await,
        Command::Port(line) => {
            let response = match session.handle_port(line) {
                Ok(endpoint) => {
                    info!("Data endpoint set to {}", endpoint);
                    Response::new(OK, "PORT command successful.")
                }
                Err(e) => {
                    warn!("Rejected {:?}: {}", line, e);
                    error_to_response(&FtpServerError::from(e))
                }
            };
            send_response(writer, &response).await?;
        }
        Command::Type(code) => {
            let response = session.handle_type(code);
            send_response(writer, &response).await?;
        }
        Command::List(path) => handle_cmd_list(session, path.as_deref(), ctx, writer).await?,
        Command::Syst => {
            send_response(writer, &Response::new(SYSTEM_TYPE, "UNIX Type: L8")).await?;
        }
        Command::Noop => {
            send_response(writer, &Response::new(OK, "Command okay.")).await?;
        }
        Command::Quit => {
            session.close_data_connection();
            send_response(writer, &Response::new(GOODBYE, "Goodbye.")).await?;
            return Ok(CommandStatus::CloseConnection);
        }
        Command::Unknown(verb) => {
            debug!("Unknown command {:?}", verb);
            send_response(
                writer,
                &Response::new(UNKNOWN_COMMAND, "Syntax error, command unrecognized."),
            )
            .await?;
        }
    }

    Ok(CommandStatus::Continue)
}

/// PASS, with the optional failure delay and attempt limit applied
async fn handle_cmd_pass<W>(
    session: &mut ClientSession,
    password: &str,
    writer: &mut W,
) -> io::Result<CommandStatus>
where
    W: AsyncWrite + Unpin,
{
    let response = session.handle_pass(password);

    if response.code() == AUTH_FAILED {
        let delay = session.login_failure_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    send_response(writer, &response).await?;

    if let Err(e) = session.check_login_attempts() {
        warn!("Closing session of {:?}: {}", session.username(), e);
        send_response(writer, &session.login_limit_response(e)).await?;
        return Ok(CommandStatus::CloseConnection);
    }

    Ok(CommandStatus::Continue)
}

/// LIST: renders the listing, opens the data connection, streams the lines
/// and closes the data connection again on every path.
async fn handle_cmd_list<W>(
    session: &mut ClientSession,
    path: Option<&str>,
    ctx: &ServerContext,
    writer: &mut W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if !session.is_authenticated() {
        let response = error_to_response(&FtpServerError::from(AuthError::NotLoggedIn));
        return send_response(writer, &response).await;
    }

    let target = path.unwrap_or(".").to_string();
    let source = Arc::clone(&ctx.metadata);
    let lookup = target.clone();
    let listing = tokio::task::spawn_blocking(move || format_listing(source.as_ref(), &lookup))
        .await
        .map_err(io::Error::other)?;

    let lines = match listing {
        Ok(lines) => lines,
        Err(e) => {
            warn!("LIST {} failed: {}", target, e);
            return send_response(writer, &error_to_response(&FtpServerError::from(e))).await;
        }
    };

    if let Err(e) = session.open_data_connection(ctx.data_timeout).await {
        warn!("LIST aborted: {}", e);
        return send_response(writer, &error_to_response(&FtpServerError::from(e))).await;
    }

    let message = format!(
        "Opening {} mode data connection for file list.",
        session.transfer_mode().name()
    );
    send_response(writer, &Response::new(DATA_CONNECTION_OPEN, message)).await?;

    let result = match session.take_data_connection() {
        Some(data) => send_listing(data, &lines).await,
        None => Err(io::Error::from(io::ErrorKind::NotConnected)),
    };

    let response = match result {
        Ok(()) => {
            info!("Sent {} listing entries for {}", lines.len(), target);
            Response::new(TRANSFER_COMPLETE, "Transfer complete.")
        }
        Err(e) => {
            warn!("Listing transfer for {} failed: {}", target, e);
            error_to_response(&FtpServerError::from(ConnectError::Interrupted(e)))
        }
    };
    send_response(writer, &response).await
}

/// Writes the listing and closes the data connection
async fn send_listing(mut data: TcpStream, lines: &[String]) -> io::Result<()> {
    for line in lines {
        data.write_all(line.as_bytes()).await?;
    }
    data.shutdown().await
}
