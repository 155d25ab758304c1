//! Module `data_channel`
//!
//! Opens the outbound data connection for active mode: the server dials
//! the endpoint the client advertised with PORT.

use log::{error, info};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

use crate::error::ConnectError;
use crate::transfer::DataEndpoint;

/// Default bound for opening a data connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to `endpoint`, giving up after `timeout`.
///
/// No retry is attempted. The returned stream belongs to the caller and is
/// closed when dropped.
pub async fn open_active(
    endpoint: DataEndpoint,
    timeout: Duration,
) -> Result<TcpStream, ConnectError> {
    info!("Active mode: connecting to client data socket {}", endpoint);

    let connect = TcpStream::connect(endpoint.socket_addr());
    let stream = connect_within(endpoint, timeout, connect).await?;
    info!("Data connection established with {}", endpoint);
    Ok(stream)
}

/// Drives a connect attempt to `endpoint`, failing once `timeout` elapses
async fn connect_within<T, F>(
    endpoint: DataEndpoint,
    timeout: Duration,
    connect: F,
) -> Result<T, ConnectError>
where
    F: Future<Output = io::Result<T>>,
{
    match time::timeout(timeout, connect).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => {
            error!("Failed to connect to data socket {}: {}", endpoint, source);
            Err(ConnectError::Io { endpoint, source })
        }
        Err(_) => {
            error!(
                "Timed out after {:?} connecting to data socket {}",
                timeout, endpoint
            );
            Err(ConnectError::TimedOut { endpoint, timeout })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_listening_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let endpoint = DataEndpoint::new(Ipv4Addr::LOCALHOST, port);

        let accept = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = String::new();
            socket.read_to_string(&mut received).await.unwrap();
            received
        });

        let mut stream = open_active(endpoint, DEFAULT_CONNECT_TIMEOUT).await.unwrap();
        stream.write_all(b"listing\r\n").await.unwrap();
        drop(stream);

        assert_eq!(accept.await.unwrap(), "listing\r\n");
    }

    #[tokio::test]
    async fn refused_connection_reports_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = DataEndpoint::new(Ipv4Addr::LOCALHOST, port);
        let err = open_active(endpoint, Duration::from_secs(2)).await.unwrap_err();
        assert_eq!(err.endpoint(), Some(endpoint));
    }

    #[tokio::test]
    async fn stalled_connect_times_out() {
        let endpoint = DataEndpoint::new(Ipv4Addr::new(192, 0, 2, 1), 20);
        let timeout = Duration::from_millis(50);

        let started = Instant::now();
        let result: Result<(), _> =
            connect_within(endpoint, timeout, std::future::pending::<io::Result<()>>()).await;
        let elapsed = started.elapsed();

        match result {
            Err(ConnectError::TimedOut { endpoint: e, timeout: t }) => {
                assert_eq!(e, endpoint);
                assert_eq!(t, timeout);
            }
            other => panic!("expected a timeout, got {:?}", other),
        }
        assert!(elapsed >= timeout, "took {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
    }
}
