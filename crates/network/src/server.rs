//! HTTP server on top of the [`tokio`] network stack.

use std::{fmt::Debug, future::Future, sync::Arc};

use fansim_app::{core::RGB8, Engine};
use smart_leds::SmartLedsWrite;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

use crate::{Command, FanError, FanResult, Response};

/// Upper bound of the request line together with the headers.
const MAX_REQUEST_HEAD_LEN: u64 = 8 * 1024;

/// Request line of an incoming HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Request path without the query string.
    pub path: String,
}

impl Request {
    /// Parses a request line like `GET /fan/on HTTP/1.1`.
    pub fn parse(line: &str) -> FanResult<Self> {
        let mut parts = line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(FanError::Decode);
        };

        if !version.starts_with("HTTP/") {
            return Err(FanError::Decode);
        }

        let path = target.split_once('?').map_or(target, |(path, _query)| path);
        Ok(Self {
            method: method.to_owned(),
            path: path.to_owned(),
        })
    }

    /// Maps this request onto the engine command.
    ///
    /// Returns an error response if there is no such command.
    pub fn command(&self) -> Result<Command, Response> {
        if self.method != "GET" {
            return Err(Response::method_not_allowed());
        }
        self.path.parse().map_err(|_| Response::not_found())
    }
}

/// Serves engine commands on the given listener until `shutdown` resolves.
///
/// Every connection is handled by its own task, a connection carries a single request.
pub async fn serve<D, F>(engine: Arc<Engine<D>>, listener: TcpListener, shutdown: F) -> FanResult<()>
where
    D: SmartLedsWrite<Color = RGB8> + Send + 'static,
    D::Error: Debug,
    F: Future<Output = ()>,
{
    let local_address = listener.local_addr().map_err(FanError::network)?;
    log::info!("Listening for commands on the {local_address}");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                log::info!("Command server on the {local_address} is shutting down");
                return Ok(());
            }

            accepted = listener.accept() => {
                let (stream, address) = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        log::warn!("Unable to accept an incoming connection: {err}");
                        continue;
                    }
                };

                log::debug!("Accepted an incoming connection from the {address}");
                let engine = engine.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_connection(engine, stream).await {
                        log::info!("Closed connection with {address}: {err}");
                    }
                });
            }
        }
    }
}

async fn handle_connection<D>(engine: Arc<Engine<D>>, mut stream: TcpStream) -> FanResult<()>
where
    D: SmartLedsWrite<Color = RGB8> + Send + 'static,
    D::Error: Debug,
{
    let (reader, mut writer) = stream.split();
    let mut reader = BufReader::new(reader.take(MAX_REQUEST_HEAD_LEN));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .map_err(FanError::network)?;
    // Headers are not interesting, but they have to be read before responding.
    loop {
        let mut header = String::new();
        let len = reader
            .read_line(&mut header)
            .await
            .map_err(FanError::network)?;
        if len == 0 || header.trim_end().is_empty() {
            break;
        }
    }

    let response = match Request::parse(&request_line) {
        Ok(request) => {
            log::debug!("Got {} {}", request.method, request.path);
            match request.command() {
                Ok(command) => execute(engine, command).await,
                Err(response) => response,
            }
        }
        Err(err) => {
            log::debug!("Unable to parse request line {request_line:?}: {err}");
            Response::bad_request()
        }
    };

    writer
        .write_all(&response.to_bytes())
        .await
        .map_err(FanError::network)?;
    writer.shutdown().await.map_err(FanError::network)
}

/// Runs the command off the async runtime, starting a worker may wait for the previous one.
async fn execute<D>(engine: Arc<Engine<D>>, command: Command) -> Response
where
    D: SmartLedsWrite<Color = RGB8> + Send + 'static,
    D::Error: Debug,
{
    match tokio::task::spawn_blocking(move || command.execute(&engine)).await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            log::error!("Unable to execute {command:?}: {err}");
            Response::internal_error(&err.to_string())
        }
        Err(err) => {
            log::error!("Command {command:?} panicked: {err}");
            Response::internal_error("Command execution panicked")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_line() {
        assert_eq!(
            Request::parse("GET /fan/speed/90?source=web HTTP/1.1\r\n"),
            Ok(Request {
                method: "GET".to_owned(),
                path: "/fan/speed/90".to_owned(),
            })
        );
        assert_eq!(Request::parse(""), Err(FanError::Decode));
        assert_eq!(Request::parse("GET /fan/on"), Err(FanError::Decode));
        assert_eq!(Request::parse("GET /fan/on FTP/1.0"), Err(FanError::Decode));
    }

    #[test]
    fn test_request_command() {
        let request = Request::parse("POST /fan/on HTTP/1.1").unwrap();
        assert_eq!(request.command().unwrap_err().status, 405);

        let request = Request::parse("GET /fan/spin HTTP/1.1").unwrap();
        assert_eq!(request.command().unwrap_err().status, 404);

        let request = Request::parse("GET /temp/8 HTTP/1.0").unwrap();
        assert_eq!(request.command(), Ok(Command::Temperature(8)));
    }
}
