use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use fansim_network::{
    app::{
        core::{DelayUnit, Frame, Gauge, Rpm, RGB8},
        Configuration, Engine, Status,
    },
    serve, FanResult, USAGE,
};
use smart_leds::SmartLedsWrite;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};

#[derive(Clone, Default)]
struct DisplayStub {
    last: Arc<Mutex<Option<Frame>>>,
}

impl SmartLedsWrite for DisplayStub {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let frame = Frame::from_pixels(iterator.into_iter().map(Into::into));
        self.last.lock().unwrap().replace(frame);
        Ok(())
    }
}

struct Loopback {
    address: SocketAddr,
    engine: Arc<Engine<DisplayStub>>,
    display: DisplayStub,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<FanResult<()>>,
}

impl Loopback {
    async fn close(self) {
        self.shutdown.send(()).unwrap();
        self.server.await.unwrap().unwrap();
        self.engine.stop().unwrap();
    }
}

async fn create_loopback() -> Loopback {
    let _ = env_logger::try_init();

    let display = DisplayStub::default();
    let config = Configuration {
        speed_rpm: Rpm(6_000),
        delay_unit: DelayUnit::Seconds,
    };
    let engine = Arc::new(Engine::new(display.clone(), config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (shutdown, stop) = oneshot::channel();
    let server = tokio::spawn(serve(engine.clone(), listener, async move {
        stop.await.ok();
    }));

    Loopback {
        address,
        engine,
        display,
        shutdown,
        server,
    }
}

/// Sends a raw request and returns the status code with the response body.
async fn send(address: SocketAddr, request: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(address).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    let (head, body) = response.split_once("\r\n\r\n").unwrap();
    let status = head.split_whitespace().nth(1).unwrap().parse().unwrap();
    (status, body.to_owned())
}

async fn get(address: SocketAddr, path: &str) -> (u16, String) {
    send(
        address,
        &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n"),
    )
    .await
}

#[tokio::test]
async fn test_fan_on_off() {
    let loopback = create_loopback().await;

    let (status, body) = get(loopback.address, "/fan/on").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Turned FAN animation ON");
    assert!(loopback.engine.is_running());
    assert!(loopback.engine.status().enabled);

    // Turning on twice keeps a single worker.
    assert_eq!(get(loopback.address, "/fan/on").await.0, 200);

    let (status, body) = get(loopback.address, "/fan/off").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Turned FAN animation OFF");
    assert!(!loopback.engine.status().enabled);
    assert!(loopback.display.last.lock().unwrap().unwrap().is_clear());

    loopback.close().await;
}

#[tokio::test]
async fn test_set_temperature_and_speed() {
    let loopback = create_loopback().await;

    let (status, body) = get(loopback.address, "/temp/8").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Changed temperature reading");
    assert_eq!(
        *loopback.display.last.lock().unwrap(),
        Some(Frame::compose(&Gauge::new(8), None))
    );

    let (status, body) = get(loopback.address, "/fan/speed/120").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Changed FAN speed");
    assert_eq!(loopback.engine.status().speed_rpm, Rpm(120));

    // Zero speed is accepted by the route but ignored by the engine.
    assert_eq!(get(loopback.address, "/fan/speed/0").await.0, 200);
    assert_eq!(loopback.engine.status().speed_rpm, Rpm(120));

    loopback.close().await;
}

#[tokio::test]
async fn test_status() {
    let loopback = create_loopback().await;
    get(loopback.address, "/temp/4").await;

    let (status, body) = get(loopback.address, "/status").await;
    assert_eq!(status, 200);
    let info: Status = serde_json::from_str(&body).unwrap();
    assert_eq!(
        info,
        Status {
            enabled: false,
            temperature: 4,
            speed_rpm: Rpm(6_000),
            running: false,
            max_temperature: 15,
        }
    );

    loopback.close().await;
}

#[tokio::test]
async fn test_index_page() {
    let loopback = create_loopback().await;

    let (status, body) = get(loopback.address, "/").await;
    assert_eq!(status, 200);
    assert!(body.contains("Test page for Fan Animation"));

    loopback.close().await;
}

#[tokio::test]
async fn test_bad_requests() {
    let loopback = create_loopback().await;

    let (status, body) = get(loopback.address, "/fan/speed/-5").await;
    assert_eq!(status, 404);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], USAGE);

    let (status, _) = send(loopback.address, "POST /fan/on HTTP/1.1\r\n\r\n").await;
    assert_eq!(status, 405);
    assert!(!loopback.engine.is_running());

    let (status, _) = send(loopback.address, "hello\r\n\r\n").await;
    assert_eq!(status, 400);

    loopback.close().await;
}

#[tokio::test]
async fn test_shutdown_leaves_display_black() {
    let loopback = create_loopback().await;
    get(loopback.address, "/temp/15").await;
    get(loopback.address, "/fan/on").await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let display = loopback.display.clone();
    let engine = loopback.engine.clone();
    loopback.close().await;

    assert!(!engine.is_running());
    assert!(display.last.lock().unwrap().unwrap().is_clear());
}
