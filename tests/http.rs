//! HTTP Adapter Integration Tests
//!
//! Runs the Wistia client and the downloader against a loopback server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wistia_assets::{
    AssetCollection, AssetRecord, AssetSource, Downloader, ExtractError, HttpSettings, WistiaClient,
};

/// Status, body, and the Content-Length to announce
type Routes = Arc<HashMap<String, (u16, String, usize)>>;

/// Serve fixed responses keyed by request path, one request per connection
async fn serve(routes: Vec<(&str, u16, &str)>) -> SocketAddr {
    serve_announcing(
        routes
            .into_iter()
            .map(|(path, status, body)| (path, status, body, body.len()))
            .collect(),
    )
    .await
}

/// Like `serve`, but each route announces its own Content-Length, so a
/// body shorter than announced ends the connection mid-transfer
async fn serve_announcing(routes: Vec<(&str, u16, &str, usize)>) -> SocketAddr {
    let routes: Routes = Arc::new(
        routes
            .into_iter()
            .map(|(path, status, body, length)| {
                (path.to_string(), (status, body.to_string(), length))
            })
            .collect(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body, length) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| (404, "not found".to_string(), 9));

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status, length, body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

const EMBED_PAGE: &str = r#"<html><script>
W.iframeInit({"assets":[{"type":"original","display_name":"Original File","size":1024,"url":"https://cdn.example/a.bin"},{"type":"still_image","url":"https://cdn.example/b.bin"}]}, {});
</script></html>"#;

#[tokio::test]
async fn test_fetch_embed_page() {
    let addr = serve(vec![("/embed/iframe/abc123?videoFoam=true", 200, EMBED_PAGE)]).await;
    let wistia = WistiaClient::with_client(format!("http://{}/embed/iframe/", addr), client());

    let assets = wistia.fetch("abc123").await.unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0]["display_name"], "Original File");
}

#[tokio::test]
async fn test_fetch_http_error() {
    let addr = serve(vec![]).await;
    let wistia = WistiaClient::with_client(format!("http://{}/embed/iframe", addr), client());

    let result = wistia.fetch("missing").await;
    assert!(matches!(result, Err(ExtractError::Http { status: 404 })));
}

#[tokio::test]
async fn test_fetch_page_without_payload() {
    let addr = serve(vec![(
        "/embed/iframe/abc123?videoFoam=true",
        200,
        "<html>no player here</html>",
    )])
    .await;
    let wistia = WistiaClient::with_client(format!("http://{}/embed/iframe", addr), client());

    let result = wistia.fetch("abc123").await;
    assert!(matches!(result, Err(ExtractError::PayloadNotFound)));
}

#[tokio::test]
async fn test_fetch_unreachable_host() {
    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let wistia = WistiaClient::with_client(format!("http://{}/embed/iframe", addr), client());

    let result = wistia.fetch("abc123").await;
    assert!(matches!(result, Err(ExtractError::Network(_))));
}

fn record(ordinal: usize, name: &str, url: String) -> AssetRecord {
    AssetRecord {
        id: AssetRecord::id_for(ordinal),
        display_name: name.to_string(),
        size: 0,
        width: None,
        height: None,
        url: Some(url),
        ext: "mp4".to_string(),
        asset_type: "mp4_video".to_string(),
    }
}

#[tokio::test]
async fn test_download_selected_assets() {
    let addr = serve(vec![("/ok.mp4", 200, "video bytes")]).await;
    let dir = TempDir::new().unwrap();

    let mut collection = AssetCollection::new();
    collection.load(vec![
        record(0, "Good", format!("http://{}/ok.mp4", addr)),
        record(1, "Gone", format!("http://{}/gone.mp4", addr)),
        record(2, "Unselected", format!("http://{}/ok.mp4", addr)),
    ]);
    collection.toggle("asset_0");
    collection.toggle("asset_1");

    let downloader = Downloader::with_client(dir.path(), Duration::from_millis(5), client());
    let plan = downloader.plan(&collection).unwrap();
    assert_eq!(plan.len(), 2);

    let report = downloader.run(plan).await.unwrap();
    assert!(!report.is_success());
    assert_eq!(report.completed, vec![dir.path().join("Good.mp4")]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, "asset_1");
    assert_eq!(report.failures[0].error, "HTTP 404");

    let saved = std::fs::read_to_string(dir.path().join("Good.mp4")).unwrap();
    assert_eq!(saved, "video bytes");
    assert!(!dir.path().join("Gone.mp4").exists());
}

#[tokio::test]
async fn test_interrupted_download_leaves_no_file() {
    let addr = serve_announcing(vec![
        ("/ok.mp4", 200, "video bytes", 11),
        ("/cut.mp4", 200, "partial", 1000),
    ])
    .await;
    let dir = TempDir::new().unwrap();

    let mut collection = AssetCollection::new();
    collection.load(vec![
        record(0, "Cut", format!("http://{}/cut.mp4", addr)),
        record(1, "Good", format!("http://{}/ok.mp4", addr)),
    ]);
    collection.select_all();

    let downloader = Downloader::with_client(dir.path(), Duration::from_millis(5), client());
    let plan = downloader.plan(&collection).unwrap();
    let report = downloader.run(plan).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, "asset_0");
    assert_eq!(report.completed, vec![dir.path().join("Good.mp4")]);

    // Neither the target nor its partial file survives the failure
    assert!(!dir.path().join("Cut.mp4").exists());
    assert!(!dir.path().join("Cut.mp4.part").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

/// Accept one request, hand its head back, and answer `200 ok`
async fn capture_one() -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let _ = tx.send(String::from_utf8_lossy(&request).to_lowercase());
        let _ = socket
            .write_all(b"HTTP/1.1 200 X\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
            .await;
        let _ = socket.shutdown().await;
    });

    (addr, rx)
}

#[tokio::test]
async fn test_download_sends_configured_user_agent() {
    let (addr, request) = capture_one().await;
    let dir = TempDir::new().unwrap();

    let settings = HttpSettings {
        user_agent: Some("asset-bot/1.0".to_string()),
        timeout: Some(Duration::from_secs(5)),
    };
    let client = settings
        .transfer_client(reqwest::Client::builder().no_proxy())
        .unwrap();

    let mut collection = AssetCollection::new();
    collection.load(vec![record(0, "Clip", format!("http://{}/clip.mp4", addr))]);
    collection.select_all();

    let downloader = Downloader::with_client(dir.path(), Duration::ZERO, client);
    let report = downloader.run(downloader.plan(&collection).unwrap()).await.unwrap();
    assert!(report.is_success());

    let head = request.await.unwrap();
    assert!(head.contains("user-agent: asset-bot/1.0"));
}

#[tokio::test]
async fn test_fetch_sends_configured_user_agent() {
    let (addr, request) = capture_one().await;

    let settings = HttpSettings {
        user_agent: Some("asset-bot/1.0".to_string()),
        timeout: None,
    };
    let client = settings
        .request_client(reqwest::Client::builder().no_proxy())
        .unwrap();
    let wistia = WistiaClient::with_client(format!("http://{}/embed/iframe", addr), client);

    // The body has no payload; only the request matters here
    assert!(matches!(wistia.fetch("abc123").await, Err(ExtractError::PayloadNotFound)));
    assert!(request.await.unwrap().contains("user-agent: asset-bot/1.0"));
}
