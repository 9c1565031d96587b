//! In-process fake SearXNG + image host.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const WIDE: u32 = 900;
pub const NARROW: u32 = 300;
const HEIGHT: u32 = 88;
const CELL: u32 = 100;
const LOW: u8 = 20;
const HIGH: u8 = 230;

fn encode_png(img: GrayImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Brightness increasing left to right.
pub fn ramp(width: u32) -> Vec<u8> {
    encode_png(GrayImage::from_fn(width, HEIGHT, |x, _| {
        Luma([(x * 255 / width) as u8])
    }))
}

/// Brightness decreasing left to right.
pub fn reversed_ramp(width: u32) -> Vec<u8> {
    encode_png(GrayImage::from_fn(width, HEIGHT, |x, _| {
        Luma([255 - (x * 255 / width) as u8])
    }))
}

/// Vertical bands, one per hash column; `dark_first` picks the phase.
pub fn bands(width: u32, dark_first: bool) -> Vec<u8> {
    encode_png(GrayImage::from_fn(width, HEIGHT, |x, _| {
        let even = (x / CELL) % 2 == 0;
        Luma([if even == dark_first { LOW } else { HIGH }])
    }))
}

#[derive(Clone, Default)]
struct HostState {
    images: Arc<HashMap<String, Vec<u8>>>,
    results: Arc<Vec<Value>>,
    served: Arc<Mutex<Vec<String>>>,
    searches: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn search(
    State(state): State<HostState>,
    axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>,
) -> Response {
    state.searches.lock().push(params);
    axum::Json(json!({ "results": state.results.as_slice() })).into_response()
}

async fn image(State(state): State<HostState>, Path(name): Path<String>) -> Response {
    state.served.lock().push(name.clone());
    match state.images.get(&name) {
        Some(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// One search hit; `image` is a file name on the test host.
pub struct Hit {
    pub image: &'static str,
    pub page: &'static str,
    pub title: &'static str,
}

pub struct TestHost {
    pub addr: SocketAddr,
    state: HostState,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestHost {
    pub async fn start(images: Vec<(&str, Vec<u8>)>, hits: Vec<Hit>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base = format!("http://{addr}");

        let results = hits
            .into_iter()
            .map(|h| {
                let img_src = if h.image.is_empty() {
                    String::new()
                } else {
                    format!("{base}/img/{}", h.image)
                };
                json!({
                    "img_src": img_src,
                    "thumbnail_src": "",
                    "url": h.page,
                    "title": h.title,
                })
            })
            .collect();

        let state = HostState {
            images: Arc::new(
                images
                    .into_iter()
                    .map(|(name, bytes)| (name.to_string(), bytes))
                    .collect(),
            ),
            results: Arc::new(results),
            ..Default::default()
        };

        let app = Router::new()
            .route("/search", get(search))
            .route("/img/{name}", get(image))
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            _server_handle: handle,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn image_url(&self, name: &str) -> String {
        format!("{}/img/{name}", self.url())
    }

    /// Image file names requested so far (probe and download both count).
    pub fn served(&self) -> Vec<String> {
        self.state.served.lock().clone()
    }

    pub fn searches(&self) -> Vec<HashMap<String, String>> {
        self.state.searches.lock().clone()
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
