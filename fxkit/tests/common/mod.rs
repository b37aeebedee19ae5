//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fxkit::config::{FxkitConfig, SampleSettings, TemplateSettings};
use fxkit::net::{HttpClient, HttpResponse, TransportError};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const TAG_LIST_URL: &str = "https://tags.test/template-tags.txt";
pub const BASE_URL: &str = "https://dl.test/releases";
pub const SAMPLES_URL: &str = "https://samples.test/archive";

/// One scripted reply
pub enum Reply {
    Ok(u16, Vec<u8>),
    Transport(String),
    Hang,
}

impl Reply {
    pub fn text(body: &str) -> Self {
        Self::Ok(200, body.as_bytes().to_vec())
    }
}

/// HTTP client answering from per-URL queues
///
/// Unscripted URLs, and URLs whose queue is drained, answer 404.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url: impl Into<String>, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn on_repeat(mut self, url: &str, times: usize, reply: impl Fn() -> Reply) -> Self {
        for _ in 0..times {
            self = self.on(url, reply());
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ok(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::Transport(msg)) => Err(TransportError::Connect(msg)),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(TransportError::Connect("hung request finished".into()))
            }
            None => Ok(HttpResponse::new(404, Vec::new())),
        }
    }
}

pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in files {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), SimpleFileOptions::default())
                .unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Zip of raw byte entries, stored uncompressed so the bytes can be
/// located and damaged in the result
pub fn stored_zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Flip every byte of the first occurrence of `needle` in `bytes`
pub fn corrupt(bytes: &mut [u8], needle: &[u8]) {
    let start = bytes
        .windows(needle.len())
        .position(|window| window == needle)
        .unwrap();
    for byte in &mut bytes[start..start + needle.len()] {
        *byte = !*byte;
    }
}

pub fn config(fallback_dir: Option<&Path>) -> FxkitConfig {
    FxkitConfig {
        templates: TemplateSettings {
            tag_list_url: TAG_LIST_URL.into(),
            base_url: BASE_URL.into(),
            fallback_dir: fallback_dir.map(Path::to_path_buf),
            try_limits: 3,
            timeout_ms: 1_000,
            retry_delay_ms: 10,
            ..TemplateSettings::default()
        },
        samples: SampleSettings {
            base_url: SAMPLES_URL.into(),
            repo_name: "Samples".into(),
            tag: "v1.0.0".into(),
        },
    }
}

pub fn zip_url(tag: &str, template: &str) -> String {
    format!("{BASE_URL}/{tag}/{template}.zip")
}
