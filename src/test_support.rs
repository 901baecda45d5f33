//! Shared fixtures for unit tests: in-memory stores and a RESP-speaking fake server.

use crate::store::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// HashMap-backed store with Redis-like semantics for the HTTP tests
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, StoreError> {
        self.entries
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(StoreError::KeyNotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store whose every call fails as if the connection had dropped
pub struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn put(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Set("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> Result<String, StoreError> {
        Err(StoreError::Get("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Ping("connection refused".into()))
    }
}

type Entries = Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>;

/// Minimal Redis stand-in on a loopback port
///
/// Understands PING, SET, GET, SELECT and CLIENT over RESP2, which is all
/// the `redis` client sends for the gateway's operations. The accept loop
/// is aborted on drop.
pub struct FakeRedis {
    pub url: String,
    accept_loop: JoinHandle<()>,
}

impl FakeRedis {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Redis listener");
        let port = listener.local_addr().unwrap().port();
        let entries: Entries = Arc::default();

        let accept_loop = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve_connection(socket, entries.clone()));
            }
        });

        Self {
            url: format!("redis://127.0.0.1:{}", port),
            accept_loop,
        }
    }
}

impl Drop for FakeRedis {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}

async fn serve_connection(mut socket: TcpStream, entries: Entries) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        while let Some((args, used)) = parse_command(&buf) {
            buf.drain(..used);
            let reply = respond(&args, &entries);
            if socket.write_all(&reply).await.is_err() {
                return;
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn respond(args: &[Vec<u8>], entries: &Entries) -> Vec<u8> {
    let Some(name) = args.first() else {
        return b"-ERR empty command\r\n".to_vec();
    };

    match name.to_ascii_uppercase().as_slice() {
        b"PING" => b"+PONG\r\n".to_vec(),
        b"SELECT" | b"CLIENT" => b"+OK\r\n".to_vec(),
        b"SET" if args.len() >= 3 => {
            entries
                .lock()
                .unwrap()
                .insert(args[1].clone(), args[2].clone());
            b"+OK\r\n".to_vec()
        }
        b"GET" if args.len() == 2 => match entries.lock().unwrap().get(&args[1]) {
            Some(value) => {
                let mut reply = format!("${}\r\n", value.len()).into_bytes();
                reply.extend_from_slice(value);
                reply.extend_from_slice(b"\r\n");
                reply
            }
            None => b"$-1\r\n".to_vec(),
        },
        _ => b"-ERR unknown command\r\n".to_vec(),
    }
}

/// Parse one RESP array of bulk strings; `None` until the frame is complete.
fn parse_command(buf: &[u8]) -> Option<(Vec<Vec<u8>>, usize)> {
    let (line, mut cursor) = read_line(buf, 0)?;
    let count: usize = std::str::from_utf8(line.strip_prefix(b"*")?)
        .ok()?
        .parse()
        .ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        let (line, next) = read_line(buf, cursor)?;
        let len: usize = std::str::from_utf8(line.strip_prefix(b"$")?)
            .ok()?
            .parse()
            .ok()?;
        if buf.len() < next + len + 2 {
            return None;
        }
        args.push(buf[next..next + len].to_vec());
        cursor = next + len + 2;
    }

    Some((args, cursor))
}

fn read_line(buf: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let rest = buf.get(start..)?;
    let end = rest.windows(2).position(|w| w == b"\r\n")?;
    Some((&rest[..end], start + end + 2))
}
