//! In-memory [`FileStore`] with call counters for unit tests.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::engine::file_store::{FileStat, FileStore};
use crate::error::{Result, TemplateCacheError};

struct FakeFile {
    content: Vec<u8>,
    modified: SystemTime,
    fail_reads: bool,
}

#[derive(Default)]
pub struct FakeFileStore {
    files: Mutex<HashMap<String, FakeFile>>,
    reads: Mutex<HashMap<String, usize>>,
    stats: Mutex<usize>,
    read_delay: Mutex<Option<Duration>>,
    panic_next_read: Mutex<HashSet<String>>,
}

fn base_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

impl FakeFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, content: &str) {
        self.insert_bytes(name, content.as_bytes().to_vec());
    }

    pub fn insert_bytes(&self, name: &str, content: Vec<u8>) {
        self.files.lock().unwrap().insert(
            name.to_string(),
            FakeFile {
                content,
                modified: base_time(),
                fail_reads: false,
            },
        );
    }

    /// Replaces the content and moves the mtime forward by `advance`.
    pub fn update(&self, name: &str, content: &str, advance: Duration) {
        let mut files = self.files.lock().unwrap();
        let file = files.get_mut(name).expect("file must exist");
        file.content = content.as_bytes().to_vec();
        file.modified += advance;
    }

    pub fn delete(&self, name: &str) {
        self.files.lock().unwrap().remove(name);
    }

    pub fn fail_reads(&self, name: &str) {
        if let Some(file) = self.files.lock().unwrap().get_mut(name) {
            file.fail_reads = true;
        }
    }

    pub fn heal_reads(&self, name: &str) {
        if let Some(file) = self.files.lock().unwrap().get_mut(name) {
            file.fail_reads = false;
        }
    }

    /// Makes the next `read_all` of `name` panic; later reads succeed.
    pub fn panic_next_read(&self, name: &str) {
        self.panic_next_read.lock().unwrap().insert(name.to_string());
    }

    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    /// Number of `read_all` calls made for `name`.
    pub fn read_count(&self, name: &str) -> usize {
        self.reads.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    /// Number of `stat` calls made for any path.
    pub fn stat_count(&self) -> usize {
        *self.stats.lock().unwrap()
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn stat(&self, path: &str) -> Result<FileStat> {
        *self.stats.lock().unwrap() += 1;
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(file) => Ok(FileStat {
                modified: file.modified,
            }),
            None => Err(TemplateCacheError::NotFound(path.to_string())),
        }
    }

    async fn read_all(&self, path: &str) -> Result<Vec<u8>> {
        *self.reads.lock().unwrap().entry(path.to_string()).or_default() += 1;

        let panics = self.panic_next_read.lock().unwrap().remove(path);
        if panics {
            panic!("simulated file store panic for {path}");
        }

        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(file) if file.fail_reads => Err(TemplateCacheError::from_io(
                path,
                io::Error::new(io::ErrorKind::Other, "simulated read failure"),
            )),
            Some(file) => Ok(file.content.clone()),
            None => Err(TemplateCacheError::NotFound(path.to_string())),
        }
    }
}
