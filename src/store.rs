use crate::record::{NewRecord, StoredRecord};
use anyhow::{anyhow, Context};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Mutex;

/// Store collaborator. `save` is atomic: a record is either fully stored
/// or not stored. Duplicate URLs are permitted.
pub trait Store: Send + Sync {
    fn save(&self, record: NewRecord) -> anyhow::Result<StoredRecord>;

    /// Most recent records first, at most `limit` of them.
    fn list(&self, limit: usize) -> anyhow::Result<Vec<StoredRecord>>;
}

/// One JSON object per line. Writes go through a temp file and a rename,
/// so a failed save never leaves a partial record behind.
pub struct JsonlStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    fn read_all(&self) -> anyhow::Result<Vec<StoredRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("could not read {}", self.path.display()))?;

        let mut records = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let record: StoredRecord =
                serde_json::from_str(line).context("records file is malformed")?;
            records.push(record);
        }

        Ok(records)
    }

    fn write_all(&self, records: &[StoredRecord]) -> anyhow::Result<()> {
        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }

        let temp_path = self.path.with_extension("jsonl.tmp");
        std::fs::write(&temp_path, out)?;
        std::fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl Store for JsonlStore {
    fn save(&self, record: NewRecord) -> anyhow::Result<StoredRecord> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("store lock poisoned"))?;

        let mut records = self.read_all()?;
        let id = records.last().map(|r| r.id + 1).unwrap_or(1);

        let stored = StoredRecord {
            id,
            url: record.url,
            title: record.title,
            description: record.description,
            tags: record.tags,
            source: record.source,
            resource_type: record.resource_type,
            created_at: Utc::now(),
            read: false,
        };

        records.push(stored.clone());
        self.write_all(&records)?;

        Ok(stored)
    }

    fn list(&self, limit: usize) -> anyhow::Result<Vec<StoredRecord>> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("store lock poisoned"))?;

        let records = self.read_all()?;
        Ok(records.into_iter().rev().take(limit).collect())
    }
}

#[cfg(test)]
pub struct MemoryStore {
    pub records: Mutex<Vec<StoredRecord>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl Store for MemoryStore {
    fn save(&self, record: NewRecord) -> anyhow::Result<StoredRecord> {
        let mut records = self.records.lock().unwrap();
        let stored = StoredRecord {
            id: records.len() as u64 + 1,
            url: record.url,
            title: record.title,
            description: record.description,
            tags: record.tags,
            source: record.source,
            resource_type: record.resource_type,
            created_at: Utc::now(),
            read: false,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    fn list(&self, limit: usize) -> anyhow::Result<Vec<StoredRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
