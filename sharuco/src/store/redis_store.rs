use std::sync::LazyLock;

use log::debug;
use redis::{Script, aio::ConnectionManager, cmd};

use super::DocumentStore;
use crate::{
    errors::{Result, SharucoError},
    keys::KeyContext,
    types::{Collection, Document, DocumentRef},
};

pub const DOCUMENT_UPDATE_SCRIPT_BODY: &str = include_str!("../../lua/document_update.lua");

pub static DOCUMENT_UPDATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_UPDATE_SCRIPT_BODY));

const DEFAULT_SERVICE: &str = "sharuco";
const SCAN_COUNT: usize = 1000;

/// Document store backed by RedisJSON.
///
/// Documents live at `{prefix}:{service}:{collection}:{id}`. Partial updates
/// run as one Lua script so the existence check and the attribute writes of a
/// single document are atomic.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
    service: String,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            service: DEFAULT_SERVICE.to_string(),
        }
    }

    /// Connects to `url` and wraps the connection manager.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Clone of the connection manager for advanced operations.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    fn key(&self, document: &DocumentRef) -> String {
        KeyContext::new(&self.prefix, &self.service).document(document.collection.as_str(), &document.id)
    }

    async fn read(&self, conn: &mut ConnectionManager, key: &str) -> Result<Option<Document>> {
        let raw: Option<String> = cmd("JSON.GET").arg(key).query_async(conn).await?;
        raw.map(|json| serde_json::from_str::<Document>(&json).map_err(SharucoError::from))
            .transpose()
    }
}

impl DocumentStore for RedisStore {
    async fn get(&self, document: &DocumentRef) -> Result<Option<Document>> {
        let mut conn = self.conn.clone();
        let key = self.key(document);
        debug!("redis store: JSON.GET {key}");
        self.read(&mut conn, &key).await
    }

    async fn update(&self, document: &DocumentRef, partial: Document) -> Result<()> {
        let mut conn = self.conn.clone();
        let key = self.key(document);
        debug!("redis store: updating {key} ({} attributes)", partial.len());

        let mut invocation = DOCUMENT_UPDATE_SCRIPT.prepare_invoke();
        invocation.key(&key);
        for (attribute, value) in &partial {
            invocation.arg(attribute).arg(serde_json::to_string(value)?);
        }
        let updated: i64 = invocation.invoke_async(&mut conn).await?;
        if updated == 0 {
            return Err(SharucoError::not_found(document.clone()));
        }
        Ok(())
    }

    async fn insert(&self, document: &DocumentRef, value: Document) -> Result<bool> {
        let mut conn = self.conn.clone();
        let key = self.key(document);
        let payload = serde_json::to_string(&value)?;
        debug!("redis store: JSON.SET {key} NX");
        let reply: Option<String> = cmd("JSON.SET")
            .arg(&key)
            .arg("$")
            .arg(payload)
            .arg("NX")
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        let mut conn = self.conn.clone();
        let pattern = KeyContext::new(&self.prefix, &self.service).collection_pattern(collection.as_str());
        let mut cursor: u64 = 0;
        let mut documents = Vec::new();

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;

            for key in keys {
                // A key can disappear between SCAN and JSON.GET.
                if let Some(document) = self.read(&mut conn, &key).await? {
                    documents.push(document);
                }
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(documents)
    }
}

/// Delete all keys matching a pattern (for test cleanup).
///
/// This performs a SCAN + DEL operation to safely delete keys without blocking Redis.
pub async fn cleanup_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64> {
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await?;

        if !keys.is_empty() {
            let deleted: u64 = cmd("DEL").arg(&keys).query_async(conn).await?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    Ok(total_deleted)
}
