//! RocksDB storage backend
//!
//! Quads live in the `quads` column family under
//! `len(store) store len(graph) graph sha256(quad)`, so one store, or one
//! context of one store, is a contiguous key range. Namespace bindings live in
//! `namespaces` under `len(store) store prefix`. Values are bincode.

use super::{NamespaceRecord, StorageBackend, StorageError, StorageResult};
use crate::rdf::{
    BlankNode, GraphName, Literal, NamedNode, Quad, QuadPattern, RdfObject, RdfPredicate,
    RdfResult, RdfSubject,
};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const QUADS_CF: &str = "quads";
const NAMESPACES_CF: &str = "namespaces";

/// Serialized term for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum StoredTerm {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: String,
        language: Option<String>,
    },
}

/// Serialized quad for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredQuad {
    /// None = default context
    graph: Option<StoredTerm>,
    subject: StoredTerm,
    predicate: String,
    object: StoredTerm,
}

impl StoredTerm {
    fn from_graph(graph: &GraphName) -> Option<Self> {
        match graph {
            GraphName::DefaultGraph => None,
            GraphName::NamedNode(n) => Some(StoredTerm::Iri(n.as_str().to_string())),
            GraphName::BlankNode(b) => Some(StoredTerm::Blank(b.as_str().to_string())),
        }
    }

    fn from_subject(subject: &RdfSubject) -> Self {
        match subject {
            RdfSubject::NamedNode(n) => StoredTerm::Iri(n.as_str().to_string()),
            RdfSubject::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
        }
    }

    fn from_object(object: &RdfObject) -> Self {
        match object {
            RdfObject::NamedNode(n) => StoredTerm::Iri(n.as_str().to_string()),
            RdfObject::BlankNode(b) => StoredTerm::Blank(b.as_str().to_string()),
            RdfObject::Literal(l) => StoredTerm::Literal {
                value: l.value().to_string(),
                datatype: l.datatype().as_str().to_string(),
                language: l.language().map(str::to_string),
            },
        }
    }

    fn into_object(self) -> RdfResult<RdfObject> {
        Ok(match self {
            StoredTerm::Iri(iri) => NamedNode::new(&iri)?.into(),
            StoredTerm::Blank(id) => BlankNode::from_id(&id)?.into(),
            StoredTerm::Literal { value, language: Some(lang), .. } => {
                Literal::new_language_tagged_literal(value, lang)?.into()
            }
            StoredTerm::Literal { value, datatype, language: None } => {
                if datatype == oxrdf::vocab::xsd::STRING.as_str() {
                    Literal::new_simple_literal(value).into()
                } else {
                    Literal::new_typed_literal(value, NamedNode::new(&datatype)?).into()
                }
            }
        })
    }

    fn into_subject(self) -> RdfResult<RdfSubject> {
        match self {
            StoredTerm::Iri(iri) => Ok(NamedNode::new(&iri)?.into()),
            StoredTerm::Blank(id) => Ok(BlankNode::from_id(&id)?.into()),
            StoredTerm::Literal { value, .. } => Err(crate::rdf::RdfError::UnsupportedTerm(
                format!("stored literal subject \"{}\"", value),
            )),
        }
    }
}

fn graph_from_stored(graph: Option<StoredTerm>) -> RdfResult<GraphName> {
    match graph {
        None => Ok(GraphName::DefaultGraph),
        Some(StoredTerm::Iri(iri)) => Ok(NamedNode::new(&iri)?.into()),
        Some(StoredTerm::Blank(id)) => Ok(BlankNode::from_id(&id)?.into()),
        Some(StoredTerm::Literal { value, .. }) => Err(crate::rdf::RdfError::UnsupportedTerm(
            format!("stored literal context \"{}\"", value),
        )),
    }
}

impl StoredQuad {
    fn from_quad(quad: &Quad) -> Self {
        Self {
            graph: StoredTerm::from_graph(&quad.graph_name),
            subject: StoredTerm::from_subject(&quad.subject),
            predicate: quad.predicate.as_str().to_string(),
            object: StoredTerm::from_object(&quad.object),
        }
    }

    fn into_quad(self) -> RdfResult<Quad> {
        Ok(Quad {
            subject: self.subject.into_subject()?,
            predicate: RdfPredicate::new(&self.predicate)?,
            object: self.object.into_object()?,
            graph_name: graph_from_stored(self.graph)?,
        })
    }
}

/// RocksDB-based persistent storage
pub struct PersistentStorage {
    /// RocksDB instance
    db: Arc<DB>,
    path: PathBuf,
}

impl PersistentStorage {
    /// Open or create a new persistent storage
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        info!("Opening persistent storage at: {}", path.display());

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        opts.set_write_buffer_size(64 * 1024 * 1024); // 64 MB
        opts.set_max_write_buffer_number(3);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(QUADS_CF, Self::cf_options()),
            ColumnFamilyDescriptor::new(NAMESPACES_CF, Self::cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, &path, cf_descriptors)?;

        info!("Persistent storage opened successfully");

        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush all data to disk
    pub fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        debug!("Flushed storage to disk");
        Ok(())
    }

    fn cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamily(name.to_string()))
    }

    /// Visit every (key, value) under a key prefix
    fn for_each_prefixed(
        &self,
        cf: &ColumnFamily,
        prefix: &[u8],
        mut visit: impl FnMut(&[u8], &[u8]) -> StorageResult<()>,
    ) -> StorageResult<()> {
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            visit(&key, &value)?;
        }
        Ok(())
    }

    /// Visit every stored quad a pattern can match, decoded, with its key
    fn for_each_candidate(
        &self,
        store: &str,
        pattern: &QuadPattern,
        mut visit: impl FnMut(&[u8], Quad) -> StorageResult<()>,
    ) -> StorageResult<()> {
        let cf = self.cf(QUADS_CF)?;
        let prefix = match pattern.graph.graph() {
            Some(graph) => graph_prefix(store, graph)?,
            None => store_prefix(store),
        };

        self.for_each_prefixed(cf, &prefix, |key, value| {
            let stored: StoredQuad = bincode::deserialize(value)?;
            let quad = stored
                .into_quad()
                .map_err(|e| StorageError::Corrupt(e.to_string()))?;
            if pattern.matches(&quad) {
                visit(key, quad)?;
            }
            Ok(())
        })
    }
}

impl StorageBackend for PersistentStorage {
    fn name(&self) -> &'static str {
        "rocksdb"
    }

    fn insert(&self, store: &str, quads: &[Quad]) -> StorageResult<usize> {
        let cf = self.cf(QUADS_CF)?;
        let mut batch = WriteBatch::default();
        let mut seen = FxHashSet::default();

        for quad in quads {
            let stored = StoredQuad::from_quad(quad);
            let value = bincode::serialize(&stored)?;
            let key = quad_key(store, &quad.graph_name, &value)?;

            if seen.contains(&key) || self.db.get_pinned_cf(cf, &key)?.is_some() {
                continue;
            }
            batch.put_cf(cf, &key, &value);
            seen.insert(key);
        }

        let inserted = seen.len();
        self.db.write(batch)?;

        debug!("Stored {} of {} quads for store {}", inserted, quads.len(), store);
        Ok(inserted)
    }

    fn delete(&self, store: &str, pattern: &QuadPattern) -> StorageResult<usize> {
        let mut keys = Vec::new();
        self.for_each_candidate(store, pattern, |key, _| {
            keys.push(key.to_vec());
            Ok(())
        })?;

        let cf = self.cf(QUADS_CF)?;
        let mut batch = WriteBatch::default();
        for key in &keys {
            batch.delete_cf(cf, key);
        }
        self.db.write(batch)?;

        debug!("Deleted {} quads for store {}", keys.len(), store);
        Ok(keys.len())
    }

    fn scan(&self, store: &str, pattern: &QuadPattern) -> StorageResult<Vec<Quad>> {
        let mut quads = Vec::new();
        self.for_each_candidate(store, pattern, |_, quad| {
            quads.push(quad);
            Ok(())
        })?;
        Ok(quads)
    }

    fn count(&self, store: &str, pattern: &QuadPattern) -> StorageResult<usize> {
        let mut count = 0;
        self.for_each_candidate(store, pattern, |_, _| {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }

    fn graphs(&self, store: &str) -> StorageResult<Vec<GraphName>> {
        let cf = self.cf(QUADS_CF)?;
        let prefix = store_prefix(store);
        let mut last: Option<Vec<u8>> = None;
        let mut graphs = Vec::new();

        // Keys are sorted, so each context is one contiguous run
        self.for_each_prefixed(cf, &prefix, |key, _| {
            let segment = read_segment(&key[prefix.len()..])
                .ok_or_else(|| StorageError::Corrupt("truncated quad key".to_string()))?;
            if last.as_deref() != Some(segment) {
                let stored: Option<StoredTerm> = bincode::deserialize(segment)?;
                let graph = graph_from_stored(stored)
                    .map_err(|e| StorageError::Corrupt(e.to_string()))?;
                graphs.push(graph);
                last = Some(segment.to_vec());
            }
            Ok(())
        })?;

        Ok(graphs)
    }

    fn put_namespace(&self, store: &str, record: &NamespaceRecord) -> StorageResult<()> {
        let cf = self.cf(NAMESPACES_CF)?;
        let value = bincode::serialize(record)?;
        self.db.put_cf(cf, namespace_key(store, &record.prefix), value)?;

        debug!("Stored namespace {} for store {}", record.prefix, store);
        Ok(())
    }

    fn delete_namespace(&self, store: &str, prefix: &str) -> StorageResult<()> {
        let cf = self.cf(NAMESPACES_CF)?;
        self.db.delete_cf(cf, namespace_key(store, prefix))?;
        Ok(())
    }

    fn namespaces(&self, store: &str) -> StorageResult<Vec<NamespaceRecord>> {
        let cf = self.cf(NAMESPACES_CF)?;
        let mut records = Vec::new();
        self.for_each_prefixed(cf, &store_prefix(store), |_, value| {
            records.push(bincode::deserialize(value)?);
            Ok(())
        })?;
        Ok(records)
    }
}

/// Append a length-prefixed segment
fn push_segment(key: &mut Vec<u8>, segment: &[u8]) {
    key.extend_from_slice(&(segment.len() as u32).to_be_bytes());
    key.extend_from_slice(segment);
}

/// Read the leading length-prefixed segment
fn read_segment(bytes: &[u8]) -> Option<&[u8]> {
    let len_bytes: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    bytes.get(4..4 + len)
}

fn store_prefix(store: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(4 + store.len());
    push_segment(&mut key, store.as_bytes());
    key
}

fn graph_prefix(store: &str, graph: &GraphName) -> StorageResult<Vec<u8>> {
    let mut key = store_prefix(store);
    push_segment(&mut key, &bincode::serialize(&StoredTerm::from_graph(graph))?);
    Ok(key)
}

fn quad_key(store: &str, graph: &GraphName, encoded_quad: &[u8]) -> StorageResult<Vec<u8>> {
    let mut key = graph_prefix(store, graph)?;
    key.extend_from_slice(&Sha256::digest(encoded_quad));
    Ok(key)
}

fn namespace_key(store: &str, prefix: &str) -> Vec<u8> {
    let mut key = store_prefix(store);
    key.extend_from_slice(prefix.as_bytes());
    key
}
