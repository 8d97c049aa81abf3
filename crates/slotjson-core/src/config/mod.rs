//! Configuration for documents, parsing and serialization
//!
//! Every section is `serde`-deserializable with per-field defaults, so a
//! configuration file only needs to name the settings it changes:
//!
//! ```
//! use slotjson::config::{GrowthPolicy, SlotJsonConfig};
//!
//! let config = SlotJsonConfig::from_json_str(
//!     r#"{ "pool": { "capacity": 4096, "growth": { "mode": "fixed" } } }"#,
//! )
//! .unwrap();
//! assert_eq!(config.pool.growth, GrowthPolicy::Fixed);
//! assert_eq!(config.parser.nesting_limit, 10);
//!
//! let doc = config.build_document();
//! assert_eq!(doc.capacity(), 4096);
//! ```

pub mod limits;

use serde::{Deserialize, Serialize};
use slotjson_domain::{JsonDocument, MemoryPool, VariantConstRef};

use crate::deserialization::DeserializationOptions;
use crate::error::{Error, Result};
use crate::serialization::{
    Writer, measure_json, measure_json_pretty, serialize_json, serialize_json_pretty,
};

pub use limits::{
    ALIAS_CHAIN_LIMIT, DEFAULT_CAPACITY, DEFAULT_NESTING_LIMIT, MAX_CAPACITY, MAX_NESTING_LIMIT,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotJsonConfig {
    /// Memory budget of documents
    pub pool: PoolConfig,
    /// Parser settings
    pub parser: ParserConfig,
    /// Serializer settings
    pub serializer: SerializerConfig,
}

/// How a document's budget may change after construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// The budget never changes
    #[default]
    Fixed,
    /// The budget doubles on demand up to `limit` bytes, or without ceiling
    Growable {
        /// Largest budget in bytes
        #[serde(default)]
        limit: Option<usize>,
    },
}

/// Memory budget of documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial budget in bytes
    pub capacity: usize,
    /// Whether the budget may grow
    pub growth: GrowthPolicy,
    /// Whether identical copied strings share storage
    pub deduplicate_strings: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            growth: GrowthPolicy::Fixed,
            deduplicate_strings: true,
        }
    }
}

impl PoolConfig {
    /// Pool configured for tight memory: small, fixed, deduplicated
    pub fn low_memory() -> Self {
        Self {
            capacity: 256,
            ..Self::default()
        }
    }

    /// Build an empty pool with these settings
    pub fn build_pool<'s>(&self) -> MemoryPool<'s> {
        let pool = match self.growth {
            GrowthPolicy::Fixed => MemoryPool::fixed(self.capacity),
            GrowthPolicy::Growable { limit } => MemoryPool::growable(self.capacity, limit),
        };
        pool.with_deduplication(self.deduplicate_strings)
    }

    fn validate(&self) -> Result<()> {
        if self.capacity > MAX_CAPACITY {
            return Err(Error::config(format!(
                "pool capacity {} exceeds maximum {}",
                self.capacity, MAX_CAPACITY
            )));
        }
        if let GrowthPolicy::Growable { limit: Some(limit) } = self.growth {
            if limit < self.capacity {
                return Err(Error::config(format!(
                    "growth limit {} is below initial capacity {}",
                    limit, self.capacity
                )));
            }
            if limit > MAX_CAPACITY {
                return Err(Error::config(format!(
                    "growth limit {} exceeds maximum {}",
                    limit, MAX_CAPACITY
                )));
            }
        }
        Ok(())
    }
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Containers the parser enters before failing with
    /// [`Error::TooDeep`]
    pub nesting_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            nesting_limit: DEFAULT_NESTING_LIMIT,
        }
    }
}

impl ParserConfig {
    /// Options for one parse call
    pub fn options(&self) -> DeserializationOptions {
        DeserializationOptions::new().with_nesting_limit(self.nesting_limit)
    }

    fn validate(&self) -> Result<()> {
        if self.nesting_limit > MAX_NESTING_LIMIT {
            return Err(Error::config(format!(
                "nesting limit {} exceeds maximum {}",
                self.nesting_limit, MAX_NESTING_LIMIT
            )));
        }
        Ok(())
    }
}

/// Serializer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Indent output by two spaces per level
    pub pretty: bool,
}

impl SerializerConfig {
    /// Write `source` with the configured layout, returning the bytes written
    pub fn serialize<'a, 's: 'a, W: Writer>(
        &self,
        source: impl Into<VariantConstRef<'a, 's>>,
        writer: W,
    ) -> usize {
        if self.pretty {
            serialize_json_pretty(source, writer)
        } else {
            serialize_json(source, writer)
        }
    }

    /// Output size for `source` with the configured layout
    pub fn measure<'a, 's: 'a>(&self, source: impl Into<VariantConstRef<'a, 's>>) -> usize {
        if self.pretty {
            measure_json_pretty(source)
        } else {
            measure_json(source)
        }
    }
}

impl SlotJsonConfig {
    /// Configuration for tight memory
    pub fn low_memory() -> Self {
        Self {
            pool: PoolConfig::low_memory(),
            ..Self::default()
        }
    }

    /// Load and validate a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| Error::config(format!("invalid configuration: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section against its bounds
    pub fn validate(&self) -> Result<()> {
        self.pool.validate()?;
        self.parser.validate()
    }

    /// Build an empty document with the configured budget
    pub fn build_document<'s>(&self) -> JsonDocument<'s> {
        JsonDocument::with_pool(self.pool.build_pool())
    }
}
