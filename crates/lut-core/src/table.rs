//! Immutable key/value lookup table populated once at construction.

use std::collections::HashMap;

use crate::ConfigError;

/// One `key -> value` mapping in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LookupEntry {
    /// Address-derived key.
    pub key: u32,
    /// Value returned for reads at `key`.
    pub value: u32,
}

impl LookupEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(key: u32, value: u32) -> Self {
        Self { key, value }
    }
}

/// Built-in table contents: prefix-code words (read as integers) mapped to
/// their decoded 8-bit exponents.
pub const DEFAULT_ENTRIES: [LookupEntry; 8] = [
    LookupEntry::new(0b110, 0b1110_1011),
    LookupEntry::new(0b111, 0b1010_1010),
    LookupEntry::new(0b100, 0b1111_0000),
    LookupEntry::new(0b101, 0b0000_1111),
    LookupEntry::new(0b10, 0b1010_1111),
    LookupEntry::new(0b11, 0b0101_0101),
    LookupEntry::new(0b0, 0b0000_0000),
    LookupEntry::new(0b1, 0b1111_1111),
];

/// Read-only mapping from 32-bit key to 32-bit value.
///
/// There is no insert, update or remove after construction, so repeated
/// lookups of the same key always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<u32, u32>,
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LookupTable {
    /// Builds a table from caller-supplied entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateKey`] when a key appears more than once.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = LookupEntry>,
    {
        let entries = entries.into_iter();
        let mut map = HashMap::with_capacity(entries.size_hint().0);
        for entry in entries {
            if map.insert(entry.key, entry.value).is_some() {
                return Err(ConfigError::DuplicateKey { key: entry.key });
            }
        }
        Ok(Self { entries: map })
    }

    /// Builds the table from [`DEFAULT_ENTRIES`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|entry| (entry.key, entry.value))
                .collect(),
        }
    }

    /// Returns the stored value for `key`, or `None` on a miss.
    #[must_use]
    pub fn lookup(&self, key: u32) -> Option<u32> {
        self.entries.get(&key).copied()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order.
    #[must_use]
    pub fn entries(&self) -> Vec<LookupEntry> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(&key, &value)| LookupEntry::new(key, value))
            .collect();
        entries.sort_unstable_by_key(|entry| entry.key);
        entries
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{LookupEntry, LookupTable, DEFAULT_ENTRIES};
    use crate::ConfigError;

    #[rstest]
    #[case(0b110, 0xEB)]
    #[case(0b111, 0xAA)]
    #[case(0b100, 0xF0)]
    #[case(0b101, 0x0F)]
    #[case(0b10, 0xAF)]
    #[case(0b11, 0x55)]
    #[case(0b0, 0x00)]
    #[case(0b1, 0xFF)]
    fn default_table_hits(#[case] key: u32, #[case] value: u32) {
        assert_eq!(LookupTable::with_defaults().lookup(key), Some(value));
    }

    #[test]
    fn absent_key_misses() {
        let table = LookupTable::default();
        assert_eq!(table.lookup(9), None);
        assert_eq!(table.lookup(u32::MAX), None);
    }

    #[test]
    fn default_table_has_every_builtin_entry() {
        let table = LookupTable::with_defaults();
        assert_eq!(table.len(), DEFAULT_ENTRIES.len());
        assert!(!table.is_empty());
        let mut expected = DEFAULT_ENTRIES.to_vec();
        expected.sort_unstable_by_key(|entry| entry.key);
        assert_eq!(table.entries(), expected);
    }

    #[test]
    fn caller_entries_replace_builtins() {
        let table =
            LookupTable::from_entries([LookupEntry::new(42, 0xDEAD_BEEF)]).expect("unique keys");
        assert_eq!(table.lookup(42), Some(0xDEAD_BEEF));
        assert_eq!(table.lookup(6), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = LookupTable::from_entries([LookupEntry::new(3, 1), LookupEntry::new(3, 2)]);
        assert_eq!(result, Err(ConfigError::DuplicateKey { key: 3 }));
    }

    #[test]
    fn empty_table_is_allowed() {
        let table = LookupTable::from_entries([]).expect("no entries");
        assert!(table.is_empty());
        assert_eq!(table.lookup(0), None);
    }
}
