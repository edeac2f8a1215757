use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::{Error, Result};

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

/// One size supported by a container, along with the tag its images are
/// stored under (ICNS only).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FormatEntry {
    size: u32,
    ostype: Option<OSType>,
}

impl FormatEntry {
    /// Creates an entry for square images of the given edge length, stored
    /// under the given OSType.
    pub fn new(size: u32, ostype: OSType) -> FormatEntry {
        FormatEntry {
            size,
            ostype: Some(ostype),
        }
    }

    /// Creates an entry with no type tag, as used by ICO containers.
    pub fn untagged(size: u32) -> FormatEntry {
        FormatEntry { size, ostype: None }
    }

    /// Returns the pixel edge length of images stored under this entry.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the OSType images for this entry are stored under, if any.
    pub fn ostype(&self) -> Option<OSType> {
        self.ostype
    }
}

/// The ordered set of sizes a container supports.
///
/// The declaration order of a registry is the order in which images appear
/// in the encoded file, regardless of the order they were added in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registry {
    entries: Vec<FormatEntry>,
}

impl Registry {
    /// Builds a registry from entries in the order they should be written.
    /// Returns an error if any size is zero or appears more than once.
    pub fn new(entries: Vec<FormatEntry>) -> Result<Registry> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.size == 0 {
                return Err(Error::ZeroSize);
            }
            if !seen.insert(entry.size) {
                return Err(Error::DuplicateSize(entry.size));
            }
        }
        Ok(Registry { entries })
    }

    /// The sizes and OSTypes written to ICNS files by default.
    ///
    /// # Examples
    /// ```
    /// use iconpack::{OSType, Registry};
    /// let registry = Registry::icns();
    /// let entry = registry.lookup(128).unwrap();
    /// assert_eq!(entry.ostype(), Some(OSType(*b"ic07")));
    /// assert!(registry.lookup(100).is_none());
    /// ```
    pub fn icns() -> Registry {
        let table: [(u32, &[u8; 4]); 7] = [(16, b"icp4"),
                                           (32, b"icp5"),
                                           (64, b"icp6"),
                                           (128, b"ic07"),
                                           (256, b"ic08"),
                                           (512, b"ic09"),
                                           (1024, b"ic10")];
        Registry {
            entries: table.iter()
                .map(|&(size, raw)| FormatEntry::new(size, OSType(*raw)))
                .collect(),
        }
    }

    /// The sizes written to ICO files by default, smallest first.
    ///
    /// Some older icon exporters wrote these largest first (256 down to 16).
    /// Callers that need that byte layout should build a descending registry
    /// with [`Registry::new`] and pass it to `IcoEncoder::with_registry`.
    ///
    /// # Examples
    /// ```
    /// use iconpack::Registry;
    /// assert_eq!(Registry::ico().sizes(),
    ///            vec![16, 24, 32, 48, 64, 96, 128, 256]);
    /// ```
    pub fn ico() -> Registry {
        Registry {
            entries: [16, 24, 32, 48, 64, 96, 128, 256]
                .iter()
                .map(|&size| FormatEntry::untagged(size))
                .collect(),
        }
    }

    /// Finds the entry for images of exactly the given size.
    pub fn lookup(&self, size: u32) -> Option<&FormatEntry> {
        self.entries.iter().find(|entry| entry.size == size)
    }

    /// Returns true if the registry has an entry for the given size.
    pub fn contains(&self, size: u32) -> bool {
        self.lookup(size).is_some()
    }

    /// Returns all entries in declaration order.
    pub fn entries(&self) -> &[FormatEntry] {
        &self.entries
    }

    /// Returns the supported sizes in declaration order.
    pub fn sizes(&self) -> Vec<u32> {
        self.entries.iter().map(FormatEntry::size).collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
