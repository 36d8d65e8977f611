use super::name::Name;
use bytesstr::BytesStr;
use std::fmt;

/// Headers is simple container for SIP-Message headers.
/// The headers are stored as [BytesStr] under its respective [Name].
///
/// Internally it is a `Vec`-backed multimap to keep insertion order
#[derive(Default, Clone)]
pub struct Headers {
    entries: Vec<(Name, BytesStr)>,
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(n, v)| (n.as_print_str(), v)))
            .finish()
    }
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns if a header with the given name is inside the map.
    pub fn contains(&self, name: &Name) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Insert a header value with the given name to end of the list
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<Name>,
        V: Into<BytesStr>,
    {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value stored under `name`
    pub fn get(&self, name: &Name) -> Option<&BytesStr> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Returns all values stored under `name` in insertion order
    pub fn get_all<'a>(&'a self, name: &'a Name) -> impl Iterator<Item = &'a BytesStr> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Remove all headers with the given name, returning their values
    pub fn remove(&mut self, name: &Name) -> Vec<BytesStr> {
        let mut removed = vec![];

        self.entries.retain(|(n, value)| {
            if n == name {
                removed.push(value.clone());
                false
            } else {
                true
            }
        });

        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &BytesStr)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }

        Ok(())
    }
}
