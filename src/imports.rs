//! Import alias resolution
//!
//! One [`ImportRegistry`] exists per compiled definition file, so the `use`
//! statements of one file never leak into another.

use std::collections::HashMap;

use tracing::trace;

use crate::parser::UseItem;

const SEPARATOR: char = '\\';

/// Short type name → fully-qualified name table
#[derive(Debug, Clone, Default)]
pub struct ImportRegistry {
    aliases: HashMap<String, String>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `short` to its fully-qualified name.
    ///
    /// The first call for a short name that carries `full` registers the
    /// mapping. Once registered, the mapping wins regardless of arguments.
    /// Unknown names without `full` resolve to themselves and stay
    /// unregistered.
    pub fn resolve(&mut self, short: &str, full: Option<&str>) -> String {
        if let Some(known) = self.aliases.get(short) {
            return known.clone();
        }
        match full {
            Some(full) => {
                trace!(short = %short, full = %full, "registered import");
                self.aliases.insert(short.to_string(), full.to_string());
                full.to_string()
            }
            None => short.to_string(),
        }
    }

    /// Register the class imported by one `use` item
    pub fn import(&mut self, item: &UseItem) -> String {
        self.resolve(item.short_name(), Some(&item.fully_qualified()))
    }

    /// Resolve a type reference as written in a definition file.
    ///
    /// Fully-qualified names are kept. Unqualified names go through the
    /// table; qualified names resolve their first segment only.
    pub fn resolve_reference(&mut self, name: &str) -> String {
        if name.starts_with(SEPARATOR) {
            return name.to_string();
        }
        match name.split_once(SEPARATOR) {
            None => self.resolve(name, None),
            Some((head, rest)) => match self.lookup(head) {
                Some(full) => format!("{}{}{}", full, SEPARATOR, rest),
                None => name.to_string(),
            },
        }
    }

    pub fn lookup(&self, short: &str) -> Option<&str> {
        self.aliases.get(short).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
