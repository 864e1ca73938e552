//! Color parsing for configuration inputs.

use std::collections::HashMap;

use crate::foundation::error::{PixForgeError, PixForgeResult};

/// Parse `#RRGGBB` or `#AARRGGBB` (leading `#` optional) into packed ARGB. Six-digit forms are
/// opaque.
pub fn parse_hex_color(s: &str) -> PixForgeResult<u32> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PixForgeError::validation(format!("invalid color '{s}'")));
    }
    let v = u32::from_str_radix(hex, 16)
        .map_err(|_| PixForgeError::validation(format!("invalid color '{s}'")))?;
    match hex.len() {
        6 => Ok(0xFF00_0000 | v),
        8 => Ok(v),
        _ => Err(PixForgeError::validation(format!(
            "color '{s}' must have 6 or 8 hex digits"
        ))),
    }
}

/// Memoizes [`parse_hex_color`] results. Owned by the caller; nothing is shared process-wide.
#[derive(Debug, Default, Clone)]
pub struct ColorCache {
    entries: HashMap<String, u32>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, s: &str) -> PixForgeResult<u32> {
        if let Some(&v) = self.entries.get(s) {
            return Ok(v);
        }
        let v = parse_hex_color(s)?;
        self.entries.insert(s.to_string(), v);
        Ok(v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
