//! Header label dictionary.
//!
//! Maps raw column/row key text to a LaTeX display descriptor. Unmapped keys
//! render their raw text unchanged, so tables with unexpected columns still
//! come out (just unstyled).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Display descriptor for one raw key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderLabel {
    /// LaTeX source for the header cell.
    pub text: String,
    /// When set, the mapping only applies on this header row; the raw text is
    /// used on every other level.
    #[serde(default)]
    pub level: Option<u8>,
    /// When set, overrides the computed column span of the header cell.
    #[serde(default)]
    pub span: Option<usize>,
}

impl HeaderLabel {
    fn plain(text: &str) -> HeaderLabel {
        HeaderLabel {
            text: text.to_string(),
            level: None,
            span: None,
        }
    }
}

/// Raw key -> display descriptor mapping.
#[derive(Debug, Clone, Default)]
pub struct HeaderDict {
    entries: HashMap<String, HeaderLabel>,
}

/// One entry of a JSON override file: either a bare display string or a full
/// descriptor with `text`/`level`/`span`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OverrideEntry {
    Text(String),
    Full(HeaderLabel),
}

impl HeaderDict {
    /// The built-in mapping for the convergence-study column set.
    pub fn builtin() -> HeaderDict {
        let mut dict = HeaderDict::default();
        dict.insert("h", HeaderLabel::plain(r"$ h~[\textup{m}] $"));
        dict.insert("dt", HeaderLabel::plain(r"$ \tau~[\textup{s}] $"));
        dict.insert("DOF", HeaderLabel::plain(r"$ N_{dof} $"));
        dict.insert("L1", HeaderLabel::plain(r"$ \lVert E_{h,S_n} \rVert_1 $"));
        dict.insert("L2", HeaderLabel::plain(r"$ \lVert E_{h,S_n} \rVert_2 $"));
        dict.insert("S_L1", HeaderLabel::plain(r"$ \lVert E_{h,S_n} \rVert_1 $"));
        dict.insert("S_L2", HeaderLabel::plain(r"$ \lVert E_{h,S_n} \rVert_2 $"));
        dict.insert("S_L1_eoc", HeaderLabel::plain(r"$ eoc_{S_n,1} $"));
        dict.insert("S_L2_eoc", HeaderLabel::plain(r"$ eoc_{S_n,2} $"));
        dict.insert("BC", HeaderLabel::plain(r"{\footnotesize Brooks \& Corey}"));
        dict.insert("VG", HeaderLabel::plain(r"{\footnotesize van Genuchten}"));
        dict
    }

    pub fn insert(&mut self, raw: &str, label: HeaderLabel) {
        self.entries.insert(raw.to_string(), label);
    }

    pub fn lookup(&self, raw: &str) -> Option<&HeaderLabel> {
        self.entries.get(raw)
    }

    /// Mapped display text, falling back to the raw key unchanged.
    pub fn display(&self, raw: &str) -> String {
        self.lookup(raw)
            .map(|label| label.text.clone())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Merge entries from a JSON override file on top of the current mapping.
    pub fn load_overrides(&mut self, path: &Path) -> Result<(), AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::input(format!(
                "Failed to read header overrides '{}': {e}",
                path.display()
            ))
        })?;
        self.apply_overrides(&text).map_err(|e| {
            AppError::input(format!(
                "Invalid header overrides '{}': {e}",
                path.display()
            ))
        })
    }

    fn apply_overrides(&mut self, text: &str) -> Result<(), serde_json::Error> {
        let overrides: HashMap<String, OverrideEntry> = serde_json::from_str(text)?;
        for (raw, entry) in overrides {
            let label = match entry {
                OverrideEntry::Text(text) => HeaderLabel::plain(&text),
                OverrideEntry::Full(label) => label,
            };
            self.entries.insert(raw, label);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_known_keys() {
        let dict = HeaderDict::builtin();
        assert_eq!(dict.display("h"), r"$ h~[\textup{m}] $");
        assert_eq!(dict.display("BC"), r"{\footnotesize Brooks \& Corey}");
    }

    #[test]
    fn unknown_keys_fall_back_to_raw_text() {
        let dict = HeaderDict::builtin();
        assert_eq!(dict.display("scheme"), "scheme");
    }

    #[test]
    fn overrides_replace_and_extend() {
        let mut dict = HeaderDict::builtin();
        dict.apply_overrides(
            r#"{"h": "$ h $", "S_L1": {"text": "$ e_1 $", "span": 2}, "p": "order"}"#,
        )
        .unwrap();

        assert_eq!(dict.display("h"), "$ h $");
        assert_eq!(dict.display("p"), "order");
        let label = dict.lookup("S_L1").unwrap();
        assert_eq!(label.text, "$ e_1 $");
        assert_eq!(label.span, Some(2));
        assert_eq!(label.level, None);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        let mut dict = HeaderDict::builtin();
        assert!(dict.apply_overrides(r#"{"h": 3}"#).is_err());
    }
}
