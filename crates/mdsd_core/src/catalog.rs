//! Building the ordered list of games to process.
//!
//! hi2txt ships one reference file per supported game. Those entry names,
//! minus the template and anything with another extension, are the catalog.

use std::collections::BTreeSet;
use std::path::Path;

use crate::archive::{ArchiveLister, ArchiveResult};
use crate::config::CatalogSettings;
use crate::models::ItemId;

/// Filtering rules applied to archive entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRules {
    /// Required entry extension, without the dot (matched case-insensitively).
    pub extension: String,
    /// Entry name excluded from the catalog.
    pub template_entry: String,
}

impl Default for CatalogRules {
    fn default() -> Self {
        Self::from(&CatalogSettings::default())
    }
}

impl From<&CatalogSettings> for CatalogRules {
    fn from(settings: &CatalogSettings) -> Self {
        Self {
            extension: settings.entry_extension.trim_start_matches('.').to_string(),
            template_entry: settings.template_entry.clone(),
        }
    }
}

/// Turn raw archive entries into a sorted, de-duplicated catalog.
pub fn build_catalog<I, S>(entries: I, rules: &CatalogRules) -> Vec<ItemId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let suffix = format!(".{}", rules.extension);
    let mut names = BTreeSet::new();

    for entry in entries {
        let entry = entry.as_ref();
        if entry.is_empty() || entry == rules.template_entry {
            continue;
        }
        if let Some(stem) = strip_suffix_ignore_case(entry, &suffix) {
            if !stem.is_empty() {
                names.insert(stem.to_string());
            }
        }
    }

    names.into_iter().map(ItemId::new).collect()
}

/// List `archive` and build its catalog.
pub fn load_catalog(
    lister: &dyn ArchiveLister,
    archive: &Path,
    rules: &CatalogRules,
) -> ArchiveResult<Vec<ItemId>> {
    let entries = lister.list_entries(archive)?;
    let catalog = build_catalog(&entries, rules);
    tracing::info!(
        "{} listed {} entries, {} games in catalog",
        lister.name(),
        entries.len(),
        catalog.len()
    );
    Ok(catalog)
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveError;

    fn names(catalog: &[ItemId]) -> Vec<&str> {
        catalog.iter().map(ItemId::as_str).collect()
    }

    #[test]
    fn filters_sorts_and_strips() {
        let entries = ["foo.xml", "bar.xml", "_template.xml", "baz.txt"];
        let catalog = build_catalog(entries, &CatalogRules::default());
        assert_eq!(names(&catalog), vec!["bar", "foo"]);
    }

    #[test]
    fn extension_match_ignores_case() {
        let entries = ["DKONG.XML", "galaga.Xml", "pacman.xml"];
        let catalog = build_catalog(entries, &CatalogRules::default());
        assert_eq!(names(&catalog), vec!["DKONG", "galaga", "pacman"]);
    }

    #[test]
    fn deduplicates_and_orders_bytewise() {
        let entries = ["b.xml", "a.xml", "B.xml", "a.XML", "", ".xml"];
        let catalog = build_catalog(entries, &CatalogRules::default());
        assert_eq!(names(&catalog), vec!["B", "a", "b"]);
    }

    #[test]
    fn same_entries_same_catalog() {
        let first = build_catalog(["z.xml", "m.xml", "a.xml"], &CatalogRules::default());
        let second = build_catalog(["a.xml", "z.xml", "m.xml"], &CatalogRules::default());
        assert_eq!(first, second);
    }

    #[test]
    fn rules_from_settings() {
        let settings = CatalogSettings {
            entry_extension: ".dat".to_string(),
            template_entry: "template.dat".to_string(),
            ..CatalogSettings::default()
        };
        let rules = CatalogRules::from(&settings);
        let catalog = build_catalog(["template.dat", "rom.dat", "rom.xml"], &rules);
        assert_eq!(names(&catalog), vec!["rom"]);
    }

    struct FixedLister(Vec<&'static str>);

    impl ArchiveLister for FixedLister {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn list_entries(&self, _archive: &Path) -> ArchiveResult<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct BrokenLister;

    impl ArchiveLister for BrokenLister {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn list_entries(&self, archive: &Path) -> ArchiveResult<Vec<String>> {
            Err(ArchiveError::FileNotFound(archive.to_path_buf()))
        }
    }

    #[test]
    fn load_catalog_uses_lister() {
        let lister = FixedLister(vec!["pacman.xml", "_template.xml", "1942.xml"]);
        let catalog =
            load_catalog(&lister, Path::new("hi2txt.zip"), &CatalogRules::default()).unwrap();
        assert_eq!(names(&catalog), vec!["1942", "pacman"]);
    }

    #[test]
    fn load_catalog_propagates_listing_failure() {
        let result = load_catalog(&BrokenLister, Path::new("hi2txt.zip"), &CatalogRules::default());
        assert!(result.is_err());
    }
}
