// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use core::fmt;
use std::sync::Arc;

use crate::library::{Library, Sound};

/// An ordered, grouped view of the sound library for presentation and
/// searching. Groups appear in first-encounter order of the underlying
/// sound list; sounds keep their list order within each group.
pub struct Catalogue {
    /// The group buckets, in order.
    groups: Vec<(String, Vec<Arc<Sound>>)>,
}

impl Catalogue {
    /// Builds the catalogue from the library's presentation order with a
    /// single stable pass: each sound is appended to its group's bucket,
    /// and a bucket is created on first encounter of its group.
    pub fn new(library: &Library) -> Catalogue {
        let mut groups: Vec<(String, Vec<Arc<Sound>>)> = Vec::new();
        for sound in library.sorted_list() {
            match groups.iter_mut().find(|(group, _)| group == sound.group()) {
                Some((_, sounds)) => sounds.push(sound),
                None => groups.push((sound.group().to_string(), vec![sound])),
            }
        }

        Catalogue { groups }
    }

    /// Narrows the catalogue to sounds matching the search query. A sound is
    /// retained iff the trimmed, lower-cased query is a substring of its
    /// name, its group's name, or any of its tags. Groups left without
    /// sounds are dropped. An empty query returns the catalogue unchanged.
    /// Ordering is inherited from the input, never re-sorted.
    pub fn filter(&self, query: &str) -> Catalogue {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Catalogue {
                groups: self.groups.clone(),
            };
        }

        let mut groups: Vec<(String, Vec<Arc<Sound>>)> = Vec::new();
        for (group, sounds) in self.groups.iter() {
            let matched: Vec<Arc<Sound>> = sounds
                .iter()
                .filter(|sound| Catalogue::matches(sound, &query))
                .cloned()
                .collect();

            if !matched.is_empty() {
                groups.push((group.clone(), matched));
            }
        }

        Catalogue { groups }
    }

    /// Returns true if the sound matches the query. The query must already
    /// be trimmed and lower-cased.
    fn matches(sound: &Sound, query: &str) -> bool {
        sound.name().to_lowercase().contains(query)
            || sound.group().to_lowercase().contains(query)
            || sound
                .tags()
                .iter()
                .any(|tag| tag.to_lowercase().contains(query))
    }

    /// Gets the ordered group buckets of the catalogue.
    pub fn groups(&self) -> &[(String, Vec<Arc<Sound>>)] {
        &self.groups
    }

    /// Returns true if the catalogue holds no sounds.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of sounds in the catalogue.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, sounds)| sounds.len()).sum()
    }
}

impl fmt::Display for Catalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Catalogue ({} sounds in {} groups):",
            self.len(),
            self.groups.len()
        )?;
        for (group, sounds) in self.groups.iter() {
            writeln!(f, "  {}:", group)?;
            for sound in sounds.iter() {
                writeln!(f, "  - {} ({})", sound.name(), sound.id())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::PathBuf;

    use crate::config;

    use super::Catalogue;

    /// Flattens a catalogue into (group, [sound names]) pairs for easy
    /// comparison.
    fn flatten(catalogue: &Catalogue) -> Vec<(String, Vec<String>)> {
        catalogue
            .groups()
            .iter()
            .map(|(group, sounds)| {
                (
                    group.clone(),
                    sounds.iter().map(|sound| sound.name().to_string()).collect(),
                )
            })
            .collect()
    }

    fn catalogue() -> Result<Catalogue, Box<dyn Error>> {
        let library = config::parse_manifest(&PathBuf::from("assets/library-manifest.json"))?;
        Ok(Catalogue::new(&library))
    }

    #[test]
    fn test_grouping_preserves_order() -> Result<(), Box<dyn Error>> {
        let catalogue = catalogue()?;

        assert_eq!(
            vec![
                ("Fire".to_string(), vec!["Campfire".to_string()]),
                (
                    "Water".to_string(),
                    vec!["Rain".to_string(), "Thunder".to_string()]
                ),
                ("Wind".to_string(), vec!["Soft Wind".to_string()]),
            ],
            flatten(&catalogue)
        );
        Ok(())
    }

    #[test]
    fn test_filter_empty_query_is_identity() -> Result<(), Box<dyn Error>> {
        let catalogue = catalogue()?;

        assert_eq!(flatten(&catalogue), flatten(&catalogue.filter("")));
        assert_eq!(flatten(&catalogue), flatten(&catalogue.filter("   ")));
        assert_eq!(flatten(&catalogue), flatten(&catalogue.filter("\t \n")));
        Ok(())
    }

    #[test]
    fn test_filter_matches_name_group_and_tags() -> Result<(), Box<dyn Error>> {
        let catalogue = catalogue()?;

        // "rain" matches Rain by name and Thunder via the Rainfall tag.
        // Groups without matches are dropped entirely.
        assert_eq!(
            vec![(
                "Water".to_string(),
                vec!["Rain".to_string(), "Thunder".to_string()]
            )],
            flatten(&catalogue.filter("rain"))
        );

        // Group name matching retains the whole group.
        assert_eq!(
            vec![(
                "Water".to_string(),
                vec!["Rain".to_string(), "Thunder".to_string()]
            )],
            flatten(&catalogue.filter("water"))
        );

        // Tag matching is case-insensitive and spans groups.
        assert_eq!(
            vec![
                ("Fire".to_string(), vec!["Campfire".to_string()]),
                ("Water".to_string(), vec!["Thunder".to_string()]),
            ],
            flatten(&catalogue.filter("NIGHT"))
        );
        Ok(())
    }

    #[test]
    fn test_filter_no_matches() -> Result<(), Box<dyn Error>> {
        let catalogue = catalogue()?;

        let filtered = catalogue.filter("submarine");
        assert!(filtered.is_empty());
        assert_eq!(0, filtered.len());
        assert!(filtered.groups().is_empty());
        Ok(())
    }

    #[test]
    fn test_filter_trims_and_lowercases() -> Result<(), Box<dyn Error>> {
        let catalogue = catalogue()?;

        assert_eq!(
            flatten(&catalogue.filter("campfire")),
            flatten(&catalogue.filter("  CampFire  "))
        );
        Ok(())
    }
}
