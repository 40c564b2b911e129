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
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::util::format_seconds;

/// An ambient sound from the library. Group and tag references are resolved
/// to their names at load time; the sound is read-only afterwards.
#[derive(Debug)]
pub struct Sound {
    /// The unique stable identifier of the sound.
    id: String,
    /// The user-presentable name of the sound.
    name: String,
    /// The name of the group this sound belongs to.
    group: String,
    /// A URI with a user-presentable icon for the sound.
    icon: String,
    /// The upper bound for the silence inserted between segment repeats.
    /// A zero duration means the sound plays seamlessly.
    max_silence: Duration,
    /// The streamable segments of this sound.
    segments: Vec<Segment>,
    /// The resolved names of the tags associated with this sound.
    tags: Vec<String>,
    /// Attributions for the original clips this sound was built from.
    sources: Vec<Source>,
    /// The manifest-relative base path under which segments are addressed.
    segments_base_path: String,
}

/// A named, independently addressable chunk of a sound's streamable audio.
#[derive(Debug)]
pub struct Segment {
    /// The name of the segment.
    name: String,
    /// Whether the segment is accessible without a subscription. Enforcement
    /// is the CDN's responsibility, this is only a hint.
    is_free: bool,
}

impl Segment {
    /// Gets the name of the segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the segment is accessible without a subscription.
    pub fn is_free(&self) -> bool {
        self.is_free
    }
}

/// Attribution details for one of the original clips a sound was built from.
#[derive(Debug)]
pub struct Source {
    /// The name of the source clip.
    name: String,
    /// The URL of the source clip.
    url: String,
    /// The SPDX license id of the source clip.
    license: String,
    /// The author of the source clip, if known.
    author: Option<Author>,
}

impl Source {
    /// Gets the name of the source clip.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the URL of the source clip.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Gets the SPDX license id of the source clip.
    pub fn license(&self) -> &str {
        &self.license
    }

    /// Gets the author of the source clip.
    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }
}

/// The author of a source clip.
#[derive(Debug)]
pub struct Author {
    /// The name of the author.
    name: String,
    /// The URL of the author.
    url: String,
}

impl Author {
    /// Gets the name of the author.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the URL of the author.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Sound {
    /// Creates a new sound from its manifest definition, resolving the group
    /// and tag references against the manifest's lookup tables. A reference
    /// that doesn't resolve fails the sound, which in turn fails the library.
    pub fn new(
        segments_base_path: &str,
        sound: &config::manifest::Sound,
        groups: &HashMap<&str, &str>,
        tags: &HashMap<&str, &str>,
    ) -> Result<Sound, Box<dyn Error>> {
        let group = groups
            .get(sound.group_id())
            .map(|name| name.to_string())
            .ok_or_else(|| {
                format!(
                    "sound '{}' references unknown group '{}'",
                    sound.id(),
                    sound.group_id()
                )
            })?;

        let tags = sound
            .tags()
            .iter()
            .map(|tag_id| {
                tags.get(tag_id.as_str())
                    .map(|name| name.to_string())
                    .ok_or_else(|| {
                        format!("sound '{}' references unknown tag '{}'", sound.id(), tag_id)
                    })
            })
            .collect::<Result<Vec<String>, String>>()?;

        let segments = sound
            .segments()
            .iter()
            .map(|segment| Segment {
                name: segment.name().to_string(),
                is_free: segment.is_free(),
            })
            .collect();

        let sources = sound
            .sources()
            .iter()
            .map(|source| Source {
                name: source.name().to_string(),
                url: source.url().to_string(),
                license: source.license().to_string(),
                author: source.author().map(|author| Author {
                    name: author.name().to_string(),
                    url: author.url().to_string(),
                }),
            })
            .collect();

        Ok(Sound {
            id: sound.id().to_string(),
            name: sound.name().to_string(),
            group,
            icon: sound.icon().to_string(),
            max_silence: Duration::from_secs(sound.max_silence()),
            segments,
            tags,
            sources,
            segments_base_path: segments_base_path.to_string(),
        })
    }

    /// Gets the id of the sound.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the name of the sound.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the group name of the sound.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Gets the icon URI of the sound.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Gets the upper bound for the silence between segment repeats.
    pub fn max_silence(&self) -> Duration {
        self.max_silence
    }

    /// Returns true if the sound plays seamlessly, i.e. no silence is ever
    /// inserted between its segments.
    pub fn is_seamless(&self) -> bool {
        self.max_silence.is_zero()
    }

    /// Gets the segments of the sound.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Gets the segments of the sound that are accessible without a
    /// subscription.
    pub fn free_segments(&self) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|segment| segment.is_free)
            .collect()
    }

    /// Returns true if at least one segment of the sound is free.
    pub fn has_free_segments(&self) -> bool {
        self.segments.iter().any(|segment| segment.is_free)
    }

    /// Gets the resolved tag names of the sound.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Gets the source attributions of the sound.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Resolves the streaming playlist URL for one of this sound's segments.
    pub fn stream_url(&self, segment: &Segment) -> String {
        format!("{}/{}/{}.m3u8", self.segments_base_path, self.id, segment.name)
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let silence = if self.is_seamless() {
            "none (seamless)".to_string()
        } else {
            format!("up to {}", format_seconds(self.max_silence.as_secs()))
        };

        write!(
            f,
            "Name: {}\n  Group: {}\n  Icon: {}\n  Silence Between Repeats: {}\n  Tags: {}\n  Segments: {}",
            self.name,
            self.group,
            self.icon,
            silence,
            self.tags.join(", "),
            self.segments
                .iter()
                .map(|segment| segment.name.clone())
                .collect::<Vec<String>>()
                .join(", "),
        )
    }
}

/// The sound library registry.
#[derive(Debug)]
pub struct Library {
    /// A mapping of the sounds in the library, keyed by sound id.
    sounds: HashMap<String, Arc<Sound>>,
}

impl Library {
    /// Creates a new library registry.
    pub fn new(sounds: HashMap<String, Arc<Sound>>) -> Library {
        Library { sounds }
    }

    /// Returns true if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Gets a sound from the library by its id.
    pub fn get(&self, id: &str) -> Result<Arc<Sound>, Box<dyn Error>> {
        match self.sounds.get(id) {
            Some(sound) => Ok(Arc::clone(sound)),
            None => Err(format!("unable to find sound {}", id).into()),
        }
    }

    /// Returns an unsorted list of the sounds in the library.
    pub fn list(&self) -> Vec<Arc<Sound>> {
        self.sounds
            .values()
            .cloned()
            .collect::<Vec<Arc<Sound>>>()
    }

    /// Returns the sounds in the library sorted by group name, then sound
    /// name. This is the presentation order of the catalogue.
    pub fn sorted_list(&self) -> Vec<Arc<Sound>> {
        let mut sorted_sounds = self.list();
        sorted_sounds.sort_by_key(|sound| (sound.group.clone(), sound.name.clone()));
        sorted_sounds
    }

    /// Returns a copy of the library restricted to sounds with at least one
    /// free segment.
    pub fn free_only(&self) -> Library {
        Library {
            sounds: self
                .sounds
                .iter()
                .filter(|(_, sound)| sound.has_free_segments())
                .map(|(id, sound)| (id.clone(), Arc::clone(sound)))
                .collect(),
        }
    }

    /// Returns the number of sounds in the library.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::PathBuf;

    use crate::config;

    #[test]
    fn test_library() -> Result<(), Box<dyn Error>> {
        let library = config::parse_manifest(&PathBuf::from("assets/library-manifest.json"))?;

        assert!(!library.is_empty());
        assert_eq!(4, library.len());

        let rain = library.get("rain")?;
        assert_eq!("Rain", rain.name());
        assert_eq!("Water", rain.group());
        assert!(rain.is_seamless());
        assert_eq!(vec!["Nature", "Rainfall"], rain.tags());

        let thunder = library.get("thunder")?;
        assert!(!thunder.is_seamless());
        assert_eq!(300, thunder.max_silence().as_secs());

        assert!(library.get("lava").is_err());
        Ok(())
    }

    #[test]
    fn test_sorted_list() -> Result<(), Box<dyn Error>> {
        let library = config::parse_manifest(&PathBuf::from("assets/library-manifest.json"))?;

        // Sorted by group name, then sound name.
        let names: Vec<String> = library
            .sorted_list()
            .iter()
            .map(|sound| format!("{}/{}", sound.group(), sound.name()))
            .collect();
        assert_eq!(
            vec!["Fire/Campfire", "Water/Rain", "Water/Thunder", "Wind/Soft Wind"],
            names
        );
        Ok(())
    }

    #[test]
    fn test_stream_url() -> Result<(), Box<dyn Error>> {
        let library = config::parse_manifest(&PathBuf::from("assets/library-manifest.json"))?;

        let rain = library.get("rain")?;
        let urls: Vec<String> = rain
            .segments()
            .iter()
            .map(|segment| rain.stream_url(segment))
            .collect();
        assert_eq!(
            vec![
                "library/segments/rain/rain_light.m3u8",
                "library/segments/rain/rain_heavy.m3u8",
            ],
            urls
        );
        Ok(())
    }

    #[test]
    fn test_free_only() -> Result<(), Box<dyn Error>> {
        let library = config::parse_manifest(&PathBuf::from("assets/library-manifest.json"))?;

        // Soft Wind has no free segments and should be dropped.
        let free = library.free_only();
        assert_eq!(3, free.len());
        assert!(free.get("soft_wind").is_err());
        assert!(free.get("rain").is_ok());

        // Rain keeps its non-free segment, the restriction is per sound.
        assert_eq!(2, free.get("rain")?.segments().len());
        assert_eq!(1, free.get("rain")?.free_segments().len());
        Ok(())
    }
}
