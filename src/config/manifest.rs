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
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

/// The JSON document describing the full sound library, fetched from the
/// CDN or read from disk.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// A UNIX timestamp with millisecond resolution of the instant when the
    /// sound library was last updated.
    updated_at: u64,
    /// A path relative to the manifest, where individual segments are
    /// accessible at `{segmentsBasePath}/{soundId}/{segmentName}.m3u8`.
    segments_base_path: String,
    /// The groups for categorising sounds.
    groups: Vec<Group>,
    /// The tags for declaring keywords related to sounds.
    tags: Vec<Tag>,
    /// The definitions of the available sounds in the library.
    sounds: Vec<Sound>,
}

impl Manifest {
    /// Deserializes a manifest JSON file from the path.
    pub fn deserialize(path: &Path) -> Result<Manifest, Box<dyn Error>> {
        serde_json::from_str(&fs::read_to_string(path)?)
            .map_err(|e| format!("error parsing manifest {}: {}", path.display(), e).into())
    }

    /// Gets the instant of the last library update, as UNIX milliseconds.
    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Gets the groups declared by the manifest.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Gets the tags declared by the manifest.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Gets the sounds declared by the manifest.
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    /// Resolves the manifest into a library. Every group and tag reference
    /// must resolve; a dangling id fails the whole load rather than
    /// producing a partial catalogue.
    pub fn to_library(&self) -> Result<crate::library::Library, Box<dyn Error>> {
        let groups: HashMap<&str, &str> = self
            .groups
            .iter()
            .map(|group| (group.id.as_str(), group.name.as_str()))
            .collect();
        let tags: HashMap<&str, &str> = self
            .tags
            .iter()
            .map(|tag| (tag.id.as_str(), tag.name.as_str()))
            .collect();

        let mut sounds: HashMap<String, Arc<crate::library::Sound>> = HashMap::new();
        for sound in self.sounds.iter() {
            let sound = crate::library::Sound::new(&self.segments_base_path, sound, &groups, &tags)?;
            sounds.insert(sound.id().to_string(), Arc::new(sound));
        }

        Ok(crate::library::Library::new(sounds))
    }
}

/// A group for categorising sounds.
#[derive(Deserialize)]
pub struct Group {
    /// A unique stable snake-cased identifier for the group.
    id: String,
    /// A user-presentable name for the group.
    name: String,
}

impl Group {
    /// Gets the id of the group.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the name of the group.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A tag declaring a keyword related to sounds.
#[derive(Deserialize)]
pub struct Tag {
    /// A unique stable snake-cased identifier for the tag.
    id: String,
    /// A user-presentable name for the tag.
    name: String,
}

impl Tag {
    /// Gets the id of the tag.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the name of the tag.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The manifest representation of a sound.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    /// A unique stable snake-cased identifier for the sound.
    id: String,
    /// The id of an existing group this sound belongs to.
    group_id: String,
    /// A user-presentable name for the sound.
    name: String,
    /// A URI containing a user-presentable icon for the sound.
    icon: String,
    /// The upper limit (in seconds) for the amount of silence to add
    /// in-between segments for non-contiguous sounds. A sound with a zero
    /// limit is contiguous.
    max_silence: u64,
    /// The segments of this sound.
    segments: Vec<Segment>,
    /// The ids of existing tags that associate with this sound.
    tags: Vec<String>,
    /// Attributions for the original clip sources of this sound.
    sources: Vec<Source>,
}

impl Sound {
    /// Gets the id of the sound.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the group id of the sound.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Gets the name of the sound.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the icon URI of the sound.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Gets the upper limit for the silence between segment repeats.
    pub fn max_silence(&self) -> u64 {
        self.max_silence
    }

    /// Gets the segments of the sound.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Gets the tag ids of the sound.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Gets the source attributions of the sound.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }
}

/// The manifest representation of a sound segment.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// The name of the segment.
    name: String,
    /// A hint whether the segment is available to unsubscribed users.
    is_free: bool,
}

impl Segment {
    /// Gets the name of the segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the segment is available to unsubscribed users.
    pub fn is_free(&self) -> bool {
        self.is_free
    }
}

/// Attribution details for an original clip source.
#[derive(Deserialize)]
pub struct Source {
    /// The name of the source clip.
    name: String,
    /// The URL of the source clip.
    url: String,
    /// The SPDX license code of the source clip.
    license: String,
    /// The author of the source clip.
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

    /// Gets the SPDX license code of the source clip.
    pub fn license(&self) -> &str {
        &self.license
    }

    /// Gets the author of the source clip.
    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }
}

/// The author of a source clip.
#[derive(Deserialize)]
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

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::path::PathBuf;

    use super::Manifest;

    #[test]
    fn test_deserialize() -> Result<(), Box<dyn Error>> {
        let manifest = Manifest::deserialize(&PathBuf::from("assets/library-manifest.json"))?;

        assert_eq!(1719912600000, manifest.updated_at());
        assert_eq!(3, manifest.groups().len());
        assert_eq!(3, manifest.tags().len());
        assert_eq!(4, manifest.sounds().len());

        let rain = manifest
            .sounds()
            .iter()
            .find(|sound| sound.id() == "rain")
            .expect("rain should be in the manifest");
        assert_eq!("water", rain.group_id());
        assert_eq!(0, rain.max_silence());
        assert_eq!(2, rain.segments().len());
        Ok(())
    }

    #[test]
    fn test_to_library_rejects_dangling_group() -> Result<(), Box<dyn Error>> {
        let manifest =
            Manifest::deserialize(&PathBuf::from("assets/dangling-group-manifest.json"))?;

        let err = manifest
            .to_library()
            .expect_err("dangling group reference should fail the load");
        assert!(err.to_string().contains("unknown group 'lava'"));
        Ok(())
    }

    #[test]
    fn test_to_library_rejects_dangling_tag() -> Result<(), Box<dyn Error>> {
        let manifest = Manifest::deserialize(&PathBuf::from("assets/dangling-tag-manifest.json"))?;

        let err = manifest
            .to_library()
            .expect_err("dangling tag reference should fail the load");
        assert!(err.to_string().contains("unknown tag 'storm'"));
        Ok(())
    }
}
