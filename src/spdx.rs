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
use std::error::Error;

/// A user-presentable description of an SPDX license.
#[derive(Debug)]
pub struct License {
    /// The full license name.
    pub name: &'static str,
    /// The canonical license text URL.
    pub url: &'static str,
}

/// The licenses that sound sources in the library are allowed to carry.
/// Attribution rendering resolves against this table only.
const LICENSES: &[(&str, License)] = &[
    (
        "CC0-1.0",
        License {
            name: "Creative Commons Zero v1.0 Universal",
            url: "https://spdx.org/licenses/CC0-1.0.html",
        },
    ),
    (
        "CC-BY-3.0",
        License {
            name: "Creative Commons Attribution 3.0 Unported",
            url: "https://spdx.org/licenses/CC-BY-3.0.html",
        },
    ),
    (
        "CC-BY-4.0",
        License {
            name: "Creative Commons Attribution 4.0 International",
            url: "https://spdx.org/licenses/CC-BY-4.0.html",
        },
    ),
    (
        "GPL-3.0-only",
        License {
            name: "GNU General Public License v3.0 only",
            url: "https://spdx.org/licenses/GPL-3.0-only.html",
        },
    ),
];

/// Resolves an SPDX license id against the fixed license table. Sound
/// sources are attributed by content authors, so an unknown id is a library
/// authoring error and must fail loudly rather than render a degraded
/// attribution.
pub fn lookup(id: &str) -> Result<&'static License, Box<dyn Error>> {
    LICENSES
        .iter()
        .find(|(license_id, _)| *license_id == id)
        .map(|(_, license)| license)
        .ok_or_else(|| format!("unknown SPDX license id '{}'", id).into())
}

#[cfg(test)]
mod test {
    use super::lookup;

    #[test]
    fn test_lookup_known_licenses() {
        let license = lookup("CC-BY-4.0").expect("CC-BY-4.0 should resolve");
        assert_eq!("Creative Commons Attribution 4.0 International", license.name);
        assert_eq!("https://spdx.org/licenses/CC-BY-4.0.html", license.url);

        assert!(lookup("CC0-1.0").is_ok());
        assert!(lookup("CC-BY-3.0").is_ok());
        assert!(lookup("GPL-3.0-only").is_ok());
    }

    #[test]
    fn test_lookup_unknown_license() {
        let err = lookup("MIT").expect_err("MIT is not in the license table");
        assert!(err.to_string().contains("MIT"));
    }
}
