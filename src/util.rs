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

/// Outputs the given number of seconds as a list of pluralized units,
/// e.g. 3661 becomes "1 hour 1 minute 1 second". Zero seconds renders as
/// an empty string.
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts: Vec<String> = Vec::new();
    for (amount, unit) in [(hours, "hour"), (minutes, "minute"), (seconds, "second")] {
        if amount > 0 {
            let plural = if amount > 1 { "s" } else { "" };
            parts.push(format!("{} {}{}", amount, unit, plural));
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod test {
    use crate::util::format_seconds;

    #[test]
    fn test_format_seconds() {
        assert_eq!("", format_seconds(0));
        assert_eq!("1 second", format_seconds(1));
        assert_eq!("30 seconds", format_seconds(30));
        assert_eq!("1 minute", format_seconds(60));
        assert_eq!("1 minute 30 seconds", format_seconds(90));
        assert_eq!("2 minutes", format_seconds(120));
        assert_eq!("1 hour 1 minute 1 second", format_seconds(3661));
        assert_eq!("2 hours 5 seconds", format_seconds(7205));
    }
}
