use super::{ProfileMap, ProfileRecord, modified_time};
use crate::Result;
use chrono::{DateTime, Utc};
use ini::Ini;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const PROFILES_INI: &str = "profiles.ini";
const TIMES_JSON: &str = "times.json";

/// Read Firefox profiles from `<root>/profiles.ini`
pub fn read_profiles(root: &Path) -> ProfileMap {
    let ini_path = root.join(PROFILES_INI);
    if !ini_path.exists() {
        tracing::debug!("Firefox profiles.ini not found at {}", ini_path.display());
        return ProfileMap::new();
    }

    match parse_profiles_ini(&ini_path, root) {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", ini_path.display(), e);
            ProfileMap::new()
        }
    }
}

fn parse_profiles_ini(ini_path: &Path, root: &Path) -> Result<ProfileMap> {
    let ini = Ini::load_from_file_noescape(ini_path)?;

    // Newer Firefox names the default profile per install: [InstallXXXX] Default=<path>
    let install_defaults: HashSet<&str> = ini
        .iter()
        .filter(|(section, _)| section.is_some_and(|s| s.starts_with("Install")))
        .filter_map(|(_, props)| props.get("Default"))
        .map(str::trim)
        .collect();

    let mut profiles = ProfileMap::new();

    for (section, props) in ini.iter() {
        if !section.is_some_and(|s| s.starts_with("Profile")) {
            continue;
        }

        let name = props.get("Name").map(str::trim).unwrap_or_default();
        let relative = props.get("Path").map(str::trim).unwrap_or_default();
        if name.is_empty() || relative.is_empty() {
            continue;
        }

        let is_relative = props.get("IsRelative").map(str::trim) != Some("0");
        let path = if is_relative {
            root.join(relative)
        } else {
            PathBuf::from(relative)
        };

        let mut record = ProfileRecord::new(name, path);
        record.is_default = parse_flag(props.get("Default")) || install_defaults.contains(relative);
        record.last_used = last_used(&record.path);

        tracing::debug!("Found Firefox profile '{}' at {}", name, record.path.display());
        profiles.insert(name.to_string(), record);
    }

    Ok(profiles)
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(value.map(|v| v.trim().to_ascii_lowercase()).as_deref(), Some("1" | "true"))
}

/// `firstUse` from times.json, falling back to the directory's mtime
fn last_used(profile_dir: &Path) -> Option<DateTime<Utc>> {
    first_use(&profile_dir.join(TIMES_JSON)).or_else(|| modified_time(profile_dir))
}

fn first_use(times_path: &Path) -> Option<DateTime<Utc>> {
    let contents = std::fs::read_to_string(times_path).ok()?;
    let times: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(times) => times,
        Err(e) => {
            tracing::debug!("Ignoring {}: {}", times_path.display(), e);
            return None;
        }
    };

    let millis = times.get("firstUse")?.as_f64()?;
    if millis <= 0.0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TWO_PROFILES: &str = "\
[General]
StartWithLastProfile=1

[Profile0]
Name=Default
IsRelative=1
Path=abc
Default=1

[Profile1]
Name=Work
IsRelative=1
Path=work
";

    fn write_ini(root: &Path, contents: &str) {
        fs::create_dir_all(root).unwrap();
        fs::write(root.join(PROFILES_INI), contents).unwrap();
    }

    #[test]
    fn test_two_profiles_with_default() {
        let temp = tempfile::tempdir().unwrap();
        write_ini(temp.path(), TWO_PROFILES);

        let profiles = read_profiles(temp.path());

        assert_eq!(profiles.len(), 2);
        assert!(profiles["Default"].is_default);
        assert!(!profiles["Work"].is_default);
        assert_eq!(profiles["Work"].path, temp.path().join("work"));
        assert_eq!(profiles["Work"].display_name, "Work");
    }

    #[test]
    fn test_missing_ini_yields_no_profiles() {
        let temp = tempfile::tempdir().unwrap();
        assert!(read_profiles(temp.path()).is_empty());
    }

    #[test]
    fn test_sections_without_name_or_path_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        write_ini(
            temp.path(),
            "[Profile0]\nName=NoPath\n\n[Profile1]\nPath=nameless\n\n[Other]\nName=X\nPath=x\n",
        );

        assert!(read_profiles(temp.path()).is_empty());
    }

    #[test]
    fn test_absolute_profile_path() {
        let temp = tempfile::tempdir().unwrap();
        let elsewhere = temp.path().join("elsewhere");
        write_ini(
            &temp.path().join("root"),
            &format!(
                "[Profile0]\nName=Portable\nIsRelative=0\nPath={}\n",
                elsewhere.display()
            ),
        );

        let profiles = read_profiles(&temp.path().join("root"));
        assert_eq!(profiles["Portable"].path, elsewhere);
    }

    #[test]
    fn test_install_section_marks_default() {
        let temp = tempfile::tempdir().unwrap();
        write_ini(
            temp.path(),
            "[Install4F96D1932A9F858E]\nDefault=work\nLocked=1\n\n\
             [Profile0]\nName=Default\nIsRelative=1\nPath=abc\n\n\
             [Profile1]\nName=Work\nIsRelative=1\nPath=work\n",
        );

        let profiles = read_profiles(temp.path());
        assert!(profiles["Work"].is_default);
        assert!(!profiles["Default"].is_default);
    }

    #[test]
    fn test_last_used_from_times_json() {
        let temp = tempfile::tempdir().unwrap();
        write_ini(temp.path(), TWO_PROFILES);
        let work = temp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join(TIMES_JSON), r#"{"created": 1500000000000, "firstUse": 1600000000000}"#).unwrap();

        let profiles = read_profiles(temp.path());
        let last_used = profiles["Work"].last_used.unwrap();
        assert_eq!(last_used.timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_last_used_falls_back_to_directory_mtime() {
        let temp = tempfile::tempdir().unwrap();
        write_ini(temp.path(), TWO_PROFILES);
        let work = temp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join(TIMES_JSON), r#"{"firstUse": null}"#).unwrap();

        let profiles = read_profiles(temp.path());
        assert!(profiles["Work"].last_used.is_some());
        // Directory does not exist, so there is nothing to fall back on
        assert!(profiles["Default"].last_used.is_none());
    }
}
