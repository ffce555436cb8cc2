//! Reading and rewriting RPM spec files.
//!
//! Only two fields matter here: `Version:` (which records the packaged
//! upstream commit) and the `-n <dir>` argument of `%setup`.

use crate::domain::{PackageVersion, PackagingState};
use crate::error::{ChangesRefreshError, Result};
use regex::Regex;

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ChangesRefreshError::spec(format!("invalid pattern '{}': {}", pattern, e)))
}

fn version_line() -> Result<Regex> {
    compile(r"^(Version:\s*)(\S+)(.*)$")
}

fn setup_line() -> Result<Regex> {
    compile(r"^(%setup\b.*?\s-n\s+)(\S+)(.*)$")
}

/// Short hash at the end of a build directory name: `-1a2b3c4`,
/// `.g1a2b3c4` or `-g1a2b3c4`. Group 1 is set for the `g`-marked forms.
fn dir_hash() -> Result<Regex> {
    compile(r"(?:[.-](g)|-)([0-9a-f]{7,40})$")
}

/// The commit hash encoded in a build directory name, if any.
///
/// An unmarked `-<hex>` suffix must contain a letter, so date or build
/// number suffixes like `foo-20201231` are not taken for hashes.
fn hash_in_dir(re: &Regex, dir: &str) -> Option<String> {
    let captures = re.captures(dir)?;
    let hash = captures.get(2)?.as_str();
    let marked = captures.get(1).is_some();
    if marked || hash.chars().any(|c| c.is_ascii_alphabetic()) {
        Some(hash.to_string())
    } else {
        None
    }
}

/// Lines of `spec` without their terminators, paired with the terminator.
fn split_lines(spec: &str) -> impl Iterator<Item = (&str, &str)> {
    spec.split_inclusive('\n').map(|line| {
        let content = line.trim_end_matches(['\n', '\r']);
        (content, &line[content.len()..])
    })
}

/// The value of the single `Version:` field.
///
/// # Errors
/// [`ChangesRefreshError::SpecFormat`] when the field is missing or repeated.
pub fn version_field(spec: &str) -> Result<String> {
    let re = version_line()?;
    let values: Vec<String> = split_lines(spec)
        .filter_map(|(line, _)| re.captures(line))
        .filter_map(|c| c.get(2).map(|m| m.as_str().to_string()))
        .collect();

    match values.as_slice() {
        [value] => Ok(value.clone()),
        [] => Err(ChangesRefreshError::spec("no Version: field found")),
        _ => Err(ChangesRefreshError::spec(format!(
            "expected one Version: field, found {}",
            values.len()
        ))),
    }
}

/// Directory names passed to `%setup -n`, in file order.
pub fn setup_dirs(spec: &str) -> Result<Vec<String>> {
    let re = setup_line()?;
    Ok(split_lines(spec)
        .filter_map(|(line, _)| re.captures(line))
        .filter_map(|c| c.get(2).map(|m| m.as_str().to_string()))
        .collect())
}

/// Work out which upstream commit the spec was last refreshed to.
///
/// The `Version:` field is consulted first; failing that, a `%setup -n`
/// directory ending in a short hash.
pub fn read_packaging_state(spec: &str) -> Result<PackagingState> {
    let version = version_field(spec)?;
    if let Some(parsed) = PackageVersion::parse(&version) {
        return Ok(PackagingState::from_prefix(parsed.commit_prefix.as_deref()));
    }

    let hash = dir_hash()?;
    let prefix = setup_dirs(spec)?
        .iter()
        .find_map(|dir| hash_in_dir(&hash, dir));

    Ok(PackagingState::from_prefix(prefix.as_deref()))
}

/// Return `spec` with the new version and build directory substituted.
///
/// Everything else, including line endings and the whitespace after
/// `Version:`, is left untouched.
pub fn update_spec(spec: &str, version: &PackageVersion, top_level_dir: &str) -> Result<String> {
    // Validates there is exactly one field to replace.
    version_field(spec)?;

    let version_re = version_line()?;
    let setup_re = setup_line()?;
    let version = version.to_string();

    let mut updated = String::with_capacity(spec.len() + 32);
    for (line, ending) in split_lines(spec) {
        if let Some(c) = version_re.captures(line) {
            updated.push_str(&c[1]);
            updated.push_str(&version);
            updated.push_str(&c[3]);
        } else if let Some(c) = setup_re.captures(line) {
            updated.push_str(&c[1]);
            updated.push_str(top_level_dir);
            updated.push_str(&c[3]);
        } else {
            updated.push_str(line);
        }
        updated.push_str(ending);
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "\
Name:           python-myproj
Version:        2.3.0+git.1500000000.1111111
Release:        0
Source0:        myproj-master.tar.gz

%prep
%setup -q -n myproj-2.3.0.dev4
";

    #[test]
    fn test_reads_prefix_from_version() {
        assert_eq!(
            read_packaging_state(SPEC).unwrap(),
            PackagingState::Incremental {
                commit_prefix: "1111111".to_string()
            }
        );
    }

    #[test]
    fn test_reads_prefix_from_setup_dir() {
        let spec = "Version: 2.3.0\n%setup -q -n myproj-2.3.0.dev4.g1a2b3c4\n";
        assert_eq!(
            read_packaging_state(spec).unwrap(),
            PackagingState::from_prefix(Some("1a2b3c4"))
        );
    }

    #[test]
    fn test_plain_version_is_first_run() {
        let spec = "Version: 2.3.0\n%setup -q -n myproj-2.3.0\n";
        assert_eq!(read_packaging_state(spec).unwrap(), PackagingState::FirstRun);
    }

    #[test]
    fn test_numeric_dir_suffix_is_not_a_hash() {
        let spec = "Version: 20201231\n%setup -q -n foo-20201231\n";
        assert_eq!(read_packaging_state(spec).unwrap(), PackagingState::FirstRun);

        // an explicit g marker still accepts an all-digit hash
        let spec = "Version: 1.0\n%setup -q -n foo-1.0.g1234567\n";
        assert_eq!(
            read_packaging_state(spec).unwrap(),
            PackagingState::from_prefix(Some("1234567"))
        );

        let spec = "Version: 1.0\n%setup -q -n foo-1a2b3c4\n";
        assert_eq!(
            read_packaging_state(spec).unwrap(),
            PackagingState::from_prefix(Some("1a2b3c4"))
        );
    }

    #[test]
    fn test_version_field_must_be_unique() {
        let missing = read_packaging_state("Name: foo\n").unwrap_err();
        assert!(matches!(missing, ChangesRefreshError::SpecFormat(_)));

        let twice = version_field("Version: 1\nVersion: 2\n").unwrap_err();
        assert!(twice.to_string().contains("found 2"));
    }

    #[test]
    fn test_update_spec_replaces_fields() {
        let version = PackageVersion::new("2.3.1", 1577836800, Some("abc1234def"));
        let updated = update_spec(SPEC, &version, "myproj-2.3.1").unwrap();

        assert!(updated.contains("Version:        2.3.1+git.1577836800.abc1234\n"));
        assert!(updated.contains("%setup -q -n myproj-2.3.1\n"));
        assert!(updated.contains("Source0:        myproj-master.tar.gz\n"));
        assert_eq!(updated.lines().count(), SPEC.lines().count());
    }

    #[test]
    fn test_update_spec_keeps_crlf() {
        let spec = "Version: 1.0\r\n%setup -n old\r\n";
        let version = PackageVersion::new("1.1", 1, None);
        assert_eq!(
            update_spec(spec, &version, "new-1.1").unwrap(),
            "Version: 1.1\r\n%setup -n new-1.1\r\n"
        );
    }
}
