use std::{cmp::Ordering, fmt, str::FromStr};

use faststr::FastStr;

/// Build version advertised through the `version` tag.
///
/// Accepts the loose grammar dkron agents have always published: an optional
/// `v`, any number of numeric segments, an optional pre-release and optional
/// `+metadata`. Missing segments compare as zero.
#[derive(Debug, Clone, Default)]
pub struct BuildVersion {
    segments: Vec<i64>,
    pre: FastStr,
    metadata: FastStr,
}

#[derive(Debug, PartialEq, Eq)]
pub enum VersionError {
    Empty,
    Malformed(FastStr),
    SegmentOverflow(FastStr),
}

impl std::error::Error for VersionError {}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::Empty => f.write_str("Empty version"),
            VersionError::Malformed(v) => write!(f, "Malformed version: {}", v),
            VersionError::SegmentOverflow(v) => write!(f, "Version segment out of range: {}", v),
        }
    }
}

const MIN_SEGMENTS: usize = 3;

impl BuildVersion {
    /// The "unknown" version used when a member advertises nothing usable.
    pub fn zero() -> BuildVersion {
        BuildVersion::default()
    }

    pub fn parse(text: &str) -> Result<BuildVersion, VersionError> {
        if text.is_empty() {
            return Err(VersionError::Empty);
        }
        let malformed = || VersionError::Malformed(FastStr::new(text));

        let mut rest = text.strip_prefix('v').unwrap_or(text);

        let mut segments = vec![];
        loop {
            let end = rest
                .find(|ch: char| !ch.is_ascii_digit())
                .unwrap_or(rest.len());
            if end == 0 {
                return Err(malformed());
            }
            let segment = rest[..end]
                .parse::<i64>()
                .map_err(|_| VersionError::SegmentOverflow(FastStr::new(text)))?;
            segments.push(segment);
            rest = &rest[end..];

            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|ch: char| ch.is_ascii_digit()) => rest = next,
                _ => break,
            }
        }
        while segments.len() < MIN_SEGMENTS {
            segments.push(0);
        }

        let (pre, metadata) = match rest.split_once('+') {
            Some((pre, metadata)) => (pre, Some(metadata)),
            None => (rest, None),
        };

        let pre = if pre.is_empty() {
            pre
        } else {
            match pre.strip_prefix('-') {
                Some(stripped) if is_identifier_list(stripped) => stripped,
                // `1.2.3-` and `1.2.3-.x`: the dash starts the pre-release itself.
                Some(_) if is_identifier_list(pre) => pre,
                None if pre.starts_with(|ch: char| ch.is_ascii_alphabetic() || ch == '~')
                    && is_identifier_list(pre) =>
                {
                    pre
                }
                _ => return Err(malformed()),
            }
        };

        let metadata = match metadata {
            Some(metadata) if is_identifier_list(metadata) => metadata,
            Some(_) => return Err(malformed()),
            None => "",
        };

        Ok(BuildVersion {
            segments,
            pre: FastStr::new(pre),
            metadata: FastStr::new(metadata),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[i64] {
        &self.segments
    }

    pub fn prerelease(&self) -> &str {
        &self.pre
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    fn segment(&self, index: usize) -> i64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

/// Parses a `version` tag, falling back to [`BuildVersion::zero`].
pub fn parse_version_or_zero(tag: Option<&str>) -> BuildVersion {
    tag.and_then(|v| BuildVersion::parse(v).ok())
        .unwrap_or_else(BuildVersion::zero)
}

fn is_identifier_list(text: &str) -> bool {
    text.split('.').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '~')
    })
}

fn compare_prerelease(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match (l.parse::<u64>(), r.parse::<u64>()) {
                (Ok(l), Ok(r)) => l.cmp(&r),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => l.cmp(r),
            },
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

impl Ord for BuildVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for index in 0..len {
            match self.segment(index).cmp(&other.segment(index)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        compare_prerelease(&self.pre, &other.pre)
    }
}

impl PartialOrd for BuildVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Metadata never takes part in comparisons.
impl PartialEq for BuildVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BuildVersion {}

impl FromStr for BuildVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildVersion::parse(s)
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.segments.len().max(MIN_SEGMENTS) {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", self.segment(index))?;
        }
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.metadata.is_empty() {
            write!(f, "+{}", self.metadata)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{parse_version_or_zero, BuildVersion, VersionError};

    #[test]
    fn test_parse() {
        let v = BuildVersion::parse("3.2.1").unwrap();
        assert_eq!(&[3, 2, 1], v.segments());
        assert_eq!("3.2.1", v.to_string());

        let v = BuildVersion::parse("v1.2").unwrap();
        assert_eq!(&[1, 2, 0], v.segments());
        assert_eq!("1.2.0", v.to_string());

        let v = BuildVersion::parse("1.2.3.4").unwrap();
        assert_eq!("1.2.3.4", v.to_string());

        let v = BuildVersion::parse("1.0.0-rc.1+build.5").unwrap();
        assert_eq!("rc.1", v.prerelease());
        assert_eq!("build.5", v.metadata());
        assert_eq!("1.0.0-rc.1+build.5", v.to_string());

        let v = BuildVersion::parse("2.0.0beta1").unwrap();
        assert_eq!("beta1", v.prerelease());

        let v = BuildVersion::parse("1.2.3-").unwrap();
        assert_eq!("-", v.prerelease());

        let v = BuildVersion::parse("1.2.3-.x").unwrap();
        assert_eq!("-.x", v.prerelease());
        assert!(v < BuildVersion::parse("1.2.3").unwrap());

        let v = BuildVersion::parse("1.2.3--beta").unwrap();
        assert_eq!("-beta", v.prerelease());

        let v = BuildVersion::parse("1.7+dev").unwrap();
        assert_eq!("", v.prerelease());
        assert_eq!("dev", v.metadata());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Err(VersionError::Empty), BuildVersion::parse(""));
        for bad in [
            "devel", "v", "1.", "1..2", ".1", "1.2.3-..x", "1.2.3+", "1.2.3-rc..1", "1.2.3 ",
            " 1.2.3", "1.2.3_x", "1.2.3+a+b",
        ] {
            assert!(
                matches!(BuildVersion::parse(bad), Err(VersionError::Malformed(_))),
                "{bad:?} should be malformed"
            );
        }
        assert!(matches!(
            BuildVersion::parse("99999999999999999999.1"),
            Err(VersionError::SegmentOverflow(_))
        ));
    }

    #[test]
    fn test_zero() {
        let zero = BuildVersion::zero();
        assert!(zero.is_zero());
        assert_eq!("0.0.0", zero.to_string());
        assert_eq!(zero, BuildVersion::parse("0.0.0").unwrap());
        assert!(!BuildVersion::parse("0.0.0").unwrap().is_zero());

        assert!(parse_version_or_zero(None).is_zero());
        assert!(parse_version_or_zero(Some("not-a-version")).is_zero());
        assert_eq!(
            BuildVersion::parse("4.0.1").unwrap(),
            parse_version_or_zero(Some("4.0.1"))
        );
    }

    #[test]
    fn test_ordering() {
        let parse = |v: &str| BuildVersion::parse(v).unwrap();
        assert!(parse("1.2.3") < parse("1.10.0"));
        assert!(parse("1.0.0-rc1") < parse("1.0.0"));
        assert!(parse("1.0.0-alpha") < parse("1.0.0-alpha.1"));
        assert!(parse("1.0.0-alpha.1") < parse("1.0.0-alpha.beta"));
        assert!(parse("1.0.0-2") < parse("1.0.0-10"));
        assert_eq!(parse("1.2"), parse("1.2.0.0"));
        assert_eq!(parse("1.2.0+a"), parse("1.2.0+b"));
        assert!(BuildVersion::zero() < parse("0.0.1"));
    }
}
