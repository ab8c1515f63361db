use std::{fmt, net::IpAddr, sync::Arc};

use ahash::AHashMap;
use faststr::FastStr;

/// Liveness of a gossip member as reported by the membership layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemberStatus {
    #[default]
    None,
    Alive,
    Leaving,
    Left,
    Failed,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::None => "none",
            MemberStatus::Alive => "alive",
            MemberStatus::Leaving => "leaving",
            MemberStatus::Left => "left",
            MemberStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MemberStatus::None),
            "alive" => Ok(MemberStatus::Alive),
            "leaving" => Ok(MemberStatus::Leaving),
            "left" => Ok(MemberStatus::Left),
            "failed" => Ok(MemberStatus::Failed),
            _ => Err(UnknownStatus(FastStr::new(s))),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStatus(pub FastStr);

impl std::error::Error for UnknownStatus {}

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown member status: {}", self.0)
    }
}

/// Read-only view over the tags a member advertises.
///
/// The map is shared behind an `Arc` and only exposes lookups, so whoever
/// reads a member's tags cannot change what the gossip layer reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    inner: Arc<AHashMap<FastStr, FastStr>>,
}

impl Tags {
    pub fn new(tags: AHashMap<FastStr, FastStr>) -> Tags {
        Tags {
            inner: Arc::new(tags),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(|v| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<FastStr>,
    V: Into<FastStr>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A cluster peer as seen by the gossip layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: FastStr,
    pub addr: IpAddr,
    pub tags: Tags,
    pub status: MemberStatus,
}

impl Member {
    pub fn new(name: impl Into<FastStr>, addr: IpAddr, tags: Tags) -> Member {
        Member {
            name: name.into(),
            addr,
            tags,
            status: MemberStatus::Alive,
        }
    }

    pub fn with_status(mut self, status: MemberStatus) -> Member {
        self.status = status;
        self
    }
}
