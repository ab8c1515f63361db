use std::{
    fmt,
    net::{IpAddr, SocketAddr},
};

use faststr::FastStr;

use super::{
    cfg::{
        ROLE_DKRON, SERVER_TRUE, TAG_BOOTSTRAP, TAG_DATACENTER, TAG_EXPECT, TAG_PORT,
        TAG_REGION, TAG_ROLE, TAG_RPC_ADDR, TAG_SERVER, TAG_VERSION,
    },
    member::{Member, MemberStatus},
    version::{parse_version_or_zero, BuildVersion},
};

/// Everything the cluster needs to know about a member acting as a dkron
/// server, derived from its gossip tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerParts {
    pub name: FastStr,
    pub id: FastStr,
    pub region: FastStr,
    pub datacenter: FastStr,
    pub port: i64,
    pub bootstrap: bool,
    pub expect: i64,
    pub build_version: BuildVersion,
    pub addr: TcpAddr,
    pub rpc_addr: TcpAddr,
    pub status: MemberStatus,
}

/// Host and port of a server endpoint.
///
/// The port is whatever integer the member advertised, it is not checked
/// against the TCP range here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TcpAddr {
    pub ip: IpAddr,
    pub port: i64,
}

impl TcpAddr {
    pub fn new(ip: IpAddr, port: i64) -> TcpAddr {
        TcpAddr { ip, port }
    }

    /// `None` when the advertised port does not fit a TCP port.
    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        u16::try_from(self.port)
            .ok()
            .map(|port| SocketAddr::new(self.ip, port))
    }
}

impl fmt::Display for TcpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            IpAddr::V4(ip) => write!(f, "{}:{}", ip, self.port),
            IpAddr::V6(ip) => write!(f, "[{}]:{}", ip, self.port),
        }
    }
}

impl fmt::Display for ServerParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Addr: {}) (DC: {})",
            self.name, self.addr, self.datacenter
        )
    }
}

/// Why a member tagged as a dkron server could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    Expect(FastStr),
    Port(FastStr),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::Expect(v) => write!(f, "invalid expect tag {:?}", v.as_str()),
            MalformedReason::Port(v) => write!(f, "invalid port tag {:?}", v.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Server(ServerParts),
    NotServer,
    /// Carries the server role tags but the rest of the tags are unusable.
    /// Callers that only care about servers treat this like `NotServer`.
    Malformed(MalformedReason),
}

impl Classification {
    pub fn into_server(self) -> Option<ServerParts> {
        match self {
            Classification::Server(parts) => Some(parts),
            Classification::NotServer | Classification::Malformed(_) => None,
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Classification::Server(_))
    }
}

/// Returns the server parts when `member` is a dkron server.
///
/// A member whose server tags are malformed is reported exactly like any
/// other non-server peer. Use [`classify`] to tell the two apart.
pub fn is_server(member: &Member) -> Option<ServerParts> {
    classify(member).into_server()
}

pub fn classify(member: &Member) -> Classification {
    let tags = &member.tags;

    if tags.get(TAG_ROLE) != Some(ROLE_DKRON) {
        return Classification::NotServer;
    }

    if tags.get(TAG_SERVER) != Some(SERVER_TRUE) {
        return Classification::NotServer;
    }

    let region = tags.get(TAG_REGION).unwrap_or_default();
    let datacenter = tags.get(TAG_DATACENTER).unwrap_or_default();
    // Only the key matters, `bootstrap=false` still counts.
    let mut bootstrap = tags.contains_key(TAG_BOOTSTRAP);

    let expect = match tags.get(TAG_EXPECT) {
        Some(expect) => match expect.parse::<i64>() {
            Ok(expect) => expect,
            Err(_) => {
                return Classification::Malformed(MalformedReason::Expect(FastStr::new(expect)))
            }
        },
        None => 0,
    };
    if expect == 1 {
        bootstrap = true;
    }

    let rpc_ip = parse_rpc_ip_or(tags.get(TAG_RPC_ADDR), member.addr);

    let port_tag = tags.get(TAG_PORT).unwrap_or_default();
    let Ok(port) = port_tag.parse::<i64>() else {
        return Classification::Malformed(MalformedReason::Port(FastStr::new(port_tag)));
    };

    let build_version = parse_version_or_zero(tags.get(TAG_VERSION));

    Classification::Server(ServerParts {
        name: member.name.clone(),
        id: member.name.clone(),
        region: FastStr::new(region),
        datacenter: FastStr::new(datacenter),
        port,
        bootstrap,
        expect,
        build_version,
        addr: TcpAddr::new(member.addr, port),
        rpc_addr: TcpAddr::new(rpc_ip, port),
        status: member.status,
    })
}

/// Parses an `rpc_addr` tag, falling back to the gossip advertised address.
pub fn parse_rpc_ip_or(tag: Option<&str>, advertised: IpAddr) -> IpAddr {
    tag.and_then(|ip| ip.parse::<IpAddr>().ok())
        .unwrap_or(advertised)
}
