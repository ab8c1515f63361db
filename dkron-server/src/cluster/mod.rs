mod error;

pub mod member;
pub mod server;
pub mod service;
pub mod version;
pub mod watcher;

pub mod cfg {
    pub const TAG_ROLE: &str = "role";
    pub const TAG_SERVER: &str = "server";
    pub const TAG_REGION: &str = "region";
    pub const TAG_DATACENTER: &str = "dc";
    pub const TAG_BOOTSTRAP: &str = "bootstrap";
    pub const TAG_EXPECT: &str = "expect";
    pub const TAG_RPC_ADDR: &str = "rpc_addr";
    pub const TAG_PORT: &str = "port";
    pub const TAG_VERSION: &str = "version";

    pub const ROLE_DKRON: &str = "dkron";
    pub const SERVER_TRUE: &str = "true";

    pub const EVENT_CHANNEL_SIZE: usize = 64;
}

pub use error::ClusterError;
pub use member::{Member, MemberStatus, Tags};
pub use server::{classify, is_server, Classification, MalformedReason, ServerParts, TcpAddr};
pub use service::ClusterService;
pub use version::BuildVersion;
pub use watcher::{ClusterWatcher, EventKind, MemberEvent};
