pub mod agent;

pub mod cfg {
    pub const DEFAULT_REGION: &str = "global";
}

pub use agent::{run, AgentConfig};
