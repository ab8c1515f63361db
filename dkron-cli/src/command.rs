use clap::{Args, Parser};

#[derive(Debug, Parser)]
#[command(name = "")]
pub enum DkronCommand {
    /// Members joined the cluster
    Join {
        #[command(flatten)]
        member: MemberArgs,
    },
    /// Members changed their tags
    Update {
        #[command(flatten)]
        member: MemberArgs,
    },
    /// Members left the cluster gracefully
    Leave {
        #[command(flatten)]
        member: MemberArgs,
    },
    /// Members stopped responding
    Fail {
        #[command(flatten)]
        member: MemberArgs,
    },
    /// Show how a member would be classified, without applying it
    Classify {
        #[command(flatten)]
        member: MemberArgs,
    },
    /// List the known servers(all regions by default)
    Servers {
        region: Option<String>,
    },
    /// Check whether enough servers are known to form the initial quorum
    Bootstrap,
    /// Print the identifier slug of TEXT
    Slug {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Check whether a local path exists
    Exists {
        path: String,
    },
    Exit,
    Clear,
}

#[derive(Debug, Args)]
pub struct MemberArgs {
    /// member name
    pub name: String,

    /// gossip advertised ip address
    pub addr: String,

    /// member tag as KEY=VALUE, a bare KEY sets an empty value
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// member status: none, alive, leaving, left, failed
    #[arg(short, long, default_value = "alive")]
    pub status: String,
}
