use std::net::IpAddr;

use anyhow::Context;
use dkron_server::cluster::{Member, MemberStatus, Tags};
use faststr::FastStr;

pub mod command;

use command::MemberArgs;

/// Splits a `KEY=VALUE` tag argument. A bare `KEY` yields an empty value.
pub fn parse_tag(tag: &str) -> (FastStr, FastStr) {
    match tag.split_once('=') {
        Some((key, value)) => (FastStr::new(key), FastStr::new(value)),
        None => (FastStr::new(tag), FastStr::empty()),
    }
}

pub fn parse_member(args: &MemberArgs) -> anyhow::Result<Member> {
    let addr: IpAddr = args
        .addr
        .parse()
        .with_context(|| format!("invalid member address: {}", args.addr))?;
    let status: MemberStatus = args.status.parse()?;
    let tags: Tags = args.tags.iter().map(|tag| parse_tag(tag)).collect();

    Ok(Member::new(FastStr::new(&args.name), addr, tags).with_status(status))
}

#[cfg(test)]
mod test {
    use dkron_server::cluster::MemberStatus;

    use crate::{command::MemberArgs, parse_member, parse_tag};

    fn args(addr: &str, tags: &[&str], status: &str) -> MemberArgs {
        MemberArgs {
            name: "node-1".to_string(),
            addr: addr.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_parse_tag() {
        let (key, value) = parse_tag("rpc_addr=10.0.0.2");
        assert_eq!("rpc_addr", key.as_str());
        assert_eq!("10.0.0.2", value.as_str());

        let (key, value) = parse_tag("bootstrap");
        assert_eq!("bootstrap", key.as_str());
        assert_eq!("", value.as_str());

        let (key, value) = parse_tag("version=1.0.0+a=b");
        assert_eq!("version", key.as_str());
        assert_eq!("1.0.0+a=b", value.as_str());
    }

    #[test]
    fn test_parse_member() {
        let member = parse_member(&args("10.0.0.1", &["role=dkron", "bootstrap"], "leaving")).unwrap();
        assert_eq!("node-1", member.name.as_str());
        assert_eq!(MemberStatus::Leaving, member.status);
        assert_eq!(Some("dkron"), member.tags.get("role"));
        assert!(member.tags.contains_key("bootstrap"));

        assert!(parse_member(&args("not-an-ip", &[], "alive")).is_err());
        assert!(parse_member(&args("10.0.0.1", &[], "zombie")).is_err());
    }
}
