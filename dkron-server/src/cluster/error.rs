use faststr::FastStr;

#[derive(Debug, PartialEq, Eq)]
pub enum ClusterError {
    ExpectConflict {
        member: FastStr,
        expect: i64,
        bootstrap_expect: i64,
    },
    BootstrapModeConflict {
        member: FastStr,
    },
}

impl std::error::Error for ClusterError {}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterError::ExpectConflict {
                member,
                expect,
                bootstrap_expect,
            } => write!(
                f,
                "Member {} has a conflicting expect value ({} != {}). All nodes should expect the same number",
                member, expect, bootstrap_expect
            ),
            ClusterError::BootstrapModeConflict { member } => {
                write!(f, "Member {} has bootstrap mode. Expect disabled", member)
            }
        }
    }
}
