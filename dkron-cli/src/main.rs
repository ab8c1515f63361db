use std::sync::Arc;

use clap::{value_parser, Arg, Command, Parser};
use dkron_cli::{
    command::{DkronCommand, MemberArgs},
    parse_member,
};
use dkron_server::{
    cluster::{
        cfg::EVENT_CHANNEL_SIZE, classify, Classification, ClusterWatcher, EventKind, MemberEvent,
        ServerParts,
    },
    server::{self, AgentConfig},
};
use dkron_util::{exists, generate_slug};
use faststr::FastStr;
use rustyline::{error::ReadlineError, history::FileHistory, DefaultEditor, Editor, Result};
use tokio::sync::{mpsc, oneshot};

struct CliInfo {
    config: AgentConfig,
    watcher: Arc<ClusterWatcher>,
    events: mpsc::Sender<MemberEvent>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let matches = Command::new("dkron-cli")
        // Application configuration
        .version("1.0.0")
        .about("Dkron cluster membership console")
        .arg(
            Arg::new("region")
                .short('r')
                .long("region")
                .default_value(server::cfg::DEFAULT_REGION),
        )
        .arg(
            Arg::new("bootstrap-expect")
                .short('e')
                .long("bootstrap-expect")
                .value_parser(value_parser!(i64))
                .default_value("0"),
        )
        .get_matches();

    let mut config = AgentConfig::default();
    if let Some(region) = matches.get_one::<String>("region") {
        config.region = FastStr::new(region);
    }
    if let Some(bootstrap_expect) = matches.get_one::<i64>("bootstrap-expect") {
        config.bootstrap_expect = *bootstrap_expect;
    }

    let watcher = Arc::new(ClusterWatcher::new());
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let agent = tokio::spawn(server::run(
        config.clone(),
        watcher.clone(),
        event_rx,
        shutdown_rx,
    ));

    let cli_info = CliInfo {
        config,
        watcher,
        events: event_tx,
    };

    let mut rl = DefaultEditor::new()?;

    let mut is_shutdown = false;

    while !is_shutdown {
        let prompt = format!("dkron({})> ", cli_info.config.region);
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if let Some(cmd) = read_command(line) {
                    cmd_execute(&cli_info, cmd, &mut rl, &mut is_shutdown).await;
                }
            }
            Err(ReadlineError::Interrupted) => {
                is_shutdown = true;
            }
            Err(ReadlineError::Eof) => {
                is_shutdown = true;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                is_shutdown = true;
            }
        }
    }

    let _ = shutdown_tx.send(());
    if let Err(err) = agent.await {
        tracing::error!(error = %err, "agent task failed");
    }

    println!("bey bey!!");

    Ok(())
}

async fn cmd_execute(
    cli_info: &CliInfo,
    cmd: DkronCommand,
    rl: &mut Editor<(), FileHistory>,
    is_shutdown: &mut bool,
) {
    match cmd {
        DkronCommand::Join { member } => send_event(cli_info, EventKind::Join, member).await,
        DkronCommand::Update { member } => send_event(cli_info, EventKind::Update, member).await,
        DkronCommand::Leave { member } => send_event(cli_info, EventKind::Leave, member).await,
        DkronCommand::Fail { member } => send_event(cli_info, EventKind::Failed, member).await,
        DkronCommand::Classify { member } => match parse_member(&member) {
            Ok(member) => match classify(&member) {
                Classification::Server(parts) => print_servers(&[parts]),
                Classification::NotServer => println!("{} is not a server", member.name),
                Classification::Malformed(reason) => {
                    println!("{} is not a server ({})", member.name, reason)
                }
            },
            Err(err) => println!("Classify error: {:#}", err),
        },
        DkronCommand::Servers { region } => {
            let servers = match region {
                Some(region) => cli_info.watcher.servers(&region),
                None => cli_info.watcher.all_servers(),
            };
            print_servers(&servers);
        }
        DkronCommand::Bootstrap => {
            let config = &cli_info.config;
            match cli_info
                .watcher
                .maybe_bootstrap(&config.region, config.bootstrap_expect)
            {
                Ok(Some(peers)) => {
                    println!("bootstrap quorum ready:");
                    print_servers(&peers);
                }
                Ok(None) if config.bootstrap_expect <= 0 => println!("bootstrap expect is disabled"),
                Ok(None) => println!(
                    "waiting for {} servers in region {}",
                    config.bootstrap_expect, config.region
                ),
                Err(err) => println!("Bootstrap error: {}", err),
            }
        }
        DkronCommand::Slug { text } => println!("{}", generate_slug(&text.join(" "))),
        DkronCommand::Exists { path } => match exists(&path) {
            (true, None) => println!("{} exists", path),
            (false, None) => println!("{} does not exist", path),
            (_, Some(err)) => println!("could not check {}: {}", path, err),
        },
        DkronCommand::Exit => *is_shutdown = true,
        DkronCommand::Clear => {
            if let Err(err) = rl.clear_screen() {
                println!("clear screen error: {}", err);
            }
        }
    }
}

async fn send_event(cli_info: &CliInfo, kind: EventKind, member: MemberArgs) {
    let member = match parse_member(&member) {
        Ok(member) => member,
        Err(err) => {
            println!("Member error: {:#}", err);
            return;
        }
    };

    if cli_info
        .events
        .send(MemberEvent::new(kind, vec![member]))
        .await
        .is_err()
    {
        println!("agent is not running");
    }
}

fn print_servers(servers: &[ServerParts]) {
    if servers.is_empty() {
        println!("no servers");
        return;
    }

    let name_width = servers.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let region_width = servers.iter().map(|s| s.region.len()).max().unwrap_or(0);

    for parts in servers {
        println!(
            "{:<nw$} {:<rw$} addr={} rpc={} dc={} version={} bootstrap={} expect={} status={}",
            parts.name.as_str(),
            parts.region.as_str(),
            parts.addr,
            parts.rpc_addr,
            parts.datacenter,
            parts.build_version,
            parts.bootstrap,
            parts.expect,
            parts.status,
            nw = name_width,
            rw = region_width
        );
    }
}

fn read_command(line: String) -> Option<DkronCommand> {
    if line.trim().is_empty() {
        return None;
    }

    match DkronCommand::try_parse_from(std::iter::once("").chain(line.split_whitespace())) {
        Ok(cmd) => Some(cmd),
        Err(err) => {
            let _ = err.print();
            None
        }
    }
}
