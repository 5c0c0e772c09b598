//! fwifi - Main Entry Point

use std::path::Path;

use chrono::Local;
use clap::Parser;
use fwifi::{
    CancelHandle, CandidateList, NetworkDescriptor, TrialEngine, TrialState, TrialTarget,
    backend::{LinkController, SimulatedLink, WifiCtrlLink},
    config::{AttackArgs, BackendKind, CliArgs, Command, TrialSettings, WordlistCommand},
    core::error::ConfigError,
    report::{ConsoleReporter, JsonLinesReporter, ResultRecord, TrialReporter},
    wordlist::{self, DEFAULT_WORDLIST},
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DISCLAIMER: &str = "\
This tool attempts to join a wireless network with guessed passphrases.
Only use it against networks you own or are explicitly authorized to test.
Re-run with --accept-disclaimer to confirm.";

type MainResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Commands that need a link controller
enum LinkTask<'a> {
    Scan,
    Attack(&'a AttackArgs),
}

#[tokio::main]
async fn main() -> MainResult<()> {
    // Logs go to stderr, stdout carries progress and JSON events
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fwifi=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    info!(?args, "Starting fwifi");

    let task = match &args.command {
        Command::Wordlist { command } => return run_wordlist(command).await,
        Command::Scan => LinkTask::Scan,
        Command::Attack(attack) => LinkTask::Attack(attack),
    };

    match args.backend {
        BackendKind::Wpa => {
            let link = WifiCtrlLink::new(args.interface.clone()).await?;
            info!("WiFi backend initialized for interface: {}", args.interface);
            run_link(link, task).await
        }
        BackendKind::Simulated => {
            let link = match &args.simulated_password {
                Some(secret) => SimulatedLink::with_secret(secret.clone()),
                None => SimulatedLink::new(),
            };
            link.set_networks(SimulatedLink::demo_networks()).await;
            info!("Simulated backend initialized");
            run_link(link, task).await
        }
    }
}

async fn run_link<L: LinkController>(link: L, task: LinkTask<'_>) -> MainResult<()> {
    match task {
        LinkTask::Scan => {
            let networks = scan_sorted(&link).await?;
            print_networks(&networks);
            Ok(())
        }
        LinkTask::Attack(attack) => run_attack(link, attack).await,
    }
}

async fn scan_sorted<L: LinkController>(link: &L) -> MainResult<Vec<NetworkDescriptor>> {
    let mut networks = link.scan().await?;
    networks.sort_by(|a, b| b.signal_quality.cmp(&a.signal_quality));
    Ok(networks)
}

fn print_networks(networks: &[NetworkDescriptor]) {
    if networks.is_empty() {
        println!("No networks found");
        return;
    }

    println!(
        "{:>3}  {:<32}  {:<17}  {:>3}  {:>6}  SECURITY",
        "#", "SSID", "BSSID", "CH", "SIGNAL"
    );
    for (i, network) in networks.iter().enumerate() {
        println!(
            "{:>3}  {:<32}  {:<17}  {:>3}  {:>5}%  {}",
            i + 1,
            network.display_name(),
            network.link_id,
            network.channel,
            network.signal_quality,
            network.security_label()
        );
    }
}

/// Pick the network named by `--bssid`, `--ssid` or `--index`
fn find_target(
    networks: Vec<NetworkDescriptor>,
    args: &AttackArgs,
) -> MainResult<NetworkDescriptor> {
    let (wanted, found) = if let Some(bssid) = &args.bssid {
        let found = networks
            .into_iter()
            .find(|n| n.link_id.eq_ignore_ascii_case(bssid));
        (bssid.clone(), found)
    } else if let Some(ssid) = &args.ssid {
        let found = networks.into_iter().find(|n| &n.name == ssid);
        (ssid.clone(), found)
    } else if let Some(index) = args.index {
        let found = index.checked_sub(1).and_then(|i| networks.into_iter().nth(i));
        (format!("#{}", index), found)
    } else {
        return Err("Specify a target with --bssid, --ssid or --index".into());
    };

    found.ok_or_else(|| ConfigError::TargetNotFound(wanted).into())
}

async fn load_candidates(path: &Path) -> MainResult<CandidateList> {
    if path == Path::new(DEFAULT_WORDLIST) {
        wordlist::ensure_default(path).await?;
    }
    Ok(CandidateList::load(path).await?)
}

async fn run_attack<L: LinkController>(link: L, args: &AttackArgs) -> MainResult<()> {
    if !args.accept_disclaimer {
        eprintln!("{}", DISCLAIMER);
        return Err("Disclaimer not accepted".into());
    }

    let settings = TrialSettings::from(args);

    let networks = scan_sorted(&link).await?;
    let network = find_target(networks, args)?;
    let target = TrialTarget::select(network, args.name.as_deref())?;
    let candidates = load_candidates(&settings.wordlist).await?;

    let mut engine = TrialEngine::new(link, settings.trial_config());
    let signals = tokio::spawn(cancel_on_signal(engine.cancel_handle()));

    let session = if settings.json {
        let mut reporter = JsonLinesReporter::stdout();
        run_engine(&mut engine, target, candidates, &mut reporter).await
    } else {
        let mut reporter = ConsoleReporter::stdout();
        run_engine(&mut engine, target, candidates, &mut reporter).await
    };
    signals.abort();
    let session = session?;

    if session.state() == TrialState::Succeeded {
        let record = ResultRecord::from_session(&session, Local::now())?;
        let path = record.write_to(&settings.results_dir).await?;
        if !settings.json {
            println!("Saved to: {}", path.display());
        }
    }

    session.into_result()?;
    Ok(())
}

async fn run_engine<L: LinkController, R: TrialReporter>(
    engine: &mut TrialEngine<L>,
    target: TrialTarget,
    candidates: CandidateList,
    reporter: &mut R,
) -> MainResult<fwifi::TrialSession> {
    Ok(engine.run(target, candidates, reporter).await?)
}

async fn run_wordlist(command: &WordlistCommand) -> MainResult<()> {
    match command {
        WordlistCommand::List { dir } => {
            let entries = wordlist::list(dir).await?;
            if entries.is_empty() {
                println!("No wordlists in {}", dir.display());
            }
            for entry in entries {
                println!(
                    "{:<40} {:>10.2} KB",
                    entry.name,
                    entry.size_bytes as f64 / 1024.0
                );
            }
        }
        WordlistCommand::Show { path, limit } => {
            let preview = wordlist::preview(path, *limit).await?;
            println!("Wordlist: {}", path.display());
            println!("Passwords: {}", preview.total);
            println!("Size: {:.2} KB", preview.size_bytes as f64 / 1024.0);
            println!();
            for (i, candidate) in preview.head.iter().enumerate() {
                println!("{:>4}. {}", i + 1, candidate);
            }
            if preview.total > preview.head.len() {
                println!("... and {} more", preview.total - preview.head.len());
            }
        }
        WordlistCommand::Create {
            name,
            preset,
            word,
            dir,
        } => {
            let file_name = if name.ends_with(".txt") {
                name.clone()
            } else {
                format!("{}.txt", name)
            };
            let path = dir.join(file_name);
            let candidates = wordlist::generate(preset, word);
            if candidates.is_empty() {
                return Err("No candidates to write".into());
            }
            wordlist::write(&path, &candidates).await?;
            println!("Created {} with {} passwords", path.display(), candidates.len());
        }
    }
    Ok(())
}

/// Request cooperative cancellation on SIGINT or SIGTERM
async fn cancel_on_signal(cancel: CancelHandle) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Received SIGINT (Ctrl+C), stopping after the current attempt");
        }
        _ = shutdown_signal() => {
            info!("Received SIGTERM, stopping after the current attempt");
        }
    }
    cancel.cancel();
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    // On non-Unix platforms, just wait forever
    std::future::pending::<()>().await
}
