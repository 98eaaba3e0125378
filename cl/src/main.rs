use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use choreledger::cli::{Cli, Command};
use choreledger::config::Config;
use choreledger::{Catalog, LedgerError, LedgerManager, LoadOutcome, RoutineInstance, RoutineStatus, StateStore, SystemClock};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("choreledger")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Log to a file so command output stays clean
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("cl.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn status_label(status: RoutineStatus) -> ColoredString {
    match status {
        RoutineStatus::Ongoing => status.to_string().yellow(),
        RoutineStatus::Completed => status.to_string().green(),
        RoutineStatus::Expired => status.to_string().dimmed(),
    }
}

fn print_routine_line(routine: &RoutineInstance) {
    let (done, total) = routine.progress();
    println!(
        "{} {} [{}] {}/{} chores, {} points, started {}",
        routine.id.cyan(),
        routine.title,
        status_label(routine.status),
        done,
        total,
        routine.earned_points(),
        routine.started_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_routine(routine: &RoutineInstance) {
    print_routine_line(routine);
    for chore in &routine.chores {
        let mark = if chore.completed { "✓".green() } else { "·".dimmed() };
        println!(
            "  {} {} {} ({} min, {} points)",
            mark,
            chore.id.yellow(),
            chore.title,
            chore.estimated_time,
            chore.points
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let catalog = Catalog::load_or_default(config.catalog_path.as_deref()).context("Failed to load catalog")?;
    let store = StateStore::open(&config.state_path).context("Failed to open state store")?;
    let mut ledger = LedgerManager::open(catalog, store, SystemClock, config.ledger_options())
        .context("Failed to open ledger")?;

    info!(state_path = %config.state_path.display(), "choreledger starting");

    if ledger.load_outcome() == LoadOutcome::Reset {
        eprintln!(
            "{} Saved state was unreadable and has been reset (kept a copy next to {})",
            "!".red(),
            config.state_path.display()
        );
    }

    match cli.command {
        Command::Routines => {
            for template in ledger.catalog().templates() {
                let today = match ledger.today_instance(&template.id) {
                    Some(routine) => {
                        let (done, total) = routine.progress();
                        format!("today: {}/{} [{}]", done, total, status_label(routine.status))
                    }
                    None => "not started today".dimmed().to_string(),
                };
                println!(
                    "{} {} ({} chores, {} min, {} points) {}",
                    template.id.cyan(),
                    template.title,
                    template.chores.len(),
                    template.estimated_minutes(),
                    template.total_points(),
                    today
                );
            }
        }
        Command::Start { template_id } => {
            let routine = ledger.get_or_create_today_instance(&template_id)?;
            print_routine(routine);
        }
        Command::Show { routine_id } => {
            let routine = ledger
                .instance(&routine_id)
                .ok_or_else(|| eyre::eyre!("Routine not found: {}", routine_id))?;
            print_routine(routine);
        }
        Command::Done { routine_id, chore_id } => {
            let routine = ledger.set_chore_completion(&routine_id, &chore_id, true)?;
            let finished = routine.status == RoutineStatus::Completed;
            print_routine(routine);
            if finished {
                println!("{} Routine complete!", "✓".green());
            }
            println!("Points: {}", ledger.total_points().to_string().cyan());
        }
        Command::Undo { routine_id, chore_id } => {
            let routine = ledger.set_chore_completion(&routine_id, &chore_id, false)?;
            print_routine(routine);
            println!("Points: {}", ledger.total_points().to_string().cyan());
        }
        Command::Active => {
            let active = ledger.active_routines();
            if active.is_empty() {
                println!("No active routines. Start one with `cl start <routine>`.");
            } else {
                for routine in active {
                    print_routine_line(routine);
                }
            }
        }
        Command::History => {
            if ledger.instances().is_empty() {
                println!("No routines stored");
            } else {
                for routine in ledger.instances() {
                    print_routine_line(routine);
                }
            }
        }
        Command::Points => {
            println!("Points: {}", ledger.total_points().to_string().cyan());
            println!("  Earned: {}", ledger.compute_points_total());
            println!("  Spent: {}", ledger.spent_points());
        }
        Command::Shop => {
            let balance = ledger.total_points();
            println!("Points: {}", balance.to_string().cyan());
            for item in ledger.catalog().shop_items() {
                let price = format!("{} points", item.points);
                let price = if i64::from(item.points) <= balance {
                    price.green()
                } else {
                    price.dimmed()
                };
                println!("{} {} {}", item.id.yellow(), item.title, price);
            }
        }
        Command::Buy { item_id } => match ledger.purchase_item(&item_id) {
            Ok(remaining) => {
                println!("{} Bought {} ({} points left)", "✓".green(), item_id.cyan(), remaining);
            }
            Err(LedgerError::InsufficientPoints { cost, available }) => {
                println!(
                    "{} Not enough points for {}: costs {}, you have {}",
                    "✗".red(),
                    item_id,
                    cost,
                    available
                );
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
