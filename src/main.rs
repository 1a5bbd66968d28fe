use clap::Parser;
use grade_ledger::app::{export, render};
use grade_ledger::config::Command;
use grade_ledger::utils::error::{ErrorSeverity, LedgerError};
use grade_ledger::utils::logger;
use grade_ledger::{CliConfig, CourseInput, Session, SnapshotStore};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: &CliConfig) -> grade_ledger::Result<()> {
    let config = cli.resolve()?;
    let store = config.build_store()?;
    tracing::info!("Using snapshot at {}", store.location());

    let mut session = Session::open(store, config.student_id()).await?;

    match &cli.command {
        Command::Add(args) => {
            session.add(&CourseInput::from(args)).await?;
            println!("✅ Saved {} for {}", args.code.trim().to_uppercase(), session.student_id());
            print!("{}", render::summary_table(&session.report()));
        }
        Command::Update(args) => {
            session.update(&CourseInput::from(args)).await?;
            println!("✅ Updated {} ({})", args.code.trim().to_uppercase(), args.term.trim());
            print!("{}", render::summary_table(&session.report()));
        }
        Command::Delete { code, term } => {
            let removed = session.delete(code, term).await?;
            println!("🗑️  Removed {} record(s)", removed);
            print!("{}", render::summary_table(&session.report()));
        }
        Command::List => {
            print!("{}", render::records_table(session.ledger()));
        }
        Command::Summary => {
            print!("{}", render::summary_table(&session.report()));
        }
        Command::Export { output } => {
            let written = export::export_csv(session.ledger(), output)?;
            println!("📁 Wrote {} record(s) to {}", written, output);
        }
        Command::Students => {
            for id in session.snapshot().student_ids() {
                let gated = session
                    .snapshot()
                    .entry(id)
                    .and_then(|entry| entry.password())
                    .is_some();
                let marker = if gated { " (password)" } else { "" };
                println!("{}{}", id, marker);
            }
        }
    }

    Ok(())
}

fn exit_code(err: &LedgerError) -> i32 {
    match err.severity() {
        ErrorSeverity::Low => 4,      // rejected input
        ErrorSeverity::Medium => 2,   // not saved, safe to retry
        ErrorSeverity::High => 1,     // unreadable data
        ErrorSeverity::Critical => 3, // configuration
    }
}
