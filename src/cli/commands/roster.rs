//! Roster command handlers

use super::{open, print_rule};
use crate::config::Config;
use crate::db::Store;

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let report = store.seed_if_empty(&config.seed, &config.security).await?;

    if report.is_noop() {
        println!("Nothing to seed; roster tables already populated.");
    } else {
        println!(
            "✓ Seeded {} teacher(s), {} student(s), {} class(es)",
            report.teachers, report.students, report.classes
        );
    }
    Ok(())
}

pub async fn cmd_students(config: &Config) -> anyhow::Result<()> {
    let state = open(config).await?;
    let students = state.ledger.list_students().await?;

    println!("Students ({} total)", students.len());
    print_rule();
    for s in students {
        println!("[{}] {} ({})", s.id, s.name, s.roll);
        println!(
            "  Email: {} | Dept: {} | Class: {} | Bluetooth: {}",
            s.email, s.dept, s.class_name, s.bluetooth_id
        );
    }
    Ok(())
}

pub async fn cmd_classes(config: &Config) -> anyhow::Result<()> {
    let state = open(config).await?;
    let classes = state.ledger.list_classes().await?;

    println!("Classes ({} total)", classes.len());
    print_rule();
    for c in classes {
        println!("[{}] {} - {}", c.id, c.code, c.title);
    }
    Ok(())
}
