use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use household_ledger::initialize_db;

/// A utility for creating a test database for the household_ledger server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let now = OffsetDateTime::now_utc();
    let this_month = now.date().replace_day(1)?;
    let last_month = (this_month - Duration::days(1)).replace_day(1)?;

    println!("Creating family members...");
    for (name, designation) in [
        ("Otieno", "dad"),
        ("Achieng", "mom"),
        ("Wanjiru", "sister"),
        ("Kiprono", "brother"),
    ] {
        conn.execute(
            "INSERT INTO family_member (name, designation) VALUES (?1, ?2)",
            (name, designation),
        )?;
    }

    println!("Creating categories...");
    for name in ["Housing", "Utilities", "Transport", "School"] {
        conn.execute("INSERT INTO expense_category (name) VALUES (?1)", (name,))?;
    }
    for name in ["Groceries", "Household", "Toiletries"] {
        conn.execute("INSERT INTO shopping_category (name) VALUES (?1)", (name,))?;
    }

    println!("Creating expenses...");
    let expenses = [
        (1, "Rent", 25_000.0, Some(25_000.0), true, now),
        (2, "Electricity", 3_500.0, Some(3_180.0), true, now),
        (2, "Water", 1_200.0, None, false, now),
        (3, "Matatu fare", 4_000.0, Some(4_350.0), false, now),
        (4, "School fees", 18_000.0, Some(18_000.0), true, now - Duration::days(35)),
    ];
    for (category_id, name, estimated, actual, completed, created_at) in expenses {
        conn.execute(
            "INSERT INTO expense (category_id, name, estimated_amount, actual_amount, completed_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                category_id,
                name,
                estimated,
                actual,
                completed.then_some(created_at),
                created_at,
            ),
        )?;
    }

    println!("Creating income...");
    let income = [
        (1, "Salary", 65_000.0, this_month),
        (2, "Salary", 58_000.0, this_month),
        (2, "Tailoring", 7_500.0, this_month),
        (1, "Salary", 65_000.0, last_month),
    ];
    for (family_member_id, source, amount, month) in income {
        conn.execute(
            "INSERT INTO income (family_member_id, source, amount, month) VALUES (?1, ?2, ?3, ?4)",
            (family_member_id, source, amount, month),
        )?;
    }

    println!("Creating shopping list...");
    let items = [
        ("Maize flour", 2, 380.0, Some("2kg packets"), 1),
        ("Sugar", 1, 210.0, None, 1),
        ("Cooking oil", 1, 650.0, None, 1),
        ("Bar soap", 3, 270.0, Some("For laundry"), 2),
        ("Toothpaste", 2, 360.0, None, 3),
    ];
    for (name, quantity, price, notes, category_id) in items {
        conn.execute(
            "INSERT INTO shopping_item (name, quantity, estimated_price, notes, category_id, month)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (name, quantity, price, notes, category_id, this_month),
        )?;
    }

    println!("Creating saving goals...");
    let goals = [
        (1, "School fees", "fixed_deposit", "active", 120_000.0),
        (2, "Emergency fund", "recurring", "active", 50_000.0),
        (3, "New phone", "challenge", "completed", 25_000.0),
        (4, "Bicycle", "flexible", "hold", 15_000.0),
    ];
    for (family_member_id, name, goal_type, status, target_amount) in goals {
        conn.execute(
            "INSERT INTO saving_goal (family_member_id, name, start_date, target_amount, goal_type, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (family_member_id, name, last_month, target_amount, goal_type, status),
        )?;
    }

    println!("Success!");

    Ok(())
}
