use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use finance_tracker::{
    NewAccount, NewTransaction, Recurrence, initialize_db, insert_account, insert_transaction,
};

/// A utility for creating a test database for the finance tracker server.
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

    println!("Creating test accounts...");

    let checking = insert_account(
        &NewAccount {
            name: "Checking".to_owned(),
            initial_balance: 1250.0,
        },
        &conn,
    )?;
    let savings = insert_account(
        &NewAccount {
            name: "Savings".to_owned(),
            initial_balance: 5000.0,
        },
        &conn,
    )?;
    let cash = insert_account(
        &NewAccount {
            name: "Cash".to_owned(),
            initial_balance: 80.0,
        },
        &conn,
    )?;

    println!("Creating test transactions...");

    let transactions = [
        (checking.id, 2400.0, date!(2025 - 01 - 31), "Salary", Recurrence::Monthly),
        (checking.id, -850.0, date!(2025 - 02 - 01), "Rent", Recurrence::Monthly),
        (checking.id, -64.37, date!(2025 - 02 - 03), "Groceries", Recurrence::Once),
        (checking.id, -12.99, date!(2025 - 02 - 05), "Streaming", Recurrence::Monthly),
        (savings.id, 300.0, date!(2025 - 02 - 01), "Savings plan", Recurrence::Monthly),
        (savings.id, -89.0, date!(2025 - 01 - 15), "Insurance", Recurrence::Yearly),
        (cash.id, -4.5, date!(2025 - 02 - 04), "Coffee", Recurrence::Once),
        (cash.id, -2.2, date!(2025 - 02 - 04), "Bakery", Recurrence::Daily),
        (cash.id, -15.0, date!(2025 - 02 - 07), "Gym", Recurrence::Weekly),
    ];

    for (account, amount, date, description, recurrence) in transactions {
        insert_transaction(
            &NewTransaction {
                account,
                amount,
                date,
                description: description.to_owned(),
                recurrence,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
