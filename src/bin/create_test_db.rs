use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, OffsetDateTime};

use kas_rt::{
    NewTransaction, NewUser, PasswordHash, PaymentCategory, Role, SettlementStatus,
    TransactionKind, ValidatedPassword, create_transaction, create_user, initialize_db,
};

/// A utility for creating a test database for the Kas RT server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const RESIDENTS: [&str; 5] = [
    "Budi Santoso",
    "Siti Aminah",
    "Agus Wijaya",
    "Dewi Lestari",
    "Hendra Gunawan",
];

const MONTHLY_DUES: i64 = 50_000;

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    let has_extension = output_path
        .extension()
        .is_some_and(|extension| !extension.is_empty());

    if !has_extension {
        eprintln!("Output path must include a file extension (e.g., 'test.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test users...");
    create_test_user(&connection, "admin", "admin123", "Pak RT", Role::Admin)?;
    create_test_user(&connection, "warga", "warga123", "Budi Santoso", Role::User)?;

    println!("Creating a year of transactions...");
    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for months_ago in (0..12).rev() {
        let (year, month) = months_before(today.year(), today.month(), months_ago);
        count += create_month_of_transactions(&connection, year, month, months_ago == 0)?;
    }

    println!("Created {count} transactions.");
    println!("Success! Log in with admin / admin123.");

    Ok(())
}

fn create_test_user(
    connection: &Connection,
    username: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<(), Box<dyn Error>> {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(password),
        PasswordHash::DEFAULT_COST,
    )?;

    create_user(
        NewUser {
            full_name: full_name.to_owned(),
            username: username.to_owned(),
            email: format!("{username}@rt06.example.com"),
            phone_number: "081234567890".to_owned(),
            role,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        },
        connection,
    )?;

    Ok(())
}

fn months_before(year: i32, month: Month, count: u8) -> (i32, Month) {
    let mut year = year;
    let mut month = month;

    for _ in 0..count {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    (year, month)
}

/// Dues from every resident plus the regular expenses.
///
/// In the current month the last resident has not paid yet.
fn create_month_of_transactions(
    connection: &Connection,
    year: i32,
    month: Month,
    is_current_month: bool,
) -> Result<usize, Box<dyn Error>> {
    let date = |day: u8| Date::from_calendar_date(year, month, day);
    let mut count = 0;

    for (index, resident) in RESIDENTS.iter().enumerate() {
        let is_unpaid = is_current_month && index == RESIDENTS.len() - 1;

        create_transaction(
            &NewTransaction {
                kind: TransactionKind::Income,
                payment_category: PaymentCategory::MonthlyDues,
                amount: MONTHLY_DUES,
                date: date(5 + index as u8)?,
                counterparty_name: (*resident).to_owned(),
                note: format!("Iuran bulanan {resident}"),
                settlement: if is_unpaid {
                    SettlementStatus::Unsettled
                } else {
                    SettlementStatus::Settled
                },
            },
            connection,
        )?;
        count += 1;
    }

    let expenses = [
        (15, 100_000, "Honor petugas keamanan"),
        (20, 40_000 + i64::from(u8::from(month)) * 2_500, "Kebersihan lingkungan"),
    ];

    for (day, amount, note) in expenses {
        create_transaction(
            &NewTransaction {
                kind: TransactionKind::Expense,
                payment_category: PaymentCategory::PublicFacility,
                amount,
                date: date(day)?,
                counterparty_name: String::new(),
                note: note.to_owned(),
                settlement: SettlementStatus::Settled,
            },
            connection,
        )?;
        count += 1;
    }

    Ok(count)
}
