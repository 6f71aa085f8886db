use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use kas_rt::{NewUser, PasswordHash, Role, ValidatedPassword, create_user, initialize_db};

/// A utility for adding an administrator to the Kas RT database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The name used to log in.
    #[arg(long)]
    username: String,

    /// The administrator's full name.
    #[arg(long)]
    full_name: String,

    /// The administrator's email address.
    #[arg(long)]
    email: String,

    /// The administrator's phone number.
    #[arg(long)]
    phone: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let Some(password_hash) = get_new_password_hash() else {
        return Ok(());
    };

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    let user = create_user(
        NewUser {
            full_name: args.full_name,
            username: args.username,
            email: args.email,
            phone_number: args.phone,
            role: Role::Admin,
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        },
        &connection,
    )?;

    println!("Created admin \"{}\" with ID {}", user.username, user.id);

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    let has_extension = db_path
        .extension()
        .is_some_and(|extension| !extension.is_empty());

    if !has_extension {
        print_error("Database path must include a file extension (e.g., 'kas_rt.db').");
        exit(1);
    }
}

fn prompt_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

/// Ask for the password twice until both match and it is long enough.
///
/// Returns `None` if stdin is closed.
fn get_new_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt_password("Enter a password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt_password("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string());
}
