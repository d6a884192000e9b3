//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `userstore_core` linkage and run one repository call against a
//!   database file for quick local checks.
//! - Keep output deterministic: one `key=value` line per result.
//!
//! Usage: `userstore_cli [<db_path> [count | list | create <email> | update <id> <email>]]`
//!
//! Set `USERSTORE_LOG_DIR` to an absolute directory to enable file logging.

use std::process::ExitCode;
use userstore_core::{
    default_log_level, init_logging, SqliteUserRepository, StoreConfig, UserRepository,
    UserStore,
};

fn main() -> ExitCode {
    println!("userstore_core version={}", userstore_core::core_version());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((path, command)) = args.split_first() else {
        return ExitCode::SUCCESS;
    };

    if let Ok(log_dir) = std::env::var("USERSTORE_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(path, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, command: &[String]) -> Result<(), String> {
    let store = UserStore::open(StoreConfig::new(path)).map_err(|err| err.to_string())?;
    store.init_store().map_err(|err| err.to_string())?;
    let repo = SqliteUserRepository::new(&store);

    match command {
        [] => {
            println!("store=ready path={path}");
        }
        [cmd] if cmd == "count" => {
            let count = repo.get_user_count().map_err(|err| err.to_string())?;
            println!("count={count}");
        }
        [cmd] if cmd == "list" => {
            for user in repo.get_all_users().map_err(|err| err.to_string())? {
                println!("id={} email={}", user.id, user.email);
            }
        }
        [cmd, email] if cmd == "create" => {
            let created = repo.create_user(email).map_err(|err| err.to_string())?;
            println!("created={created}");
        }
        [cmd, id, email] if cmd == "update" => {
            let id = id
                .parse::<i64>()
                .map_err(|err| format!("invalid id `{id}`: {err}"))?;
            let updated = repo.update_email(id, email).map_err(|err| err.to_string())?;
            println!("updated={updated}");
        }
        other => return Err(format!("unknown command: {}", other.join(" "))),
    }

    Ok(())
}
