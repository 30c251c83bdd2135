//! `fleetdesk` - CLI for the fleet desk
//!
//! Each invocation restores the persisted session, checks it against the
//! view the command belongs to, and then reads or mutates the ship records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;

use fleetdesk::cli::{
    Cli, Command, ConfigCommand, OutputFormat, ShipsCommand, StatusCommand, UpdateShipArgs,
};
use fleetdesk::{
    init_logging, Config, Error, FleetSummary, SessionManager, ShipRecord, ShipStatus, ShipStore,
    SqliteStorage, View,
};

type Sessions<'a> = SessionManager<&'a SqliteStorage>;
type Ships<'a> = ShipStore<&'a SqliteStorage>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let result = match cli.command {
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
        command => open_and_run(cli.config, command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(e.downcast_ref::<Error>().map_or(1, Error::exit_code))
        }
    }
}

fn open_and_run(config_path: Option<PathBuf>, command: Command) -> anyhow::Result<()> {
    let config = Config::load_from(config_path).context("loading configuration")?;
    let storage = open_storage(&config)?;
    let mut sessions = SessionManager::new(&storage);
    sessions.restore();
    run(&config, &storage, &mut sessions, command)
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = config.database_path();
    let storage = SqliteStorage::open(&path)
        .with_context(|| format!("opening local storage at {}", path.display()))?;
    storage.set_busy_timeout(config.busy_timeout())?;
    Ok(storage)
}

fn run(
    config: &Config,
    storage: &SqliteStorage,
    sessions: &mut Sessions<'_>,
    command: Command,
) -> anyhow::Result<()> {
    let default_format = OutputFormat::from(config.display.format);

    match command {
        Command::Login(login) => {
            if !sessions.login(&login.email, &login.password)? {
                bail!(Error::InvalidCredentials);
            }
            if let Some(session) = sessions.current_session() {
                println!("Logged in as {}", session.role());
            }
        }
        Command::Logout => {
            sessions.logout()?;
            println!("Logged out.");
        }
        Command::Whoami(cmd) => handle_whoami(sessions, cmd.json)?,
        Command::Dashboard(cmd) => {
            sessions.guard(View::Dashboard).require(View::Dashboard)?;
            let ships = load_ships(storage);
            print_summary(&ships.summary(), cmd.format.unwrap_or(default_format))?;
        }
        Command::Ships(ships_cmd) => handle_ships(storage, sessions, ships_cmd, default_format)?,
        Command::Status(StatusCommand { json }) => handle_status(config, storage, json)?,
        Command::Config(_) => unreachable!("configuration commands run before storage opens"),
    }
    Ok(())
}

fn load_ships(storage: &SqliteStorage) -> Ships<'_> {
    let mut ships = ShipStore::new(storage);
    ships.load();
    ships
}

fn handle_whoami(sessions: &Sessions<'_>, json: bool) -> anyhow::Result<()> {
    let user = sessions.current_user();
    if json {
        let value = match user {
            Some(user) => serde_json::json!({ "email": user.email, "role": user.role }),
            None => serde_json::Value::Null,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match user {
            Some(user) => println!("Logged in as {} ({})", user.role, user.email),
            None => println!("Not logged in."),
        }
    }
    Ok(())
}

fn handle_ships(
    storage: &SqliteStorage,
    sessions: &Sessions<'_>,
    cmd: ShipsCommand,
    default_format: OutputFormat,
) -> anyhow::Result<()> {
    let view = match cmd {
        ShipsCommand::Show { .. } => View::ShipDetail,
        _ => View::ShipList,
    };
    sessions.guard(view).require(view)?;

    let mut ships = load_ships(storage);

    match cmd {
        ShipsCommand::List { format } => {
            print_ships(ships.list(), format.unwrap_or(default_format))?;
        }
        ShipsCommand::Show { id, format } => {
            let ship = ships.find_by_id(&id).ok_or_else(|| Error::ship_not_found(&id))?;
            print_profile(ship, format.unwrap_or(default_format))?;
        }
        ShipsCommand::Add(args) => {
            let ship = ships.create(args.into())?;
            println!("Added ship {} ({})", ship.name, ship.id);
        }
        ShipsCommand::Update(args) => handle_update(&mut ships, &args)?,
        ShipsCommand::Delete { id, yes } => {
            let Some(ship) = ships.find_by_id(&id) else {
                bail!(Error::ship_not_found(&id));
            };
            if !yes {
                println!("Delete ship {} ({id})? Re-run with --yes to confirm.", ship.name);
                return Ok(());
            }
            ships.delete(&id)?;
            println!("Deleted ship {id}.");
        }
    }
    Ok(())
}

fn handle_update(ships: &mut Ships<'_>, args: &UpdateShipArgs) -> anyhow::Result<()> {
    let patch = args.patch();
    let Some(current) = ships.find_by_id(&args.id) else {
        bail!(Error::ship_not_found(&args.id));
    };
    if patch.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }

    let edited = patch.apply_to(current);
    match ships.update(edited)? {
        Some(ship) => println!("Updated ship {} ({})", ship.name, ship.id),
        None => bail!(Error::ship_not_found(&args.id)),
    }
    Ok(())
}

fn print_ships(ships: &[ShipRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(ships)?),
        _ if ships.is_empty() => println!("No ships found."),
        OutputFormat::Table => {
            let rows: Vec<[&str; 5]> = ships
                .iter()
                .map(|s| {
                    [
                        s.id.as_str(),
                        s.name.as_str(),
                        s.imo_number.as_str(),
                        s.flag.as_str(),
                        s.status.as_str(),
                    ]
                })
                .collect();
            print_table(["ID", "Name", "IMO Number", "Flag", "Status"], &rows);
        }
        OutputFormat::Plain => {
            for ship in ships {
                println!(
                    "{}  {} | IMO {} | {} | {}",
                    ship.id, ship.name, ship.imo_number, ship.flag, ship.status
                );
            }
        }
    }
    Ok(())
}

fn print_table<const N: usize>(headers: [&str; N], rows: &[[&str; N]]) {
    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str; N]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(&headers).trim_end());
    println!("{}", widths.map(|w| "-".repeat(w)).join("  "));
    for row in rows {
        println!("{}", line(row).trim_end());
    }
}

fn print_profile(ship: &ShipRecord, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(ship)?);
        return Ok(());
    }
    println!("Ship Profile: {}", ship.name);
    println!("  IMO Number:  {}", ship.imo_number);
    println!("  Flag:        {}", ship.flag);
    println!("  Status:      {}", ship.status);
    println!("  ID:          {}", ship.id);
    Ok(())
}

fn print_summary(summary: &FleetSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Table => {
            let total = summary.total_ships.to_string();
            let counts: Vec<(ShipStatus, String)> = ShipStatus::ALL
                .into_iter()
                .map(|status| (status, summary.count(status).to_string()))
                .collect();
            let mut rows = vec![["Total Ships", total.as_str()]];
            rows.extend(counts.iter().map(|(status, n)| [status.as_str(), n.as_str()]));
            print_table(["Metric", "Count"], &rows);
        }
        OutputFormat::Plain => {
            println!("Dashboard");
            println!("---------");
            println!("Total Ships:   {}", summary.total_ships);
            for status in ShipStatus::ALL {
                println!("{:<14} {}", format!("{status}:"), summary.count(status));
            }
        }
    }
    Ok(())
}

fn handle_status(config: &Config, storage: &SqliteStorage, json: bool) -> anyhow::Result<()> {
    let stats = storage.stats()?;
    let entries = storage.entries()?;

    if json {
        let keys: Vec<_> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "key": e.key,
                    "size_bytes": e.size_bytes,
                    "updated_at": e.updated_at,
                })
            })
            .collect();
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "entries": stats.total_entries,
            "db_size_bytes": stats.db_size_bytes,
            "keys": keys,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fleetdesk status");
        println!("----------------");
        println!("Database:      {}", storage.path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Entries:       {}", stats.total_entries);
        for entry in &entries {
            let updated = entry
                .updated_at
                .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
            println!("  {:<14} {:>8} bytes  {}", entry.key, entry.size_bytes, updated);
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("loading configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Busy timeout (ms):  {}", config.storage.busy_timeout_ms);
                println!();
                println!("[Display]");
                println!("  Format:             {:?}", config.display.format);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("{} is not a usable configuration", path.display()))?;
            println!("{}: OK", path.display());
        }
    }
    Ok(())
}
