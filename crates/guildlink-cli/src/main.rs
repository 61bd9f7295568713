use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use guildlink_api::{DEFAULT_BOT_URL, HttpBotApi};
use guildlink_application::{GuildLink, LinkConfig};
use guildlink_core::{LinkEvent, ModuleCatalog, ModuleId, SystemClock};
use guildlink_infrastructure::FileSessionStore;

#[derive(Parser)]
#[command(name = "guildlink")]
#[command(about = "GuildLink CLI - link this machine to your guild's bot", long_about = None)]
struct Cli {
    /// Bot service base URL.
    #[arg(long, default_value = DEFAULT_BOT_URL)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link this machine using a code from the bot's %connect command
    Connect { code: String },
    /// Show the linked user and guild
    Status,
    /// Stage a module level and push it to the bot
    Set { module: String, level: u32 },
    /// List synced module levels
    Levels,
    /// Show the guild roster, optionally filtered by a role id
    Roster {
        #[arg(long)]
        role: Option<String>,
    },
    /// Drop the stored session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = Arc::new(ModuleCatalog::new());
    let manager = Arc::new(GuildLink::new(
        Arc::new(HttpBotApi::new(cli.url)),
        Arc::new(FileSessionStore::default_location()?),
        catalog.clone(),
        Arc::new(SystemClock),
        LinkConfig::default(),
    ));

    let mut events = manager.subscribe();
    let result = run(cli.command, &manager, &catalog).await;

    // Lifecycle events were emitted while the command ran; report them
    // before surfacing the command's own outcome.
    while let Ok(event) = events.try_recv() {
        print_event(&event);
    }
    manager.shutdown();
    result
}

async fn run(command: Commands, manager: &Arc<GuildLink>, catalog: &ModuleCatalog) -> Result<()> {
    match command {
        Commands::Connect { code } => {
            let identity = manager.check_connect_code(&code).await?;
            println!(
                "Code accepted for {} in {}",
                identity.user.username, identity.guild.name
            );
            manager.connect(&identity).await?;
        }
        Commands::Status => {
            manager.initialize().await?;
            match (manager.user().await, manager.guild().await) {
                (Some(user), Some(guild)) => {
                    println!("Linked as {} in {}", user.username, guild.name)
                }
                _ => println!("Not linked"),
            }
        }
        Commands::Set { module, level } => {
            manager.initialize().await?;
            let id = resolve_module(catalog, &module)?;
            manager.set_module_level(id, level).await?;
            println!("{module} set to {level}");
        }
        Commands::Levels => {
            manager.initialize().await?;
            match manager.module_levels().await {
                Some(levels) if !levels.is_empty() => {
                    let mut rows: Vec<_> = levels
                        .iter()
                        .map(|(id, entry)| (catalog.name_of(*id).unwrap_or("?"), entry.level))
                        .collect();
                    rows.sort();
                    for (name, level) in rows {
                        println!("{name:<16} {level}");
                    }
                }
                Some(_) => println!("No module levels synced yet"),
                None => println!("Not linked"),
            }
        }
        Commands::Roster { role } => {
            manager.initialize().await?;
            let data = manager.corp_roster(role.as_deref()).await?;
            for member in &data.members {
                println!("{}", member.name);
            }
            if let Some(name) = &data.filter_name {
                println!("(filtered by {name})");
            }
        }
        Commands::Logout => {
            manager.logout().await;
        }
    }
    Ok(())
}

fn resolve_module(catalog: &ModuleCatalog, module: &str) -> Result<ModuleId> {
    match module.parse::<ModuleId>() {
        Ok(id) => Ok(id),
        Err(_) => catalog
            .id_of(module)
            .ok_or_else(|| anyhow::anyhow!("unknown module '{module}'")),
    }
}

fn print_event(event: &LinkEvent) {
    match event {
        LinkEvent::Connected { identity } => println!(
            "Connected: {} / {}",
            identity.user.username, identity.guild.name
        ),
        LinkEvent::ConnectFailed { message } => eprintln!("Connect failed: {message}"),
        LinkEvent::Disconnected => println!("Disconnected"),
        LinkEvent::Sync { levels } => println!("Synced {} module levels", levels.len()),
    }
}
