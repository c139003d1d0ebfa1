use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lonely_wm::actor::placer::{Event, Placer};
use lonely_wm::common::config::FileSettings;
use lonely_wm::common::log;
use lonely_wm::layout_engine::Plan;
use lonely_wm::model::EditError;
use lonely_wm::sys::geometry::Rect;
use lonely_wm::sys::memory::{MemoryWindowSystem, Request};
use lonely_wm::sys::window_system::WindowInfo;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "lonely-cli")]
#[command(about = "Inspect and edit automatic window placement settings")]
struct Cli {
    /// Settings file to use instead of ~/.lonely.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Window classes that are never auto-placed
    Exclusions {
        #[command(subcommand)]
        command: ExclusionCommands,
    },
    /// Check the settings file for invalid values
    Validate,
    /// Show what would happen to a new window in a described workspace
    Plan { scenario: PathBuf },
}

#[derive(Subcommand)]
enum ExclusionCommands {
    /// Print every excluded class
    List,
    /// Exclude a window class
    Add { class: String },
    /// Stop excluding a window class
    Remove { class: String },
    /// Replace one excluded class with another
    Rename { old: String, new: String },
}

/// A workspace snapshot: every monitor referenced by a window gets
/// `work_area`, `windows` are listed bottom to top and `new_window` is
/// created last.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    work_area: Rect,
    #[serde(default)]
    windows: Vec<WindowInfo>,
    new_window: WindowInfo,
}

#[derive(Serialize)]
struct PlanOutput {
    plan: Option<Plan>,
    requests: Vec<Request>,
}

fn main() {
    log::init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match cli.config {
        Some(path) => FileSettings::new(path),
        None => FileSettings::at_default_location()?,
    };

    match cli.command {
        Commands::Exclusions { command } => exclusions(&settings, command),
        Commands::Validate => validate(&settings),
        Commands::Plan { scenario } => plan(settings, scenario),
    }
}

fn exclusions(settings: &FileSettings, command: ExclusionCommands) -> anyhow::Result<()> {
    match command {
        ExclusionCommands::List => {
            for class in settings.load()?.settings.excluded_classes.iter() {
                println!("{class}");
            }
        }
        ExclusionCommands::Add { class } => {
            settings.edit_exclusions(|list| list.add(&class).map(|()| ((), true)))?;
        }
        ExclusionCommands::Remove { class } => {
            let removed = settings.edit_exclusions(|list| {
                let removed = list.remove(class.trim());
                Ok::<_, EditError>((removed, removed))
            })?;
            if !removed {
                eprintln!("{class} was not excluded");
            }
        }
        ExclusionCommands::Rename { old, new } => {
            settings.edit_exclusions(|list| list.rename(&old, &new).map(|changed| ((), changed)))?;
        }
    }
    Ok(())
}

fn validate(settings: &FileSettings) -> anyhow::Result<()> {
    let issues = settings.load()?.validate();
    if issues.is_empty() {
        println!("{}: ok", settings.path().display());
        return Ok(());
    }
    for issue in &issues {
        println!("{issue}");
    }
    anyhow::bail!("{} issue(s) in {}", issues.len(), settings.path().display())
}

fn plan(settings: FileSettings, scenario: PathBuf) -> anyhow::Result<()> {
    let buf = fs::read_to_string(&scenario)
        .with_context(|| format!("reading {}", scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&buf)
        .with_context(|| format!("parsing {}", scenario.display()))?;

    let mut config = settings.load()?;
    config.auto_fix_values();

    let mut host = MemoryWindowSystem::new();
    for info in scenario.windows.iter().chain([&scenario.new_window]) {
        host.set_work_area(info.monitor, scenario.work_area);
    }
    for info in scenario.windows {
        host.add_window(info);
    }

    let mut placer = Placer::new(host, settings, config.settings);
    placer.handle_event(Event::Enable);
    let wid = placer.host_mut().add_window(scenario.new_window);
    placer.handle_event(Event::WindowCreated(wid));
    let plan = placer.on_first_frame(wid);

    let output = PlanOutput {
        plan,
        requests: placer.host_mut().take_requests(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
