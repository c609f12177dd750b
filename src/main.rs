//! Action Transfer - command line host.
//!
//! Works on a scene file (armatures + actions, YAML) and mapping files (YAML or JSON):
//!
//! - `collect`: build a mapping from one armature, or infer one from a source/target pair
//! - `set-target`: edit one entry of a mapping
//! - `validate`: check a mapping against two armatures and an action
//! - `transfer`: remap an action onto an armature and write the scene back
//! - `show` / `clear`: inspect or empty a mapping file
//!
//! Settings come from `Action Transfer.yaml` in the config directory and
//! `ACTION_TRANSFER_*` environment variables.

use action_transfer::models::Skeleton;
use action_transfer::{APP_NAME, ConfigManager, Scene, Session, SessionChange, VERSION};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "action-transfer", version = VERSION, about = "Transfer animation actions between skeletons")]
struct Cli {
    /// Directory holding the settings file
    #[arg(long, default_value = ".")]
    config_dir: Utf8PathBuf,

    /// Also print logs to the console
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect bones into a new mapping; with two armatures, infer targets
    Collect {
        #[arg(long)]
        scene: Utf8PathBuf,
        /// Source armature, then optionally the target armature
        #[arg(required = true, num_args = 1..)]
        armatures: Vec<String>,
        #[arg(long)]
        prefix_src: Option<String>,
        #[arg(long)]
        prefix_tgt: Option<String>,
        /// Mapping file to write
        #[arg(long)]
        out: Utf8PathBuf,
    },
    /// Set the target of one mapping entry
    SetTarget {
        #[arg(long)]
        mapping: Utf8PathBuf,
        source: String,
        target: String,
    },
    /// Check a mapping against source and target armatures and an action
    Validate {
        #[arg(long)]
        scene: Utf8PathBuf,
        #[arg(long)]
        mapping: Utf8PathBuf,
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        #[arg(long)]
        action: String,
    },
    /// Remap an action through a mapping onto a destination armature
    Transfer {
        #[arg(long)]
        scene: Utf8PathBuf,
        #[arg(long)]
        mapping: Utf8PathBuf,
        #[arg(long)]
        action: String,
        #[arg(long)]
        destination: Option<String>,
        /// Scene file to write; defaults to overwriting `--scene`
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },
    /// Print a mapping
    Show {
        #[arg(long)]
        mapping: Utf8PathBuf,
    },
    /// Remove every entry from a mapping file, keeping its prefixes
    Clear {
        #[arg(long)]
        mapping: Utf8PathBuf,
    },
}

fn report(changes: &[SessionChange]) {
    for change in changes {
        tracing::debug!("Session change: {:?}", change);
    }
}

fn print_mapping(session: &Session) {
    let mapping = session.mapping();
    println!(
        "prefix_src: {:?}  prefix_tgt: {:?}  ({}/{} resolved)",
        mapping.prefix_src,
        mapping.prefix_tgt,
        mapping.resolved_count(),
        mapping.len()
    );
    for entry in mapping.entries() {
        let target = entry.resolved_target().unwrap_or("<unresolved>");
        println!("  {} -> {}", entry.source(), target);
    }
}

fn run(cli: Cli, mut session: Session) -> Result<()> {
    match cli.cmd {
        Command::Collect {
            scene,
            armatures,
            prefix_src,
            prefix_tgt,
            out,
        } => {
            let scene = Scene::load(&scene)?;
            let skeletons = armatures
                .iter()
                .map(|name| scene.skeleton(name))
                .collect::<Result<Vec<&Skeleton>>>()?;

            let mapping = session.mapping();
            let src = prefix_src.unwrap_or_else(|| mapping.prefix_src.clone());
            let tgt = prefix_tgt.unwrap_or_else(|| mapping.prefix_tgt.clone());
            report(&session.set_prefixes(&src, &tgt));

            report(&session.collect(skeletons.as_slice())?);
            session.save(&out)?;
            print_mapping(&session);
        }
        Command::SetTarget {
            mapping,
            source,
            target,
        } => {
            report(&session.load(&mapping)?);
            report(&session.set_target(&source, &target)?);
            session.save(&mapping)?;
            println!("{} -> {}", source, target);
        }
        Command::Validate {
            scene,
            mapping,
            source,
            target,
            action,
        } => {
            let scene = Scene::load(&scene)?;
            report(&session.load(&mapping)?);
            session.validate(
                scene.skeleton(&source)?,
                scene.skeleton(&target)?,
                scene.action(&action)?,
            )?;
            println!("Mapping is valid");
        }
        Command::Transfer {
            scene: scene_path,
            mapping,
            action,
            destination,
            out,
        } => {
            let mut scene = Scene::load(&scene_path)?;
            report(&session.load(&mapping)?);
            report(&session.select_action(Some(&action)));
            if !session.mapping().is_complete() {
                tracing::warn!("Mapping has unresolved entries; their curves will be dropped");
            }

            let source_action = scene.action(&action)?.clone();
            let outcome = match &destination {
                Some(name) => {
                    let skeleton = scene.skeleton_mut(name)?;
                    session.transfer(&source_action, Some(skeleton))?
                }
                None => session.transfer::<Skeleton>(&source_action, None)?,
            };

            println!("{}: {}", outcome.action.name, outcome.report.summary());
            scene.insert_action(outcome.action);
            scene.save(out.as_ref().unwrap_or(&scene_path))?;
        }
        Command::Show { mapping } => {
            report(&session.load(&mapping)?);
            print_mapping(&session);
        }
        Command::Clear { mapping } => {
            report(&session.load(&mapping)?);
            report(&session.clear());
            session.save(&mapping)?;
            println!("Cleared {}", mapping);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager
        .load_settings()
        .context("Failed to load settings")?;

    let _guard = action_transfer::logging::setup_logging_with_console(
        &settings.log_dir,
        APP_NAME,
        settings.debug_mode,
        cli.verbose,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let session = Session::from_settings(&settings);
    if let Err(e) = run(cli, session) {
        tracing::error!("{:#}", e);
        return Err(e);
    }

    tracing::info!("Done");
    Ok(())
}
