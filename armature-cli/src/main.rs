use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use armature_core::rig::{LengthFix, NameRules, RenameRecord, SelectionOnly};
use armature_core::{config, pipeline, scene, NormalizeConfig, ObjectKind, Pipeline, Scene, VERSION};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "armature", version = VERSION, about = "Armature bone fixing and renaming tools")]
struct Cli {
    /// Normalization settings (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use this object instead of the scene's active object
    #[arg(long, global = true)]
    active: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the objects of a scene and the bones of its armatures
    Inspect { path: PathBuf },
    /// Extend bones shorter than the minimum length
    FixLengths {
        path: PathBuf,
        /// Write the updated scene here (report only when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Move side markers in bone names to a trailing " R"/" L"
    Rename {
        path: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip the eye-bone table
        #[arg(long)]
        no_special: bool,
    },
    /// Print the normalized form of a single bone name
    RenameName {
        name: String,
        #[arg(long)]
        no_special: bool,
    },
    /// Select left-side bones and mark the anchor for symmetrize
    Symmetrize {
        path: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Fix lengths, rename, then symmetrize
    Run {
        path: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => config::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NormalizeConfig::default(),
    };

    match cli.cmd {
        Command::Inspect { path } => {
            let scene = open(&path, cli.active.as_deref())?;
            inspect(&scene);
        }
        Command::FixLengths { path, out } => {
            let mut scene = open(&path, cli.active.as_deref())?;
            let fixed = pipeline::fix_lengths(&mut scene, &cfg)?;
            print_lengths(&fixed, cfg.lengths.min_length);
            finish(&scene, out.as_deref())?;
        }
        Command::Rename { path, out, no_special } => {
            if no_special {
                cfg.names.special_cases = false;
            }
            let mut scene = open(&path, cli.active.as_deref())?;
            let renames = pipeline::rename_bones(&mut scene, &cfg)?;
            print_renames(&renames);
            finish(&scene, out.as_deref())?;
        }
        Command::RenameName { name, no_special } => {
            let rules = if no_special { NameRules::generic_only() } else { NameRules::standard() };
            match rules.rename(&name) {
                Some((new, _)) => println!("{}", new),
                None => println!("{}", name),
            }
        }
        Command::Symmetrize { path, out } => {
            let mut scene = open(&path, cli.active.as_deref())?;
            let selection = pipeline::symmetrize(&mut scene, &cfg, &mut SelectionOnly)?;
            println!("Selected {} left-side bone(s)", selection.bones.len());
            if let Some(active) = &selection.active {
                println!("Active bone: {}", active);
            }
            println!("Symmetrize operation completed");
            finish(&scene, out.as_deref())?;
        }
        Command::Run { path, out } => {
            let mut scene = open(&path, cli.active.as_deref())?;
            let report = Pipeline::new(&cfg).run(&mut scene, &mut SelectionOnly)?;
            print_lengths(&report.lengths, cfg.lengths.min_length);
            print_renames(&report.renames);
            println!("Symmetrize operation completed ({} bone(s) selected)", report.mirror.bones.len());
            finish(&scene, out.as_deref())?;
        }
    }
    Ok(())
}

fn open(path: &Path, active: Option<&str>) -> Result<Scene> {
    let mut scene = scene::load_from_path(path)?;
    if let Some(name) = active {
        scene.set_active(name);
    }
    Ok(scene)
}

fn finish(scene: &Scene, out: Option<&Path>) -> Result<()> {
    if let Some(out) = out {
        scene::save_to_path(scene, out)?;
        println!("Wrote {}", out.display());
    }
    Ok(())
}

fn inspect(scene: &Scene) {
    println!("Active: {}", scene.active.as_deref().unwrap_or("<none>"));
    for obj in &scene.objects {
        match &obj.kind {
            ObjectKind::Armature(skeleton) => {
                println!("{} (armature, {} bones)", obj.name, skeleton.bones.len());
                for bone in &skeleton.bones {
                    let parent = bone.parent.as_deref().unwrap_or("-");
                    println!("  {:<32} len={:.3} parent={}", bone.name, bone.length(), parent);
                }
            }
            other => println!("{} ({})", obj.name, other.label()),
        }
    }
}

fn print_lengths(fixed: &[LengthFix], min_length: f32) {
    if fixed.is_empty() {
        println!("No bones with length < {}m found", min_length);
        return;
    }
    println!("\nFixed bone lengths:");
    for fix in fixed {
        println!("- {}", fix);
    }
}

fn print_renames(renames: &[RenameRecord]) {
    for rename in renames {
        println!("{}", rename);
    }
}
