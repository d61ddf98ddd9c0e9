//! level CLI - builds sector/brush level scenes
//!
//! Loads a JSON scene, runs the build pipeline and writes the result back,
//! optionally exporting the built rooms as Wavefront OBJ.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::constants::LEVEL_COLLECTION;
use level_build::{build, BuildOptions, Scene, ShapeKind};
use std::fs;
use std::path::{Path, PathBuf};

mod obj;

#[derive(Parser)]
#[command(name = "level")]
#[command(about = "Compile sector/brush level scenes into room meshes", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild every room of a scene
    Build {
        /// Scene JSON file
        scene: PathBuf,
        /// Where to write the built scene (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export the level rooms as Wavefront OBJ
        #[arg(long)]
        obj: Option<PathBuf>,
        /// Only rebuild rooms of selected shapes
        #[arg(long)]
        selected_only: bool,
    },
    /// Add a default shape to a scene (created if missing)
    New {
        /// Scene JSON file
        scene: PathBuf,
        /// Kind of shape to add
        #[arg(short, long, value_enum, default_value_t = KindArg::Sector2d)]
        kind: KindArg,
        /// Name for the shape (default: the kind)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Display information about a scene
    Info {
        /// Scene JSON file
        scene: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Sector2d,
    Sector3d,
    Brush,
}

impl From<KindArg> for ShapeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sector2d => ShapeKind::Sector2D,
            KindArg::Sector3d => ShapeKind::Sector3D,
            KindArg::Brush => ShapeKind::Brush,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Build {
            scene,
            output,
            obj,
            selected_only,
        } => build_scene(&scene, output.as_deref(), obj.as_deref(), selected_only),
        Commands::New { scene, kind, name } => new_shape(&scene, kind.into(), name),
        Commands::Info { scene } => show_info(&scene),
    }
}

fn load_scene(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene {}", path.display()))?;
    Scene::from_json(&json).with_context(|| format!("Invalid scene {}", path.display()))
}

fn save_scene(scene: &Scene, path: &Path) -> Result<()> {
    let json = scene.to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write scene {}", path.display()))
}

fn build_scene(
    input: &Path,
    output: Option<&Path>,
    obj_path: Option<&Path>,
    selected_only: bool,
) -> Result<()> {
    let mut scene = load_scene(input)?;
    let report = build(&mut scene, BuildOptions { selected_only })?;

    let target = output.unwrap_or(input);
    save_scene(&scene, target)?;
    println!(
        "Built {} room(s) into {} ({} skipped)",
        report.rooms_built,
        target.display(),
        report.skipped.len()
    );

    if let Some(path) = obj_path {
        let rooms = scene.linked_rooms(LEVEL_COLLECTION)?;
        let mut text = String::new();
        obj::write_obj(&mut text, &rooms)?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write OBJ {}", path.display()))?;
        println!("Exported {} room(s) to {}", rooms.len(), path.display());
    }
    Ok(())
}

fn new_shape(path: &Path, kind: ShapeKind, name: Option<String>) -> Result<()> {
    let mut scene = if path.exists() {
        load_scene(path)?
    } else {
        log::info!("creating new scene {}", path.display());
        Scene::new()
    };

    let id = scene.add_new_shape(kind)?;
    if let Some(name) = name {
        scene.shape_mut(id)?.name = name;
    }
    save_scene(&scene, path)?;

    println!("Added {} shape {} to {}", kind, id, path.display());
    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let scene = load_scene(path)?;

    println!("Level scene: {}", path.display());
    println!("  Precision: {}", scene.settings.precision);
    println!("  Remove material: {}", scene.settings.remove_material_name());
    println!("  Shapes: {}", scene.shapes().len());
    println!("  Rooms: {}", scene.rooms().len());
    println!("  Materials: {}", scene.materials.len());

    if !scene.shapes().is_empty() {
        println!("\nShapes:");
        for shape in scene.shapes() {
            let kind = shape
                .kind
                .map(|k| k.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  {} {} [{}] ({} vertices, {} faces)",
                shape.id,
                shape.name,
                kind,
                shape.mesh.vertex_count(),
                shape.mesh.face_count()
            );
        }
    }

    let rooms = scene.linked_rooms(LEVEL_COLLECTION).unwrap_or_default();
    if !rooms.is_empty() {
        println!("\nRooms:");
        for room in &rooms {
            println!(
                "  {} from {} ({} triangles, {} slots)",
                room.name,
                room.source,
                room.mesh.triangle_count(),
                room.material_slots.len()
            );
        }
    }

    Ok(())
}
