use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use camtf::{build_extrinsic, build_intrinsic, pixel_to_world};

mod config;

#[derive(FromArgs, Debug)]
/// Map a pixel to camera and world coordinates and print every stage.
struct Args {
    /// path to a JSON file with `intrinsics`, `extrinsics` and `pixel` sections
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// pixel column, overrides the config
    #[argh(option)]
    u: Option<f64>,

    /// pixel row, overrides the config
    #[argh(option)]
    v: Option<f64>,
}

const RULE: &str = "##################################";

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut scene = match &args.config {
        Some(path) => config::load_scene(path)?,
        None => config::Scene::default(),
    };
    if let Some(u) = args.u {
        scene.pixel[0] = u;
    }
    if let Some(v) = args.v {
        scene.pixel[1] = v;
    }
    log::debug!("running with {scene:?}");

    let intrinsic = build_intrinsic(scene.intrinsics)?;
    println!("\n{RULE}");
    println!("{intrinsic}");
    println!("{RULE}\n");

    let extrinsic = build_extrinsic(scene.extrinsics)?;

    let [u, v] = scene.pixel;
    let stages = pixel_to_world(&intrinsic, &extrinsic, u, v)?;
    println!("Image Coordinates:");
    println!("{:?}", stages.pixel);
    println!("Derived Camera Coordinates:");
    println!("{:?}", stages.camera);

    println!("\n{RULE}");
    println!("{extrinsic}");
    println!("{RULE}\n");

    println!("Derived World Coordinates:");
    println!("{:?}", stages.world);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
