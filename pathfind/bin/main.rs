use log::info;
use pathfind::{
    grid::{Grid, DEFAULT_CELL_WIDTH},
    util::{parse_ascii, preset},
    DfsOptions,
};

/// Runs the search headless on one of the built-in maps and prints the result.
///
/// Usage: `pathfind [open|wall|maze] [--frames] [--no-replay]`
fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut name = "maze".to_string();
    let mut print_frames = false;
    let mut options = DfsOptions::default();

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--frames" => print_frames = true,
            "--no-replay" => options.replay_failed_branch = false,
            _ => name = arg,
        }
    }

    let map = preset(&name).ok_or_else(|| anyhow::anyhow!("Unknown map: {}", name))?;
    let mut board = parse_ascii(map, DEFAULT_CELL_WIDTH)?;

    println!("{}", board.grid());

    let mut frames = 0;
    let found = board.run(options, &mut |grid: &Grid| {
        frames += 1;
        if print_frames {
            println!("frame {}\n{}", frames, grid);
        }
    })?;

    info!("{} finished after {} frames", name, frames);

    println!("{}", board.grid());
    println!(
        "{} ({} frames)",
        if found { "path found" } else { "no path" },
        frames
    );

    Ok(())
}
