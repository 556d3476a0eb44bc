//! savetool - inspect a save file without loading it
//!
//! Validates the magic signature, version range, and header record of a
//! save file and prints the metadata. Exits nonzero on any format error.

use std::path::Path;
use std::process::ExitCode;

use realmsave_format::{read_save_header, STATUS_COMPRESSED};
use tracing::{error, Level};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: savetool <file.sav>");
        return ExitCode::from(2);
    };

    match read_save_header(Path::new(&path)) {
        Ok((version, header)) => {
            println!("save file:   {}", path);
            println!("version:     {}", version);
            println!("game type:   {}", header.game_type.as_str());
            println!("map:         {} ({})", header.info.name, header.info.file);
            println!("size:        {}x{}", header.info.width, header.info.height);
            println!("saved at:    {}", header.info.timestamp);
            println!("compressed:  {}", header.status & STATUS_COMPRESSED != 0);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}: {}", path, err);
            ExitCode::FAILURE
        }
    }
}
