//! Extracts every icon in one or more resource files as PNGs.
//!
//! ```shell
//! cargo run --example rsrc2png <out_dir> <path/to/file.rsrc>...
//! # icons will be saved to out_dir/<type>_<id>_<width>.png
//! ```
//!
//! Inputs may be raw resource forks or MacBinary files.  Each input is
//! decoded on its own thread.

use rsrcfork::extract;
use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::thread;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        println!("Usage: rsrc2png <out_dir> <path>...");
        return;
    }
    let out_dir = Path::new(&args[0]);
    fs::create_dir_all(out_dir).expect("failed to create output directory");
    thread::scope(|scope| {
        for input in &args[1..] {
            scope.spawn(move || extract_file(Path::new(input), out_dir));
        }
    });
}

fn extract_file(input: &Path, out_dir: &Path) {
    let data = match fs::read(input) {
        Ok(data) => data,
        Err(error) => {
            println!("{}: {}", input.display(), error);
            return;
        }
    };
    let extraction = match extract(&data) {
        Ok(extraction) => extraction,
        Err(error) => {
            println!("{}: {}", input.display(), error);
            return;
        }
    };
    for icon in &extraction.icons {
        let png_path = out_dir.join(icon.file_name());
        let png_file = BufWriter::new(File::create(&png_path)
                                          .expect("failed to create PNG file"));
        icon.pixels
            .to_rgba()
            .write_png(png_file)
            .expect("failed to write PNG file");
    }
    println!("{}: {} icon(s) extracted, {} resource(s) skipped",
             input.display(),
             extraction.icons.len(),
             extraction.warnings.len());
    for warning in &extraction.warnings {
        println!("  '{}' {}: {}", warning.ostype, warning.id, warning.error);
    }
}
