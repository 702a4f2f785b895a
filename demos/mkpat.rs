//! Builds a resource file holding a single `PAT ` resource.
//!
//! ```shell
//! cargo run --example mkpat <out.rsrc> <id> <name> <row>...
//! ```
//!
//! Each of the eight rows is a string of eight '0' or '1' characters,
//! leftmost pixel first.

use rsrcfork::pattern::{pattern_resource, PATTERN_OSTYPE};
use rsrcfork::ResourceFork;
use std::env;
use std::fs::File;
use std::io::BufWriter;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 11 {
        println!("Usage: mkpat <out.rsrc> <id> <name> <row>...");
        return;
    }
    let id: i16 = args[1].parse().expect("resource ID must be a 16-bit integer");
    let resource = pattern_resource(id, &args[2], &args[3..])
        .expect("invalid pattern");
    let mut fork = ResourceFork::new();
    fork.resources.push(resource);
    let file = BufWriter::new(File::create(&args[0])
                                  .expect("failed to create resource file"));
    fork.write(file).expect("failed to write resource file");
    println!("Wrote '{}' {} to {}", PATTERN_OSTYPE, id, args[0]);
}
