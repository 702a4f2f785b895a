use rsrcfork::{extract, macbinary};
use std::env;
use std::fs;

fn main() {
    if env::args().count() != 2 {
        println!("Usage: readrsrc <path>");
        return;
    }
    let path = env::args().nth(1).unwrap();
    let data = fs::read(path).expect("failed to read file");
    let header = macbinary::MacBinaryHeader::parse(&data)
        .filter(|header| header.rsrc_length > 0);
    if let Some(header) = header {
        println!("MacBinary: {:?} ({}/{})",
                 String::from_utf8_lossy(&header.name),
                 header.file_type,
                 header.creator);
    }
    let extraction = extract(&data).expect("failed to read resource fork");
    let fork = &extraction.fork;
    println!("Resource fork contains {} resource(s).", fork.resources.len());
    for ostype in fork.types() {
        for resource in fork.resources_of_type(ostype) {
            println!("'{}' {}: {} ({} byte payload)",
                     ostype,
                     resource.id,
                     resource.name_lossy().unwrap_or_default(),
                     resource.data.len());
        }
    }
    for warning in &extraction.warnings {
        println!("skipped '{}' {}: {}", warning.ostype, warning.id, warning.error);
    }
}
