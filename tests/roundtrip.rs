use byteorder::{BigEndian, ByteOrder};
use rsrcfork::clut::encode_color_table;
use rsrcfork::icon::{encode_cicn, encode_mono};
use rsrcfork::{extract, ColorEntry, Error, IconPixels, MonoIcon, OSType,
               Resource, ResourceFork};

#[test]
fn round_trip_preserves_resources() {
    init_logging();
    let resources = vec![
        Resource::new(OSType(*b"PAT "), 128, vec![0xAA; 8]).with_name("Gray"),
        Resource::new(OSType(*b"PAT "), -1, vec![]).with_name(""),
        Resource::new(OSType(*b"a\0\xffz"), 0, b"odd type".to_vec()),
        Resource::new(OSType(*b"STR "), 32767, vec![1, 2, 3])
            .with_name(vec![0xA5, 0x00, 0x7F]),
        Resource::new(OSType(*b"STR "), -32768, vec![0; 1000]),
    ];
    let decoded = round_trip(&resources);
    assert_eq!(decoded.len(), resources.len());
    for resource in &resources {
        let found = decoded
            .iter()
            .find(|r| r.ostype == resource.ostype && r.id == resource.id)
            .expect("resource missing after round trip");
        assert_eq!(found, resource);
    }
}

#[test]
fn encoding_is_deterministic() {
    let mut resources = vec![
        Resource::new(OSType(*b"ppat"), 130, vec![3; 20]).with_name("B"),
        Resource::new(OSType(*b"PAT "), 129, vec![2; 8]).with_name("A"),
        Resource::new(OSType(*b"PAT "), 128, vec![1; 8]).with_name("B"),
        Resource::new(OSType(*b"ICN#"), 1, vec![0; 256]),
    ];
    let first = encode(&resources);
    resources.reverse();
    let second = encode(&resources);
    resources.swap(0, 2);
    let third = encode(&resources);
    assert!(first == second);
    assert!(first == third);
}

#[test]
fn decoded_order_is_type_then_id() {
    let resources = vec![
        Resource::new(OSType(*b"zzzz"), 5, vec![]),
        Resource::new(OSType(*b"aaaa"), 9, vec![]),
        Resource::new(OSType(*b"aaaa"), -9, vec![]),
    ];
    let decoded = round_trip(&resources);
    let order: Vec<(OSType, i16)> =
        decoded.iter().map(|r| (r.ostype, r.id)).collect();
    assert_eq!(order,
               vec![(OSType(*b"aaaa"), -9),
                    (OSType(*b"aaaa"), 9),
                    (OSType(*b"zzzz"), 5)]);
}

#[test]
fn shared_names_occupy_one_entry() {
    let resources = vec![
        Resource::new(OSType(*b"PAT "), 1, vec![0; 8]).with_name("Shared"),
        Resource::new(OSType(*b"PAT "), 2, vec![0; 8]).with_name("Shared"),
    ];
    let bytes = encode(&resources);
    let occurrences = bytes.windows(7).filter(|w| *w == &b"\x06Shared"[..]).count();
    assert_eq!(occurrences, 1);
    let decoded = round_trip(&resources);
    assert!(decoded.iter().all(|r| r.name == Some(b"Shared".to_vec())));
}

#[test]
fn long_names_are_truncated() {
    let resources = vec![Resource::new(OSType(*b"PAT "), 1, vec![])
                             .with_name(vec![b'n'; 400])];
    let decoded = round_trip(&resources);
    assert_eq!(decoded[0].name, Some(vec![b'n'; 255]));
}

#[test]
fn out_of_bounds_offsets_are_malformed() {
    let resources = vec![Resource::new(OSType(*b"ICN#"), 1, vec![0xFF; 256])];
    let bytes = encode(&resources);
    for field in 0..4 {
        let mut corrupt = bytes.clone();
        BigEndian::write_u32(&mut corrupt[4 * field..], 0x7FFF_FFFF);
        match ResourceFork::parse(&corrupt) {
            Err(Error::MalformedContainer(_)) => {}
            Err(other) => panic!("field {}: unexpected error {}", field, other),
            Ok(_) => panic!("field {}: corrupt fork decoded", field),
        }
        match extract(&corrupt) {
            Err(Error::MalformedContainer(_)) => {}
            Err(other) => panic!("field {}: unexpected error {}", field, other),
            Ok(_) => panic!("field {}: corrupt fork extracted", field),
        }
    }
}

#[test]
fn solid_mono_icons() {
    let resources = vec![
        Resource::new(OSType(*b"ICN#"), 128, vec![0xFF; 128]),
        Resource::new(OSType(*b"ICN#"), 129, vec![0x00; 128]),
    ];
    let extraction = extract(&encode(&resources)).expect("extract failed");
    assert_eq!(extraction.icons.len(), 2);
    let black = extraction.icons[0].pixels.to_rgba();
    assert_eq!((black.width(), black.height()), (32, 32));
    assert!(black.data().chunks(4).all(|px| px == [0, 0, 0, 255]));
    let blank = extraction.icons[1].pixels.to_rgba();
    assert!(blank.data().chunks(4).all(|px| px[3] == 0));
}

#[test]
fn mono_icon_with_mask_round_trip() {
    let mut data = vec![0u8; 256];
    data[0] = 0xF0;
    data[128..].iter_mut().for_each(|byte| *byte = 0xFF);
    let resources = vec![Resource::new(OSType(*b"ICN#"), 128, data.clone())];
    let extraction = extract(&encode(&resources)).unwrap();
    match extraction.icons[0].pixels {
        IconPixels::Mono(ref icon) => {
            assert!(icon.mask.is_some());
            assert!(icon.image.get(3, 0));
            assert!(!icon.image.get(4, 0));
            assert!(icon.is_opaque(31, 31));
            assert_eq!(encode_mono(icon), data);
        }
        IconPixels::Color(_) => panic!("mono icon decoded as color"),
    }
}

#[test]
fn color_icon_uses_clut_fallback_palette() {
    let palette: Vec<ColorEntry> = (0..16)
        .map(|value| ColorEntry {
            value,
            rgb: [value as u8 * 16, 255 - value as u8, 7],
        })
        .collect();
    let indices: Vec<u8> = (0..64).map(|i| (i % 16) as u8).collect();
    let cicn = encode_cicn(8, 8, 4, &[], &indices, None).unwrap();
    let resources = vec![
        Resource::new(OSType(*b"clut"), 4, encode_color_table(0, 0, &palette)),
        Resource::new(OSType(*b"cicn"), 128, cicn),
    ];
    let extraction = extract(&encode(&resources)).unwrap();
    assert!(extraction.warnings.is_empty());
    assert_eq!(extraction.icons.len(), 1);
    let image = extraction.icons[0].pixels.to_rgba();
    for y in 0..8 {
        for x in 0..8 {
            let index = ((y * 8 + x) % 16) as usize;
            let [r, g, b] = palette[index].rgb;
            assert_eq!(image.pixel(x, y), &[r, g, b, 255]);
        }
    }
}

#[test]
fn bad_color_icon_does_not_stop_siblings() {
    init_logging();
    let mut cicn = encode_cicn(8, 8, 8, &[], &[0; 64], None).unwrap();
    // Declare 1000-byte rows.
    BigEndian::write_u16(&mut cicn[4..6], 0x8000 | 1000);
    let resources = vec![
        Resource::new(OSType(*b"ICN#"), 128, vec![0xFF; 256]),
        Resource::new(OSType(*b"cicn"), 128, cicn),
    ];
    let extraction = extract(&encode(&resources)).unwrap();
    assert_eq!(extraction.icons.len(), 1);
    assert_eq!(extraction.icons[0].ostype, OSType(*b"ICN#"));
    assert_eq!(extraction.warnings.len(), 1);
    let warning = &extraction.warnings[0];
    assert_eq!((warning.ostype, warning.id), (OSType(*b"cicn"), 128));
    assert!(matches!(warning.error, Error::TruncatedResource { .. }));
}

#[test]
fn extract_from_macbinary() {
    let resources = vec![Resource::new(OSType(*b"ics#"), 200, vec![0xFF; 64])
                             .with_name("Small")];
    let fork = encode(&resources);
    let file = macbinary(b"some data fork", &fork);
    let extraction = extract(&file).expect("extract failed");
    assert_eq!(extraction.icons.len(), 1);
    let icon = &extraction.icons[0];
    assert_eq!(icon.name, Some(b"Small".to_vec()));
    assert_eq!(icon.file_name(), "ics#_200_16.png");
    match icon.pixels {
        IconPixels::Mono(MonoIcon { ref mask, .. }) => assert!(mask.is_some()),
        IconPixels::Color(_) => panic!("mono icon decoded as color"),
    }
}

#[test]
fn macbinary_without_resource_fork_is_empty() {
    let file = macbinary(b"only data", b"");
    let extraction = extract(&file).expect("extract failed");
    assert!(extraction.fork.is_empty());
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn encode(resources: &[Resource]) -> Vec<u8> {
    let fork = ResourceFork { resources: resources.to_vec() };
    fork.to_bytes().expect("encode failed")
}

fn round_trip(resources: &[Resource]) -> Vec<Resource> {
    let (fork, warnings) =
        ResourceFork::parse(&encode(resources)).expect("decode failed");
    assert!(warnings.is_empty());
    fork.resources
}

fn macbinary(data_fork: &[u8], rsrc_fork: &[u8]) -> Vec<u8> {
    let mut file = vec![0u8; 128];
    file[1] = 8;
    file[2..10].copy_from_slice(b"Icons.rs");
    BigEndian::write_u32(&mut file[83..87], data_fork.len() as u32);
    BigEndian::write_u32(&mut file[87..91], rsrc_fork.len() as u32);
    for fork in &[data_fork, rsrc_fork] {
        file.extend_from_slice(fork);
        while file.len() % 128 != 0 {
            file.push(0);
        }
    }
    file
}
