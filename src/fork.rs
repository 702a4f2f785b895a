use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use super::error::{slice_at, DecodeWarning, Error, Result};
use super::ostype::OSType;
use super::resource::{Resource, MAX_DATA_LENGTH};

/// The length of the fork header (and of its copy in the map), in bytes:
const FORK_HEADER_LENGTH: usize = 16;

/// The length of the resource map header, in bytes:
const MAP_HEADER_LENGTH: usize = 28;

/// The length of one type record in the type list, in bytes:
const TYPE_RECORD_LENGTH: usize = 8;

/// The length of one entry in a reference list, in bytes:
const REFERENCE_LENGTH: usize = 12;

/// Where the encoder places the data area:
const DATA_AREA_OFFSET: usize = 256;

/// Marks an absent type list or an unnamed resource:
const NO_OFFSET: u16 = 0xFFFF;

/// The most resources a single type can hold (the count is stored minus 1):
const MAX_RESOURCES_PER_TYPE: usize = 0x1_0000;

/// The most types a fork can hold (the count is stored minus 1, signed):
const MAX_TYPES: usize = 0x8000;

/// A set of resources stored in a single resource fork.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceFork {
    /// The resources in the fork.  After decoding these are in on-disk
    /// order: grouped by type in type-list order, then in reference-list
    /// order within each type.
    pub resources: Vec<Resource>,
}

impl ResourceFork {
    /// Creates a new, empty resource fork.
    pub fn new() -> ResourceFork {
        ResourceFork { resources: Vec::new() }
    }

    /// Returns true if the fork contains no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns each distinct resource type in the fork, in the order in
    /// which the type first appears.
    pub fn types(&self) -> Vec<OSType> {
        let mut types: Vec<OSType> = Vec::new();
        for resource in &self.resources {
            if !types.contains(&resource.ostype) {
                types.push(resource.ostype);
            }
        }
        types
    }

    /// Returns the resources of the given type, in fork order.
    pub fn resources_of_type(&self,
                             ostype: OSType)
                             -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |res| res.ostype == ostype)
    }

    /// Finds the resource with the given type and ID.
    pub fn get(&self, ostype: OSType, id: i16) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|res| res.ostype == ostype && res.id == id)
    }

    /// Reads a resource fork from a reader, consuming it to the end.  See
    /// [`parse`](#method.parse).
    pub fn read<R: Read>(mut reader: R)
                         -> Result<(ResourceFork, Vec<DecodeWarning>)> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        ResourceFork::parse(&data)
    }

    /// Decodes a raw resource fork.
    ///
    /// Fails with `Error::MalformedContainer` if the header or the map is
    /// inconsistent with the buffer, or if reference lists or resource data
    /// overlap, in which case no resources are returned.  Resources whose
    /// name or data lie outside their areas are skipped and reported in the
    /// returned warning list instead.
    pub fn parse(data: &[u8]) -> Result<(ResourceFork, Vec<DecodeWarning>)> {
        if data.len() < FORK_HEADER_LENGTH {
            return Err(Error::MalformedContainer(format!(
                "fork is only {} bytes long",
                data.len())));
        }
        let data_offset = u64::from(BigEndian::read_u32(&data[0..]));
        let map_offset = u64::from(BigEndian::read_u32(&data[4..]));
        let data_length = u64::from(BigEndian::read_u32(&data[8..]));
        let map_length = u64::from(BigEndian::read_u32(&data[12..]));
        let total = data.len() as u64;
        if map_offset + map_length > total {
            return Err(Error::MalformedContainer(format!(
                "map ({} bytes at {:#x}) extends past end of fork ({} bytes)",
                map_length, map_offset, total)));
        }
        if data_offset + data_length > total {
            return Err(Error::MalformedContainer(format!(
                "data area ({} bytes at {:#x}) extends past end of fork \
                 ({} bytes)",
                data_length, data_offset, total)));
        }
        let data_area =
            &data[data_offset as usize..(data_offset + data_length) as usize];
        let map = &data[map_offset as usize..(map_offset + map_length) as usize];
        if map.len() < MAP_HEADER_LENGTH {
            return Err(Error::MalformedContainer(format!(
                "map is only {} bytes long",
                map.len())));
        }

        let mut fork = ResourceFork::new();
        let mut warnings = Vec::new();
        let type_list_offset = BigEndian::read_u16(&map[24..]);
        let name_list_offset = BigEndian::read_u16(&map[26..]) as usize;
        if type_list_offset == NO_OFFSET {
            log::debug!("fork has no type list");
            return Ok((fork, warnings));
        }
        let type_list = map.get(type_list_offset as usize..).ok_or_else(|| {
            Error::MalformedContainer(format!(
                "type list offset {:#x} is outside the map",
                type_list_offset))
        })?;
        let name_list = map.get(name_list_offset..).unwrap_or(&[]);

        let count = BigEndian::read_i16(map_slice(type_list, 0, 2)?);
        let num_types = (i32::from(count) + 1).max(0) as usize;
        log::debug!("decoding {} resource type(s)", num_types);
        // Reference lists may not share entries, and resources may not share
        // data, so the decoded fork is never larger than the input.
        let max_references = (map.len() - MAP_HEADER_LENGTH) / REFERENCE_LENGTH;
        let mut num_references = 0;
        let mut decoded_bytes = 0;
        for type_index in 0..num_types {
            let record = map_slice(type_list,
                                   2 + type_index * TYPE_RECORD_LENGTH,
                                   TYPE_RECORD_LENGTH)?;
            let ostype = OSType::from_padded(&record[0..4]);
            let num_resources = BigEndian::read_u16(&record[4..]) as usize + 1;
            let ref_list_offset = BigEndian::read_u16(&record[6..]) as usize;
            num_references += num_resources;
            if num_references > max_references {
                return Err(Error::MalformedContainer(format!(
                    "type list claims more than {} references, which is \
                     all a {} byte map can hold",
                    max_references, map.len())));
            }
            for index in 0..num_resources {
                let entry = map_slice(type_list,
                                      ref_list_offset + index * REFERENCE_LENGTH,
                                      REFERENCE_LENGTH)?;
                let id = BigEndian::read_i16(&entry[0..]);
                match read_resource(ostype, entry, name_list, data_area) {
                    Ok(resource) => {
                        decoded_bytes += resource.total_length();
                        if decoded_bytes > data_area.len() {
                            return Err(Error::MalformedContainer(format!(
                                "'{}' {} overlaps data already claimed by \
                                 another resource",
                                ostype, id)));
                        }
                        log::trace!("'{}' {}: {} bytes",
                                    ostype,
                                    id,
                                    resource.data.len());
                        fork.resources.push(resource);
                    }
                    Err(error) => {
                        warnings.push(DecodeWarning::new(ostype, id, error));
                    }
                }
            }
        }
        Ok((fork, warnings))
    }

    /// Encodes the fork into a byte buffer.
    ///
    /// Resources are stored grouped by type in ascending type order, and by
    /// ascending ID within each type, regardless of the order of
    /// `self.resources`.  Identical names are stored once.  Fails with
    /// `Error::InvalidManifest` if a type/ID pair is duplicated or the fork
    /// exceeds any of the format's offset or count limits.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut by_type: BTreeMap<OSType, Vec<&Resource>> = BTreeMap::new();
        for resource in &self.resources {
            by_type.entry(resource.ostype).or_default().push(resource);
        }
        if by_type.len() > MAX_TYPES {
            return Err(Error::InvalidManifest(format!(
                "too many resource types ({})",
                by_type.len())));
        }
        for (ostype, list) in by_type.iter_mut() {
            list.sort_by_key(|res| res.id);
            if let Some(pair) = list.windows(2).find(|p| p[0].id == p[1].id) {
                return Err(Error::InvalidManifest(format!(
                    "duplicate resource '{}' {}",
                    ostype, pair[0].id)));
            }
            if list.len() > MAX_RESOURCES_PER_TYPE {
                return Err(Error::InvalidManifest(format!(
                    "too many '{}' resources ({})",
                    ostype, list.len())));
            }
        }

        let data_length: usize =
            self.resources.iter().map(Resource::total_length).sum();
        let mut data_area: Vec<u8> = Vec::with_capacity(data_length);
        let mut name_list: Vec<u8> = Vec::new();
        let mut name_offsets: HashMap<&[u8], u16> = HashMap::new();
        let mut reference_lists = Vec::with_capacity(by_type.len());
        for (&ostype, list) in &by_type {
            let mut refs = Vec::with_capacity(list.len() * REFERENCE_LENGTH);
            for resource in list {
                let data_offset = data_area.len();
                if data_offset > MAX_DATA_LENGTH {
                    return Err(Error::InvalidManifest(format!(
                        "data offset of '{}' {} ({:#x}) does not fit in \
                         24 bits",
                        ostype, resource.id, data_offset)));
                }
                let data_length = u32::try_from(resource.data.len())
                    .map_err(|_| {
                        Error::InvalidManifest(format!(
                            "'{}' {} is too large",
                            ostype, resource.id))
                    })?;
                data_area.write_u32::<BigEndian>(data_length)?;
                data_area.extend_from_slice(&resource.data);

                let name_offset = match resource.stored_name() {
                    None => NO_OFFSET,
                    Some(name) => match name_offsets.get(name) {
                        Some(&offset) => offset,
                        None => {
                            let offset = u16::try_from(name_list.len())
                                .ok()
                                .filter(|&offset| offset != NO_OFFSET)
                                .ok_or_else(|| {
                                    Error::InvalidManifest(
                                        "name list exceeds 64 KiB".to_string())
                                })?;
                            name_list.push(name.len() as u8);
                            name_list.extend_from_slice(name);
                            name_offsets.insert(name, offset);
                            offset
                        }
                    },
                };

                refs.write_i16::<BigEndian>(resource.id)?;
                refs.write_u16::<BigEndian>(name_offset)?;
                refs.write_u8(resource.attributes)?;
                refs.write_u24::<BigEndian>(data_offset as u32)?;
                refs.write_u32::<BigEndian>(0)?;
            }
            reference_lists.push((ostype, list.len(), refs));
        }

        let mut type_list: Vec<u8> = Vec::new();
        type_list.write_i16::<BigEndian>((by_type.len() as i32 - 1) as i16)?;
        let mut ref_list_offset = 2 + TYPE_RECORD_LENGTH * reference_lists.len();
        for (ostype, count, refs) in &reference_lists {
            let offset = u16::try_from(ref_list_offset).map_err(|_| {
                Error::InvalidManifest("type list exceeds 64 KiB".to_string())
            })?;
            type_list.write_all(ostype.as_bytes())?;
            type_list.write_u16::<BigEndian>((count - 1) as u16)?;
            type_list.write_u16::<BigEndian>(offset)?;
            ref_list_offset += refs.len();
        }
        for (_, _, refs) in &reference_lists {
            type_list.extend_from_slice(refs);
        }

        let name_list_offset = u16::try_from(MAP_HEADER_LENGTH + type_list.len())
            .map_err(|_| {
                Error::InvalidManifest("resource map exceeds 64 KiB"
                    .to_string())
            })?;
        let map_length = MAP_HEADER_LENGTH + type_list.len() + name_list.len();
        let map_offset = DATA_AREA_OFFSET + data_area.len();
        let fields = [DATA_AREA_OFFSET, map_offset, data_area.len(), map_length];
        let mut header = Vec::with_capacity(FORK_HEADER_LENGTH);
        for &field in &fields {
            let field = u32::try_from(field).map_err(|_| {
                Error::InvalidManifest("fork exceeds 4 GiB".to_string())
            })?;
            header.write_u32::<BigEndian>(field)?;
        }
        log::debug!("encoding {} resource(s) of {} type(s): {} data bytes, \
                     {} map bytes",
                    self.resources.len(),
                    by_type.len(),
                    data_area.len(),
                    map_length);

        let mut output = Vec::with_capacity(map_offset + map_length);
        output.extend_from_slice(&header);
        output.resize(DATA_AREA_OFFSET, 0);
        output.extend_from_slice(&data_area);
        output.extend_from_slice(&header);
        output.write_u32::<BigEndian>(0)?; // next map handle
        output.write_u16::<BigEndian>(0)?; // file reference number
        output.write_u16::<BigEndian>(0)?; // map attributes
        output.write_u16::<BigEndian>(MAP_HEADER_LENGTH as u16)?;
        output.write_u16::<BigEndian>(name_list_offset)?;
        output.extend_from_slice(&type_list);
        output.extend_from_slice(&name_list);
        Ok(output)
    }

    /// Writes the encoded fork.  Nothing is written if encoding fails.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

/// Slices part of the resource map; running off the end of the map makes
/// the whole fork unreadable.
fn map_slice(area: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    slice_at(area, offset, len).map_err(|_| {
        Error::MalformedContainer(format!(
            "{} byte map entry at {:#x} runs past end of map",
            len, offset))
    })
}

/// Resolves one reference-list entry into a resource.
fn read_resource(ostype: OSType,
                 entry: &[u8],
                 name_list: &[u8],
                 data_area: &[u8])
                 -> Result<Resource> {
    let id = BigEndian::read_i16(&entry[0..]);
    let name_offset = BigEndian::read_u16(&entry[2..]);
    let attributes = entry[4];
    let data_offset = BigEndian::read_u24(&entry[5..]) as usize;
    let name = if name_offset == NO_OFFSET {
        None
    } else {
        let name_offset = name_offset as usize;
        let length = slice_at(name_list, name_offset, 1)?[0] as usize;
        Some(slice_at(name_list, name_offset + 1, length)?.to_vec())
    };
    let length = BigEndian::read_u32(slice_at(data_area, data_offset, 4)?);
    let data = slice_at(data_area, data_offset + 4, length as usize)?;
    Ok(Resource {
        ostype,
        id,
        name,
        attributes,
        data: data.to_vec(),
    })
}
