//! Synthetic R2000 drawings.
//!
//! [`DwgFixture`] lays out a preamble, header-variable bounds, a classes
//! section, object regions and an object map with valid CRCs, recording
//! where each piece landed so tests can corrupt it.

use dwgcore::io::dwg::constants::{sentinels, CRC_SEED};
use dwgcore::io::dwg::crc::crc8;

use super::bit_writer::BitWriter;

/// Layer handle every fixture entity points at.
pub const LAYER_HANDLE: u64 = 0x10;

/// Byte length of the preamble with three locator records.
pub const PREAMBLE_LENGTH: usize = 70;

/// Byte offset of the first locator record in the preamble.
pub const RECORDS_OFFSET: usize = 0x19;

/// Handle codes used by the fixtures.
pub mod codes {
    pub const HARD_OWNER: u8 = 3;
    pub const SOFT_POINTER: u8 = 4;
    pub const HARD_POINTER: u8 = 5;
    pub const PLUS_ONE: u8 = 6;
    pub const PLUS_OFFSET: u8 = 0xA;
}

// ===========================================================================
// Objects
// ===========================================================================

/// A geometry-bearing object with the R2000 common entity data.
#[derive(Debug, Clone)]
pub struct EntityObject {
    pub type_code: i16,
    pub handle: u64,
    /// 0 stores an owner handle
    pub entity_mode: u8,
    pub owner: u64,
    pub reactors: Vec<u64>,
    pub no_links: bool,
    pub previous: u64,
    pub next: u64,
    pub layer: u64,
    pub color: i16,
    /// (application handle, payload)
    pub eed: Vec<(u64, Vec<u8>)>,
    pub graphics: Option<Vec<u8>>,
    /// Type-specific data stream
    pub data: BitWriter,
    /// Type-specific handle stream
    pub handles: BitWriter,
}

impl EntityObject {
    pub fn new(type_code: i16, handle: u64) -> Self {
        Self {
            type_code,
            handle,
            entity_mode: 2,
            owner: 0,
            reactors: Vec::new(),
            no_links: true,
            previous: 0,
            next: 0,
            layer: LAYER_HANDLE,
            color: 256,
            eed: Vec::new(),
            graphics: None,
            data: BitWriter::new(),
            handles: BitWriter::new(),
        }
    }

    pub fn with_data(mut self, write: impl FnOnce(&mut BitWriter)) -> Self {
        write(&mut self.data);
        self
    }

    pub fn with_handles(mut self, write: impl FnOnce(&mut BitWriter)) -> Self {
        write(&mut self.handles);
        self
    }

    /// Store explicit previous/next entity links.
    pub fn linked(mut self, previous: u64, next: u64) -> Self {
        self.no_links = false;
        self.previous = previous;
        self.next = next;
        self
    }

    /// Object body: type, common data, specific data, handle stream.
    pub fn body(&self) -> Vec<u8> {
        let mut rest = BitWriter::new();
        rest.write_handle(0, self.handle);
        for (app, payload) in &self.eed {
            rest.write_bit_short(payload.len() as i16);
            rest.write_handle(codes::HARD_POINTER, *app);
            rest.write_bytes(payload);
        }
        rest.write_bit_short(0);
        match &self.graphics {
            Some(graphics) => {
                rest.write_bit(true);
                rest.write_raw_long(graphics.len() as i32);
                rest.write_bytes(graphics);
            }
            None => rest.write_bit(false),
        }
        rest.write_bits(self.entity_mode as u64, 2);
        rest.write_bit_long(self.reactors.len() as i32);
        rest.write_bit(self.no_links);
        rest.write_bit_short(self.color);
        // Linetype scale
        rest.write_bit_double(1.0);
        // Linetype and plotstyle by layer
        rest.write_bits(0, 2);
        rest.write_bits(0, 2);
        // Invisibility
        rest.write_bit_short(0);
        // Lineweight
        rest.write_byte(29);
        rest.append(&self.data);

        let mut body = BitWriter::new();
        body.write_bit_short(self.type_code);
        let size_in_bits = body.bit_len() + 32 + rest.bit_len();
        body.write_raw_long(size_in_bits as i32);
        body.append(&rest);

        if self.entity_mode == 0 {
            body.write_handle(codes::SOFT_POINTER, self.owner);
        }
        for reactor in &self.reactors {
            body.write_handle(codes::SOFT_POINTER, *reactor);
        }
        // No extension dictionary
        body.write_handle(codes::HARD_OWNER, 0);
        if !self.no_links {
            body.write_handle(codes::SOFT_POINTER, self.previous);
            body.write_handle(codes::SOFT_POINTER, self.next);
        }
        body.write_handle(codes::HARD_POINTER, self.layer);
        body.append(&self.handles);

        body.into_bytes()
    }
}

/// Non-entity object: only the type code and some filler.
pub fn raw_object_body(type_code: i16, filler: &[u8]) -> Vec<u8> {
    let mut body = BitWriter::new();
    body.write_bit_short(type_code);
    body.write_bytes(filler);
    body.into_bytes()
}

/// MS size, body and little-endian CRC.
pub fn object_region(body: &[u8]) -> Vec<u8> {
    let mut region = BitWriter::new();
    region.write_modular_short(body.len() as u32);
    region.write_bytes(body);
    let mut bytes = region.into_bytes();
    let crc = crc8(CRC_SEED, &bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes
}

// ===========================================================================
// Classes
// ===========================================================================

/// One entry of the classes section.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub class_number: i16,
    pub app_name: String,
    pub cpp_class_name: String,
    pub dxf_name: String,
    pub item_class_id: i16,
}

impl ClassDef {
    pub fn new(class_number: i16, cpp_class_name: &str, dxf_name: &str) -> Self {
        Self {
            class_number,
            app_name: "ObjectDBX Classes".to_string(),
            cpp_class_name: cpp_class_name.to_string(),
            dxf_name: dxf_name.to_string(),
            item_class_id: 0x1F3,
        }
    }
}

/// Complete classes section, sentinel to sentinel.
pub fn classes_section(classes: &[ClassDef]) -> Vec<u8> {
    let mut data = BitWriter::new();
    for class in classes {
        data.write_bit_short(class.class_number);
        data.write_bit_short(0);
        data.write_variable_text(class.app_name.as_bytes());
        data.write_variable_text(class.cpp_class_name.as_bytes());
        data.write_variable_text(class.dxf_name.as_bytes());
        data.write_bit(false);
        data.write_bit_short(class.item_class_id);
    }
    let data = data.into_bytes();

    let mut section = sentinels::CLASSES_START.to_vec();
    section.extend_from_slice(&(data.len() as i32).to_le_bytes());
    section.extend_from_slice(&data);
    let crc = crc8(CRC_SEED, &section[16..]);
    section.extend_from_slice(&crc.to_le_bytes());
    section.extend_from_slice(&sentinels::CLASSES_END);
    section
}

// ===========================================================================
// Object map
// ===========================================================================

/// Object map with `(handle, offset)` entries split into subsections of at
/// most `per_subsection` entries. Handles are written as-is; offset deltas
/// restart in every subsection.
pub fn object_map_section(entries: &[(u64, u64)], per_subsection: usize) -> Vec<u8> {
    let mut section = Vec::new();
    for chunk in entries.chunks(per_subsection.max(1)) {
        let mut pairs = BitWriter::new();
        let mut last_offset = 0i64;
        for &(handle, offset) in chunk {
            pairs.write_modular_char(handle);
            pairs.write_signed_modular_char(offset as i64 - last_offset);
            last_offset = offset as i64;
        }
        let pairs = pairs.into_bytes();

        let size = (pairs.len() + 2) as u16;
        let mut subsection = size.to_be_bytes().to_vec();
        subsection.extend_from_slice(&pairs);
        let crc = crc8(CRC_SEED, &subsection);
        subsection.extend_from_slice(&crc.to_be_bytes());
        section.extend_from_slice(&subsection);
    }

    let terminator = 2u16.to_be_bytes();
    section.extend_from_slice(&terminator);
    section.extend_from_slice(&crc8(CRC_SEED, &terminator).to_be_bytes());
    section
}

// ===========================================================================
// Whole drawing
// ===========================================================================

/// Builder for a complete drawing.
#[derive(Debug, Clone)]
pub struct DwgFixture {
    pub code_page: u16,
    pub classes: Vec<ClassDef>,
    /// (handle, object body) in file order
    pub objects: Vec<(u64, Vec<u8>)>,
    pub per_subsection: usize,
}

/// A built drawing and the location of its parts.
#[derive(Debug, Clone)]
pub struct BuiltDwg {
    pub bytes: Vec<u8>,
    pub header_offset: usize,
    pub header_size: usize,
    pub classes_offset: usize,
    pub classes_size: usize,
    pub object_map_offset: usize,
    pub object_map_size: usize,
    /// (handle, file offset) in file order
    pub object_offsets: Vec<(u64, u64)>,
}

impl BuiltDwg {
    pub fn offset_of(&self, handle: u64) -> u64 {
        self.object_offsets
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, o)| *o)
            .unwrap_or_else(|| panic!("no object with handle {handle:#X}"))
    }

    /// The same drawing with its object map replaced by `entries`.
    pub fn with_object_map(&self, entries: &[(u64, u64)]) -> Vec<u8> {
        let map = object_map_section(entries, usize::MAX);
        let mut bytes = self.bytes[..self.object_map_offset].to_vec();
        bytes.extend_from_slice(&map);

        // Record 2: number RC, seeker RL, size RL
        let size_at = RECORDS_OFFSET + 2 * 9 + 5;
        bytes[size_at..size_at + 4].copy_from_slice(&(map.len() as u32).to_le_bytes());
        let crc_at = RECORDS_OFFSET + 3 * 9;
        let crc = crc8(CRC_SEED, &bytes[..crc_at]);
        bytes[crc_at..crc_at + 2].copy_from_slice(&crc.to_le_bytes());
        bytes
    }
}

impl Default for DwgFixture {
    fn default() -> Self {
        Self {
            code_page: 0x1E,
            classes: Vec::new(),
            objects: Vec::new(),
            per_subsection: usize::MAX,
        }
    }
}

impl DwgFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: ClassDef) -> Self {
        self.classes.push(class);
        self
    }

    pub fn entity(mut self, entity: EntityObject) -> Self {
        self.objects.push((entity.handle, entity.body()));
        self
    }

    pub fn raw(mut self, handle: u64, body: Vec<u8>) -> Self {
        self.objects.push((handle, body));
        self
    }

    pub fn subsections_of(mut self, per_subsection: usize) -> Self {
        self.per_subsection = per_subsection;
        self
    }

    pub fn build(&self) -> BuiltDwg {
        let header_offset = PREAMBLE_LENGTH;
        let mut header = sentinels::HEADER_START.to_vec();
        header.extend_from_slice(&4u32.to_le_bytes());
        header.extend_from_slice(&[0u8; 4]);
        header.extend_from_slice(&sentinels::HEADER_END);

        let classes_offset = header_offset + header.len();
        let classes = classes_section(&self.classes);

        let mut objects = Vec::new();
        let mut object_offsets = Vec::new();
        let objects_offset = classes_offset + classes.len();
        for (handle, body) in &self.objects {
            object_offsets.push((*handle, (objects_offset + objects.len()) as u64));
            objects.extend_from_slice(&object_region(body));
        }

        let mut map_entries = object_offsets.clone();
        map_entries.sort_by_key(|(handle, _)| *handle);
        let object_map_offset = objects_offset + objects.len();
        let object_map = object_map_section(&map_entries, self.per_subsection);

        let mut bytes = b"AC1015".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0x0F, 0x01]);
        // Preview address
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&[0x1F, 0x00]);
        bytes.extend_from_slice(&self.code_page.to_le_bytes());
        bytes.extend_from_slice(&3i32.to_le_bytes());
        for (number, seeker, size) in [
            (0u8, header_offset, header.len()),
            (1, classes_offset, classes.len()),
            (2, object_map_offset, object_map.len()),
        ] {
            bytes.push(number);
            bytes.extend_from_slice(&(seeker as u32).to_le_bytes());
            bytes.extend_from_slice(&(size as u32).to_le_bytes());
        }
        let crc = crc8(CRC_SEED, &bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&sentinels::FILE_HEADER_END);
        assert_eq!(bytes.len(), PREAMBLE_LENGTH);

        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&classes);
        bytes.extend_from_slice(&objects);
        bytes.extend_from_slice(&object_map);

        BuiltDwg {
            bytes,
            header_offset,
            header_size: header.len(),
            classes_offset,
            classes_size: classes.len(),
            object_map_offset,
            object_map_size: object_map.len(),
            object_offsets,
        }
    }
}
