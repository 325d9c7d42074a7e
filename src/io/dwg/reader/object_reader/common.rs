//! Common entity data shared by every entity type.

use std::io::{Read, Seek};

use crate::error::{DwgError, Result};
use crate::notification::NotificationType;
use crate::types::Handle;

use super::{DwgObjectReader, StreamSet};

/// Fields that precede the type-specific data of every entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonEntityHeader {
    /// Object size in bytes, from the modular-short prefix
    pub length: u32,
    pub object_type: i16,
    /// Size of the data stream in bits; the handle stream follows it
    pub size_in_bits: u32,
    pub handle: Handle,
    /// Total bytes of extended entity data (skipped)
    pub extended_data_size: u64,
    /// Whether proxy graphics were present (skipped)
    pub has_graphics: bool,
    /// 0 = owner handle stored, 1 = paper space, 2 = model space
    pub entity_mode: u8,
    pub reactor_count: u32,
    /// Set when previous/next entity links are implicit
    pub no_links: bool,
    pub color_index: i16,
    pub linetype_scale: f64,
    /// 0 = bylayer, 1 = byblock, 2 = continuous, 3 = handle stored
    pub linetype_flags: u8,
    /// 0 = bylayer, 1 = byblock, 2 = continuous, 3 = handle stored
    pub plotstyle_flags: u8,
    pub invisibility: i16,
    pub line_weight: u8,
}

impl CommonEntityHeader {
    pub fn is_invisible(&self) -> bool {
        self.invisibility & 1 != 0
    }
}

/// Handle-stream references every entity carries, resolved to absolute
/// handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityReferences {
    /// Owner block, present when the entity mode is 0
    pub owner: Option<Handle>,
    pub reactors: Vec<Handle>,
    pub xdictionary: Handle,
    /// Previous/next entity links, present unless `no_links` is set
    pub previous_entity: Option<Handle>,
    pub next_entity: Option<Handle>,
    pub layer: Handle,
    pub linetype: Option<Handle>,
    pub plotstyle: Option<Handle>,
}

impl<'a, R: Read + Seek> DwgObjectReader<'a, R> {
    /// Read the common entity data (R2000 layout).
    ///
    /// Data stream fields are read in file order; handles are taken from the
    /// handle stream as the data fields announce them.
    pub(super) fn read_common_entity_data(
        &mut self,
        streams: &mut StreamSet,
    ) -> Result<(CommonEntityHeader, EntityReferences)> {
        let mut header = CommonEntityHeader {
            length: streams.object_size,
            ..Default::default()
        };
        let mut refs = EntityReferences::default();

        // RL: size of object data in bits, locates the handle stream.
        self.update_handle_reader(streams, &mut header)?;

        // Handle (H).
        header.handle = streams.object_reader.read_handle()?;
        let owner = header.handle;

        // EED (extended entity data).
        header.extended_data_size = self.read_extended_data(streams)?;

        // Graphic present flag (B).
        header.has_graphics = streams.object_reader.read_bit()?;
        if header.has_graphics {
            // RL: graphics size.
            let gfx_size = streams.object_reader.read_raw_long()?;
            let gfx_size = u64::try_from(gfx_size).map_err(|_| {
                DwgError::InvalidFormat(format!("negative graphics size {gfx_size}"))
            })?;
            streams.object_reader.advance_bytes(gfx_size)?;
            self.notifications.notify_at(
                NotificationType::NotImplemented,
                streams.offset,
                format!("proxy graphics of {gfx_size} bytes skipped"),
            );
        }

        // Entity mode (BB).
        header.entity_mode = streams.object_reader.read_2bits()?;
        // When entity_mode == 0, the owner handle is present (soft pointer).
        if header.entity_mode == 0 {
            refs.owner = Some(streams.handles_reader.read_handle_resolved(owner)?);
        }

        // BL: number of reactors.
        let num_reactors = streams.object_reader.read_bit_long()?;
        let num_reactors = u32::try_from(num_reactors).map_err(|_| {
            DwgError::InvalidFormat(format!("negative reactor count {num_reactors}"))
        })?;
        // Every handle takes at least one byte of the handle stream.
        if u64::from(num_reactors) * 8 > streams.handles_reader.remaining_bits() {
            return Err(DwgError::InvalidFormat(format!(
                "reactor count {num_reactors} exceeds the handle stream"
            )));
        }
        header.reactor_count = num_reactors;

        // Reactor handles.
        refs.reactors = (0..num_reactors)
            .map(|_| streams.handles_reader.read_handle_resolved(owner))
            .collect::<Result<Vec<_>>>()?;

        // XDictionary handle.
        refs.xdictionary = streams.handles_reader.read_handle_resolved(owner)?;

        // R13-R2000: prev/next entity handles (linked list).
        header.no_links = streams.object_reader.read_bit()?;
        if !header.no_links {
            refs.previous_entity = Some(streams.handles_reader.read_handle_resolved(owner)?);
            refs.next_entity = Some(streams.handles_reader.read_handle_resolved(owner)?);
        }

        // Color (BS): index only before R2004.
        header.color_index = streams.object_reader.read_bit_short()?;

        // Linetype scale (BD).
        header.linetype_scale = streams.object_reader.read_bit_double()?;

        // Layer handle (H).
        refs.layer = streams.handles_reader.read_handle_resolved(owner)?;

        // Linetype flags (BB): 00=bylayer, 01=byblock, 10=continuous, 11=handle.
        header.linetype_flags = streams.object_reader.read_2bits()?;
        if header.linetype_flags == 3 {
            refs.linetype = Some(streams.handles_reader.read_handle_resolved(owner)?);
        }

        // Plotstyle flags (BB).
        header.plotstyle_flags = streams.object_reader.read_2bits()?;
        if header.plotstyle_flags == 3 {
            refs.plotstyle = Some(streams.handles_reader.read_handle_resolved(owner)?);
        }

        // Invisibility (BS).
        header.invisibility = streams.object_reader.read_bit_short()?;

        // Lineweight (RC).
        header.line_weight = streams.object_reader.read_raw_char()?;

        Ok((header, refs))
    }

    /// Read the RL object size in bits and move the handle cursor to the
    /// end of the data stream.
    fn update_handle_reader(
        &mut self,
        streams: &mut StreamSet,
        header: &mut CommonEntityHeader,
    ) -> Result<()> {
        let size_in_bits = streams.object_reader.read_raw_long()?;
        let size_in_bits = u32::try_from(size_in_bits).map_err(|_| {
            DwgError::InvalidFormat(format!("negative object bit size {size_in_bits}"))
        })?;
        if u64::from(size_in_bits) > u64::from(streams.object_size) * 8 {
            return Err(DwgError::InvalidFormat(format!(
                "object bit size {size_in_bits} exceeds object size {} bytes",
                streams.object_size
            )));
        }
        header.size_in_bits = size_in_bits;
        streams
            .handles_reader
            .set_position_in_bits(streams.object_initial_pos + u64::from(size_in_bits))
    }

    /// Skip the extended entity data, returning the number of payload bytes.
    fn read_extended_data(&mut self, streams: &mut StreamSet) -> Result<u64> {
        let mut total = 0u64;

        loop {
            // BS: size of next app group (0 = end of EED).
            let size = streams.object_reader.read_bit_short()?;
            if size <= 0 {
                break;
            }

            // H: APPID handle.
            let app_handle = streams.object_reader.read_handle()?;

            // The data itself is not interpreted.
            streams.object_reader.advance_bytes(size as u64)?;
            total += size as u64;
            self.notifications.notify_at(
                NotificationType::NotImplemented,
                streams.offset,
                format!("{size} bytes of extended data for application {app_handle} skipped"),
            );
        }

        Ok(total)
    }
}
