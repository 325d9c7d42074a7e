//! Bit-level reader for the R2000 DWG encodings.
//!
//! Every section and object body is decoded from an owned byte region with
//! a running cursor measured in bits. Bits are consumed most significant
//! first. All reads are checked against the region length: a read that
//! would run past the end fails with [`DwgError::Overrun`] and leaves the
//! cursor where it was.
//!
//! | Code | Method | Encoding |
//! |------|--------|----------|
//! | B  | [`read_bit`](DwgBitReader::read_bit) | 1 bit |
//! | BB | [`read_2bits`](DwgBitReader::read_2bits) | 2 bits |
//! | BS | [`read_bit_short`](DwgBitReader::read_bit_short) | 2-bit prefix + 0/1/2 bytes |
//! | BL | [`read_bit_long`](DwgBitReader::read_bit_long) | 2-bit prefix + 0/1/4 bytes |
//! | BD | [`read_bit_double`](DwgBitReader::read_bit_double) | 2-bit prefix + 0/8 bytes |
//! | DD | [`read_bit_double_with_default`](DwgBitReader::read_bit_double_with_default) | 2-bit prefix + 0/4/6/8 bytes patched into a default |
//! | RC/RS/RL/RD | `read_raw_*` | fixed width, little-endian |
//! | MC | [`read_modular_char`](DwgBitReader::read_modular_char) | 7 bits per byte, high bit continues |
//! | MS | [`read_modular_short`](DwgBitReader::read_modular_short) | 15 bits per LE byte pair |
//! | H  | [`read_handle_reference`](DwgBitReader::read_handle_reference) | code/counter byte + big-endian bytes |
//! | TV | [`read_variable_text`](DwgBitReader::read_variable_text) | BS length + code-page bytes |
//! | BE | [`read_bit_extrusion`](DwgBitReader::read_bit_extrusion) | bit set = unit Z, else 3BD |
//! | BT | [`read_bit_thickness`](DwgBitReader::read_bit_thickness) | bit set = 0.0, else BD |

use encoding_rs::Encoding;

use crate::error::{DwgError, Result};
use crate::io::dwg::reference_type::{DwgReferenceType, HandleReference};
use crate::types::{Handle, Vector2, Vector3};

/// Bounds-checked bit cursor over an owned byte region.
#[derive(Debug, Clone)]
pub struct DwgBitReader {
    data: Vec<u8>,
    /// Cursor in bits from the start of `data`.
    position: u64,
    encoding: &'static Encoding,
}

impl DwgBitReader {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            encoding: encoding_rs::WINDOWS_1252,
        }
    }

    /// Create a reader that decodes text with the given encoding.
    pub fn with_encoding(data: Vec<u8>, encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            ..Self::new(data)
        }
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// The underlying region.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Region length in bits.
    pub fn length_in_bits(&self) -> u64 {
        (self.data.len() as u64) << 3
    }

    pub fn position_in_bits(&self) -> u64 {
        self.position
    }

    /// Byte index of the cursor (a partially consumed byte is not counted).
    pub fn position(&self) -> u64 {
        self.position >> 3
    }

    pub fn remaining_bits(&self) -> u64 {
        self.length_in_bits().saturating_sub(self.position)
    }

    /// Move the cursor. Positions past the end of the region are rejected.
    pub fn set_position_in_bits(&mut self, position: u64) -> Result<()> {
        if position > self.length_in_bits() {
            return Err(DwgError::Overrun {
                position,
                requested: 0,
                length: self.length_in_bits(),
            });
        }
        self.position = position;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn ensure(&self, bits: u64) -> Result<()> {
        if bits > self.remaining_bits() {
            return Err(DwgError::Overrun {
                position: self.position,
                requested: bits,
                length: self.length_in_bits(),
            });
        }
        Ok(())
    }

    /// Run a multi-part read, restoring the cursor if any part fails.
    fn atomic<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.position;
        let result = read(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn bit_at(&self, position: u64) -> bool {
        let byte = self.data[(position >> 3) as usize];
        (byte >> (7 - (position & 7))) & 1 == 1
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N as u64 * 8)?;
        let mut arr = [0u8; N];
        for b in arr.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(arr)
    }

    // ---------------------------------------------------------------
    // Bits
    // ---------------------------------------------------------------

    /// B: a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure(1)?;
        let value = self.bit_at(self.position);
        self.position += 1;
        Ok(value)
    }

    /// BB: two bits, first bit most significant.
    pub fn read_2bits(&mut self) -> Result<u8> {
        self.ensure(2)?;
        let hi = self.bit_at(self.position) as u8;
        let lo = self.bit_at(self.position + 1) as u8;
        self.position += 2;
        Ok((hi << 1) | lo)
    }

    // ---------------------------------------------------------------
    // Raw values
    // ---------------------------------------------------------------

    /// One byte at the current (possibly unaligned) bit position.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure(8)?;
        let index = (self.position >> 3) as usize;
        let shift = (self.position & 7) as u32;
        let value = if shift == 0 {
            self.data[index]
        } else {
            (self.data[index] << shift) | (self.data[index + 1] >> (8 - shift))
        };
        self.position += 8;
        Ok(value)
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>> {
        self.ensure((length as u64).saturating_mul(8))?;
        let mut arr = Vec::with_capacity(length);
        for _ in 0..length {
            arr.push(self.read_byte()?);
        }
        Ok(arr)
    }

    /// Skip `length` bytes without decoding them.
    pub fn advance_bytes(&mut self, length: u64) -> Result<()> {
        let bits = length.checked_mul(8).ok_or_else(|| DwgError::Overrun {
            position: self.position,
            requested: u64::MAX,
            length: self.length_in_bits(),
        })?;
        self.ensure(bits)?;
        self.position += bits;
        Ok(())
    }

    /// RC
    pub fn read_raw_char(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// RS
    pub fn read_raw_short(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array::<2>()?))
    }

    /// RS, unsigned
    pub fn read_raw_ushort(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    /// RL
    pub fn read_raw_long(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    /// RD
    pub fn read_raw_double(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array::<8>()?))
    }

    /// 2RD
    pub fn read_2raw_double(&mut self) -> Result<Vector2> {
        self.atomic(|r| {
            let x = r.read_raw_double()?;
            let y = r.read_raw_double()?;
            Ok(Vector2::new(x, y))
        })
    }

    /// 3RD
    pub fn read_3raw_double(&mut self) -> Result<Vector3> {
        self.atomic(|r| {
            let x = r.read_raw_double()?;
            let y = r.read_raw_double()?;
            let z = r.read_raw_double()?;
            Ok(Vector3::new(x, y, z))
        })
    }

    // ---------------------------------------------------------------
    // Compressed values
    // ---------------------------------------------------------------

    /// BS: bit short.
    pub fn read_bit_short(&mut self) -> Result<i16> {
        self.atomic(|r| match r.read_2bits()? {
            // 00: A short (2 bytes) follows, little-endian order (LSB first)
            0 => r.read_raw_short(),
            // 01: An unsigned char (1 byte) follows
            1 => Ok(r.read_byte()? as i16),
            // 10: 0
            2 => Ok(0),
            // 11: 256
            _ => Ok(256),
        })
    }

    /// BL: bit long.
    pub fn read_bit_long(&mut self) -> Result<i32> {
        self.atomic(|r| match r.read_2bits()? {
            // 00: A long (4 bytes) follows, little-endian order
            0 => r.read_raw_long(),
            // 01: An unsigned char (1 byte) follows
            1 => Ok(r.read_byte()? as i32),
            // 10: 0
            2 => Ok(0),
            // 11: not used
            _ => Err(DwgError::InvalidFormat("BitLong uses reserved prefix 11".into())),
        })
    }

    /// BD: bit double.
    pub fn read_bit_double(&mut self) -> Result<f64> {
        self.atomic(|r| match r.read_2bits()? {
            0 => r.read_raw_double(),
            1 => Ok(1.0),
            2 => Ok(0.0),
            _ => Err(DwgError::InvalidFormat("BitDouble uses reserved prefix 11".into())),
        })
    }

    /// DD: bit double with default.
    ///
    /// The 2-bit prefix selects how much of `def` survives:
    /// `00` keeps it, `01` replaces its low 4 bytes, `10` replaces bytes
    /// 4-5 and then the low 4 bytes, `11` reads a full RD.
    pub fn read_bit_double_with_default(&mut self, def: f64) -> Result<f64> {
        self.atomic(|r| {
            let mut arr = def.to_le_bytes();
            match r.read_2bits()? {
                // 00: No more data present, use default.
                0 => Ok(def),
                // 01: 4 bytes patched into first 4 bytes of default
                1 => {
                    arr[..4].copy_from_slice(&r.read_array::<4>()?);
                    Ok(f64::from_le_bytes(arr))
                }
                // 10: 6 bytes, first 2 patch bytes [4..6], last 4 patch bytes [0..4]
                2 => {
                    arr[4..6].copy_from_slice(&r.read_array::<2>()?);
                    arr[..4].copy_from_slice(&r.read_array::<4>()?);
                    Ok(f64::from_le_bytes(arr))
                }
                // 11: A full RD follows
                _ => r.read_raw_double(),
            }
        })
    }

    /// 2BD
    pub fn read_2bit_double(&mut self) -> Result<Vector2> {
        self.atomic(|r| {
            let x = r.read_bit_double()?;
            let y = r.read_bit_double()?;
            Ok(Vector2::new(x, y))
        })
    }

    /// 3BD
    pub fn read_3bit_double(&mut self) -> Result<Vector3> {
        self.atomic(|r| {
            let x = r.read_bit_double()?;
            let y = r.read_bit_double()?;
            let z = r.read_bit_double()?;
            Ok(Vector3::new(x, y, z))
        })
    }

    /// 2DD
    pub fn read_2bit_double_with_default(&mut self, def: Vector2) -> Result<Vector2> {
        self.atomic(|r| {
            let x = r.read_bit_double_with_default(def.x)?;
            let y = r.read_bit_double_with_default(def.y)?;
            Ok(Vector2::new(x, y))
        })
    }

    /// 3DD
    pub fn read_3bit_double_with_default(&mut self, def: Vector3) -> Result<Vector3> {
        self.atomic(|r| {
            let x = r.read_bit_double_with_default(def.x)?;
            let y = r.read_bit_double_with_default(def.y)?;
            let z = r.read_bit_double_with_default(def.z)?;
            Ok(Vector3::new(x, y, z))
        })
    }

    /// BE: extrusion, unit Z when the leading bit is set.
    pub fn read_bit_extrusion(&mut self) -> Result<Vector3> {
        self.atomic(|r| {
            if r.read_bit()? {
                Ok(Vector3::UNIT_Z)
            } else {
                r.read_3bit_double()
            }
        })
    }

    /// BT: thickness, zero when the leading bit is set.
    pub fn read_bit_thickness(&mut self) -> Result<f64> {
        self.atomic(|r| {
            if r.read_bit()? {
                Ok(0.0)
            } else {
                r.read_bit_double()
            }
        })
    }

    // ---------------------------------------------------------------
    // Modular values
    // ---------------------------------------------------------------

    /// MC: unsigned modular char.
    pub fn read_modular_char(&mut self) -> Result<u64> {
        self.atomic(|r| {
            let mut value = 0u64;
            let mut shift = 0u32;
            loop {
                let byte = r.read_byte()?;
                if shift > 63 {
                    return Err(DwgError::InvalidFormat("modular char exceeds 64 bits".into()));
                }
                value |= ((byte & 0b0111_1111) as u64) << shift;
                if (byte & 0b1000_0000) == 0 {
                    return Ok(value);
                }
                shift += 7;
            }
        })
    }

    /// Signed MC: bit 6 of the terminating byte carries the sign.
    pub fn read_signed_modular_char(&mut self) -> Result<i64> {
        self.atomic(|r| {
            let mut value = 0i64;
            let mut shift = 0u32;
            loop {
                let byte = r.read_byte()?;
                if shift > 56 {
                    return Err(DwgError::InvalidFormat("modular char exceeds 64 bits".into()));
                }
                if (byte & 0b1000_0000) != 0 {
                    value |= ((byte & 0b0111_1111) as i64) << shift;
                    shift += 7;
                    continue;
                }
                // Last byte: drop the flags and apply the sign.
                value |= ((byte & 0b0011_1111) as i64) << shift;
                if (byte & 0b0100_0000) != 0 {
                    value = -value;
                }
                return Ok(value);
            }
        })
    }

    /// MS: modular short, 15 value bits per little-endian byte pair.
    pub fn read_modular_short(&mut self) -> Result<u32> {
        self.atomic(|r| {
            let mut value = 0u64;
            let mut shift = 0u32;
            loop {
                let lo = r.read_byte()?;
                let hi = r.read_byte()?;
                if shift > 30 {
                    return Err(DwgError::InvalidFormat("modular short exceeds 32 bits".into()));
                }
                value |= ((lo as u64) | (((hi & 0b0111_1111) as u64) << 8)) << shift;
                if (hi & 0b1000_0000) == 0 {
                    break;
                }
                shift += 15;
            }
            u32::try_from(value)
                .map_err(|_| DwgError::InvalidFormat("modular short exceeds 32 bits".into()))
        })
    }

    // ---------------------------------------------------------------
    // Handles
    // ---------------------------------------------------------------

    /// H: a handle reference, unresolved.
    pub fn read_handle_reference(&mut self) -> Result<HandleReference> {
        self.atomic(|r| {
            // |CODE (4 bits)|COUNTER (4 bits)|HANDLE or OFFSET|
            let form = r.read_byte()?;
            let code = form >> 4;
            let counter = (form & 0b0000_1111) as usize;

            let reference_type = DwgReferenceType::from_code(code).ok_or_else(|| {
                DwgError::InvalidFormat(format!("invalid handle reference code {code:#X}"))
            })?;
            if counter > 8 {
                return Err(DwgError::InvalidFormat(format!(
                    "handle byte count {counter} exceeds maximum of 8"
                )));
            }

            // Handle bytes are stored most significant first.
            let mut value = 0u64;
            for _ in 0..counter {
                value = (value << 8) | r.read_byte()? as u64;
            }
            Ok(HandleReference::new(reference_type, value))
        })
    }

    /// H, for an object's own handle (always absolute).
    pub fn read_handle(&mut self) -> Result<Handle> {
        Ok(self.read_handle_reference()?.resolve(Handle::NULL))
    }

    /// H, resolved against the handle of the containing object.
    pub fn read_handle_resolved(&mut self, owner: Handle) -> Result<Handle> {
        Ok(self.read_handle_reference()?.resolve(owner))
    }

    // ---------------------------------------------------------------
    // Text and sentinels
    // ---------------------------------------------------------------

    /// TV: BS length followed by that many code-page bytes.
    pub fn read_variable_text(&mut self) -> Result<String> {
        self.atomic(|r| {
            let length = r.read_bit_short()?;
            if length < 0 {
                return Err(DwgError::InvalidFormat(format!("negative text length {length}")));
            }
            if length == 0 {
                return Ok(String::new());
            }
            let bytes = r.read_bytes(length as usize)?;
            let (text, _, _) = r.encoding.decode(&bytes);
            Ok(text.replace('\0', ""))
        })
    }

    /// 16 raw bytes.
    pub fn read_sentinel(&mut self) -> Result<[u8; 16]> {
        self.read_array::<16>()
    }
}

/// Map the preamble code page to a text encoding.
pub fn encoding_from_code_page(code_page: u16) -> &'static Encoding {
    match code_page {
        0x00 | 0x01 | 0x1E => encoding_rs::WINDOWS_1252,
        0x02 => encoding_rs::WINDOWS_1250,    // Central European
        0x03 => encoding_rs::WINDOWS_1251,    // Cyrillic
        0x04 => encoding_rs::WINDOWS_1253,    // Greek
        0x05 => encoding_rs::WINDOWS_1254,    // Turkish
        0x06 => encoding_rs::WINDOWS_1255,    // Hebrew
        0x07 => encoding_rs::WINDOWS_1256,    // Arabic
        0x08 => encoding_rs::WINDOWS_1257,    // Baltic
        0x0A => encoding_rs::WINDOWS_874,     // Thai
        0x0B => encoding_rs::SHIFT_JIS,       // Japanese
        0x0C => encoding_rs::GBK,             // Simplified Chinese
        0x0D => encoding_rs::EUC_KR,          // Korean
        0x0E => encoding_rs::BIG5,            // Traditional Chinese
        _ => encoding_rs::WINDOWS_1252,
    }
}
