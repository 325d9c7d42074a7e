//! MSB-first bit writer producing the DWG compressed encodings.

/// Appends bits most significant first, the way the drawing stores them.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Bytes written so far; the last byte is zero padded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u32) {
        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    /// Copy every bit of another writer.
    pub fn append(&mut self, other: &BitWriter) {
        for i in 0..other.bit_len {
            let byte = other.bytes[i / 8];
            self.write_bit(byte & (0x80 >> (i % 8)) != 0);
        }
    }

    pub fn write_byte(&mut self, value: u8) {
        self.write_bits(value as u64, 8);
    }

    pub fn write_bytes(&mut self, values: &[u8]) {
        for &b in values {
            self.write_byte(b);
        }
    }

    // RC / RS / RL / RD

    pub fn write_raw_short(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_raw_long(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_raw_double(&mut self, value: f64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_2raw_double(&mut self, x: f64, y: f64) {
        self.write_raw_double(x);
        self.write_raw_double(y);
    }

    // BS / BL / BD

    pub fn write_bit_short(&mut self, value: i16) {
        match value {
            0 => self.write_bits(0b10, 2),
            256 => self.write_bits(0b11, 2),
            1..=255 => {
                self.write_bits(0b01, 2);
                self.write_byte(value as u8);
            }
            _ => {
                self.write_bits(0b00, 2);
                self.write_raw_short(value);
            }
        }
    }

    pub fn write_bit_long(&mut self, value: i32) {
        match value {
            0 => self.write_bits(0b10, 2),
            1..=255 => {
                self.write_bits(0b01, 2);
                self.write_byte(value as u8);
            }
            _ => {
                self.write_bits(0b00, 2);
                self.write_raw_long(value);
            }
        }
    }

    pub fn write_bit_double(&mut self, value: f64) {
        if value == 1.0 {
            self.write_bits(0b01, 2);
        } else if value == 0.0 && value.is_sign_positive() {
            self.write_bits(0b10, 2);
        } else {
            self.write_bits(0b00, 2);
            self.write_raw_double(value);
        }
    }

    pub fn write_3bit_double(&mut self, x: f64, y: f64, z: f64) {
        self.write_bit_double(x);
        self.write_bit_double(y);
        self.write_bit_double(z);
    }

    /// DD with the shortest prefix that reproduces `value` from `default`.
    pub fn write_bit_double_with_default(&mut self, value: f64, default: f64) {
        let v = value.to_le_bytes();
        let d = default.to_le_bytes();
        if v == d {
            self.write_bits(0b00, 2);
        } else if v[4..] == d[4..] {
            self.write_bits(0b01, 2);
            self.write_bytes(&v[..4]);
        } else if v[6..] == d[6..] {
            self.write_bits(0b10, 2);
            self.write_bytes(&v[4..6]);
            self.write_bytes(&v[..4]);
        } else {
            self.write_bits(0b11, 2);
            self.write_raw_double(value);
        }
    }

    /// BE; `None` writes the unit-Z shortcut.
    pub fn write_bit_extrusion(&mut self, normal: Option<(f64, f64, f64)>) {
        match normal {
            None => self.write_bit(true),
            Some((x, y, z)) => {
                self.write_bit(false);
                self.write_3bit_double(x, y, z);
            }
        }
    }

    /// BT; zero uses the one-bit shortcut.
    pub fn write_bit_thickness(&mut self, thickness: f64) {
        if thickness == 0.0 {
            self.write_bit(true);
        } else {
            self.write_bit(false);
            self.write_bit_double(thickness);
        }
    }

    // MC / signed MC / MS

    pub fn write_modular_char(&mut self, mut value: u64) {
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.write_byte(group);
                return;
            }
            self.write_byte(group | 0x80);
        }
    }

    pub fn write_signed_modular_char(&mut self, value: i64) {
        let negative = value < 0;
        let mut magnitude = value.unsigned_abs();
        while magnitude >= 0x40 {
            self.write_byte((magnitude & 0x7F) as u8 | 0x80);
            magnitude >>= 7;
        }
        let sign = if negative { 0x40 } else { 0 };
        self.write_byte(magnitude as u8 | sign);
    }

    pub fn write_modular_short(&mut self, mut value: u32) {
        loop {
            let group = (value & 0x7FFF) as u16;
            value >>= 15;
            let [lo, hi] = group.to_le_bytes();
            if value == 0 {
                self.write_bytes(&[lo, hi]);
                return;
            }
            self.write_bytes(&[lo, hi | 0x80]);
        }
    }

    // H / TV

    /// Handle reference with the given code and the fewest value bytes.
    pub fn write_handle(&mut self, code: u8, value: u64) {
        let be = value.to_be_bytes();
        let skip = be.iter().take_while(|&&b| b == 0).count();
        let significant = &be[skip..];
        self.write_byte((code << 4) | significant.len() as u8);
        self.write_bytes(significant);
    }

    pub fn write_variable_text(&mut self, bytes: &[u8]) {
        self.write_bit_short(bytes.len() as i16);
        self.write_bytes(bytes);
    }
}

