//! Vertex descriptor table of a RIP dump.
//!
//! Each entry names a semantic and gives its byte offset within one
//! interleaved vertex record. All attributes are stored as 32-bit floats, so
//! offsets are kept in float units.

use crate::error::{ParseError, ParseResult};
use crate::reader::ByteReader;

/// Vertex semantics this decoder understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Semantic {
    Position,
    Normal,
    Color,
    TexCoord,
}

impl Semantic {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "POSITION" => Some(Semantic::Position),
            "NORMAL" => Some(Semantic::Normal),
            "COLOR" => Some(Semantic::Color),
            "TEXCOORD" => Some(Semantic::TexCoord),
            _ => None,
        }
    }
}

/// One raw entry of the descriptor table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeEntry {
    pub name: String,
    /// Offset in floats from the start of the vertex record
    pub offset: usize,
    pub byte_length: u32,
    pub element_count: usize,
}

impl AttributeEntry {
    pub fn semantic(&self) -> Option<Semantic> {
        Semantic::from_name(&self.name)
    }
}

/// Float offsets of each semantic slot within a vertex record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexDescriptor {
    pub position: Option<[usize; 3]>,
    pub normal: Option<[usize; 3]>,
    pub color: Option<[usize; 3]>,
    pub alpha: Option<usize>,
    pub texcoord: Option<[usize; 2]>,

    /// Sum of element counts across all entries, the expected record width
    pub element_length: usize,

    /// Entries in file order, including unrecognized ones
    pub attributes: Vec<AttributeEntry>,
}

impl VertexDescriptor {
    /// Decode `attribute_count` entries from the reader.
    pub fn decode(reader: &mut ByteReader<'_>, attribute_count: u32) -> ParseResult<Self> {
        let mut descriptor = Self::default();

        for _ in 0..attribute_count {
            let name = reader.read_cstring()?;
            reader.skip(4)?;
            let offset = (reader.read_u32()? / 4) as usize;
            let byte_length = reader.read_u32()?;
            let element_count = reader.read_u32()? as usize;
            // Per-element type tags, not needed: every element is a float.
            for _ in 0..element_count {
                reader.skip(4)?;
            }

            log::debug!(
                "Vertex attribute {} at float offset {} ({} elements)",
                name,
                offset,
                element_count
            );
            descriptor.push(AttributeEntry {
                name,
                offset,
                byte_length,
                element_count,
            });
        }

        Ok(descriptor)
    }

    /// Register one entry, filling the slot for its semantic.
    pub fn push(&mut self, entry: AttributeEntry) {
        let o = entry.offset;
        self.element_length += entry.element_count;

        match entry.semantic() {
            Some(Semantic::Position) => self.position = Some([o, o + 1, o + 2]),
            Some(Semantic::Normal) => self.normal = Some([o, o + 1, o + 2]),
            Some(Semantic::Color) => {
                self.color = Some([o, o + 1, o + 2]);
                if entry.element_count == 4 {
                    self.alpha = Some(o + 3);
                }
            }
            Some(Semantic::TexCoord) => self.texcoord = Some([o, o + 1]),
            None => log::debug!("Ignoring vertex attribute '{}'", entry.name),
        }

        self.attributes.push(entry);
    }

    pub fn has_normals(&self) -> bool {
        self.normal.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.color.is_some()
    }

    pub fn has_alphas(&self) -> bool {
        self.alpha.is_some()
    }

    pub fn has_texcoords(&self) -> bool {
        self.texcoord.is_some()
    }

    /// Largest float offset any slot reads.
    fn max_offset(&self) -> Option<usize> {
        let slots = self.position.iter().flatten();
        let slots = slots.chain(self.normal.iter().flatten());
        let slots = slots.chain(self.color.iter().flatten());
        let slots = slots.chain(self.alpha.iter());
        let slots = slots.chain(self.texcoord.iter().flatten());
        slots.copied().max()
    }

    /// Check the slots against the record width declared in the header.
    ///
    /// A width that differs from `element_length` is tolerated; a slot that
    /// would read past the end of a record is not.
    pub fn validate(&self, float_stride: usize) -> ParseResult<()> {
        if self.position.is_none() {
            return Err(ParseError::MalformedAttribute(
                "no POSITION attribute declared".to_string(),
            ));
        }

        if self.element_length != float_stride {
            log::warn!(
                "Vertex descriptor declares {} floats per vertex, header stride is {}",
                self.element_length,
                float_stride
            );
        }

        match self.max_offset() {
            Some(max) if max >= float_stride => Err(ParseError::MalformedAttribute(format!(
                "attribute offset {} is outside a {}-float vertex record",
                max, float_stride
            ))),
            _ => Ok(()),
        }
    }
}
