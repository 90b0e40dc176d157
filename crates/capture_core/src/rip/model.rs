//! Decoded contents of one RIP dump.
//!
//! Vertex records are kept as one flat float buffer and addressed only
//! through the [`VertexDescriptor`] offsets, since the attribute layout
//! changes from capture to capture.

use glam::{Vec2, Vec3, Vec4};

use crate::error::{ParseError, ParseResult};
use crate::mesh::remap_axes;
use crate::reader::ByteReader;
use crate::rip::descriptor::VertexDescriptor;

/// Magic value at the start of every RIP file, read big-endian.
pub const RIP_SIGNATURE: u32 = 0xDEC0_ADDE;

/// Fixed header fields following the signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RipHeader {
    pub version: u32,
    pub triangle_count: u32,
    pub vertex_count: u32,
    pub byte_stride: u32,
    pub texture_count: u32,
    pub reserved: u32,
    pub attribute_count: u32,
}

impl RipHeader {
    fn read(reader: &mut ByteReader<'_>) -> ParseResult<Self> {
        Ok(Self {
            version: reader.read_u32()?,
            triangle_count: reader.read_u32()?,
            vertex_count: reader.read_u32()?,
            byte_stride: reader.read_u32()?,
            texture_count: reader.read_u32()?,
            reserved: reader.read_u32()?,
            attribute_count: reader.read_u32()?,
        })
    }

    /// Floats per vertex record.
    pub fn float_stride(&self) -> usize {
        (self.byte_stride / 4) as usize
    }
}

/// One captured draw call: descriptor, texture, faces and raw vertices.
#[derive(Clone, Debug, Default)]
pub struct RipModel {
    pub header: RipHeader,
    pub descriptor: VertexDescriptor,
    /// Last texture name in the file; earlier ones are discarded
    pub texture_name: Option<String>,
    pub faces: Vec<[u32; 3]>,
    vertices: Vec<f32>,
    float_stride: usize,
}

impl RipModel {
    /// Decode a complete RIP file held in memory.
    pub fn parse(data: &[u8]) -> ParseResult<Self> {
        let found = ByteReader::big_endian(data).read_signature()?;
        if found != RIP_SIGNATURE {
            return Err(ParseError::SignatureMismatch { found });
        }

        let mut reader = ByteReader::little_endian(data);
        reader.skip(4)?;
        let header = RipHeader::read(&mut reader)?;

        let descriptor = VertexDescriptor::decode(&mut reader, header.attribute_count)?;

        let mut texture_name = None;
        for _ in 0..header.texture_count {
            texture_name = Some(reader.read_cstring()?);
        }
        if header.texture_count > 1 {
            log::warn!(
                "{} textures declared, keeping only '{}'",
                header.texture_count,
                texture_name.as_deref().unwrap_or_default()
            );
        }

        let mut faces = Vec::with_capacity((header.triangle_count as usize).min(reader.remaining() / 12));
        for _ in 0..header.triangle_count {
            faces.push([reader.read_u32()?, reader.read_u32()?, reader.read_u32()?]);
        }

        if header.byte_stride % 4 != 0 {
            log::warn!(
                "Byte stride {} is not a multiple of 4, truncating",
                header.byte_stride
            );
        }
        let float_stride = header.float_stride();
        descriptor.validate(float_stride)?;

        let float_count = header.vertex_count as usize * float_stride;
        let mut vertices = Vec::with_capacity(float_count.min(reader.remaining() / 4));
        for _ in 0..float_count {
            vertices.push(reader.read_f32()?);
        }

        if reader.remaining() > 0 {
            log::debug!("{} trailing bytes after vertex buffer", reader.remaining());
        }

        Ok(Self {
            header,
            descriptor,
            texture_name,
            faces,
            vertices,
            float_stride,
        })
    }

    pub fn vertex_count(&self) -> usize {
        if self.float_stride == 0 {
            0
        } else {
            self.vertices.len() / self.float_stride
        }
    }

    pub fn float_stride(&self) -> usize {
        self.float_stride
    }

    /// Raw float record of one vertex.
    pub fn raw_vertex(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.float_stride)?;
        self.vertices.get(start..start + self.float_stride)
    }

    /// Position in the Z-up convention: the record's `(x, y, z)` is returned as `(x, -z, y)`.
    pub fn vertex_position(&self, index: usize) -> Option<Vec3> {
        let [x, y, z] = self.descriptor.position?;
        let record = self.raw_vertex(index)?;
        Some(remap_axes(Vec3::new(record[x], record[y], record[z])))
    }

    /// Normal exactly as captured, without the position axis remap.
    pub fn vertex_normal(&self, index: usize) -> Option<Vec3> {
        let [nx, ny, nz] = self.descriptor.normal?;
        let record = self.raw_vertex(index)?;
        Some(Vec3::new(record[nx], record[ny], record[nz]))
    }

    /// RGBA color; alpha is 1.0 when the capture declares only RGB.
    pub fn vertex_color(&self, index: usize) -> Option<Vec4> {
        let [r, g, b] = self.descriptor.color?;
        let record = self.raw_vertex(index)?;
        let a = self.descriptor.alpha.map_or(1.0, |a| record[a]);
        Some(Vec4::new(record[r], record[g], record[b], a))
    }

    pub fn vertex_texcoord(&self, index: usize) -> Option<Vec2> {
        let [u, v] = self.descriptor.texcoord?;
        let record = self.raw_vertex(index)?;
        Some(Vec2::new(record[u], record[v]))
    }

    pub fn has_normals(&self) -> bool {
        self.descriptor.has_normals()
    }

    pub fn has_colors(&self) -> bool {
        self.descriptor.has_colors()
    }

    pub fn has_alphas(&self) -> bool {
        self.descriptor.has_alphas()
    }

    pub fn has_texcoords(&self) -> bool {
        self.descriptor.has_texcoords()
    }
}
