//! WRL scene parser.
//!
//! Handles the VRML subset written by the capture plugin:
//!
//! ```text
//! Shape {
//!   appearance DEF <name> Appearance {
//!     material Material { ambientIntensity .. diffuseColor .. emisiveColor .. }
//!     texture ImageTexture { url "<file>" repeatS TRUE }
//!   }
//!   geometry DEF <name> IndexedFaceSet {
//!     coord Coordinate { point [ <x y z,> ... ] }
//!     texCoord TextureCoordinate { point [ <u v,> ... ] }
//!     color Color { color [ <r g b,> ... ] }
//!   }
//! }
//! ```
//!
//! Each list line carries one tuple. Every three consecutive points form a
//! triangle; index lists such as `coordIndex` are skipped.

use glam::{Vec2, Vec3, Vec4};

use crate::error::{ParseError, ParseResult};
use crate::mesh::{remap_axes, Mesh};
use crate::scene::Material;
use crate::wrl::tokenizer::{Line, LineCursor};

/// One `Shape` block: its geometry and the material it was declared with.
#[derive(Clone, Debug)]
pub struct WrlShape {
    pub mesh: Mesh,
    pub material: Material,
}

/// WRL text parser.
pub struct WrlParser<'a> {
    cursor: LineCursor<'a>,
}

impl<'a> WrlParser<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            cursor: LineCursor::new(content),
        }
    }

    /// Parse every top-level `Shape` block in file order.
    pub fn parse(&mut self) -> ParseResult<Vec<WrlShape>> {
        let mut shapes = Vec::new();

        while let Some(line) = self.cursor.advance() {
            if line.head() == "Shape" {
                line.expect(1, "{")?;
                shapes.push(self.parse_shape(line.number)?);
            }
        }

        Ok(shapes)
    }

    fn parse_shape(&mut self, start: usize) -> ParseResult<WrlShape> {
        let mut mesh = Mesh::default();
        let mut material = Material::default();

        loop {
            let line = self.cursor.next_in_block(start)?;
            match line.head() {
                "}" => break,
                "appearance" => {
                    if let Some(name) = block_name(&line) {
                        material.name = name.to_string();
                    }
                    self.parse_appearance(&mut material, line.number)?;
                }
                "geometry" => {
                    if let Some(name) = block_name(&line) {
                        mesh.name = name.to_string();
                    }
                    self.parse_geometry(&mut mesh, line.number)?;
                }
                _ => self.skip_unknown(&line)?,
            }
        }

        log::debug!(
            "Shape at line {}: mesh '{}' with {} points, material '{}'",
            start,
            mesh.name,
            mesh.points.len(),
            material.name
        );

        Ok(WrlShape { mesh, material })
    }

    fn parse_appearance(&mut self, material: &mut Material, start: usize) -> ParseResult<()> {
        loop {
            let line = self.cursor.next_in_block(start)?;
            match line.head() {
                "}" => return Ok(()),
                "material" => self.parse_material(material, line.number)?,
                "texture" => self.parse_texture(material, line.number)?,
                _ => self.skip_unknown(&line)?,
            }
        }
    }

    fn parse_material(&mut self, material: &mut Material, start: usize) -> ParseResult<()> {
        loop {
            let line = self.cursor.next_in_block(start)?;
            match line.head() {
                "}" => return Ok(()),
                "ambientIntensity" => material.ambient_intensity = parse_float(&line, 1)?,
                "diffuseColor" => material.diffuse_color = parse_vec3(&line)?,
                "specularColor" => material.specular_color = parse_vec3(&line)?,
                // The producer misspells both of these field names.
                "emisiveColor" => material.emissive_color = parse_vec3(&line)?,
                "shinines" => material.shininess = parse_float(&line, 1)?,
                "transparency" => material.alpha = 1.0 - parse_float(&line, 1)?,
                _ => self.skip_unknown(&line)?,
            }
        }
    }

    fn parse_texture(&mut self, material: &mut Material, start: usize) -> ParseResult<()> {
        loop {
            let line = self.cursor.next_in_block(start)?;
            match line.head() {
                "}" => return Ok(()),
                "url" => {
                    let url = line.tokens[1..].join(" ");
                    let url = url.trim_matches('"');
                    if url.is_empty() {
                        return Err(malformed(&line, "url without a value"));
                    }
                    material.texture_url = Some(url.to_string());
                }
                "repeatS" => material.texture_repeat = line.token(1) == Some("TRUE"),
                _ => self.skip_unknown(&line)?,
            }
        }
    }

    fn parse_geometry(&mut self, mesh: &mut Mesh, start: usize) -> ParseResult<()> {
        let mut texcoords = Vec::new();
        let mut colors = Vec::new();

        loop {
            let line = self.cursor.next_in_block(start)?;
            match line.head() {
                "}" => break,
                "coord" => {
                    let points = self.parse_attribute::<3>("point", line.number)?;
                    mesh.points.extend(
                        points
                            .into_iter()
                            .map(|p| remap_axes(Vec3::from_array(p))),
                    );
                }
                "texCoord" => {
                    let uvs = self.parse_attribute::<2>("point", line.number)?;
                    texcoords.extend(uvs.into_iter().map(Vec2::from_array));
                }
                "color" => {
                    let rgb = self.parse_attribute::<3>("color", line.number)?;
                    colors.extend(
                        rgb.into_iter()
                            .map(|c| Vec3::from_array(c).extend(1.0)),
                    );
                }
                _ => self.skip_unknown(&line)?,
            }
        }

        if mesh.points.len() % 3 != 0 {
            log::warn!(
                "Geometry '{}' has {} points, trailing {} ignored",
                mesh.name,
                mesh.points.len(),
                mesh.points.len() % 3
            );
        }
        if !texcoords.is_empty() {
            warn_length_mismatch(mesh, "texture coordinates", texcoords.len());
            mesh.texcoords = Some(texcoords);
        }
        if !colors.is_empty() {
            warn_length_mismatch(mesh, "colors", colors.len());
            mesh.colors = Some(colors);
        }

        Ok(())
    }

    /// Parse a node holding one `<keyword> [ ... ]` list, e.g. `coord { point [ ... ] }`.
    fn parse_attribute<const N: usize>(
        &mut self,
        keyword: &str,
        start: usize,
    ) -> ParseResult<Vec<[f32; N]>> {
        let mut values = Vec::new();

        loop {
            let line = self.cursor.next_in_block(start)?;
            if line.closes_block() {
                return Ok(values);
            }
            if line.head() == keyword {
                line.expect(1, "[")?;
                self.read_list(line.number, &mut values)?;
            } else {
                self.skip_unknown(&line)?;
            }
        }
    }

    /// Read tuple lines until a line starting with `]`.
    fn read_list<const N: usize>(&mut self, start: usize, out: &mut Vec<[f32; N]>) -> ParseResult<()> {
        loop {
            let line = self.cursor.next_in_block(start)?;
            if line.closes_list() {
                return Ok(());
            }
            out.push(parse_tuple(&line)?);
        }
    }

    /// Step over a line this parser has no use for, including any block or list it opens.
    fn skip_unknown(&mut self, line: &Line<'a>) -> ParseResult<()> {
        if line.opens_block() {
            log::debug!("Skipping block '{}' at line {}", line.head(), line.number);
            self.cursor.skip_block(line.number)
        } else if line.opens_list() {
            self.cursor.skip_list(line.number)
        } else {
            Ok(())
        }
    }
}

/// Parse a WRL string and return its shapes.
pub fn parse_wrl(content: &str) -> ParseResult<Vec<WrlShape>> {
    WrlParser::new(content).parse()
}

/// Name given by `<keyword> DEF <name> <Type> {`.
fn block_name<'a>(line: &Line<'a>) -> Option<&'a str> {
    line.token(2).filter(|&name| name != "{")
}

fn malformed(line: &Line<'_>, message: &str) -> ParseError {
    ParseError::MalformedBlock {
        line: line.number,
        message: format!("{}: {}", line.head(), message),
    }
}

fn parse_number(line: &Line<'_>, token: &str) -> ParseResult<f32> {
    token
        .trim_end_matches(',')
        .parse::<f32>()
        .map_err(|_| ParseError::InvalidNumber {
            line: line.number,
            token: token.to_string(),
        })
}

fn parse_float(line: &Line<'_>, index: usize) -> ParseResult<f32> {
    let token = line
        .token(index)
        .ok_or_else(|| malformed(line, "missing value"))?;
    parse_number(line, token)
}

fn parse_vec3(line: &Line<'_>) -> ParseResult<Vec3> {
    Ok(Vec3::new(
        parse_float(line, 1)?,
        parse_float(line, 2)?,
        parse_float(line, 3)?,
    ))
}

/// Parse the first `N` numbers of a list line; separator commas are dropped.
fn parse_tuple<const N: usize>(line: &Line<'_>) -> ParseResult<[f32; N]> {
    let mut numbers = line.tokens.iter().filter(|t| **t != ",");
    let mut out = [0.0; N];
    for slot in &mut out {
        let token = numbers
            .next()
            .ok_or_else(|| malformed(line, &format!("expected {} values", N)))?;
        *slot = parse_number(line, token)?;
    }
    Ok(out)
}

fn warn_length_mismatch(mesh: &Mesh, what: &str, len: usize) {
    if len != mesh.points.len() {
        log::warn!(
            "Geometry '{}' has {} points but {} {}",
            mesh.name,
            mesh.points.len(),
            len,
            what
        );
    }
}
