//! Decoder for the JVM class file format.
//!
//! Only the structural parts needed for dependency analysis are read: the
//! constant pool, access flags, field and method descriptors, and the
//! `SourceFile` attribute. Method bodies are skipped.

use crate::ingest::{ArtifactDecoder, DecodeError};
use crate::model::{Class, package_of};
use std::io::Read;

const CLASS_MAGIC: u32 = 0xCAFE_BABE;

const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;
const ACC_MODULE: u16 = 0x8000;

const SOURCE_FILE_ATTRIBUTE: &str = "SourceFile";

/// Default structural decoder for `.class` artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassFileDecoder;

impl ClassFileDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a class from an in-memory class file.
    ///
    /// Module descriptors (`module-info.class`) yield `None`.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Option<Class>, DecodeError> {
        let mut input = ByteReader::new(bytes);

        let magic = input.u32()?;
        if magic != CLASS_MAGIC {
            return Err(DecodeError::BadMagic(magic));
        }
        input.skip(4)?; // minor and major version

        let pool = ConstantPool::parse(&mut input)?;

        let access = input.u16()?;
        if access & ACC_MODULE != 0 {
            return Ok(None);
        }

        let this_index = input.u16()?;
        let name = internal_to_qualified(pool.class_name(this_index)?);

        let mut class = Class::new(name.clone());
        class.set_package(package_of(&name));
        class.set_abstract(access & (ACC_ABSTRACT | ACC_INTERFACE) != 0);

        input.skip(2)?; // super class, also present as a class constant
        let interfaces = input.u16()? as usize;
        input.skip(interfaces * 2)?;

        let mut referenced = pool.referenced_types(this_index)?;

        for _ in 0..2 {
            // fields, then methods
            let count = input.u16()?;
            for _ in 0..count {
                input.skip(4)?; // access flags and name
                let descriptor = pool.utf8(input.u16()?)?;
                referenced.extend(descriptor_types(descriptor));
                skip_attributes(&mut input)?;
            }
        }

        let attributes = input.u16()?;
        for _ in 0..attributes {
            let attribute = pool.utf8(input.u16()?)?;
            let length = input.u32()? as usize;
            if attribute == SOURCE_FILE_ATTRIBUTE && length == 2 {
                class.set_source_file(pool.utf8(input.u16()?)?);
            } else {
                input.skip(length)?;
            }
        }

        for dependency in referenced.iter().filter(|d| **d != name) {
            class.add_dependency(dependency);
            class.add_imported_package(package_of(dependency));
        }

        Ok(Some(class))
    }
}

impl ArtifactDecoder for ClassFileDecoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<Option<Class>, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode_bytes(&bytes)
    }
}

fn skip_attributes(input: &mut ByteReader<'_>) -> Result<(), DecodeError> {
    let count = input.u16()?;
    for _ in 0..count {
        input.skip(2)?;
        let length = input.u32()? as usize;
        input.skip(length)?;
    }
    Ok(())
}

/// `java/util/Map$Entry` → `java.util.Map$Entry`
fn internal_to_qualified(name: &str) -> String {
    name.replace('/', ".")
}

/// Object types named in a field or method descriptor, e.g.
/// `(ILjava/lang/String;[Ljava/util/List;)V` → `java.lang.String`, `java.util.List`.
fn descriptor_types(descriptor: &str) -> Vec<String> {
    let mut types = Vec::new();
    let mut rest = descriptor;
    while let Some(start) = rest.find('L') {
        let after = &rest[start + 1..];
        match after.find(';') {
            Some(end) => {
                types.push(internal_to_qualified(&after[..end]));
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    types
}

/// Class constants name either an internal class name or an array descriptor.
fn class_constant_type(name: &str) -> Option<String> {
    if name.starts_with('[') {
        descriptor_types(name).into_iter().next()
    } else {
        Some(internal_to_qualified(name))
    }
}

enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Other,
    /// Second slot of a long or double.
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(input: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let count = input.u16()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let index = entries.len();
            let tag = input.u8()?;
            let constant = match tag {
                1 => {
                    let length = input.u16()? as usize;
                    Constant::Utf8(String::from_utf8_lossy(input.take(length)?).into_owned())
                }
                3 | 4 => {
                    input.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    input.skip(8)?;
                    entries.push(Constant::Other);
                    Constant::Unusable
                }
                7 => Constant::Class {
                    name_index: input.u16()?,
                },
                8 | 16 | 19 | 20 => {
                    input.skip(2)?;
                    Constant::Other
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    input.skip(4)?;
                    Constant::Other
                }
                15 => {
                    input.skip(3)?;
                    Constant::Other
                }
                _ => {
                    return Err(DecodeError::Malformed(format!(
                        "unknown constant pool tag {} at index {}",
                        tag, index
                    )));
                }
            };
            entries.push(constant);
        }

        entries.truncate(count.max(1));
        Ok(Self { entries })
    }

    fn utf8(&self, index: u16) -> Result<&str, DecodeError> {
        match self.entries.get(index as usize) {
            Some(Constant::Utf8(value)) => Ok(value.as_str()),
            _ => Err(DecodeError::Malformed(format!(
                "constant {} is not a UTF-8 entry",
                index
            ))),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str, DecodeError> {
        match self.entries.get(index as usize) {
            Some(Constant::Class { name_index }) => self.utf8(*name_index),
            _ => Err(DecodeError::Malformed(format!(
                "constant {} is not a class entry",
                index
            ))),
        }
    }

    /// Every type named by a class constant other than `this_index`.
    fn referenced_types(&self, this_index: u16) -> Result<Vec<String>, DecodeError> {
        let mut types = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if let Constant::Class { name_index } = entry {
                if index == this_index as usize {
                    continue;
                }
                if let Some(name) = class_constant_type(self.utf8(*name_index)?) {
                    types.push(name);
                }
            }
        }
        Ok(types)
    }
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(len).ok_or(DecodeError::Truncated)?;
        let slice = self.bytes.get(self.pos..end).ok_or(DecodeError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.take(len).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
