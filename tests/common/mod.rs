//! Fixtures for integration tests: minimal class files and archives.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;

/// A class file for `name` (dotted) extending `java.lang.Object` and
/// referencing each of `dependencies` through a class constant.
pub fn class_file(name: &str, dependencies: &[&str], access: u16) -> Vec<u8> {
    let mut pool = Vec::new();
    let mut next_index: u16 = 1;

    let mut class_constant = |internal: &str| -> u16 {
        pool.push(1u8);
        pool.extend((internal.len() as u16).to_be_bytes());
        pool.extend(internal.as_bytes());
        let name_index = next_index;
        pool.push(7u8);
        pool.extend(name_index.to_be_bytes());
        next_index += 2;
        name_index + 1
    };

    let this_class = class_constant(&name.replace('.', "/"));
    let super_class = class_constant("java/lang/Object");
    for dependency in dependencies {
        class_constant(&dependency.replace('.', "/"));
    }

    let mut out = Vec::new();
    out.extend(0xCAFE_BABEu32.to_be_bytes());
    out.extend(0u16.to_be_bytes());
    out.extend(61u16.to_be_bytes());
    out.extend(next_index.to_be_bytes());
    out.extend(&pool);
    out.extend(access.to_be_bytes());
    out.extend(this_class.to_be_bytes());
    out.extend(super_class.to_be_bytes());
    out.extend(0u16.to_be_bytes()); // interfaces
    out.extend(0u16.to_be_bytes()); // fields
    out.extend(0u16.to_be_bytes()); // methods
    out.extend(0u16.to_be_bytes()); // attributes
    out
}

/// Path of the class file for `name` relative to a class output directory.
pub fn class_path(name: &str) -> String {
    format!("{}.class", name.replace('.', "/"))
}

/// Write `bytes` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, bytes: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// An archive holding the given entries, in order.
pub fn archive(entries: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(method);
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
