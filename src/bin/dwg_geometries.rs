//! Diagnostic: list the sections and geometry of an R2000 drawing.
//!
//! Usage: dwg_geometries <file.dwg> [--failsafe] [--verify-crc]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context};
use dwgcore::{decode_entity, decode_sections, DwgReaderConfiguration};

fn main() -> anyhow::Result<()> {
    let mut path = None;
    let mut config = DwgReaderConfiguration::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--failsafe" => config.failsafe = true,
            "--verify-crc" => config.verify_crc = true,
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("unexpected argument {other}"),
        }
    }
    let Some(path) = path else {
        bail!("usage: dwg_geometries <file.dwg> [--failsafe] [--verify-crc]");
    };

    let file = File::open(&path).with_context(|| format!("cannot open {path}"))?;
    let mut source = BufReader::new(file);
    let sections = decode_sections(&mut source, &config)
        .with_context(|| format!("cannot decode sections of {path}"))?;

    println!("File:        {path}");
    println!("Length:      {} bytes", sections.file_length);
    println!("Code page:   {:#X}", sections.file_header.code_page);
    for record in sections.section_table().records() {
        println!(
            "Section {}:   offset {:#X}, size {}",
            record.number, record.seeker, record.size
        );
    }
    println!("Classes:     {}", sections.classes.len());
    for class in &sections.classes {
        println!("  {:>4} {:<32} {}", class.class_number, class.dxf_name, class.cpp_class_name);
    }
    println!("Objects:     {}", sections.object_map.len());
    println!("Geometries:  {}", sections.geometry_count());

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut failures = 0usize;
    for (i, location) in sections.geometries.iter().enumerate() {
        match decode_entity(&mut source, &sections, i) {
            Ok(entity) => {
                *counts.entry(entity.geometry.name()).or_default() += 1;
                println!(
                    "  {:>6} {:>10} {:<12} layer {}",
                    i,
                    location.handle.to_string(),
                    entity.geometry.name(),
                    entity.references.layer
                );
            }
            Err(e) => {
                failures += 1;
                println!("  {:>6} {:>10} FAILED {e}", i, location.handle.to_string());
            }
        }
    }

    println!();
    for (name, count) in &counts {
        println!("{name:<12} {count}");
    }
    if failures > 0 {
        println!("{failures} geometries failed to decode");
    }
    for notification in sections.notifications.iter() {
        println!("{notification}");
    }

    Ok(())
}
