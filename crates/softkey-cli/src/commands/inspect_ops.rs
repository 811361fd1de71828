use std::fs;

use serde::Serialize;

use softkey_core::geometry::{
    GeometryError, KeyGeometryIndex, KeyboardLayout, GRID_COLUMNS, GRID_ROWS,
};

#[derive(Debug, Serialize)]
pub struct KeyReport {
    pub index: usize,
    pub label: String,
    pub code: i32,
    pub neighbors: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub name: Option<String>,
    pub bounds: (i32, i32),
    pub cell_size: (i32, i32),
    pub proximity_threshold: i64,
    /// Candidate count per grid cell, row-major.
    pub grid: Vec<Vec<usize>>,
    pub keys: Vec<KeyReport>,
}

pub fn inspect(layout: &KeyboardLayout) -> Result<InspectReport, GeometryError> {
    let index = KeyGeometryIndex::from_provider(layout)?;
    let (cw, ch) = index.cell_size();
    let grid = (0..GRID_ROWS as i32)
        .map(|row| {
            (0..GRID_COLUMNS as i32)
                .map(|col| index.candidates_at(col * cw, row * ch).len())
                .collect()
        })
        .collect();
    let keys = index
        .keys()
        .iter()
        .enumerate()
        .map(|(i, key)| KeyReport {
            index: i,
            label: key
                .label
                .clone()
                .unwrap_or_else(|| format!("#{}", key.code)),
            code: key.code,
            neighbors: index.neighbors(i).to_vec(),
        })
        .collect();
    Ok(InspectReport {
        name: layout.name.clone(),
        bounds: index.bounds(),
        cell_size: (cw, ch),
        proximity_threshold: index.proximity_threshold(),
        grid,
        keys,
    })
}

pub fn inspect_cmd(keyboard_file: &str, json: bool) {
    let content = die!(fs::read_to_string(keyboard_file), "Error reading {keyboard_file}: {}");
    let layout = die!(KeyboardLayout::from_toml(&content), "Error: {}");
    let report = die!(inspect(&layout), "Error: {}");

    if json {
        println!("{}", die!(serde_json::to_string_pretty(&report), "Error: {}"));
        return;
    }

    if let Some(name) = &report.name {
        println!("{name}");
    }
    println!(
        "{} keys, bounds {}x{}, cell {}x{}, threshold {} (squared)",
        report.keys.len(),
        report.bounds.0,
        report.bounds.1,
        report.cell_size.0,
        report.cell_size.1,
        report.proximity_threshold
    );
    println!("candidates per cell:");
    for row in &report.grid {
        let cells: Vec<String> = row.iter().map(|n| format!("{n:>3}")).collect();
        println!("  {}", cells.join(""));
    }
    println!("neighbors:");
    for key in &report.keys {
        let labels: Vec<&str> = key
            .neighbors
            .iter()
            .filter_map(|&n| report.keys.get(n).map(|k| k.label.as_str()))
            .collect();
        println!("  {:>3} {:<8} {}", key.index, key.label, labels.join(" "));
    }
}
