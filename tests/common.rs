// Shared fixtures: workbooks are generated at test time with rust_xlsxwriter
#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::PathBuf;
use tempfile::TempDir;

pub enum Fixture {
    Text(&'static str),
    Num(f64),
    Blank,
}

use Fixture::{Blank, Num, Text};

/// Write `rows` (header first) to the first sheet of a new workbook
pub fn write_workbook(dir: &TempDir, name: &str, rows: &[Vec<Fixture>]) -> PathBuf {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                Text(s) => {
                    sheet.write_string(r, c, *s).expect("Failed to write string");
                }
                Num(n) => {
                    sheet.write_number(r, c, *n).expect("Failed to write number");
                }
                Blank => {}
            }
        }
    }

    let path = dir.path().join(name);
    workbook.save(&path).expect("Failed to save workbook");
    path
}

/// Three months of three indicators, in the usual (Hibrido, Zebu) pair layout
///
/// - row 2 is entirely blank and column F ("Notas") has no data; both are
///   dropped before the month columns are paired
/// - Ganho de Peso has no Zebu value for Março, Peso Final no Hibrido value
pub fn sample_rows() -> Vec<Vec<Fixture>> {
    vec![
        vec![
            Text("Indicador"),
            Text("Janeiro"),
            Blank,
            Text("FEVEREIRO"),
            Blank,
            Text("Notas"),
            Text("Março"),
            Blank,
        ],
        vec![
            Text("Ganho de Peso"),
            Num(10.456),
            Num(20.111),
            Num(11.0),
            Num(21.5),
            Blank,
            Num(12.0),
            Blank,
        ],
        vec![Blank, Blank, Blank, Blank, Blank, Blank, Blank, Blank],
        vec![
            Text("Peso Final"),
            Num(300.0),
            Num(310.0),
            Num(305.0),
            Num(315.0),
            Blank,
            Blank,
            Num(320.0),
        ],
        vec![
            Text("Rendimento de Carcaça"),
            Num(52.3),
            Num(54.1),
            Num(52.9),
            Num(54.4),
            Blank,
            Num(53.0),
            Num(55.0),
        ],
    ]
}

pub fn sample_workbook(dir: &TempDir) -> PathBuf {
    write_workbook(dir, "rip.xlsx", &sample_rows())
}
