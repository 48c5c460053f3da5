//! Minimal XLSX writer for test score workbooks.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::sheet::Cell;
use crate::table::{FIRST_SCORE_COL, LABEL_COL, SCORE_ROWS, SECOND_SCORE_COL, SIDE_CELL};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

/// Cells of a score sheet: side cell plus one row per `(label, first, second)`.
pub fn score_sheet_cells(first_side: &str, rows: &[(&str, f64, f64)]) -> Vec<(u32, u32, Cell)> {
    let mut cells = vec![(SIDE_CELL.0, SIDE_CELL.1, Cell::Text(first_side.to_string()))];
    for (row, (label, first, second)) in SCORE_ROWS.zip(rows) {
        cells.push((row, LABEL_COL, Cell::Text(label.to_string())));
        cells.push((row, FIRST_SCORE_COL, Cell::Number(*first)));
        cells.push((row, SECOND_SCORE_COL, Cell::Number(*second)));
    }
    cells
}

/// Write a single-sheet workbook holding `cells` at zero-based positions.
///
/// Missing parent directories are created.
pub fn write_xlsx(path: &Path, cells: &[(u32, u32, Cell)]) -> std::io::Result<()> {
    let mut strings: Vec<String> = Vec::new();
    let mut rows: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();

    for (row, col, cell) in cells {
        let reference = format!("{}{}", column_name(*col), row + 1);
        let xml = match cell {
            Cell::Text(text) => {
                strings.push(text.clone());
                format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, strings.len() - 1)
            }
            Cell::Number(n) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n),
        };
        rows.entry(*row).or_default().insert(*col, xml);
    }

    let mut sheet_data = String::new();
    for (row, cols) in &rows {
        sheet_data.push_str(&format!(r#"<row r="{}">"#, row + 1));
        for xml in cols.values() {
            sheet_data.push_str(xml);
        }
        sheet_data.push_str("</row>");
    }
    let worksheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        sheet_data
    );

    let shared: String = strings
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", escape(s)))
        .collect();
    let shared_strings = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">{}</sst>"#,
        shared,
        n = strings.len()
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/sharedStrings.xml", shared_strings),
        ("xl/worksheets/sheet1.xml", worksheet),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).map_err(std::io::Error::other)?;
        zip.write_all(body.as_bytes())?;
    }
    zip.finish().map_err(std::io::Error::other)?;
    Ok(())
}

fn column_name(mut col: u32) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(3), "D");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
    }

    #[test]
    fn test_write_into_new_subject_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ID12/ID12_FMA_SCORE.xlsx");
        write_xlsx(&path, &score_sheet_cells("Right", &[("FMA17 shoulder", 2.0, 1.0)])).unwrap();

        let sheet = crate::workbook::read_first_sheet(&path).unwrap();
        assert_eq!(sheet.text(SIDE_CELL.0, SIDE_CELL.1), Some("Right"));
        assert_eq!(sheet.text(*SCORE_ROWS.start(), LABEL_COL), Some("FMA17 shoulder"));
    }
}
