//! Plain-text table rendering.

use nursedesk_core::{NurseRecord, SortColumn, SortDirection, SortState};

const ID_HEADER: &str = "ID";

fn header(column: SortColumn, sort: SortState) -> String {
    match sort.active() {
        Some((active, SortDirection::Ascending)) if active == column => format!("{} ^", column.label()),
        Some((active, SortDirection::Descending)) if active == column => format!("{} v", column.label()),
        _ => column.label().to_string(),
    }
}

fn cells(record: &NurseRecord) -> [String; 5] {
    [
        record.id.to_string(),
        record.name.clone(),
        record.license_number.clone(),
        record.dob_string(),
        record.age.to_string(),
    ]
}

/// Renders `rows` under a header that marks the sorted column.
pub fn table(rows: &[NurseRecord], sort: SortState) -> String {
    let mut headers = vec![ID_HEADER.to_string()];
    headers.extend(SortColumn::ALL.iter().map(|c| header(*c, sort)));

    let body: Vec<[String; 5]> = rows.iter().map(cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![format_line(&headers)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &body {
        out.push(format_line(row));
    }
    if body.is_empty() {
        out.push("(no nurses)".to_string());
    }
    out.join("\n")
}
