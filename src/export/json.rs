//! JSON rendering of result tables: a pretty-printed array of objects keyed by column name.

use crate::records::ReportRow;

pub fn render_json<T: ReportRow>(rows: &[T]) -> Result<Vec<u8>, String> {
    let mut out = serde_json::to_vec_pretty(rows).map_err(|e| e.to_string())?;
    out.push(b'\n');
    Ok(out)
}
