/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/
use crate::error::AppError;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Writes an instrument listing to disk.
///
/// `json_path` receives the whole array as JSON and `list_path` one ticker
/// symbol per line. Instruments without a `symbol` string are left out of the
/// symbol list.
///
/// # Returns
/// The number of symbols written to `list_path`
pub fn export_instruments(
    instruments: &[Value],
    json_path: impl AsRef<Path>,
    list_path: impl AsRef<Path>,
) -> Result<usize, AppError> {
    let mut json_file = BufWriter::new(File::create(json_path.as_ref())?);
    serde_json::to_writer(&mut json_file, instruments)?;
    json_file.flush()?;

    let mut list_file = BufWriter::new(File::create(list_path.as_ref())?);
    let mut written = 0;
    for instrument in instruments {
        match instrument.get("symbol").and_then(Value::as_str) {
            Some(symbol) => {
                writeln!(list_file, "{symbol}")?;
                written += 1;
            }
            None => warn!("Instrument without symbol skipped: {}", instrument),
        }
    }
    list_file.flush()?;

    debug!(
        "Exported {} instruments ({} symbols) to {}",
        instruments.len(),
        written,
        json_path.as_ref().display()
    );
    Ok(written)
}
