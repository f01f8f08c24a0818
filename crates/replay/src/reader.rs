//! JSON-lines event input and output.

use poc_core::{Error, MarketEvent, PocAverage, Result};
use std::io::{BufRead, Write};

/// Decode one `MarketEvent` per non-blank line.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<MarketEvent>> {
    let mut events = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = serde_json::from_str(trimmed)
            .map_err(|e| Error::data(format!("line {}: {e}", line_no + 1)))?;
        events.push(event);
    }

    Ok(events)
}

/// Write outputs as JSON lines.
pub fn write_outputs<W: Write>(mut writer: W, outputs: &[PocAverage]) -> Result<()> {
    for output in outputs {
        serde_json::to_writer(&mut writer, output)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
