use std::fmt::{self, Write};

use super::Table;
use crate::common::PRINT_ROW_LIMIT;

impl Table {
    /// Renders the component structure and annotations as a text block.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_description(&mut out);
        out
    }

    fn write_description(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "table: {} components, {} of {} records valid, record length {} bytes",
            self.components.len(),
            self.valid,
            self.capacity,
            self.record_len
        )?;
        if !self.components.is_empty() {
            writeln!(
                out,
                "{:>5}  {:<24} {:>7} {:>6} {:>6}  {}",
                "comp", "name", "offset", "bytes", "code", "type"
            )?;
            for (i, c) in self.components.iter().enumerate() {
                writeln!(
                    out,
                    "{:>5}  {:<24} {:>7} {:>6} {:>6}  {}",
                    i,
                    c.name(),
                    c.offset(),
                    c.size(),
                    c.component_type().code(),
                    c.component_type()
                )?;
            }
        }

        let a = &self.annotations;
        writeln!(
            out,
            "rate {} ms, window {} ms, offset {} ms, descr {:?}",
            a.rate, a.window, a.offset, a.descr
        )?;
        if let Some(rtext) = &a.rtext {
            writeln!(out, "rtext: {}", rtext)?;
        }
        if let Some(vrtext) = &a.vrtext {
            writeln!(out, "vrtext: {}", vrtext)?;
        }
        Ok(())
    }
}

/// Prints the valid records, one per line, with a header of component
/// names. Output stops after `PRINT_ROW_LIMIT` records.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "rec")?;
        for c in &self.components {
            write!(f, " {:>12}", c.name())?;
        }
        writeln!(f)?;

        for r in 0..self.valid.min(PRINT_ROW_LIMIT) {
            write!(f, "{:>6}", r)?;
            for j in 0..self.components.len() {
                write!(f, " {:>12}", self.fetch_text(r, j))?;
            }
            writeln!(f)?;
        }
        if self.valid > PRINT_ROW_LIMIT {
            writeln!(f, "   ... {} more records", self.valid - PRINT_ROW_LIMIT)?;
        }
        Ok(())
    }
}
