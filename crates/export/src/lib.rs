//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

fn optional(index: Option<usize>) -> String {
    index.map(|i| i.to_string()).unwrap_or_default()
}

pub mod events {
    use std::io::{self, Write};

    use super::optional;

    const HEADER: &str = "agent,role,time_days,event,target,captured,released,score,propellant_kg,delta_v_km_s,wait_days,refuels_remaining,a_km,inc_deg,raan_deg";

    /// Write the event-log CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row of a servicing agent's event log.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub agent: &'a str,
        pub role: &'a str,
        pub time_days: f64,
        pub event: &'a str,
        /// Target identifier, empty when the event concerns none.
        pub target: &'a str,
        pub captured: Option<usize>,
        pub released: Option<usize>,
        pub score: f64,
        pub propellant_kg: f64,
        pub delta_v_km_s: f64,
        pub wait_days: f64,
        pub refuels_remaining: u32,
        pub a_km: f64,
        pub inc_deg: f64,
        pub raan_deg: f64,
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.6},{},{},{},{},{:.6},{:.3},{:.6},{:.6},{},{:.3},{:.4},{:.4}",
                self.agent,
                self.role,
                self.time_days,
                self.event,
                self.target,
                optional(self.captured),
                optional(self.released),
                self.score,
                self.propellant_kg,
                self.delta_v_km_s,
                self.wait_days,
                self.refuels_remaining,
                self.a_km,
                self.inc_deg,
                self.raan_deg,
            )
        }
    }
}

pub mod profiles {
    use std::io::{self, Write};

    const HEADER: &str = "agent,time_days,raan_deg";

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One node-angle sample of an agent's RAAN history.
    #[derive(Debug, Clone, Copy)]
    pub struct Record<'a> {
        pub agent: &'a str,
        pub time_days: f64,
        pub raan_deg: f64,
    }

    impl Record<'_> {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{:.6},{:.6}",
                self.agent, self.time_days, self.raan_deg
            )
        }
    }
}

pub mod matrix {
    use std::io::{self, Write};

    /// Write a square matrix as CSV with `labels` as both the header row and first column.
    pub fn write_square(
        writer: &mut dyn Write,
        corner: &str,
        labels: &[&str],
        values: &[Vec<f64>],
    ) -> io::Result<()> {
        write!(writer, "{}", corner)?;
        for label in labels {
            write!(writer, ",{}", label)?;
        }
        writeln!(writer)?;
        for (label, row) in labels.iter().zip(values) {
            write!(writer, "{}", label)?;
            for value in row {
                write!(writer, ",{:.6}", value)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

pub mod summary {
    use std::fs::{self, File};
    use std::io::{self, BufWriter};
    use std::path::Path;

    use chrono::{SecondsFormat, Utc};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize> {
        generated_utc: String,
        tool: &'a str,
        #[serde(flatten)]
        body: &'a T,
    }

    /// Write `body` as pretty JSON, stamped with the generation time and producing tool.
    pub fn write_json<T: Serialize>(path: &Path, tool: &str, body: &T) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let envelope = Envelope {
            generated_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tool,
            body,
        };
        let writer = BufWriter::new(File::create(path)?);
        to_writer_pretty(writer, &envelope)?;
        Ok(())
    }
}
