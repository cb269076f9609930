use anyhow::{Context, Result, bail};
use ndarray::ArrayView1;
use std::io::Write;

/// Presentation of one or more labelled daily series.
pub trait View {
    fn show(&mut self, title: &str, series: &[(&str, ArrayView1<f64>)]) -> Result<()>;
}

/// Renders series as a plain text table, one line per day.
pub struct ConsoleView<W: Write> {
    writer: W,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> View for ConsoleView<W> {
    fn show(&mut self, title: &str, series: &[(&str, ArrayView1<f64>)]) -> Result<()> {
        let n_days = series.first().map_or(0, |(_, vals)| vals.len());
        if series.iter().any(|(_, vals)| vals.len() != n_days) {
            bail!("all series must have {n_days} days");
        }

        writeln!(self.writer, "#{title}:")?;
        write!(self.writer, "#{:>5}", "day")?;
        for (label, _) in series {
            write!(self.writer, " {label:>16}")?;
        }
        writeln!(self.writer)?;

        for i_day in 0..n_days {
            write!(self.writer, " {i_day:>5}")?;
            for (_, vals) in series {
                write!(self.writer, " {:>16.8}", vals[i_day])?;
            }
            writeln!(self.writer)?;
        }
        writeln!(self.writer)?;

        self.writer.flush().context("failed to flush writer stream")?;
        Ok(())
    }
}
