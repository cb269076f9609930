use crate::analysis::{DailySummary, analyse_and_show};
use crate::config::Config;
use crate::normalise::patient_normalise;
use crate::source::{DataFormat, data_source};
use crate::view::{ConsoleView, View};
use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct Manager {
    data_dir: PathBuf,
    cfg: Config,
}

#[derive(Serialize)]
struct AnalysisResults {
    daily_std_dev: Vec<f64>,
}

#[derive(Serialize)]
struct DatasetStats {
    dataset: usize,
    #[serde(flatten)]
    summary: DailySummary,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        let cfg = Config::from_dir(&data_dir).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { data_dir, cfg })
    }

    pub fn run_analysis(&self) -> Result<()> {
        let source = data_source(self.cfg.source.format, &self.data_dir);

        let mut view = ConsoleView::new(io::stdout());
        let daily_std_dev =
            analyse_and_show(&*source, &mut view).context("failed to analyse data")?;

        let results = AnalysisResults {
            daily_std_dev: daily_std_dev.to_vec(),
        };
        save_json(self.results_file(), &results).context("failed to save results")?;

        Ok(())
    }

    pub fn run_statistics(&self) -> Result<()> {
        let data = data_source(self.cfg.source.format, &self.data_dir)
            .load_inflammation_data()
            .context("failed to load inflammation data")?;

        let mut view = ConsoleView::new(io::stdout());
        let stats = summarise_datasets(&data, &mut view);

        save_json(self.stats_file(), &stats).context("failed to save statistics")?;

        Ok(())
    }

    pub fn normalise_file(&self, file: &Path, output: &Path) -> Result<()> {
        let format = DataFormat::from_path(file).unwrap_or(self.cfg.source.format);

        let table = format
            .load(file)
            .with_context(|| format!("failed to load {file:?}"))?;
        let normalised = patient_normalise(&table).context("failed to normalise table")?;

        let out = File::create(output).with_context(|| format!("failed to create {output:?}"))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(out));
        for row in normalised.rows() {
            writer
                .write_record(row.iter().map(|val| val.to_string()))
                .context("failed to write row")?;
        }
        writer.flush().context("failed to flush writer stream")?;
        log::info!("wrote {output:?}");

        Ok(())
    }

    fn results_file(&self) -> PathBuf {
        self.data_dir.join(&self.cfg.output.results_file)
    }

    fn stats_file(&self) -> PathBuf {
        self.data_dir.join(&self.cfg.output.stats_file)
    }
}

/// Summarise every dataset; a failing view is only logged.
fn summarise_datasets(data: &[Array2<f64>], view: &mut dyn View) -> Vec<DatasetStats> {
    data.iter()
        .enumerate()
        .map(|(dataset, table)| {
            let summary = DailySummary::new(table.view());
            if let Err(error) = summary.show(&format!("dataset {dataset}"), view) {
                log::warn!("failed to show statistics: {error:#}");
            }
            DatasetStats { dataset, summary }
        })
        .collect()
}

fn save_json<P: AsRef<Path>, T: Serialize>(file: P, value: &T) -> Result<()> {
    let file = file.as_ref();
    let out = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = BufWriter::new(out);

    serde_json::to_writer_pretty(&mut writer, value).context("failed to serialize value")?;
    writer.flush().context("failed to flush writer stream")?;
    log::info!("wrote {file:?}");

    Ok(())
}
