//! Analysis of a whole collection of inflammation datasets.

use crate::error::Error;
use crate::source::DataSource;
use crate::stats::{daily_max, daily_mean, daily_min, daily_std_dev};
use crate::view::View;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::Serialize;

/// Standard deviation by day, across datasets, of the daily mean
/// inflammation of each dataset.
///
/// # Errors
/// Errors from the data source are returned unchanged. Datasets with a
/// different number of days give an [`Error::Shape`].
pub fn analyse_data(source: &dyn DataSource) -> Result<Array1<f64>, Error> {
    let data = source.load_inflammation_data()?;
    log::info!("loaded {} datasets", data.len());

    compute_standard_deviation_by_day(&data)
}

/// Same as [`analyse_data`], then show the result through `view`.
///
/// The result does not depend on the view; a failing view is only logged.
pub fn analyse_and_show(
    source: &dyn DataSource,
    view: &mut dyn View,
) -> Result<Array1<f64>, Error> {
    let std_dev = analyse_data(source)?;

    let title = "daily standard deviation of mean inflammation";
    if let Err(error) = view.show(title, &[("std_dev", std_dev.view())]) {
        log::warn!("failed to show results: {error:#}");
    }

    Ok(std_dev)
}

pub fn compute_standard_deviation_by_day(data: &[Array2<f64>]) -> Result<Array1<f64>, Error> {
    if data.is_empty() {
        return Err(Error::Shape(
            "cannot stack an empty collection of datasets".to_string(),
        ));
    }

    let means: Vec<_> = data.iter().map(|table| daily_mean(table.view())).collect();
    let views: Vec<_> = means.iter().map(|mean| mean.view()).collect();
    let means_by_day = ndarray::stack(Axis(0), &views).map_err(|err| {
        Error::Shape(format!("daily means must all have the same length: {err}"))
    })?;
    log::debug!("stacked daily means with shape {:?}", means_by_day.dim());

    Ok(daily_std_dev(means_by_day.view(), 0.0))
}

/// Daily mean, maximum and minimum of one dataset.
#[derive(Debug, PartialEq, Serialize)]
pub struct DailySummary {
    pub mean: Vec<f64>,
    pub max: Vec<f64>,
    pub min: Vec<f64>,
}

impl DailySummary {
    pub fn new(table: ArrayView2<f64>) -> Self {
        Self {
            mean: daily_mean(table).to_vec(),
            max: daily_max(table).to_vec(),
            min: daily_min(table).to_vec(),
        }
    }

    pub fn show(&self, title: &str, view: &mut dyn View) -> anyhow::Result<()> {
        view.show(
            title,
            &[
                ("mean", self.mean.as_slice().into()),
                ("max", self.max.as_slice().into()),
                ("min", self.min.as_slice().into()),
            ],
        )
    }
}
