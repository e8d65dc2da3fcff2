use crate::domain::{Dataset, Point};
use crate::error::{Error, Result};

/// Access to an indexed collection of datasets (`@0`, `@1`, ...).
///
/// A transformation commits its result with exactly one write: `replace`,
/// `clear`, `append` or `append_new`. Each of them must either take full
/// effect or fail without changing anything.
pub trait DatasetProvider {
    fn dataset(&self, index: usize) -> Option<&Dataset>;

    fn set_points(&mut self, index: usize, points: Vec<Point>) -> Result<()>;

    fn set_title(&mut self, index: usize, title: String) -> Result<()>;

    /// Replace points and title of a dataset in one step.
    fn replace(&mut self, index: usize, dataset: Dataset) -> Result<()>;

    /// Remove all points (and the title) of a dataset, keeping its slot.
    fn clear(&mut self, index: usize) -> Result<()>;

    /// Append an empty dataset and return its index.
    fn append_new(&mut self) -> usize;

    /// Append `dataset` and return its index.
    fn append(&mut self, dataset: Dataset) -> usize;

    fn count(&self) -> usize;
}

/// In-memory dataset collection.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    datasets: Vec<Dataset>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datasets(datasets: Vec<Dataset>) -> Self {
        Self { datasets }
    }

    /// Append a dataset and return its index.
    pub fn push(&mut self, dataset: Dataset) -> usize {
        self.datasets.push(dataset);
        self.datasets.len() - 1
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    fn slot(&mut self, index: usize) -> Result<&mut Dataset> {
        self.datasets.get_mut(index).ok_or(Error::NoSuchDataset(index))
    }
}

impl DatasetProvider for DataStore {
    fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.datasets.get(index)
    }

    fn set_points(&mut self, index: usize, points: Vec<Point>) -> Result<()> {
        self.slot(index)?.points = points;
        Ok(())
    }

    fn set_title(&mut self, index: usize, title: String) -> Result<()> {
        self.slot(index)?.title = title;
        Ok(())
    }

    fn replace(&mut self, index: usize, dataset: Dataset) -> Result<()> {
        *self.slot(index)? = dataset;
        Ok(())
    }

    fn clear(&mut self, index: usize) -> Result<()> {
        self.replace(index, Dataset::default())
    }

    fn append_new(&mut self) -> usize {
        self.push(Dataset::default())
    }

    fn append(&mut self, dataset: Dataset) -> usize {
        self.push(dataset)
    }

    fn count(&self) -> usize {
        self.datasets.len()
    }
}
