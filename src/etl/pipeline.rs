//! Pipeline orchestration for acquire/convert operations

use super::{Acquirer, Converter, DataCarrier};
use crate::error::Result;

/// Pipeline that runs an acquisition stage into a conversion stage,
/// threading a [`DataCarrier`] between them.
///
/// The pipeline owns the stage boundary invariant: a converter only ever
/// sees the `Paths` carrier variant, validated before the conversion stage
/// runs rather than inside it.
///
/// # Type Parameters
/// - `A`: Acquirer type
/// - `C`: Converter type
///
/// # Example
/// ```no_run
/// use corral::etl::Pipeline;
/// # use corral::etl::{Acquirer, Converter};
/// # use corral::error::Result;
/// # use polars::prelude::*;
/// # use std::path::PathBuf;
/// # struct MySource;
/// # impl Acquirer for MySource {
/// #     async fn fetch(&self, _force: bool) -> Result<Vec<PathBuf>> { Ok(vec![]) }
/// # }
/// # struct MyConverter;
/// # impl Converter for MyConverter {
/// #     fn convert(&self, _inputs: &[PathBuf], _force: bool) -> Result<DataFrame> {
/// #         Ok(DataFrame::empty())
/// #     }
/// # }
///
/// # async fn example() -> Result<()> {
/// let pipeline = Pipeline::new(MySource, MyConverter);
///
/// let carrier = pipeline.run(false).await?;
/// let table = carrier.into_table()?;
/// println!("Converted {} rows", table.height());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<A, C> {
    acquirer: A,
    converter: C,
}

impl<A, C> Pipeline<A, C>
where
    A: Acquirer,
    C: Converter,
{
    /// Create a new pipeline
    pub fn new(acquirer: A, converter: C) -> Self {
        Self {
            acquirer,
            converter,
        }
    }

    /// Run the complete pipeline
    ///
    /// Steps:
    /// 1. Acquire raw files into the source's destination directory
    /// 2. Wrap the resulting paths in a carrier
    /// 3. Convert the files into a columnar table
    ///
    /// `force` is threaded through to both stages, bypassing their caches.
    ///
    /// Returns a carrier holding the converted table.
    ///
    /// # Errors
    /// Returns an error if either stage fails
    pub async fn run(&self, force: bool) -> Result<DataCarrier> {
        log::info!("Starting pipeline (force: {})", force);

        log::debug!("Acquiring from source...");
        let paths = self.acquirer.fetch(force).await?;
        let carrier = DataCarrier::Paths(paths);
        log::info!("Acquired: {}", carrier);

        if carrier.as_paths().is_some_and(|paths| paths.is_empty()) {
            log::warn!("Source produced no files, skipping conversion");
            return Ok(carrier);
        }

        log::debug!("Converting to table...");
        let inputs = carrier.expect_paths()?;
        let table = self.converter.convert(inputs, force)?;
        let carrier = DataCarrier::Table(table);
        log::info!("Converted: {}", carrier);

        Ok(carrier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use polars::prelude::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSource(Vec<PathBuf>);

    impl Acquirer for MockSource {
        async fn fetch(&self, _force: bool) -> Result<Vec<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl Acquirer for FailingSource {
        async fn fetch(&self, _force: bool) -> Result<Vec<PathBuf>> {
            Err(PipelineError::SourceUnavailable("connection refused".into()))
        }
    }

    struct CountingConverter(AtomicUsize);

    impl Converter for CountingConverter {
        fn convert(&self, inputs: &[PathBuf], _force: bool) -> Result<DataFrame> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(df!("input" => [inputs.len() as i64]).unwrap())
        }
    }

    #[tokio::test]
    async fn test_pipeline_produces_table_carrier() {
        let pipeline = Pipeline::new(
            MockSource(vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]),
            CountingConverter(AtomicUsize::new(0)),
        );

        let carrier = pipeline.run(false).await.unwrap();
        assert!(carrier.is_table());
        assert_eq!(carrier.as_table().unwrap().height(), 1);
    }

    #[tokio::test]
    async fn test_empty_source_skips_conversion() {
        let converter = CountingConverter(AtomicUsize::new(0));
        let pipeline = Pipeline::new(MockSource(vec![]), converter);

        let carrier = pipeline.run(false).await.unwrap();
        assert!(carrier.is_paths());
        assert_eq!(pipeline.converter.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let pipeline = Pipeline::new(FailingSource, CountingConverter(AtomicUsize::new(0)));

        let err = pipeline.run(false).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(pipeline.converter.0.load(Ordering::SeqCst), 0);
    }
}
