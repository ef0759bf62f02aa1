pub mod enrich;
pub mod etl;
pub mod merge;
pub mod normalize;
pub mod pipeline;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{BookErrorPolicy, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
