pub mod aggregate;
pub mod calculator;
pub mod cost;
pub mod etl;
pub mod filters;
pub mod pipeline;
pub mod problems;
pub mod rows;
pub mod summary;
pub mod timestamp;
pub mod validator;

pub use crate::domain::model::{CostReport, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
