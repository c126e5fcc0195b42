//! 스크리닝을 위한 도메인 모델.

mod data_source;
mod fundamentals;
mod indicator_set;
mod market_data;
mod report;
mod score;

pub use data_source::*;
pub use fundamentals::*;
pub use indicator_set::*;
pub use market_data::*;
pub use report::*;
pub use score::*;
