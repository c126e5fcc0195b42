//! 스크리너 전반에서 사용되는 공통 타입.

mod decimal;
mod interval;
mod period;
mod ticker;

pub use decimal::*;
pub use interval::*;
pub use period::*;
pub use ticker::*;
