//! # Query Models Module
//!
//! 리포지토리 조회 조건을 표현하는 값 객체들입니다.
//! 호출자는 저장소 전용 쿼리 문법 대신 이 타입들만 사용합니다.
//!
//! - [`sort`] - 정렬 조건 (`Sort`, `Order`, `Direction`)
//! - [`page`] - 페이지 요청과 결과 (`PageRequest`, `Page`)
//! - [`example`] - 쿼리 바이 예제 (`Example`)

pub mod example;
pub mod page;
pub mod sort;

pub use example::Example;
pub use page::{Page, PageRequest};
pub use sort::{Direction, Order, Sort};
