pub mod fiscal_data;
pub mod util;

pub use fiscal_data::FiscalDataClient;
pub use util::{Delay, RetryPolicy, TokioDelay};
