mod error;
pub mod messages;
mod mock_data;
mod operations;
mod requests;
mod types;
mod view;

pub use error::SushiError;
pub use mock_data::generate_seed_sushi;
pub use operations::{filter_sushi, sort_sushi, validate_sushi};
pub use requests::{CreateSushiRequest, SushiQueryParams};
pub use types::{Sushi, SushiData, SushiType};
pub use view::ListView;
