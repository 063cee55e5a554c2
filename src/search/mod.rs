//! Search wire types shared by the controller and the backend client

pub mod record;

pub(crate) use record::OrderRequest;
pub use record::{OrderResponse, OrderUpdate, RankingMode, ResultRecord, SearchPayload};
