pub mod product;
pub mod proposal;
pub mod shipping;
