pub(crate) mod placement;
pub(crate) mod units;
