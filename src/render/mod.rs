pub(crate) mod batch;
pub(crate) mod blend;
pub(crate) mod cache;
pub(crate) mod compositor;
pub(crate) mod encode;
pub(crate) mod pipeline;
