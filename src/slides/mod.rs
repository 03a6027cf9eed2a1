pub(crate) mod deck;
pub(crate) mod slide;
