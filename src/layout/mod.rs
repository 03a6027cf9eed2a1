pub(crate) mod autofit;
