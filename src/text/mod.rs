pub(crate) mod font;
pub(crate) mod library;
pub(crate) mod shaper;
