pub(crate) mod color;
pub(crate) mod compositor;
pub(crate) mod deform;
pub(crate) mod noise;
