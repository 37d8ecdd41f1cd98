pub(crate) mod rasterizer;
pub(crate) mod surface;
